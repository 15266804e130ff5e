use std::f64::consts::PI;

/// A plane figure.
///
/// `area` has no default body, so every shape must provide one. A shape
/// without it does not compile:
///
/// ```compile_fail
/// use tempo::objects::Shape;
///
/// struct Blob;
///
/// impl Shape for Blob {
///     fn name(&self) -> &'static str {
///         "Blob"
///     }
/// }
/// ```
pub trait Shape {
    fn name(&self) -> &'static str;

    fn area(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Shape for Circle {
    fn name(&self) -> &'static str {
        "Circle"
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Shape for Rectangle {
    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_area_rounds_to_two_places() {
        assert_eq!(format!("{:.2}", Circle::new(3.0).area()), "28.27");
    }

    #[test]
    fn rectangle_area_is_exact() {
        let area = Rectangle::new(4.0, 5.0).area();

        assert_eq!(area, 20.0);
        assert_eq!(area.to_string(), "20");
    }
}
