use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    make: String,
    model: String,
}

impl Car {
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
        }
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the start-up message, e.g. `Toyota Corolla started`.
    pub fn start(&self) -> String {
        format!("{self} started")
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.make, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_names_make_and_model() {
        let car = Car::new("Toyota", "Corolla");

        assert_eq!(car.start(), "Toyota Corolla started");
        assert_eq!((car.make(), car.model()), ("Toyota", "Corolla"));
    }
}
