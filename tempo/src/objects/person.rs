/// A plain value type; its `Debug` output is its representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_shows_every_field() {
        let person = Person::new("Omar", 30);

        assert_eq!(format!("{person:?}"), r#"Person { name: "Omar", age: 30 }"#);
    }
}
