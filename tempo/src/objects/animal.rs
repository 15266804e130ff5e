/// Something that makes a sound.
///
/// `speak` has a default; implementors override it with their own.
pub trait Animal {
    fn speak(&self) -> String {
        "Some generic sound".to_string()
    }
}

/// An animal that keeps the default sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericAnimal;

impl Animal for GenericAnimal {}

#[derive(Debug, Clone, Copy, Default)]
pub struct Dog;

impl Animal for Dog {
    fn speak(&self) -> String {
        "Woof!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dog_overrides_the_default_sound() {
        let animals: [&dyn Animal; 2] = [&GenericAnimal, &Dog];

        let sounds: Vec<String> = animals.iter().map(|a| a.speak()).collect();

        assert_eq!(sounds, ["Some generic sound", "Woof!"]);
    }
}
