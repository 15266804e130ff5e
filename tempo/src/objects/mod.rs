//! Small object models: value types, behavior, overriding, encapsulated
//! state and required capabilities.

mod account;
mod animal;
mod car;
mod person;
mod shape;

pub use account::BankAccount;
pub use animal::{Animal, Dog, GenericAnimal};
pub use car::Car;
pub use person::Person;
pub use shape::{Circle, Rectangle, Shape};
