//! Lessons 16 to 20: object models.

use super::{LessonContext, LessonFuture};
use crate::objects::{Animal, BankAccount, Car, Circle, Dog, Person, Rectangle, Shape};

/// 16: print a value object's representation.
pub(super) fn value_object(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let person = Person::new("Omar", 30);
        cx.out.say("16", format!("{person:?}"));
    })
}

/// 17: call a method that uses the object's fields.
pub(super) fn object_with_behavior(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        cx.out.say("17", Car::new("Toyota", "Corolla").start());
    })
}

/// 18: dispatch `speak` through the trait.
pub(super) fn polymorphic_dispatch(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let animal: Box<dyn Animal + Send> = Box::new(Dog);
        cx.out.say("18", animal.speak());
    })
}

/// 19: mutate private state through methods only.
pub(super) fn encapsulated_state(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let mut account = BankAccount::new(100);
        account.deposit(50);
        account.withdraw(30);

        cx.out.say("19", account.balance());
    })
}

/// 20: two shapes providing the required `area`.
pub(super) fn required_capability(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let circle = Circle::new(3.0);
        cx.out.say(
            format!("20 {} area", circle.name()),
            format!("{:.2}", circle.area()),
        );

        let rectangle = Rectangle::new(4.0, 5.0);
        cx.out.say(format!("20 {} area", rectangle.name()), rectangle.area());
    })
}
