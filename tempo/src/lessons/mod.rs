//! The twenty lessons, their catalog and the driver that runs them.
//!
//! A lesson is a function from a [`LessonContext`] to a boxed future. The
//! context carries the only things a lesson touches from outside: where
//! its output goes, how it fetches JSON, and the configuration that
//! scales its delays and names its endpoints. Lessons share nothing else.

mod awaiting;
mod callbacks;
mod objects;
mod promises;

pub use awaiting::print_in_definition_order;
pub use callbacks::{
    Items, Record, add_one, fetch_data, process_data, read_from_db, triple, wait_and_run,
};
pub use promises::value_then_cleanup;

use crate::BoxFuture;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::Fetch;
use crate::output::Output;
use crate::runtime::task::JoinSet;
use crate::time::instrumented;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub type LessonFuture = BoxFuture<'static, ()>;

/// Everything a lesson may use.
#[derive(Clone)]
pub struct LessonContext {
    pub out: Output,
    pub fetch: Arc<dyn Fetch>,
    pub config: Arc<Config>,
}

impl LessonContext {
    pub fn new(out: Output, fetch: Arc<dyn Fetch>, config: Arc<Config>) -> Self {
        Self { out, fetch, config }
    }

    /// A lesson delay of `ms` milliseconds, scaled by the configuration.
    pub fn delay(&self, ms: u64) -> Duration {
        self.config.delay(ms)
    }
}

#[derive(Clone, Copy)]
pub struct Lesson {
    pub number: u8,
    pub title: &'static str,
    run: fn(LessonContext) -> LessonFuture,
}

impl Lesson {
    pub fn run(&self, cx: LessonContext) -> LessonFuture {
        (self.run)(cx)
    }
}

impl std::fmt::Debug for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lesson")
            .field("number", &self.number)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

const fn lesson(number: u8, title: &'static str, run: fn(LessonContext) -> LessonFuture) -> Lesson {
    Lesson { number, title, run }
}

static CATALOG: [Lesson; 20] = [
    lesson(1, "Delayed success", promises::delayed_success),
    lesson(2, "Delayed failure", promises::delayed_failure),
    lesson(3, "Two-step chain", promises::two_step_chain),
    lesson(4, "Guaranteed cleanup", promises::guaranteed_cleanup),
    lesson(5, "Parallel fetch-and-aggregate", promises::parallel_fetch),
    lesson(6, "Sequential await", awaiting::sequential_await),
    lesson(7, "Await with recovery", awaiting::await_with_recovery),
    lesson(8, "Callback-returning delay awaited", awaiting::callback_awaited),
    lesson(9, "Two concurrent delays", awaiting::concurrent_delays),
    lesson(10, "Two concurrent fetches with failure handling", awaiting::concurrent_fetches),
    lesson(11, "Single callback", callbacks::single_callback),
    lesson(12, "Two-stage callback pipeline", callbacks::callback_pipeline),
    lesson(13, "Three-step sequential await", callbacks::sequential_steps),
    lesson(14, "Parameterized delay callback", callbacks::parameterized_callback),
    lesson(15, "N-step sequential callback runner", callbacks::sequential_callbacks),
    lesson(16, "Value object construction", objects::value_object),
    lesson(17, "Object with behavior", objects::object_with_behavior),
    lesson(18, "Polymorphic dispatch", objects::polymorphic_dispatch),
    lesson(19, "Encapsulated mutable state", objects::encapsulated_state),
    lesson(20, "Abstract requirement and variants", objects::required_capability),
];

/// All lessons, in order.
pub fn catalog() -> &'static [Lesson] {
    &CATALOG
}

pub fn find(number: u8) -> Result<&'static Lesson> {
    CATALOG
        .iter()
        .find(|l| l.number == number)
        .ok_or(Error::UnknownLesson(number))
}

/// Resolves lesson numbers, or the whole catalog when `numbers` is empty.
pub fn select(numbers: &[u8]) -> Result<Vec<&'static Lesson>> {
    if numbers.is_empty() {
        return Ok(CATALOG.iter().collect());
    }

    numbers.iter().map(|&n| find(n)).collect()
}

/// How [`run_lessons`] schedules lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// All lessons start at once and interleave, as in a single process.
    #[default]
    Concurrent,
    /// Each lesson finishes before the next starts.
    Sequential,
}

/// Runs `lessons` on the current runtime and waits for all of them.
///
/// # Panics
///
/// Panics if called outside of a runtime context.
pub async fn run_lessons(lessons: Vec<&'static Lesson>, cx: LessonContext, mode: Mode) {
    debug!(count = lessons.len(), ?mode, "running lessons");

    match mode {
        Mode::Concurrent => {
            let mut set = JoinSet::new();
            for lesson in lessons {
                set.spawn(run_one(lesson, cx.clone()));
            }
            set.join_all().await;
        }
        Mode::Sequential => {
            for lesson in lessons {
                run_one(lesson, cx.clone()).await;
            }
        }
    }
}

async fn run_one(lesson: &'static Lesson, cx: LessonContext) {
    debug!(lesson = lesson.number, title = lesson.title, "lesson started");

    let ((), elapsed) = instrumented(lesson.run(cx)).await;

    debug!(lesson = lesson.number, ?elapsed, "lesson finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_numbered_one_to_twenty() {
        let numbers: Vec<u8> = catalog().iter().map(|l| l.number).collect();

        assert_eq!(numbers, (1..=20).collect::<Vec<u8>>());
    }

    #[test]
    fn unknown_lessons_are_rejected() {
        assert!(matches!(find(0), Err(Error::UnknownLesson(0))));
        assert!(matches!(select(&[3, 21]), Err(Error::UnknownLesson(21))));
        assert_eq!(select(&[]).unwrap().len(), 20);
    }
}
