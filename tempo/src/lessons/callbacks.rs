//! Lessons 11 to 15: completion callbacks, nested callbacks, sequential
//! awaits and a sequential callback runner.
//!
//! Each lesson prints from inside its callbacks. The lesson future itself
//! only waits until the last callback has run.

use super::{LessonContext, LessonFuture};
use crate::callback::{self, Callback, Step};
use crate::deferred;
use crate::time::set_timeout;

use std::convert::Infallible;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

/// A row as a database would return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Items {
    pub items: Vec<i64>,
}

/// Calls `done` with Alice's record after `delay`.
pub fn read_from_db(delay: Duration, done: Callback<Record, Infallible>) {
    set_timeout(delay, move || {
        done(Ok(Record {
            id: 1,
            name: "Alice".to_string(),
        }))
    });
}

/// Calls `done` with `[1, 2, 3]` after `delay`.
pub fn fetch_data(delay: Duration, done: Callback<Items, Infallible>) {
    set_timeout(delay, move || {
        done(Ok(Items {
            items: vec![1, 2, 3],
        }))
    });
}

/// Calls `done` with every item doubled after `delay`.
pub fn process_data(data: Items, delay: Duration, done: Callback<Vec<i64>, Infallible>) {
    set_timeout(delay, move || {
        done(Ok(data.items.iter().map(|x| x * 2).collect()))
    });
}

/// Calls `done` with `Waited {ms}ms` after `delay`.
pub fn wait_and_run(ms: u64, delay: Duration, done: impl FnOnce(String) + Send + 'static) {
    set_timeout(delay, move || done(format!("Waited {ms}ms")));
}

/// A step that adds one to the running value after `delay`.
pub fn add_one(delay: Duration) -> Step<i64, Infallible> {
    Box::new(move |value, done| {
        set_timeout(delay, move || done(Ok(value + 1)));
    })
}

/// A step that triples the running value after `delay`.
pub fn triple(delay: Duration) -> Step<i64, Infallible> {
    Box::new(move |value, done| {
        set_timeout(delay, move || done(Ok(value * 3)));
    })
}

/// 11: print the record handed to a completion callback.
pub(super) fn single_callback(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let out = cx.out.clone();
        let delay = cx.delay(300);

        let finished = callback::into_deferred::<(), Infallible, _>(|done| {
            read_from_db(
                delay,
                Box::new(move |result| {
                    let Ok(record) = result;
                    out.say("11", record);
                    done(Ok(()));
                }),
            )
        });

        if let Err(rejection) = finished.await {
            warn!(lesson = 11, %rejection, "callback never ran");
        }
    })
}

/// 12: fetch, then process inside the fetch callback.
pub(super) fn callback_pipeline(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let out = cx.out.clone();
        let delay = cx.delay(200);

        let finished = callback::into_deferred::<(), Infallible, _>(|done| {
            fetch_data(
                delay,
                Box::new(move |result| {
                    let Ok(data) = result;

                    process_data(
                        data,
                        delay,
                        Box::new(move |result| {
                            let Ok(doubled) = result;
                            out.say("12", format!("{doubled:?}"));
                            done(Ok(()));
                        }),
                    );
                }),
            )
        });

        if let Err(rejection) = finished.await {
            warn!(lesson = 12, %rejection, "callback never ran");
        }
    })
}

/// 13: 1 -> +1 -> +1, each step awaited before the next.
pub(super) fn sequential_steps(cx: LessonContext) -> LessonFuture {
    let start = || deferred::resolved::<i64, Infallible>(1);
    let increment = |v: i64| deferred::resolved::<i64, Infallible>(v + 1);

    Box::pin(async move {
        let steps = async {
            let a = start().await?;
            let b = increment(a).await?;
            increment(b).await
        };

        match steps.await {
            Ok(c) => cx.out.say("13", c),
            Err(rejection) => warn!(lesson = 13, %rejection, "step failed"),
        }
    })
}

/// 14: a timer-driven callback with a message built from its delay.
pub(super) fn parameterized_callback(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let out = cx.out.clone();
        let delay = cx.delay(500);

        let finished = callback::into_deferred::<(), Infallible, _>(|done| {
            wait_and_run(500, delay, move |message| {
                out.say("14", message);
                done(Ok(()));
            })
        });

        if let Err(rejection) = finished.await {
            warn!(lesson = 14, %rejection, "callback never ran");
        }
    })
}

/// 15: `[+1, x3]` from 2, each step started by the previous callback.
pub(super) fn sequential_callbacks(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let out = cx.out.clone();
        let delay = cx.delay(100);

        let chain = callback::run_sequential(
            vec![add_one(delay), triple(delay)],
            2,
            move |index, value| out.say("15", format!("Callback {index} result: {value}")),
        );

        if let Err(rejection) = chain.await {
            warn!(lesson = 15, %rejection, "sequence stopped");
        }
    })
}
