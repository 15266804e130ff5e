//! Lessons 6 to 10: awaiting, recovery and joint waits in await style.

use super::{LessonContext, LessonFuture};
use crate::callback::{self, Callback};
use crate::deferred::{self, Deferred};
use crate::output::Output;
use crate::time::set_timeout;
use crate::try_join;

use std::convert::Infallible;
use std::time::Duration;

use tracing::warn;

/// 6: fetch the user and print it.
pub(super) fn sequential_await(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        match cx.fetch.get_json(&cx.config.endpoints.user).await {
            Ok(user) => cx.out.say("6", user),
            Err(err) => {
                warn!(lesson = 6, error = %err, "fetch failed");
                cx.out.error("6", format!("Fetch failed: {err}"));
            }
        }
    })
}

/// 7: fetch an unreachable endpoint and recover.
pub(super) fn await_with_recovery(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        match cx.fetch.get_json(&cx.config.endpoints.unreachable).await {
            Ok(document) => cx.out.say("7", document),
            Err(err) => {
                warn!(lesson = 7, error = %err, "fetch failed");
                cx.out.error("7", "Fetch failed");
            }
        }
    })
}

/// Completes `done` with `some data` once `delay` has passed.
fn read_data(delay: Duration, done: Callback<&'static str, Infallible>) {
    set_timeout(delay, move || done(Ok("some data")));
}

/// 8: await a callback-based timer through a deferred value.
pub(super) fn callback_awaited(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let delay = cx.delay(500);

        match callback::into_deferred(|done| read_data(delay, done)).await {
            Ok(data) => cx.out.say("8", data),
            Err(rejection) => warn!(lesson = 8, %rejection, "read_data never completed"),
        }
    })
}

/// 9: wait for `one` (300 ms) and `two` (200 ms) together.
pub(super) fn concurrent_delays(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let one = deferred::resolve_after(cx.delay(300), "one");
        let two = deferred::resolve_after(cx.delay(200), "two");

        print_in_definition_order(cx.out.clone(), one, two).await;
    })
}

/// Waits for both values and prints `9: first second`, whichever settled
/// first.
pub async fn print_in_definition_order(
    out: Output,
    first: Deferred<&'static str, Infallible>,
    second: Deferred<&'static str, Infallible>,
) {
    match try_join!(first, second) {
        Ok((a, b)) => out.say("9", format!("{a} {b}")),
        Err(rejection) => warn!(lesson = 9, %rejection, "joint wait failed"),
    }
}

/// 10: fetch the post and the user jointly; report one failure if any.
pub(super) fn concurrent_fetches(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let endpoints = &cx.config.endpoints;

        match try_join!(
            cx.fetch.get_json(&endpoints.post),
            cx.fetch.get_json(&endpoints.user)
        ) {
            Ok((post, user)) => cx.out.say("10", format!("{post} {user}")),
            Err(err) => {
                warn!(lesson = 10, error = %err, "fetch failed");
                cx.out.error("10", format!("One or more calls failed: {err}"));
            }
        }
    })
}
