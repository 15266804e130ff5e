//! Lessons 1 to 5: deferred values, rejection, chaining, cleanup and joint
//! waits.

use super::{LessonContext, LessonFuture};
use crate::deferred::{self, Deferred, finally};
use crate::output::Output;

use std::convert::Infallible;
use std::fmt;

use tracing::warn;

/// 1: resolve with `Success` after 2000 ms.
pub(super) fn delayed_success(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let success = deferred::resolve_after::<_, Infallible>(cx.delay(2000), "Success");

        match success.await {
            Ok(message) => cx.out.say("1", message),
            Err(rejection) => warn!(lesson = 1, %rejection, "deferred value did not resolve"),
        }
    })
}

/// 2: reject with `Something went wrong` after 1000 ms, and handle it.
pub(super) fn delayed_failure(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let failure = deferred::reject_after::<(), _>(cx.delay(1000), "Something went wrong");

        if let Err(rejection) = failure.await {
            cx.out.error("2", rejection);
        }
    })
}

/// 3: produce 5, double it in a second step.
pub(super) fn two_step_chain(cx: LessonContext) -> LessonFuture {
    let first = || deferred::resolved::<i64, Infallible>(5);
    let double = |x: i64| deferred::resolved::<i64, Infallible>(x * 2);

    Box::pin(async move {
        let chain = async {
            let a = first().await?;
            cx.out.say("3A", a);

            let b = double(a).await?;
            cx.out.say("3B", b);

            Ok::<_, deferred::Rejection<Infallible>>(())
        };

        if let Err(rejection) = chain.await {
            warn!(lesson = 3, %rejection, "chain broke");
        }
    })
}

/// 4: print the value of a 500 ms deferred, then always print the cleanup
/// marker.
pub(super) fn guaranteed_cleanup(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let done = deferred::resolve_after::<_, Infallible>(cx.delay(500), "Done");
        value_then_cleanup(cx.out.clone(), done).await;
    })
}

/// Prints `value` under label `4` (or its failure on stderr), then
/// `4: finally executed` in both cases.
pub async fn value_then_cleanup<T, E>(out: Output, value: Deferred<T, E>)
where
    T: fmt::Display,
    E: fmt::Display,
{
    let print = {
        let out = out.clone();
        async move {
            match value.await {
                Ok(v) => out.say("4", v),
                Err(rejection) => {
                    warn!(lesson = 4, %rejection, "value step failed");
                    out.error("4", rejection);
                }
            }
        }
    };

    finally(print, move || out.say("4", "finally executed")).await;
}

/// 5: fetch the post and the user together; all or nothing.
pub(super) fn parallel_fetch(cx: LessonContext) -> LessonFuture {
    Box::pin(async move {
        let endpoints = &cx.config.endpoints;
        let requests = vec![
            cx.fetch.get_json(&endpoints.post),
            cx.fetch.get_json(&endpoints.user),
        ];

        match deferred::try_join_all(requests).await {
            Ok(documents) => {
                for (name, document) in ["Post", "User"].into_iter().zip(documents) {
                    cx.out.say("5", format!("{name}: {document}"));
                }
            }
            Err(err) => {
                warn!(lesson = 5, error = %err, "fetch failed");
                cx.out.error("5", format!("Error: {err}"));
            }
        }
    })
}
