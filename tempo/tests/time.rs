use tempo::task;
use tempo::time::{instrumented, set_timeout, sleep, timeout};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tempo::test]
async fn sleep_waits_at_least_the_duration() {
    let start = Instant::now();

    sleep(ms(30)).await;

    assert!(start.elapsed() >= ms(30));
}

#[tempo::test]
async fn sleeps_fire_in_deadline_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = [("300", 30), ("100", 10), ("200", 20)]
        .into_iter()
        .map(|(name, delay)| {
            let order = order.clone();
            task::spawn(async move {
                sleep(ms(delay)).await;
                order.lock().unwrap().push(name);
            })
        })
        .collect();

    for handle in handles {
        handle.await;
    }

    assert_eq!(*order.lock().unwrap(), ["100", "200", "300"]);
}

#[tempo::test]
async fn timeout_passes_through_a_fast_future() {
    let result = timeout(ms(200), async {
        sleep(ms(5)).await;
        123
    })
    .await;

    assert_eq!(result, Ok(123));
}

#[tempo::test]
async fn timeout_expires_on_a_slow_future() {
    let start = Instant::now();

    let result = timeout(ms(20), sleep(ms(500))).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "deadline has elapsed");
    assert!(start.elapsed() < ms(500));
}

#[tempo::test]
async fn unrepresentable_sleep_is_clamped_not_a_panic() {
    let forever = sleep(Duration::MAX);
    assert!(forever.deadline() > Instant::now() + Duration::from_secs(86_400 * 365));

    let result = timeout(ms(10), forever).await;
    assert!(result.is_err());
}

#[tempo::test]
async fn instrumented_measures_elapsed_time() {
    let (value, elapsed) = instrumented(async {
        sleep(ms(25)).await;
        "measured"
    })
    .await;

    assert_eq!(value, "measured");
    assert!(elapsed >= ms(25));
}

#[tempo::test]
async fn set_timeout_runs_the_callback_once_after_the_delay() {
    let start = Instant::now();
    let fired_at = Arc::new(Mutex::new(Vec::new()));

    let f = fired_at.clone();
    let handle = set_timeout(ms(20), move || f.lock().unwrap().push(Instant::now()));
    handle.await;

    let fired_at = fired_at.lock().unwrap();
    assert_eq!(fired_at.len(), 1);
    assert!(fired_at[0] - start >= ms(20));
}

#[tempo::test]
async fn aborted_set_timeout_never_fires() {
    let fired = Arc::new(AtomicBool::new(false));

    let f = fired.clone();
    let handle = set_timeout(ms(10), move || f.store(true, Ordering::SeqCst));
    handle.abort();

    sleep(ms(40)).await;

    assert!(!fired.load(Ordering::SeqCst));
}
