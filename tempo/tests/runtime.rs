use tempo::task::{self, JoinSet};
use tempo::time::sleep;
use tempo::{RuntimeBuilder, join, try_join, yield_now};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[test]
fn block_on_returns_the_output() {
    let rt = RuntimeBuilder::new().build().unwrap();

    assert_eq!(rt.block_on(async { 40 + 2 }), 42);
}

#[test]
fn tasks_spawned_before_block_on_run_inside_it() {
    let rt = RuntimeBuilder::new().tasks_per_tick(1).build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let handle = rt.spawn(async move {
        c.fetch_add(1, Ordering::SeqCst);
        "spawned"
    });

    assert_eq!(rt.block_on(handle), "spawned");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
#[should_panic(expected = "within the context of a tempo runtime")]
fn spawn_outside_a_runtime_panics() {
    let _ = task::spawn(async {});
}

#[tempo::test]
async fn join_handle_yields_task_output() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(5)).await;
        "done"
    });

    assert_eq!(handle.await, "done");
}

#[tempo::test]
async fn join_waits_for_every_future() {
    let start = Instant::now();

    let (a, b, c) = join!(
        async {
            sleep(Duration::from_millis(30)).await;
            "slow"
        },
        async {
            sleep(Duration::from_millis(10)).await;
            "fast"
        },
        async { 3 }
    );

    assert_eq!((a, b, c), ("slow", "fast", 3));
    assert!(start.elapsed() >= Duration::from_millis(30));
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tempo::test]
async fn join_single_future() {
    let value = join!(async { 7 });

    assert_eq!(value, 7);
}

#[tempo::test]
async fn try_join_collects_successes() {
    let result: Result<(i32, &str), String> = try_join!(async { Ok(1) }, async {
        sleep(Duration::from_millis(5)).await;
        Ok("two")
    });

    assert_eq!(result, Ok((1, "two")));
}

#[tempo::test]
async fn join_macros_keep_adjacent_words_apart() {
    let (a, b) = join!(
        match 2 as i32 {
            n => std::future::ready(n),
        },
        std::future::ready(3 as i64)
    );
    assert_eq!((a, b), (2, 3));

    let result: Result<(u64, u64), ()> = try_join!(
        match 5 as u64 {
            n => std::future::ready(Ok(n)),
        },
        async { Ok(1 as u64) }
    );
    assert_eq!(result, Ok((5, 1)));
}

#[tempo::test]
async fn try_join_returns_the_first_failure() {
    let start = Instant::now();

    let result: Result<((), ()), &str> = try_join!(
        async {
            sleep(Duration::from_millis(300)).await;
            Ok(())
        },
        async {
            sleep(Duration::from_millis(10)).await;
            Err("broken")
        }
    );

    assert_eq!(result, Err("broken"));
    assert!(start.elapsed() < Duration::from_millis(300));
}

#[tempo::test]
async fn yield_now_lets_queued_tasks_run_first() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let l = log.clone();
    let other = task::spawn(async move {
        l.lock().unwrap().push("spawned");
    });

    log.lock().unwrap().push("before");
    yield_now().await;
    log.lock().unwrap().push("after");

    other.await;
    assert_eq!(*log.lock().unwrap(), ["before", "spawned", "after"]);
}

#[tempo::test]
async fn abort_stops_a_sleeping_task() {
    let handle = task::spawn(async {
        sleep(Duration::from_millis(200)).await;
    });

    handle.abort();

    assert!(handle.is_finished());
}

#[tempo::test]
async fn joinset_join_all_waits_for_every_task() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut set = JoinSet::new();

    for ms in [30, 10, 20] {
        let c = counter.clone();
        set.spawn(async move {
            sleep(Duration::from_millis(ms)).await;
            c.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(set.len(), 3);
    set.join_all().await;

    assert!(set.is_empty());
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tempo::test]
async fn joinset_join_next_returns_the_first_finisher() {
    let finished = Arc::new(Mutex::new(Vec::new()));
    let mut set = JoinSet::new();

    for (name, ms) in [("slow", 200), ("fast", 10)] {
        let f = finished.clone();
        set.spawn(async move {
            sleep(Duration::from_millis(ms)).await;
            f.lock().unwrap().push(name);
        });
    }

    assert!(set.join_next().await.is_some());
    assert_eq!(*finished.lock().unwrap(), ["fast"]);
    assert_eq!(set.len(), 1);
}

#[tempo::test]
async fn joinset_abort_all_empties_the_set() {
    let mut set = JoinSet::new();
    set.spawn(async {
        sleep(Duration::from_millis(500)).await;
    });

    set.abort_all();

    assert!(set.is_empty());
    assert!(set.join_next().await.is_none());
}
