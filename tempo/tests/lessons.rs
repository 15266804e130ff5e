use tempo::BoxFuture;
use tempo::RuntimeBuilder;
use tempo::config::{Config, TimingConfig};
use tempo::deferred;
use tempo::http::{Fetch, FetchError};
use tempo::lessons::{self, LessonContext, Mode};
use tempo::output::{Channel, Output, Transcript};

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

const SCALE: f64 = 0.01;

/// Answers from a fixed table; any other URL fails like an unknown host.
struct StubFetch {
    documents: HashMap<String, Result<Value, u16>>,
}

impl StubFetch {
    fn healthy(config: &Config) -> Self {
        let mut documents = HashMap::new();
        documents.insert(config.endpoints.post.clone(), Ok(post()));
        documents.insert(config.endpoints.user.clone(), Ok(user()));
        Self { documents }
    }

    fn user_down(config: &Config) -> Self {
        let mut stub = Self::healthy(config);
        stub.documents.insert(config.endpoints.user.clone(), Err(503));
        stub
    }
}

impl Fetch for StubFetch {
    fn get_json<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Value, FetchError>> {
        Box::pin(async move {
            tempo::yield_now().await;

            match self.documents.get(url) {
                Some(Ok(document)) => Ok(document.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    status: *status,
                    reason: "Service Unavailable".to_string(),
                }),
                None => Err(FetchError::Resolve {
                    host: url.to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "unknown host"),
                }),
            }
        })
    }
}

fn post() -> Value {
    json!({"id": 1, "title": "sunt aut facere"})
}

fn user() -> Value {
    json!({"id": 1, "name": "Leanne Graham"})
}

fn config() -> Config {
    Config {
        timing: TimingConfig { scale: SCALE },
        ..Config::default()
    }
}

fn run(numbers: &[u8], fetch: impl Fetch + 'static, mode: Mode) -> Transcript {
    let transcript = Transcript::new();
    let cx = LessonContext::new(
        Output::new(transcript.clone()),
        Arc::new(fetch),
        Arc::new(config()),
    );

    let selected = lessons::select(numbers).unwrap();
    let rt = RuntimeBuilder::new().build().unwrap();
    rt.block_on(lessons::run_lessons(selected, cx, mode));

    transcript
}

fn stdout(transcript: &Transcript) -> Vec<String> {
    transcript.rendered(Channel::Stdout)
}

fn stderr(transcript: &Transcript) -> Vec<String> {
    transcript.rendered(Channel::Stderr)
}

/// Asserts that `expected` appears in `lines` in that relative order.
fn assert_subsequence(lines: &[String], expected: &[&str]) {
    let positions: Vec<usize> = expected
        .iter()
        .map(|e| {
            lines
                .iter()
                .position(|l| l == e)
                .unwrap_or_else(|| panic!("missing line {e:?} in {lines:#?}"))
        })
        .collect();

    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "{expected:?} out of order in {lines:#?}"
    );
}

#[test]
fn all_lessons_print_their_lines_once() {
    let transcript = run(&[], StubFetch::healthy(&config()), Mode::Concurrent);

    let mut out = stdout(&transcript);
    out.sort();

    let mut expected = vec![
        "1: Success".to_string(),
        "3A: 5".to_string(),
        "3B: 10".to_string(),
        "4: Done".to_string(),
        "4: finally executed".to_string(),
        format!("5: Post: {}", post()),
        format!("5: User: {}", user()),
        format!("6: {}", user()),
        "8: some data".to_string(),
        "9: one two".to_string(),
        format!("10: {} {}", post(), user()),
        r#"11: {"id":1,"name":"Alice"}"#.to_string(),
        "12: [2, 4, 6]".to_string(),
        "13: 3".to_string(),
        "14: Waited 500ms".to_string(),
        "15: Callback 0 result: 3".to_string(),
        "15: Callback 1 result: 9".to_string(),
        r#"16: Person { name: "Omar", age: 30 }"#.to_string(),
        "17: Toyota Corolla started".to_string(),
        "18: Woof!".to_string(),
        "19: 120".to_string(),
        "20 Circle area: 28.27".to_string(),
        "20 Rectangle area: 20".to_string(),
    ];
    expected.sort();

    assert_eq!(out, expected);
    assert_eq!(
        stderr(&transcript),
        ["2: Something went wrong", "7: Fetch failed"]
    );
}

#[test]
fn concurrent_lessons_interleave_by_delay() {
    let transcript = run(&[1, 2, 4, 17], StubFetch::healthy(&config()), Mode::Concurrent);

    let order: Vec<String> = transcript.lines().iter().map(|l| l.to_string()).collect();

    assert_eq!(
        order,
        [
            "17: Toyota Corolla started",
            "4: Done",
            "4: finally executed",
            "2: Something went wrong",
            "1: Success",
        ]
    );
}

#[test]
fn sequential_mode_follows_the_requested_order() {
    let transcript = run(&[19, 3, 13], StubFetch::healthy(&config()), Mode::Sequential);

    assert_eq!(stdout(&transcript), ["19: 120", "3A: 5", "3B: 10", "13: 3"]);
}

#[test]
fn lesson_one_is_not_early() {
    let start = Instant::now();
    let transcript = run(&[1], StubFetch::healthy(&config()), Mode::Concurrent);

    let lines = transcript.timed_lines();
    assert_eq!(lines.len(), 1);

    let (at, line) = &lines[0];
    assert_eq!(line.to_string(), "1: Success");
    assert!(*at - start >= config().delay(2000));
}

#[test]
fn lesson_two_reports_the_failure_once_on_stderr() {
    let transcript = run(&[2], StubFetch::healthy(&config()), Mode::Concurrent);

    assert_eq!(stderr(&transcript), ["2: Something went wrong"]);
    assert!(stdout(&transcript).is_empty());
}

#[test]
fn chained_values_print_in_order() {
    let transcript = run(&[3], StubFetch::healthy(&config()), Mode::Concurrent);

    assert_eq!(stdout(&transcript), ["3A: 5", "3B: 10"]);
}

#[test]
fn cleanup_follows_the_value_on_success_and_failure() {
    let rt = RuntimeBuilder::new().build().unwrap();

    let success = Transcript::new();
    let out = Output::new(success.clone());
    rt.block_on(async move {
        let value = deferred::resolve_after::<_, String>(Duration::from_millis(5), "Done");
        lessons::value_then_cleanup(out, value).await;
    });
    assert_eq!(stdout(&success), ["4: Done", "4: finally executed"]);

    let failure = Transcript::new();
    let out = Output::new(failure.clone());
    rt.block_on(async move {
        let value = deferred::reject_after::<&str, _>(Duration::from_millis(5), "forced");
        lessons::value_then_cleanup(out, value).await;
    });
    assert_eq!(stderr(&failure), ["4: forced"]);
    assert_eq!(stdout(&failure), ["4: finally executed"]);

    let order: Vec<String> = failure.lines().iter().map(|l| l.to_string()).collect();
    assert_eq!(order, ["4: forced", "4: finally executed"]);
}

#[test]
fn fetch_failure_prints_one_error_and_no_partial_output() {
    let transcript = run(&[5, 10], StubFetch::user_down(&config()), Mode::Concurrent);

    assert!(stdout(&transcript).is_empty());

    let mut errors = stderr(&transcript);
    errors.sort();
    assert_eq!(
        errors,
        [
            "10: One or more calls failed: HTTP status 503 Service Unavailable",
            "5: Error: HTTP status 503 Service Unavailable",
        ]
    );
}

#[test]
fn unreachable_endpoint_is_recovered() {
    let transcript = run(&[7], StubFetch::healthy(&config()), Mode::Concurrent);

    assert_eq!(stderr(&transcript), ["7: Fetch failed"]);
    assert!(stdout(&transcript).is_empty());
}

#[test]
fn failed_user_fetch_in_lesson_six_goes_to_stderr() {
    let transcript = run(&[6], StubFetch::user_down(&config()), Mode::Concurrent);

    assert_eq!(
        stderr(&transcript),
        ["6: Fetch failed: HTTP status 503 Service Unavailable"]
    );
}

#[test]
fn joint_wait_prints_in_definition_order_for_any_timing() {
    let rt = RuntimeBuilder::new().build().unwrap();

    for (first, second) in [(30, 10), (10, 30), (0, 0), (15, 15)] {
        let transcript = Transcript::new();
        let out = Output::new(transcript.clone());

        rt.block_on(async move {
            let one = deferred::resolve_after(Duration::from_millis(first), "one");
            let two = deferred::resolve_after(Duration::from_millis(second), "two");
            lessons::print_in_definition_order(out, one, two).await;
        });

        assert_eq!(stdout(&transcript), ["9: one two"], "{first}ms / {second}ms");
    }
}

#[test]
fn callback_lessons_keep_their_internal_order() {
    let transcript = run(&[11, 12, 14, 15], StubFetch::healthy(&config()), Mode::Concurrent);
    let out = stdout(&transcript);

    assert_subsequence(&out, &["15: Callback 0 result: 3", "15: Callback 1 result: 9"]);
    assert_eq!(
        out.iter().filter(|l| l.starts_with("12:")).count(),
        1,
        "{out:#?}"
    );
    assert!(out.contains(&"14: Waited 500ms".to_string()));
}

#[test]
fn object_lessons_print_their_results() {
    let transcript = run(&[16, 17, 18, 19, 20], StubFetch::healthy(&config()), Mode::Sequential);

    assert_eq!(
        stdout(&transcript),
        [
            r#"16: Person { name: "Omar", age: 30 }"#,
            "17: Toyota Corolla started",
            "18: Woof!",
            "19: 120",
            "20 Circle area: 28.27",
            "20 Rectangle area: 20",
        ]
    );
}
