use tempo::http::{Fetch, FetchError, HttpClient};
use tempo::{task, time};

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::json;

/// Serves one canned response on a loopback port and hands back the base
/// URL plus the request text the server received.
fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");

        let mut request = Vec::new();
        let mut buffer = [0; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buffer).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..n]);
        }

        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8(request).unwrap()
    });

    (format!("http://{addr}"), server)
}

fn client() -> HttpClient {
    HttpClient::new(Duration::from_secs(5))
}

#[tempo::test]
async fn fetches_and_parses_json() {
    let (base, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 26\r\n\r\n{\"id\":1,\"name\":\"Leanne G\"}",
    );

    let user = client().get_json(&format!("{base}/users/1")).await.unwrap();
    assert_eq!(user, json!({"id": 1, "name": "Leanne G"}));

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /users/1 HTTP/1.1\r\n"));
    assert!(request.contains(&format!("Host: {}\r\n", base.trim_start_matches("http://"))));
    assert!(request.contains("Connection: close\r\n"));
}

#[tempo::test]
async fn decodes_a_chunked_body() {
    let (base, server) = serve_once(
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n8\r\n{\"id\": 1\r\n1\r\n}\r\n0\r\n\r\n",
    );

    let post = client().get_json(&format!("{base}/posts/1")).await.unwrap();
    server.join().unwrap();

    assert_eq!(post, json!({"id": 1}));
}

#[tempo::test]
async fn non_success_status_is_an_error() {
    let (base, server) =
        serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 2\r\n\r\n{}");

    let err = client().get_json(&base).await.unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, FetchError::Status { status: 404, .. }), "{err}");
}

#[tempo::test]
async fn non_json_body_is_an_error() {
    let (base, server) = serve_once("HTTP/1.1 200 OK\r\n\r\n<html></html>");

    let err = client().get_json(&base).await.unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, FetchError::Json(_)), "{err}");
}

#[tempo::test]
async fn get_returns_the_raw_response() {
    let (base, server) = serve_once("HTTP/1.1 204 No Content\r\nX-Lesson: 6\r\n\r\n");

    let response = client().get(&base).await.unwrap();
    server.join().unwrap();

    assert_eq!(response.status(), 204);
    assert_eq!(response.header("x-lesson"), Some("6"));
    assert!(response.body().is_empty());
}

#[tempo::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let server = thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(300));
    });

    let client = HttpClient::new(Duration::from_millis(50));
    let err = client.get_json(&base).await.unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(50)));
}

#[tempo::test]
async fn refused_connection_is_an_io_error() {
    let base = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let err = client().get_json(&base).await.unwrap_err();

    assert!(matches!(err, FetchError::Io(_)), "{err}");
}

#[tempo::test]
async fn host_names_are_resolved() {
    let (base, server) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]");
    let port = base.rsplit(':').next().unwrap();

    let body = client()
        .get_json(&format!("http://localhost:{port}/"))
        .await
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(body, json!([]));
    assert!(request.contains(&format!("Host: localhost:{port}\r\n")));
}

#[tempo::test]
async fn lookup_is_bounded_by_the_timeout_and_leaves_timers_running() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = task::spawn({
        let ticks = ticks.clone();
        async move {
            for _ in 0..1000 {
                time::sleep(Duration::from_millis(5)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    let limit = Duration::from_millis(200);
    let start = Instant::now();
    let err = HttpClient::new(limit)
        .get_json("http://tempo-lookup-test.invalid/")
        .await
        .unwrap_err();
    let elapsed = start.elapsed();
    ticker.abort();

    assert!(
        matches!(err, FetchError::Resolve { .. } | FetchError::Timeout(_)),
        "{err}"
    );
    assert!(elapsed < limit + Duration::from_secs(1), "{elapsed:?}");
    if elapsed >= Duration::from_millis(50) {
        assert!(ticks.load(Ordering::SeqCst) > 0, "timers stalled during lookup");
    }
}

#[tempo::test]
async fn https_is_not_supported() {
    let err = client()
        .get_json("https://jsonplaceholder.typicode.com/posts/1")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UnsupportedScheme(s) if s == "https"));
}
