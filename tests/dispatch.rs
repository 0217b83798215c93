//! End-to-end dispatch tests over a real TCP socket
//!
//! Each test binds an ephemeral port, serves an application on a background
//! task and talks plain HTTP/1.1 over a `TcpStream`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use treeline::http::build_text_response;
use treeline::{Application, AssetHandler, PathParams, Router};

async fn start(app: Application) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(app.serve(listener));
    addr
}

/// Send one request with `Connection: close` and return the raw response.
async fn send(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8_lossy(&raw).into_owned()
}

/// Read one keep-alive response off the stream, using Content-Length for
/// body framing.
async fn read_response(stream: &mut TcpStream) -> (u16, String) {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        raw.extend_from_slice(&buf[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
    let content_length: usize = head
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().unwrap())
        })
        .unwrap_or(0);

    while raw.len() < header_end + content_length {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed mid-body");
        raw.extend_from_slice(&buf[..n]);
    }

    let body =
        String::from_utf8_lossy(&raw[header_end..header_end + content_length]).into_owned();
    (parse_status(&head), body)
}

fn parse_status(response: &str) -> u16 {
    response
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .expect("malformed status line")
}

fn parse_body(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map_or("", |(_, body)| body)
}

fn blog_router() -> Router {
    let mut router = Router::new();
    router.get("/", |_req, _params| async {
        Ok(build_text_response("home".to_string()))
    });
    router.get("/users/:id", |_req, params: PathParams| async move {
        Ok(build_text_response(params["id"].clone()))
    });
    router
}

#[tokio::test]
async fn test_registered_routes_answer() {
    let addr = start(Application::new().mount(blog_router())).await;

    let resp = send(addr, "GET", "/").await;
    assert_eq!(parse_status(&resp), 200);
    assert_eq!(parse_body(&resp), "home");

    let resp = send(addr, "GET", "/users/42").await;
    assert_eq!(parse_status(&resp), 200);
    assert_eq!(parse_body(&resp), "42");
}

#[tokio::test]
async fn test_unanswered_method_is_501() {
    let addr = start(Application::new().mount(blog_router())).await;

    let resp = send(addr, "POST", "/").await;
    assert_eq!(parse_status(&resp), 501);
    assert_eq!(parse_body(&resp), "");
}

#[tokio::test]
async fn test_trailing_slash_resolves_identically() {
    let mut router = Router::new();
    router.get("/items", |_req, _params| async {
        Ok(build_text_response("items".to_string()))
    });
    let addr = start(Application::new().mount(router)).await;

    for path in ["/items", "/items/"] {
        let resp = send(addr, "GET", path).await;
        assert_eq!(parse_status(&resp), 200, "path {path}");
        assert_eq!(parse_body(&resp), "items");
    }
}

#[tokio::test]
async fn test_failing_handler_is_500_with_empty_body() {
    let app = Application::new().mount_fn(|_req| async { Err("exploded".into()) });
    let addr = start(app).await;

    let resp = send(addr, "GET", "/").await;
    assert_eq!(parse_status(&resp), 500);
    assert_eq!(parse_body(&resp), "");
}

#[tokio::test]
async fn test_asset_fallback_answers_when_router_declines() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "plain notes").unwrap();

    let app = Application::new()
        .mount(blog_router())
        .mount(AssetHandler::new(dir.path()));
    let addr = start(app).await;

    let resp = send(addr, "GET", "/notes.txt").await;
    assert_eq!(parse_status(&resp), 200);
    assert_eq!(parse_body(&resp), "plain notes");

    let resp = send(addr, "GET", "/missing.txt").await;
    assert_eq!(parse_status(&resp), 404);
}

#[tokio::test]
async fn test_chain_short_circuit_counts_no_later_calls() {
    let later_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&later_calls);

    let app = Application::new()
        .mount(blog_router())
        .mount_fn(move |_req| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(build_text_response("fallback".to_string())))
            }
        });
    let addr = start(app).await;

    let resp = send(addr, "GET", "/").await;
    assert_eq!(parse_body(&resp), "home");
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);

    let resp = send(addr, "GET", "/unrouted").await;
    assert_eq!(parse_body(&resp), "fallback");
    assert_eq!(later_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sequential_requests_on_one_connection() {
    let addr = start(Application::new().mount(blog_router())).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    for id in ["1", "2", "3"] {
        let request =
            format!("GET /users/{id} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let (status, body) = read_response(&mut stream).await;
        assert_eq!(status, 200);
        assert_eq!(body, id);
    }
}

#[tokio::test]
async fn test_concurrent_connections() {
    let addr = start(Application::new().mount(blog_router())).await;

    let mut tasks = Vec::new();
    for id in 0..8 {
        tasks.push(tokio::spawn(async move {
            let resp = send(addr, "GET", &format!("/users/{id}")).await;
            assert_eq!(parse_body(&resp), id.to_string());
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}
