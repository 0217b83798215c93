//! HTTP response building module
//!
//! Provides builders for the status codes the dispatch pipeline produces
//! itself plus a few conveniences for handlers. All builders fall back to a
//! bare response if header assembly fails, so a response is always sent.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Response type used throughout the framework: a fully buffered body.
pub type HttpResponse = Response<Full<Bytes>>;

/// Build 500 Internal Server Error response (empty body)
///
/// Sent when a chain handler returns an error; the error itself only goes
/// to the log, never to the client.
pub fn build_500_response() -> HttpResponse {
    Response::builder()
        .status(500)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 501 Not Implemented response (empty body)
///
/// Sent when every handler in the chain declined the request.
pub fn build_501_response() -> HttpResponse {
    Response::builder()
        .status(501)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("501", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String) -> HttpResponse {
    let content_length = content.len();
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain text response
pub fn build_text_response(content: String) -> HttpResponse {
    let content_length = content.len();
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("text", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build raw bytes response with an explicit content type
pub fn build_bytes_response(data: Bytes, content_type: &str) -> HttpResponse {
    let content_length = data.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("bytes", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response from an already serialized value
pub fn build_json_response(json: String) -> HttpResponse {
    let content_length = json.len();
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
