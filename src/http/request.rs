//! Owned HTTP request snapshot
//!
//! The dispatch loop collects each incoming request into an [`HttpRequest`]
//! before running the handler chain, so every handler sees the same fully
//! buffered request without fighting over the streaming body.

use http_body_util::BodyExt;
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderMap;
use hyper::{Method, Request, Uri};

/// One inbound request: method, target, headers and the full body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpRequest {
    /// Assemble a request from its parts (used directly by tests and tools).
    #[must_use]
    pub const fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Collect a hyper request into an owned snapshot.
    ///
    /// Fails only if reading the body from the connection fails.
    pub async fn read(req: Request<Incoming>) -> Result<Self, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Look up a header value as UTF-8 text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_excludes_query() {
        let req = HttpRequest::new(
            Method::GET,
            "/posts/42?draft=1".parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
        );
        assert_eq!(req.path(), "/posts/42");
    }

    #[test]
    fn test_header_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "text/plain".parse().unwrap());
        let req = HttpRequest::new(Method::POST, "/".parse().unwrap(), headers, Bytes::new());
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("x-missing"), None);
    }
}
