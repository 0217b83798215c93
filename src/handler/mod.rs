//! Handler chain contract
//!
//! A chain handler receives the request and either answers it, declines it,
//! or fails. Both shapes the framework accepts — a type implementing
//! [`RequestHandler`] or a bare async closure wrapped by [`handler_fn`] —
//! are normalized to the trait at registration time; dispatch never branches
//! on handler shape.

pub mod assets;

pub use assets::AssetHandler;

use crate::http::{HttpRequest, HttpResponse};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Errors surfaced by handlers; mapped to a 500 by the dispatch loop.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// `Ok(Some(_))` answers the request, `Ok(None)` declines it, `Err(_)` is a
/// handler failure.
pub type HandlerResult = Result<Option<HttpResponse>, HandlerError>;

/// Boxed future returned by chain handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// A candidate responder in the application's handler chain.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: Arc<HttpRequest>) -> HandlerFuture;
}

/// A future that immediately declines the request.
#[must_use]
pub fn decline() -> HandlerFuture {
    let declined: HandlerResult = Ok(None);
    Box::pin(std::future::ready(declined))
}

/// Adapt a bare async closure to [`RequestHandler`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Arc<HttpRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    HandlerFn(f)
}

/// Wrapper produced by [`handler_fn`].
pub struct HandlerFn<F>(F);

impl<F, Fut> RequestHandler for HandlerFn<F>
where
    F: Fn(Arc<HttpRequest>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(&self, request: Arc<HttpRequest>) -> HandlerFuture {
        Box::pin((self.0)(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_text_response;
    use hyper::body::Bytes;
    use hyper::header::HeaderMap;
    use hyper::Method;

    fn request(path: &str) -> Arc<HttpRequest> {
        Arc::new(HttpRequest::new(
            Method::GET,
            path.parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
        ))
    }

    #[tokio::test]
    async fn test_closure_adapts_to_trait() {
        let handler = handler_fn(|req: Arc<HttpRequest>| async move {
            if req.path() == "/yes" {
                Ok(Some(build_text_response("yes".to_string())))
            } else {
                Ok(None)
            }
        });

        let answered = handler.handle(request("/yes")).await.unwrap();
        assert!(answered.is_some());

        let declined = handler.handle(request("/no")).await.unwrap();
        assert!(declined.is_none());
    }
}
