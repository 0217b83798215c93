//! Application: accept loop and handler chain dispatch
//!
//! The `Application` owns the listening socket and an ordered chain of
//! request handlers. Connections are accepted with unbounded concurrency,
//! one spawned task each; within a connection hyper serves requests
//! strictly sequentially, so a slow request only delays its own connection.
//!
//! The chain is populated before serving starts and is read-only
//! afterwards: `listen`/`serve` consume the `Application`, so registering a
//! handler on a running server does not typecheck.

use crate::handler::{handler_fn, HandlerResult, RequestHandler};
use crate::http::{build_500_response, build_501_response, HttpRequest, HttpResponse};
use crate::logger;
use crate::server;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Request acceptor with an ordered, append-only handler chain.
#[derive(Default)]
pub struct Application {
    chain: Vec<Box<dyn RequestHandler>>,
}

impl Application {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the chain. Handlers are tried in mount order;
    /// the first one that answers wins.
    #[must_use]
    pub fn mount(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.chain.push(Box::new(handler));
        self
    }

    /// Append a bare async closure to the chain. Normalized to the same
    /// handler contract as [`Self::mount`] at registration time.
    #[must_use]
    pub fn mount_fn<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Arc<HttpRequest>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.mount(handler_fn(f))
    }

    /// Run one request through the chain without a socket. This is the same
    /// dispatch the serving loop uses; exposed for in-process testing.
    pub async fn respond(&self, request: Arc<HttpRequest>) -> HttpResponse {
        run_chain(&self.chain, request).await
    }

    /// Bind `host:port` and serve until the process is stopped.
    pub async fn listen(self, host: &str, port: u16) -> io::Result<()> {
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{e}")))?;
        let listener = server::bind_listener(addr)?;
        logger::log_server_start(&addr);
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    ///
    /// Accept errors are logged and the loop keeps going; nothing here is
    /// fatal to the process.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> io::Result<()> {
        let chain: Arc<[Box<dyn RequestHandler>]> = self.chain.into();
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    spawn_connection(stream, peer_addr, Arc::clone(&chain));
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                }
            }
        }
    }
}

/// Serve one connection in its own task. Requests on the connection are
/// processed one at a time; the next request is not read until the current
/// one has been answered.
fn spawn_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    chain: Arc<[Box<dyn RequestHandler>]>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let chain = Arc::clone(&chain);
                async move { Ok::<_, Infallible>(dispatch(req, &chain).await) }
            }),
        );
        if let Err(err) = conn.await {
            logger::log_connection_error(&peer_addr, &err);
        }
    });
}

/// Collect the request and run it through the chain. Always produces
/// exactly one response.
async fn dispatch(req: Request<Incoming>, chain: &[Box<dyn RequestHandler>]) -> HttpResponse {
    let request = match HttpRequest::read(req).await {
        Ok(r) => Arc::new(r),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return build_500_response();
        }
    };
    logger::log_request(request.method().as_str(), request.path());
    run_chain(chain, request).await
}

/// Try handlers in order. First answer wins; a handler error aborts the
/// rest of the chain for this request and maps to a 500; an exhausted chain
/// maps to a 501.
async fn run_chain(chain: &[Box<dyn RequestHandler>], request: Arc<HttpRequest>) -> HttpResponse {
    for handler in chain {
        match handler.handle(Arc::clone(&request)).await {
            Ok(Some(response)) => return response,
            Ok(None) => {}
            Err(e) => {
                logger::log_handler_error(request.path(), e.as_ref());
                return build_500_response();
            }
        }
    }
    build_501_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_text_response;
    use hyper::body::Bytes;
    use hyper::header::HeaderMap;
    use hyper::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(method: Method, path: &str) -> Arc<HttpRequest> {
        Arc::new(HttpRequest::new(
            method,
            path.parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
        ))
    }

    #[tokio::test]
    async fn test_empty_chain_responds_501() {
        let app = Application::new();
        let resp = app.respond(request(Method::GET, "/")).await;
        assert_eq!(resp.status(), 501);
    }

    #[tokio::test]
    async fn test_all_handlers_declining_responds_501() {
        let app = Application::new()
            .mount_fn(|_req| async { Ok(None) })
            .mount_fn(|_req| async { Ok(None) });
        let resp = app.respond(request(Method::GET, "/anything")).await;
        assert_eq!(resp.status(), 501);
    }

    #[tokio::test]
    async fn test_first_answer_short_circuits_chain() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);

        let app = Application::new()
            .mount_fn(|_req| async { Ok(Some(build_text_response("first".to_string()))) })
            .mount_fn(move |_req| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(build_text_response("second".to_string())))
                }
            });

        let resp = app.respond(request(Method::GET, "/")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handlers_run_in_mount_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);

        let app = Application::new()
            .mount_fn(move |_req| {
                let order = Arc::clone(&first);
                async move {
                    order.lock().unwrap().push("a");
                    Ok(None)
                }
            })
            .mount_fn(move |_req| {
                let order = Arc::clone(&second);
                async move {
                    order.lock().unwrap().push("b");
                    Ok(Some(build_text_response("done".to_string())))
                }
            });

        let resp = app.respond(request(Method::GET, "/")).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failing_handler_responds_500_and_aborts_chain() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);

        let app = Application::new()
            .mount_fn(|_req| async { Err("boom".into()) })
            .mount_fn(move |_req| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(build_text_response("unreached".to_string())))
                }
            });

        let resp = app.respond(request(Method::GET, "/")).await;
        assert_eq!(resp.status(), 500);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declined_then_answered() {
        let app = Application::new()
            .mount_fn(|_req| async { Ok(None) })
            .mount_fn(|_req| async { Ok(Some(build_text_response("tail".to_string()))) });

        let resp = app.respond(request(Method::POST, "/x")).await;
        assert_eq!(resp.status(), 200);
    }
}
