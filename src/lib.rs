//! treeline — a small trie-routed web framework
//!
//! An [`Application`] owns the TCP accept loop and an ordered chain of
//! request handlers; a [`Router`] resolves method + path against per-method
//! segment tries and slots into that chain like any other handler. The
//! first handler that answers wins, a handler failure maps to a 500, an
//! exhausted chain to a 501.
//!
//! ```no_run
//! use treeline::{Application, AssetHandler, Router};
//! use treeline::http::build_text_response;
//!
//! # async fn run() -> std::io::Result<()> {
//! let mut router = Router::new();
//! router.get("/hello/:name", |_req, params| async move {
//!     Ok(build_text_response(format!("hello {}", params["name"])))
//! });
//!
//! Application::new()
//!     .mount(router)
//!     .mount(AssetHandler::new("public"))
//!     .listen("127.0.0.1", 4287)
//!     .await
//! # }
//! ```

pub mod app;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod routing;
pub mod server;

pub use app::Application;
pub use handler::{decline, handler_fn, AssetHandler, HandlerError, HandlerResult, RequestHandler};
pub use http::{HttpRequest, HttpResponse};
pub use routing::{PathParams, RouteMethod, Router};
