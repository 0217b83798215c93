//! Method-aware router
//!
//! Owns one segment trie per HTTP method and implements the chain handler
//! contract: a resolved route invokes its handler, an unresolved one
//! declines so the rest of the application's chain can answer.

use crate::handler::{decline, HandlerError, HandlerFuture, RequestHandler};
use crate::http::{HttpRequest, HttpResponse};
use crate::routing::RouteNode;
use hyper::Method;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Path parameter bindings captured during lookup (`:id` -> `"42"`).
pub type PathParams = HashMap<String, String>;

type RouteFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, HandlerError>> + Send>>;
type BoxedRouteHandler = Box<dyn Fn(Arc<HttpRequest>, PathParams) -> RouteFuture + Send + Sync>;

/// The closed set of methods a route can be registered for. Requests with
/// any other method never have a tree and always miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl RouteMethod {
    /// Map a wire-level method into the routable set.
    #[must_use]
    pub fn from_http(method: &Method) -> Option<Self> {
        match method.as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }
}

/// Maps (method, path) to a registered handler plus path parameters.
///
/// All registration happens before the application starts serving; a
/// `Router` mounted into the chain is only ever read afterwards.
#[derive(Default)]
pub struct Router {
    base_prefix: String,
    trees: HashMap<RouteMethod, RouteNode<BoxedRouteHandler>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A router whose routes are all mounted under `prefix`. The prefix is
    /// applied at registration only; lookups expect paths already expressed
    /// relative to the mount point's host root.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            base_prefix: prefix.to_string(),
            trees: HashMap::new(),
        }
    }

    /// Register a handler for `method` + `route`.
    ///
    /// Segments starting with `:` capture the matched path segment under
    /// the rest of the token. Registering the same method and path again
    /// replaces the earlier handler.
    pub fn on<F, Fut>(&mut self, method: RouteMethod, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        let full = format!("{}/{}", self.base_prefix, route);
        let segments = path_segments(&full);
        let boxed: BoxedRouteHandler = Box::new(move |req, params| Box::pin(handler(req, params)));
        self.trees
            .entry(method)
            .or_insert_with(RouteNode::root)
            .insert(&segments, boxed);
        self
    }

    pub fn get<F, Fut>(&mut self, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        self.on(RouteMethod::Get, route, handler)
    }

    pub fn post<F, Fut>(&mut self, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        self.on(RouteMethod::Post, route, handler)
    }

    pub fn put<F, Fut>(&mut self, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        self.on(RouteMethod::Put, route, handler)
    }

    pub fn delete<F, Fut>(&mut self, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        self.on(RouteMethod::Delete, route, handler)
    }

    pub fn patch<F, Fut>(&mut self, route: &str, handler: F) -> &mut Self
    where
        F: Fn(Arc<HttpRequest>, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, HandlerError>> + Send + 'static,
    {
        self.on(RouteMethod::Patch, route, handler)
    }

    /// Resolve a method and path to a handler and its parameter bindings.
    /// Never performs I/O; an unmatched route is just `None`.
    fn lookup(&self, method: RouteMethod, path: &str) -> Option<(&BoxedRouteHandler, PathParams)> {
        let tree = self.trees.get(&method)?;
        let segments = path_segments(path);
        let mut params = PathParams::new();
        let handler = tree.find(&segments, &mut params)?;
        Some((handler, params))
    }
}

impl RequestHandler for Router {
    fn handle(&self, request: Arc<HttpRequest>) -> HandlerFuture {
        let Some(method) = RouteMethod::from_http(request.method()) else {
            return decline();
        };
        match self.lookup(method, request.path()) {
            None => decline(),
            Some((handler, params)) => {
                let fut = handler(Arc::clone(&request), params);
                Box::pin(async move { fut.await.map(Some) })
            }
        }
    }
}

/// Strip a leading `scheme://host` prefix so absolute-form targets and
/// registration strings normalize to the same path.
fn strip_origin(path: &str) -> &str {
    match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => path,
    }
}

/// Split a path into its non-empty segments. Repeated, leading and trailing
/// slashes are all insignificant.
fn path_segments(path: &str) -> Vec<&str> {
    strip_origin(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}
