//! The route table.
//!
//! Bindings are kept in registration order and dispatch returns on the first
//! binding whose method and path pattern both match, so a later binding never
//! shadows an earlier one.
//!
//! A pattern matches a path when it is equal to it, or when it ends in `*` and
//! the path starts with everything before the `*`: `/files/*` matches
//! `/files/a.txt` and `/files/`, but not `/files` or `/other`.
//!
//! The table is built before the server starts and is read-only afterwards, so
//! concurrent dispatch from many connections needs no locking.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use nano_http::handler::{Handler, make_handler};
use nano_http::protocol::{Method, Request, Response};
use tracing::debug;

use crate::routes;

/// A stored `(method, path pattern, handler)` triple.
pub struct RouteBinding {
    method: String,
    pattern: String,
    handler: Arc<dyn Handler>,
}

impl RouteBinding {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// Whether this binding serves `method` on `path`.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method == method && path_matches(&self.pattern, path)
    }
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding").field("method", &self.method).field("pattern", &self.pattern).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct RouteTable {
    bindings: Vec<RouteBinding>,
}

macro_rules! method_route {
    ($name:ident, $method:expr) => {
        pub fn $name<H: Handler + 'static>(&mut self, pattern: impl Into<String>, handler: H) -> &mut Self {
            self.register($method.as_str(), pattern, handler)
        }
    };
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with the built-in routes, serving static files from `static_root`.
    ///
    /// | method     | pattern      | handler                         |
    /// |------------|--------------|---------------------------------|
    /// | GET        | `/`          | informational HTML page         |
    /// | GET        | `/health`    | liveness JSON                   |
    /// | GET, POST  | `/echo`      | the request reflected as JSON   |
    /// | GET        | `/static`    | `static_root/index.html`        |
    /// | GET        | `/static/*`  | files under `static_root`       |
    pub fn with_default_routes(static_root: impl Into<PathBuf>) -> Self {
        let static_files = Arc::new(routes::StaticFiles::new(static_root));

        let mut table = Self::new();
        table
            .get("/", make_handler(routes::root))
            .get("/health", routes::Health::new())
            .get("/echo", make_handler(routes::echo))
            .post("/echo", make_handler(routes::echo))
            .get("/static", Arc::clone(&static_files))
            .get("/static/*", static_files);
        table
    }

    /// Appends a binding. The pattern is not validated.
    pub fn register<H: Handler + 'static>(
        &mut self,
        method: impl Into<String>,
        pattern: impl Into<String>,
        handler: H,
    ) -> &mut Self {
        self.bindings.push(RouteBinding { method: method.into(), pattern: pattern.into(), handler: Arc::new(handler) });
        self
    }

    method_route!(get, Method::Get);
    method_route!(post, Method::Post);
    method_route!(put, Method::Put);
    method_route!(delete, Method::Delete);
    method_route!(head, Method::Head);
    method_route!(options, Method::Options);

    /// The first binding serving `method` on `path`, in registration order.
    pub fn find(&self, method: &str, path: &str) -> Option<&RouteBinding> {
        self.bindings.iter().find(|binding| binding.matches(method, path))
    }

    /// Invokes the first matching handler, or answers `404 Not Found` naming the path.
    pub fn dispatch(&self, req: &Request) -> Response {
        match self.find(req.method().as_str(), req.path()) {
            Some(binding) => {
                debug!(method = binding.method(), pattern = binding.pattern(), path = req.path(), "matched route");
                binding.handler().call(req)
            }
            None => {
                debug!(method = %req.method(), path = req.path(), "no route matched");
                Response::not_found(format!("Route not found: {}", req.path()))
            }
        }
    }

    pub fn bindings(&self) -> &[RouteBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Handler for RouteTable {
    fn call(&self, req: &Request) -> Response {
        self.dispatch(req)
    }
}

/// Exact match, or prefix match for a pattern ending in `*`.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    if pattern == path {
        return true;
    }

    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => false,
    }
}
