//! Ordered route registry.
//!
//! Routes are kept in registration order and scanned front to back; the first
//! route whose method and pattern match wins. Nothing is deduplicated, so an
//! earlier identical registration shadows a later one. A route registered
//! under `*` or `/*` is a catch-all for every method, consulted only when no
//! route matched structurally.

use bytes::Bytes;
use http_body_util::Full;

use crate::dispatch;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::matcher;
use crate::method::Method;

const WILDCARDS: [&str; 2] = ["*", "/*"];

/// A registered `(method, pattern, handler)` triple.
pub(crate) struct Route {
    pub(crate) method: Method,
    pub(crate) pattern: String,
    pub(crate) handler: BoxedHandler,
}

impl Route {
    fn is_wildcard(&self) -> bool {
        WILDCARDS.contains(&self.pattern.as_str())
    }
}

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
///
/// ```rust,no_run
/// # use takanashi::{Context, Method, Router};
/// # async fn get_user(_: Context) -> &'static str { "" }
/// # async fn create_user(_: Context) -> &'static str { "" }
/// # async fn fallback(_: Context) -> &'static str { "" }
/// Router::new()
///     .get("/users/:id", get_user)
///     .on(Method::Post, "/users", create_user)
///     .on(Method::Get, "*", fallback);
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method + pattern pair. Returns `self` for chaining.
    ///
    /// Pattern segments prefixed with `:` capture a path parameter, which
    /// [`Context::param`](crate::Context::param) retrieves.
    pub fn on(mut self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.routes.push(Route {
            method,
            pattern: pattern.to_owned(),
            handler: handler.into_boxed_handler(),
        });
        self
    }

    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, pattern, handler)
    }

    pub fn head(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Head, pattern, handler)
    }

    pub fn options(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Options, pattern, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes one request and builds its response.
    ///
    /// A handler failure comes back as [`Error::Handler`]; everything else,
    /// including "no route", is a response.
    pub async fn handle(
        &self,
        req: http::Request<Bytes>,
    ) -> Result<http::Response<Full<Bytes>>, Error> {
        dispatch::dispatch(self, req).await
    }

    /// First structural match in registration order, else the first wildcard
    /// route of any method.
    pub(crate) fn find(&self, method: Method, pathname: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.method == method && matcher::matches(&r.pattern, pathname))
            .or_else(|| self.routes.iter().find(|r| r.is_wildcard()))
    }
}
