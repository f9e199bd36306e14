//! Per-request context handed to every handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use http::header::{COOKIE, HeaderMap};
use http::StatusCode;

use crate::cookie::{self, CookieDefinition};
use crate::matcher;
use crate::method::Method;

/// The mutable part of a [`Context`]: what the handler wants on the response
/// besides its body.
#[derive(Clone, Debug)]
pub(crate) struct Outgoing {
    /// Applied in order; a later entry for the same name replaces an earlier one.
    pub(crate) headers: Vec<(String, String)>,
    /// One entry per cookie name, in first-set order.
    pub(crate) cookies: Vec<(String, CookieDefinition)>,
    pub(crate) status: StatusCode,
}

impl Default for Outgoing {
    fn default() -> Self {
        Self { headers: Vec::new(), cookies: Vec::new(), status: StatusCode::OK }
    }
}

/// An incoming request, resolved against the route that matched it.
///
/// Built fresh for each request and owned by the handler it is passed to.
///
/// ```rust
/// use takanashi::{Context, CookieDefinition, StatusCode};
///
/// async fn login(ctx: Context) -> &'static str {
///     let user = ctx.param("user").unwrap_or("anonymous").to_owned();
///     ctx.set_status(StatusCode::CREATED);
///     ctx.set_header("x-user", &user);
///     ctx.set_cookie("sid", CookieDefinition::new("abc").max_age(600));
///     "welcome"
/// }
/// ```
pub struct Context {
    method: Method,
    pathname: String,
    query: Option<String>,
    params: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    body: Bytes,
    outgoing: Arc<Mutex<Outgoing>>,
}

impl Context {
    /// Builds the context for `req`, which was routed to `pattern`.
    pub(crate) fn new(req: http::Request<Bytes>, method: Method, pattern: &str) -> Self {
        let (parts, body) = req.into_parts();
        let pathname = parts.uri.path().to_owned();
        let (headers, cookie_header) = flatten_headers(&parts.headers);

        Self {
            method,
            params: matcher::extract_params(&pathname, pattern),
            query: parts.uri.query().map(str::to_owned),
            pathname,
            headers,
            cookies: cookie_header.as_deref().map(cookie::parse).unwrap_or_default(),
            body,
            outgoing: Arc::default(),
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn pathname(&self) -> &str { &self.pathname }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn params(&self) -> &HashMap<String, String> { &self.params }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Inbound headers keyed by lowercase name, `cookie` excluded.
    pub fn headers(&self) -> &HashMap<String, String> { &self.headers }

    pub fn cookies(&self) -> &HashMap<String, String> { &self.cookies }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `ctx.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    // ── Outgoing bag ──────────────────────────────────────────────────────────

    pub fn set_status(&self, status: StatusCode) {
        self.outgoing().status = status;
    }

    pub fn set_header(&self, name: &str, value: &str) {
        self.outgoing().headers.push((name.to_owned(), value.to_owned()));
    }

    /// Queues a cookie. Setting the same name again replaces the definition.
    pub fn set_cookie(&self, name: &str, def: impl Into<CookieDefinition>) {
        let def = def.into();
        let mut out = self.outgoing();
        match out.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = def,
            None => out.cookies.push((name.to_owned(), def)),
        }
    }

    /// A second handle on the outgoing bag, kept by the dispatcher while the
    /// handler owns the context.
    pub(crate) fn outgoing_handle(&self) -> OutgoingHandle {
        OutgoingHandle(Arc::clone(&self.outgoing))
    }

    fn outgoing(&self) -> MutexGuard<'_, Outgoing> {
        lock(&self.outgoing)
    }
}

pub(crate) struct OutgoingHandle(Arc<Mutex<Outgoing>>);

impl OutgoingHandle {
    /// Takes the bag, leaving a fresh default in its place.
    pub(crate) fn take(&self) -> Outgoing {
        std::mem::take(&mut *lock(&self.0))
    }
}

// Poisoning only means a handler panicked; every write to the bag is a
// single assignment or push, so its contents are still whole.
fn lock(m: &Mutex<Outgoing>) -> MutexGuard<'_, Outgoing> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Splits inbound headers into a flat map and the raw `cookie` header.
///
/// Repeated headers are joined with `", "`; repeated `cookie` headers with `"; "`.
fn flatten_headers(headers: &HeaderMap) -> (HashMap<String, String>, Option<String>) {
    let mut flat = HashMap::new();
    let mut cookie = None;

    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        if *name == COOKIE {
            cookie = Some(values.collect::<Vec<_>>().join("; "));
        } else {
            flat.insert(name.as_str().to_owned(), values.collect::<Vec<_>>().join(", "));
        }
    }

    (flat, cookie)
}
