//! Request dispatch: route, run the handler, assemble the response.
//!
//! ```text
//! request ─▶ Method ─▶ Router::find ─▶ Context ─▶ handler ─▶ Body
//!              │            │                                 │
//!             405          404                  outgoing bag ─┴─▶ response
//! ```

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use http::StatusCode;
use http_body_util::Full;
use tracing::{debug, warn};

use crate::body::Body;
use crate::context::{Context, Outgoing};
use crate::cookie;
use crate::error::Error;
use crate::method::Method;
use crate::router::Router;

const NOT_FOUND_TEXT: &str = "404 Not Found.";
// The misspelling is part of the wire contract existing clients match on.
const NOT_FOUND_JSON: &str = r#"{"code":404,"message":"This page cloud not be found"}"#;

/// Separator between encoded cookies in the single `set-cookie` header.
const COOKIE_SEPARATOR: &str = ", ";

type HttpResponse = http::Response<Full<Bytes>>;

/// Core hot path: routes one request and produces one response.
///
/// A handler failure is returned as [`Error::Handler`] and never turned into
/// a response here; the server decides what a failed request looks like.
pub(crate) async fn dispatch(
    router: &Router,
    req: http::Request<Bytes>,
) -> Result<HttpResponse, Error> {
    let Ok(method) = Method::try_from(req.method()) else {
        debug!(method = %req.method(), path = req.uri().path(), status = 405, "unsupported method");
        return empty(StatusCode::METHOD_NOT_ALLOWED);
    };

    let Some(route) = router.find(method, req.uri().path()) else {
        debug!(%method, path = req.uri().path(), status = 404, "no route");
        return not_found(method);
    };

    let path = req.uri().path().to_owned();
    let ctx = Context::new(req, method, &route.pattern);
    let outgoing = ctx.outgoing_handle();

    let body = route.handler.call(ctx).await.map_err(Error::Handler)?;
    let out = outgoing.take();

    debug!(%method, path = %path, pattern = %route.pattern, status = out.status.as_u16(), "dispatched");
    respond(body, out)
}

/// Merges the handler's body and outgoing bag into the final response.
fn respond(body: Body, out: Outgoing) -> Result<HttpResponse, Error> {
    let mut headers = HeaderMap::new();

    for (name, value) in &out.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "dropping outgoing header with invalid name or value"),
        }
    }

    // Queued cookies join a `set-cookie` the handler wrote by hand.
    if let Some(encoded) = set_cookie_value(&out.cookies) {
        let mut combined = headers
            .get(SET_COOKIE)
            .map(|v| v.as_bytes().to_vec())
            .unwrap_or_default();
        if !combined.is_empty() {
            combined.extend_from_slice(COOKIE_SEPARATOR.as_bytes());
        }
        combined.extend_from_slice(encoded.as_bytes());

        match HeaderValue::from_bytes(&combined) {
            Ok(value) => {
                headers.insert(SET_COOKIE, value);
            }
            Err(_) => warn!("dropping queued cookies with invalid characters"),
        }
    }

    if !headers.contains_key(CONTENT_TYPE) {
        if let Some(content_type) = body.default_content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    let mut response = http::Response::builder()
        .status(out.status)
        .body(Full::new(body.into_bytes()?))?;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Encodes every queued cookie into one `set-cookie` value.
fn set_cookie_value(cookies: &[(String, cookie::CookieDefinition)]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let encoded: Vec<String> = cookies
        .iter()
        .map(|(name, def)| cookie::encode(name, def))
        .collect();
    Some(encoded.join(COOKIE_SEPARATOR))
}

/// Fallback when nothing (not even a wildcard) matched: plain text for `GET`,
/// JSON for every other method.
fn not_found(method: Method) -> Result<HttpResponse, Error> {
    let (body, content_type) = match method {
        Method::Get => (NOT_FOUND_TEXT, "text/plain; charset=utf-8"),
        _           => (NOT_FOUND_JSON, "application/json; charset=utf-8"),
    };
    Ok(http::Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(Bytes::from_static(body.as_bytes())))?)
}

fn empty(status: StatusCode) -> Result<HttpResponse, Error> {
    Ok(http::Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))?)
}
