//! Handler return values and the [`IntoBody`] conversion trait.
//!
//! A handler returns *what* to send; the dispatcher decides *how*. Every
//! return value is resolved into one of three [`Body`] variants, and the
//! variant alone picks the serialization and the default content type.

use bytes::Bytes;
use serde::Serialize;

use crate::error::BoxError;

/// The value a handler produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// Sent as-is, `text/plain; charset=utf-8` unless overridden.
    Text(String),
    /// Sent as-is. No content type is forced.
    Binary(Bytes),
    /// Objects and arrays. Serialized to JSON text,
    /// `application/json; charset=utf-8` unless overridden.
    Structured(serde_json::Value),
}

impl Body {
    /// Default `content-type` for this variant, if any.
    pub(crate) fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Text(_)       => Some("text/plain; charset=utf-8"),
            Self::Binary(_)     => None,
            Self::Structured(_) => Some("application/json; charset=utf-8"),
        }
    }

    /// Serializes the body into the bytes put on the wire.
    pub(crate) fn into_bytes(self) -> Result<Bytes, serde_json::Error> {
        Ok(match self {
            Self::Text(s)       => Bytes::from(s),
            Self::Binary(b)     => b,
            Self::Structured(v) => Bytes::from(serde_json::to_vec(&v)?),
        })
    }
}

/// JSON wrapper for any `Serialize` value.
///
/// ```rust
/// use serde::Serialize;
/// use takanashi::{Context, Json};
///
/// #[derive(Serialize)]
/// struct User { id: u32, name: &'static str }
///
/// async fn get_user(_ctx: Context) -> Json<User> {
///     Json(User { id: 1, name: "alice" })
/// }
/// ```
pub struct Json<T>(pub T);

// ── IntoBody ──────────────────────────────────────────────────────────────────

/// Conversion into a response [`Body`].
///
/// Implement it on your own types to return them directly from handlers.
pub trait IntoBody {
    fn into_body(self) -> Result<Body, BoxError>;
}

impl IntoBody for Body {
    fn into_body(self) -> Result<Body, BoxError> { Ok(self) }
}

impl IntoBody for String {
    fn into_body(self) -> Result<Body, BoxError> { Ok(Body::Text(self)) }
}

impl IntoBody for &'static str {
    fn into_body(self) -> Result<Body, BoxError> { Ok(Body::Text(self.to_owned())) }
}

impl IntoBody for Bytes {
    fn into_body(self) -> Result<Body, BoxError> { Ok(Body::Binary(self)) }
}

impl IntoBody for Vec<u8> {
    fn into_body(self) -> Result<Body, BoxError> { Ok(Body::Binary(Bytes::from(self))) }
}

impl IntoBody for &'static [u8] {
    fn into_body(self) -> Result<Body, BoxError> { Ok(Body::Binary(Bytes::from_static(self))) }
}

/// A bare JSON string is text, like any other string. Numbers, booleans and
/// `null` are still sent as JSON.
impl IntoBody for serde_json::Value {
    fn into_body(self) -> Result<Body, BoxError> {
        Ok(match self {
            serde_json::Value::String(s) => Body::Text(s),
            other                        => Body::Structured(other),
        })
    }
}

impl<T: Serialize> IntoBody for Json<T> {
    fn into_body(self) -> Result<Body, BoxError> {
        Ok(Body::Structured(serde_json::to_value(self.0)?))
    }
}

/// A fallible handler: `Err` is a handler failure and is propagated to the
/// server untouched.
impl<T, E> IntoBody for Result<T, E>
where
    T: IntoBody,
    E: Into<BoxError>,
{
    fn into_body(self) -> Result<Body, BoxError> {
        match self {
            Ok(v)  => v.into_body(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_become_text() {
        assert_eq!("hi".into_body().unwrap(), Body::Text("hi".to_owned()));
        assert_eq!(String::from("hi").into_body().unwrap(), Body::Text("hi".to_owned()));
    }

    #[test]
    fn bytes_become_binary() {
        let body = vec![0u8, 159, 146, 150].into_body().unwrap();
        assert_eq!(body, Body::Binary(Bytes::from_static(&[0, 159, 146, 150])));
        assert_eq!(body.default_content_type(), None);
    }

    #[test]
    fn structured_serializes_to_json_text() {
        let body = json!({ "id": 7, "tags": ["a", "b"] }).into_body().unwrap();
        assert_eq!(body.default_content_type(), Some("application/json; charset=utf-8"));
        assert_eq!(body.into_bytes().unwrap(), r#"{"id":7,"tags":["a","b"]}"#);
    }

    #[test]
    fn json_string_becomes_text() {
        assert_eq!(json!("hi").into_body().unwrap(), Body::Text("hi".to_owned()));
        assert_eq!(json!(true).into_body().unwrap(), Body::Structured(json!(true)));
    }

    #[test]
    fn arrays_are_structured() {
        let body = Json(vec![1, 2, 3]).into_body().unwrap();
        assert_eq!(body, Body::Structured(json!([1, 2, 3])));
    }

    #[test]
    fn err_result_is_a_handler_failure() {
        let failed: Result<&'static str, std::io::Error> =
            Err(std::io::Error::other("db down"));
        let err = failed.into_body().unwrap_err();
        assert_eq!(err.to_string(), "db down");
    }
}
