//! Unified error type.

/// A handler failure, or any other error a handler wants to surface.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by takanashi's fallible operations.
///
/// Application-level outcomes (404, 405, etc.) are HTTP responses, not
/// `Error`s. This type surfaces infrastructure failures and handler failures,
/// which this layer never recovers from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("static assets: {0}")]
    Assets(#[from] walkdir::Error),

    #[error("request body: {0}")]
    Body(#[from] hyper::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response: {0}")]
    Http(#[from] http::Error),

    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),
}
