//! # takanashi
//!
//! A minimal HTTP routing and response layer on top of hyper.
//!
//! You register `(method, pattern, handler)` triples. For each request the
//! first matching route's handler gets a [`Context`], writes whatever status,
//! headers and cookies it wants into it, and returns a body. takanashi turns
//! that body into bytes, picks a content type and builds the response.
//!
//! What takanashi does:
//!
//! - Ordered routing with `:name` path parameters and a `*` catch-all
//! - Cookie parsing, and `Set-Cookie` encoding with secure defaults
//! - JSON / text / binary bodies with content-type defaults
//! - Graceful shutdown on SIGTERM / Ctrl-C
//!
//! What it leaves to the host: TLS, timeouts, middleware, streaming bodies.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use takanashi::{Context, CookieDefinition, Router, Server, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), takanashi::Error> {
//!     let app = Router::new()
//!         .get("/users/:id", get_user)
//!         .post("/login", login);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn get_user(ctx: Context) -> serde_json::Value {
//!     json!({ "id": ctx.param("id") })
//! }
//!
//! async fn login(ctx: Context) -> &'static str {
//!     ctx.set_status(StatusCode::CREATED);
//!     ctx.set_cookie("sid", CookieDefinition::new("abc"));
//!     "welcome"
//! }
//! ```

mod body;
mod context;
mod dispatch;
mod error;
mod handler;
mod method;
mod router;
mod server;

pub mod assets;
pub mod config;
pub mod cookie;
pub mod matcher;

pub use body::{Body, IntoBody, Json};
pub use crate::config::Config;
pub use context::Context;
pub use cookie::{CookieDefinition, Priority, SameSite};
pub use error::{BoxError, Error};
pub use handler::Handler;
pub use http::StatusCode;
pub use method::{Method, UnknownMethod};
pub use router::Router;
pub use server::Server;
