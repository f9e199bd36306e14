//! Minimal takanashi example: JSON endpoints, cookies and a catch-all.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -i -X POST http://localhost:3000/login -H 'cookie: visits=3'
//!   curl -X DELETE http://localhost:3000/users/42
//!   curl http://localhost:3000/nowhere
//!
//! Configuration comes from `takanashi.toml` (optional) and `TAKANASHI_*`
//! environment variables, e.g. `TAKANASHI_PORT=8080`.

use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use takanashi::{Config, Context, CookieDefinition, Json, Router, SameSite, Server, StatusCode};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct User {
    id: String,
    name: &'static str,
}

#[tokio::main]
async fn main() -> Result<(), takanashi::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load_from("takanashi")?;

    let app = Router::new()
        .get("/users/:id", get_user)
        .post("/login", login)
        .delete("/users/:id", delete_user)
        .get("/*", fallback);

    Server::from_config(&config)?.serve(app).await
}

// GET /users/:id → Json<T> is serialized with serde
async fn get_user(ctx: Context) -> Json<User> {
    Json(User {
        id: ctx.param("id").unwrap_or("unknown").to_owned(),
        name: "alice",
    })
}

// POST /login → 201, two cookies in one set-cookie header
async fn login(ctx: Context) -> serde_json::Value {
    let visits: u32 = ctx.cookie("visits").and_then(|v| v.parse().ok()).unwrap_or(0);

    ctx.set_status(StatusCode::CREATED);
    ctx.set_cookie("sid", CookieDefinition::new("abc123").same_site(SameSite::Strict));
    ctx.set_cookie("visits", (visits + 1).to_string());

    json!({ "ok": true, "visits": visits + 1 })
}

// DELETE /users/:id → 204, empty binary body so no content-type is added
async fn delete_user(ctx: Context) -> Bytes {
    ctx.set_status(StatusCode::NO_CONTENT);
    Bytes::new()
}

// Catch-all for every unmatched request, whatever the method
async fn fallback(ctx: Context) -> String {
    format!("nothing at {}", ctx.pathname())
}
