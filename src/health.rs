//! Service identification and health endpoints.
//!
//! Two read-only introspection handlers, wired by [`crate::app::router`]:
//!
//! | Path | Body |
//! |---|---|
//! | `GET /` | `{"message", "version"}` — constant identification record |
//! | `GET /api/health` | `{"status", "mongodb", "environment"}` |
//!
//! `mongodb` reports the connection state *at request time* — the handler
//! asks the live handle, never a value cached at startup — so a database
//! that has gone away since boot shows up as `"Disconnected"` on the next
//! probe. Both handlers are side-effect-free and never fail.

use std::sync::Arc;

use serde::Serialize;

use crate::context::AppContext;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Body of `GET /`.
#[derive(Serialize)]
struct Identification {
    message: &'static str,
    version: &'static str,
}

/// Body of `GET /api/health`.
#[derive(Serialize)]
struct HealthStatus<'a> {
    status: &'static str,
    mongodb: &'static str,
    environment: &'a str,
}

/// `GET /` — constant identification record.
pub async fn root(_req: Request) -> Result<Response, Error> {
    Ok(Response::json(&Identification {
        message: "QuizRipple API running",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/health` — process and database state.
pub async fn status(_req: Request, ctx: Arc<AppContext>) -> Result<Response, Error> {
    let connected = ctx.db.is_connected().await;
    Ok(Response::json(&HealthStatus {
        status: "OK",
        mongodb: if connected { "Connected" } else { "Disconnected" },
        environment: &ctx.config.environment,
    }))
}
