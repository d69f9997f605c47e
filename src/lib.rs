//! # quizripple-api
//!
//! The request admission and routing shell of the QuizRipple web API.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Business logic — accounts, profiles, quiz results, collections — lives
//! in feature route sets that plug into this shell. The shell owns
//! everything that happens *before* a feature handler runs, in a fixed
//! order per request:
//!
//! 1. **CORS decision** — allow-listed origins get credentialed grant
//!    headers; everything else gets a structured 403 naming the origin.
//! 2. **Body decoding** — JSON and form payloads, capped at 10 MiB.
//! 3. **Request logging** — one structured line per admitted request.
//! 4. **Static assets** — the public `/data` tree, cross-origin-readable.
//! 5. **Route dispatch** — radix lookup plus prefix-mounted feature sets.
//! 6. **Terminal error handler** — the only failure-recovery point.
//!
//! Startup is equally rigid: validate configuration, connect to MongoDB
//! once (unreachable database → log and exit, the listener never opens),
//! then serve until SIGTERM drains the in-flight connections.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! use quizripple_api::{app, db, AppContext, Config, FeatureRoutes, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quizripple_api::Error> {
//!     let config = Config::from_env()?;
//!     let handle = db::connect(&config.mongo_uri).await?;
//!
//!     let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
//!     let ctx = Arc::new(AppContext::new(config, Arc::new(handle)));
//!     let routes = app::router(&ctx, FeatureRoutes::default());
//!
//!     Server::bind(addr).serve(routes, ctx).await
//! }
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod db;
pub mod health;
pub mod middleware;

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub use app::FeatureRoutes;
pub use config::Config;
pub use context::AppContext;
pub use db::Persistence;
pub use error::Error;
pub use handler::Handler;
pub use middleware::cors::AllowList;
pub use request::{Payload, Request};
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
