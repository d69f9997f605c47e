//! Binary entry point: startup sequencing only.
//!
//! The bootstrap itself ([`run`]) returns a `Result` so it stays testable;
//! only `main` decides to terminate the process. An unreachable database
//! or invalid configuration is fatal before the listener ever opens — no
//! retry, no degraded mode.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use quizripple_api::{app, db, AppContext, Config, Error, FeatureRoutes, Persistence, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "startup failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;

    let handle = db::connect(&config.mongo_uri).await?;
    tracing::info!(host = handle.host(), "mongodb connected");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let ctx = Arc::new(AppContext::new(config, Arc::new(handle)));
    tracing::info!(origins = ?ctx.origins.as_slice(), "cors allow-list");

    let routes = app::router(&ctx, FeatureRoutes::default());
    Server::bind(addr).serve(routes, ctx).await
}
