//! MongoDB bootstrap and live connection state.
//!
//! [`connect`] is the one-shot startup attempt: the driver establishes the
//! topology lazily, so a `ping` forces server selection and turns an
//! unreachable endpoint into an error *now*, while the process can still
//! refuse to start. There is no retry and no degraded mode — an
//! unreachable database at startup is a deployment fault, and masking it
//! behind a half-alive listener would only move the failure somewhere
//! harder to see.
//!
//! After startup the handle is written exactly once into the application
//! context and only read — concurrently — by request handlers. The health
//! endpoint asks [`Persistence::is_connected`] at request time, never a
//! cached snapshot from boot.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::error::Error;

/// Read-only view of the persistence connection, injected into the
/// application context so tests can substitute a toggleable fake.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Whether the database currently answers. Checked live per call.
    async fn is_connected(&self) -> bool;

    /// The resolved host this process connected to, for logs.
    fn host(&self) -> &str;
}

/// The production handle over the MongoDB driver.
pub struct MongoHandle {
    client: Client,
    host: String,
}

#[async_trait]
impl Persistence for MongoHandle {
    async fn is_connected(&self) -> bool {
        self.ping().await.is_ok()
    }

    fn host(&self) -> &str {
        &self.host
    }
}

impl MongoHandle {
    async fn ping(&self) -> Result<(), Error> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

/// Attempts exactly one connection to the configured endpoint.
///
/// On failure the caller (the binary's startup routine) logs the reason and
/// terminates the process — the listener is never opened.
pub async fn connect(uri: &str) -> Result<MongoHandle, Error> {
    let options = ClientOptions::parse(uri).await?;
    let host = options
        .hosts
        .first()
        .map(ToString::to_string)
        .unwrap_or_default();

    let client = Client::with_options(options)?;
    let handle = MongoHandle { client, host };

    // Force server selection; with_options alone succeeds even when the
    // endpoint is unreachable.
    handle.ping().await?;
    Ok(handle)
}
