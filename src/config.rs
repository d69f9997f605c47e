//! Environment-driven configuration.
//!
//! All lookups happen once, at startup, through [`Config::from_env`] — the
//! rest of the process receives the validated structure by reference.
//! Validation failures name the offending field so a bad deploy is
//! diagnosable from a single log line.

use std::path::PathBuf;

use crate::error::Error;

/// Listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Environment label when `APP_ENV` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// On-disk directory served under `/data` when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Validated process configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extra allowed origin for the deployed frontend (`CLIENT_ORIGIN`).
    pub client_origin: Option<String>,
    /// MongoDB connection string (`MONGO_URI`, required).
    pub mongo_uri: String,
    /// Listen port (`PORT`).
    pub port: u16,
    /// Environment label reported by the health endpoint (`APP_ENV`).
    pub environment: String,
    /// Root of the public static asset tree (`DATA_DIR`).
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads and validates configuration from process environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but with an injected lookup, so tests
    /// never touch (or race on) the real process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mongo_uri = non_empty(lookup("MONGO_URI")).ok_or(Error::Config {
            field: "MONGO_URI",
            reason: "must be set to the MongoDB connection string".into(),
        })?;

        let port = match non_empty(lookup("PORT")) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| Error::Config {
                field: "PORT",
                reason: format!("`{raw}` is not a valid port number"),
            })?,
        };

        Ok(Self {
            client_origin: non_empty(lookup("CLIENT_ORIGIN")),
            mongo_uri,
            port,
            environment: non_empty(lookup("APP_ENV"))
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned()),
            data_dir: non_empty(lookup("DATA_DIR"))
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
        })
    }
}

/// Treats unset and blank variables identically — a `CLIENT_ORIGIN=""` left
/// in a deploy manifest must not become an allow-list entry.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
