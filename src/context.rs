//! Process-wide application context.
//!
//! Built exactly once, after configuration validation and the persistence
//! bootstrap succeed, then shared read-only across every connection task.
//! Handlers receive it by `Arc` instead of reaching for globals, so tests
//! can assemble a context around a fake persistence handle.

use std::sync::Arc;

use crate::config::Config;
use crate::db::Persistence;
use crate::middleware::cors::AllowList;

/// Everything a request handler may consult: the validated configuration,
/// the origin allow-list derived from it, and the persistence handle.
pub struct AppContext {
    pub config: Config,
    pub origins: AllowList,
    pub db: Arc<dyn Persistence>,
}

impl AppContext {
    pub fn new(config: Config, db: Arc<dyn Persistence>) -> Self {
        let origins = AllowList::new(config.client_origin.as_deref());
        Self { config, origins, db }
    }
}
