//! Application wiring: the full router assembled from the context and the
//! injected feature route sets.
//!
//! The shell owns admission and dispatch; the business endpoints under
//! `/api` are built by the feature collaborators (accounts, profiles, quiz
//! results, collections) and plugged in through [`FeatureRoutes`]. An
//! unmounted feature simply 404s under its prefix, which is the complete
//! observable behavior of this layer.

use std::sync::Arc;

use crate::context::AppContext;
use crate::health;
use crate::router::Router;

/// The four feature route sets mounted under `/api`, injected at wiring
/// time so tests can substitute their own.
#[derive(Default)]
pub struct FeatureRoutes {
    pub auth: Router,
    pub user: Router,
    pub quiz_results: Router,
    pub collections: Router,
}

/// Builds the application router: identification and health endpoints,
/// then the feature mounts in registration order.
pub fn router(ctx: &Arc<AppContext>, features: FeatureRoutes) -> Router {
    let health_ctx = Arc::clone(ctx);
    Router::new()
        .get("/", health::root)
        .get("/api/health", move |req| {
            health::status(req, Arc::clone(&health_ctx))
        })
        .nest("/api/auth", features.auth)
        .nest("/api/user", features.user)
        .nest("/api/quiz-results", features.quiz_results)
        .nest("/api/collections", features.collections)
}
