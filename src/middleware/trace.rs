//! Per-request structured log line, stage three of the pipeline.
//!
//! Purely observational — it never blocks or alters the request. Runs
//! after admission and body decoding, so a CORS-rejected or oversized
//! request is not logged here (its classification is logged by the
//! terminal error handler instead).

use http::Method;

/// Logged in place of the origin when the header is absent.
pub const NO_ORIGIN: &str = "no-origin";

/// Emits the one log line every admitted request gets. The subscriber
/// supplies the timestamp.
pub(crate) fn record(method: &Method, path: &str, origin: Option<&str>) {
    tracing::info!(%method, path, origin = origin.unwrap_or(NO_ORIGIN), "request");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_never_panics_with_or_without_origin() {
        record(&Method::GET, "/api/health", None);
        record(&Method::POST, "/api/auth/login", Some("http://localhost:3000"));
    }
}
