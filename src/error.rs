//! Classified failure taxonomy and the terminal error mapping.
//!
//! Every pipeline stage and route handler raises [`Error`] instead of
//! answering the client directly. Failures bubble to one place — the
//! terminal mapping in [`Error::into_response`] — which decides what the
//! client is allowed to see:
//!
//! | classification | client sees |
//! |---|---|
//! | [`Error::CorsRejected`] | `403` + the rejected origin, for operator diagnostics |
//! | everything else | generic `500`, message logged server-side only |
//!
//! Startup failures ([`Error::Config`], [`Error::Db`] from the bootstrap)
//! never produce an HTTP response at all — the binary logs them and exits
//! before the listener opens.

use http::StatusCode;
use serde_json::json;

use crate::response::Response;

/// A classified failure raised by a pipeline stage or a route handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried an `Origin` header that is not on the allow-list.
    #[error("origin `{origin}` not allowed by CORS")]
    CorsRejected { origin: String },

    /// The request body exceeded the decoding cap. Maps to the generic 500,
    /// not 413 — the classification exists for server-side logs.
    #[error("request body exceeds the {limit} byte cap")]
    PayloadTooLarge { limit: usize },

    /// The request body did not decode as its declared content type.
    #[error("malformed {content_type} body: {reason}")]
    PayloadInvalid {
        content_type: &'static str,
        reason: String,
    },

    /// A named configuration field failed validation at startup.
    #[error("config field `{field}`: {reason}")]
    Config { field: &'static str, reason: String },

    #[error("mongodb: {0}")]
    Db(#[from] mongodb::error::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Terminal error handler: converts a propagated failure into the
    /// response the client receives. CORS rejections are the only
    /// classification echoed back with detail; all other failures are
    /// logged here and flattened to an opaque 500.
    pub(crate) fn into_response(self) -> Response {
        match self {
            Self::CorsRejected { origin } => Response::builder()
                .status(StatusCode::FORBIDDEN)
                .json(&json!({ "error": "CORS error", "origin": origin })),
            other => {
                tracing::error!(error = %other, "request failed");
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .json(&json!({ "error": "Internal Server Error" }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejection_echoes_the_origin_with_403() {
        let res = Error::CorsRejected { origin: "https://evil.example".into() }.into_response();
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["error"], "CORS error");
        assert_eq!(body["origin"], "https://evil.example");
    }

    #[test]
    fn every_other_classification_is_an_opaque_500() {
        for err in [
            Error::PayloadTooLarge { limit: 1024 },
            Error::PayloadInvalid { content_type: "application/json", reason: "eof".into() },
            Error::Io(std::io::Error::other("disk on fire")),
        ] {
            let res = err.into_response();
            assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

            let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
            assert_eq!(body["error"], "Internal Server Error");
            assert!(body.get("origin").is_none(), "internal detail must not leak");
        }
    }
}
