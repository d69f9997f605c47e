//! Origin allow-list and the per-request CORS decision.
//!
//! The allow-list is assembled once at startup — the configured frontend
//! origin (when deployed) plus the two fixed local-development origins —
//! and never mutated afterwards. Per request:
//!
//! - no `Origin` header → permitted with no grant headers (same-origin
//!   pages, server-to-server calls, curl);
//! - listed origin → permitted, and the response is granted
//!   `Access-Control-Allow-Origin` for that origin plus credentials
//!   support;
//! - anything else → [`Error::CorsRejected`], which the terminal handler
//!   turns into a structured 403 naming the offending origin. Rejecting
//!   loudly instead of silently dropping the headers is deliberate: a
//!   misconfigured frontend origin should be diagnosable from the response
//!   body, not from a browser console three timezones away.
//!
//! `OPTIONS` preflights from a listed origin are answered here directly
//! with `204` and the standard allow headers — they never reach the
//! router.

use http::header::{self, HeaderMap};
use http::{Method, StatusCode};

use crate::error::Error;
use crate::response::Response;

/// Local development origins, always allowed.
const LOCAL_DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

/// Methods advertised on preflight responses.
const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

// ── Allow-list ────────────────────────────────────────────────────────────────

/// The fixed set of origins permitted to make credentialed cross-origin
/// requests. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct AllowList {
    origins: Vec<String>,
}

impl AllowList {
    /// Builds the list from the optional configured origin followed by the
    /// local development defaults. Empty entries are dropped.
    pub fn new(client_origin: Option<&str>) -> Self {
        let origins = client_origin
            .into_iter()
            .chain(LOCAL_DEV_ORIGINS)
            .filter(|o| !o.is_empty())
            .map(str::to_owned)
            .collect();
        Self { origins }
    }

    /// An absent origin is always allowed; a present one must exact-match.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(o) => self.origins.iter().any(|allowed| allowed == o),
        }
    }

    /// The configured entries, in order, for the startup log line.
    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }
}

// ── Per-request decision ──────────────────────────────────────────────────────

/// Outcome of the admission stage for a permitted request.
#[derive(Debug)]
pub(crate) enum Admission {
    /// No `Origin` header; nothing to grant.
    SameOrigin,
    /// Cross-origin request from a listed origin.
    Granted(CorsGrant),
    /// Preflight answered immediately; short-circuits the pipeline.
    Preflight(Response),
}

/// Grant headers to apply to whatever response the pipeline produces —
/// including error responses, which browsers otherwise refuse to expose to
/// the requesting page.
#[derive(Debug)]
pub(crate) struct CorsGrant {
    origin: String,
}

impl CorsGrant {
    pub(crate) fn apply(&self, response: &mut Response) {
        let headers = response.headers_mut();
        // Static assets pin their own `*` allow-origin; leave it alone.
        if !headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
            if let Ok(value) = self.origin.parse() {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            http::HeaderValue::from_static("true"),
        );
        headers.append(header::VARY, http::HeaderValue::from_static("Origin"));
    }
}

/// The value of the `Origin` header, lossily decoded so a garbage origin
/// can still be echoed in the rejection body.
pub(crate) fn origin_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// The CORS decision procedure, stage one of the pipeline.
pub(crate) fn admit(
    allow_list: &AllowList,
    method: &Method,
    origin: Option<&str>,
    headers: &HeaderMap,
) -> Result<Admission, Error> {
    let Some(origin) = origin else {
        return Ok(Admission::SameOrigin);
    };

    if !allow_list.is_allowed(Some(origin)) {
        return Err(Error::CorsRejected { origin: origin.to_owned() });
    }

    let grant = CorsGrant { origin: origin.to_owned() };

    if method == Method::OPTIONS {
        let mut builder = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(header::ACCESS_CONTROL_ALLOW_METHODS.as_str(), ALLOWED_METHODS);
        if let Some(requested) = headers
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .and_then(|v| v.to_str().ok())
        {
            builder = builder.header(header::ACCESS_CONTROL_ALLOW_HEADERS.as_str(), requested);
        }
        let mut response = builder.empty();
        grant.apply(&mut response);
        return Ok(Admission::Preflight(response));
    }

    Ok(Admission::Granted(grant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_orders_configured_origin_first() {
        let list = AllowList::new(Some("https://quizripple.vercel.app"));
        assert_eq!(
            list.as_slice(),
            &[
                "https://quizripple.vercel.app",
                "http://localhost:3000",
                "http://localhost:3001",
            ]
        );
    }

    #[test]
    fn unset_client_origin_leaves_only_local_defaults() {
        let list = AllowList::new(None);
        assert_eq!(list.as_slice(), &LOCAL_DEV_ORIGINS);
    }

    #[test]
    fn absent_origin_is_always_allowed() {
        assert!(AllowList::new(None).is_allowed(None));
        assert!(AllowList::new(Some("https://a.example")).is_allowed(None));
    }

    #[test]
    fn membership_is_exact_string_match() {
        let list = AllowList::new(Some("https://quizripple.vercel.app"));
        assert!(list.is_allowed(Some("http://localhost:3000")));
        assert!(list.is_allowed(Some("https://quizripple.vercel.app")));
        // No scheme, prefix, or case slack.
        assert!(!list.is_allowed(Some("http://quizripple.vercel.app")));
        assert!(!list.is_allowed(Some("https://quizripple.vercel.app/")));
        assert!(!list.is_allowed(Some("http://localhost:3002")));
    }

    #[test]
    fn disallowed_origin_is_a_classified_rejection() {
        let list = AllowList::new(None);
        let err = admit(&list, &Method::GET, Some("https://evil.example"), &HeaderMap::new())
            .unwrap_err();
        match err {
            Error::CorsRejected { origin } => assert_eq!(origin, "https://evil.example"),
            other => panic!("unexpected classification: {other}"),
        }
    }

    #[test]
    fn allowed_origin_grants_credentialed_headers() {
        let list = AllowList::new(None);
        let admission = admit(
            &list,
            &Method::GET,
            Some("http://localhost:3000"),
            &HeaderMap::new(),
        )
        .unwrap();
        let Admission::Granted(grant) = admission else {
            panic!("expected a grant");
        };

        let mut response = Response::text("ok");
        grant.apply(&mut response);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert_eq!(response.headers().get(header::VARY).unwrap(), "Origin");
    }

    #[test]
    fn grant_leaves_an_existing_allow_origin_untouched() {
        let grant = CorsGrant { origin: "http://localhost:3000".into() };
        let mut response = Response::builder()
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN.as_str(), "*")
            .empty();
        grant.apply(&mut response);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[test]
    fn preflight_from_listed_origin_short_circuits_with_204() {
        let list = AllowList::new(None);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            "content-type, authorization".parse().unwrap(),
        );

        let admission = admit(&list, &Method::OPTIONS, Some("http://localhost:3001"), &headers)
            .unwrap();
        let Admission::Preflight(response) = admission else {
            panic!("expected a preflight response");
        };
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            ALLOWED_METHODS
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type, authorization"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3001"
        );
    }

    #[test]
    fn preflight_from_unlisted_origin_is_rejected_like_any_other() {
        let list = AllowList::new(None);
        let err = admit(&list, &Method::OPTIONS, Some("https://evil.example"), &HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::CorsRejected { .. }));
    }
}
