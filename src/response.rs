//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it (wrapped in `Ok`).
//! That is the entire job description.
//!
//! # Shortcuts (200 OK)
//!
//! ```rust
//! use quizripple_api::Response;
//!
//! Response::json(&serde_json::json!({ "id": 1 }));
//! Response::text("hello");
//! ```
//!
//! # Builder (custom status or headers)
//!
//! ```rust
//! use http::StatusCode;
//! use quizripple_api::Response;
//!
//! Response::builder()
//!     .status(StatusCode::CREATED)
//!     .header("location", "/api/collections/42")
//!     .json(&serde_json::json!({ "id": 42 }));
//! ```

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

/// An outgoing HTTP response.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `200 OK` — serializes `value` as an `application/json` body.
    ///
    /// Serialization failure is a programming error in the value's
    /// `Serialize` impl; it is logged and flattened to an empty 500 rather
    /// than panicking on the request path.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::with_body("application/json", bytes.into()),
            Err(e) => {
                tracing::error!("response body serialization failed: {e}");
                Self::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_body("text/plain; charset=utf-8", body.into().into_bytes().into())
    }

    /// Response with the given status and no body.
    pub fn status(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: StatusCode::OK, headers: HeaderMap::new() }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn with_body(content_type: &'static str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self { status: StatusCode::OK, headers, body }
    }

    /// Converts into the hyper representation handed to the connection task.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Obtain via [`Response::builder()`].
/// Defaults to `200 OK`; terminated by a typed body method.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Appends a header.
    ///
    /// # Panics
    ///
    /// Panics on a syntactically invalid header name or value — headers are
    /// written by the application, not derived from client input, so an
    /// invalid one is a bug caught in development.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::try_from(name)
            .unwrap_or_else(|_| panic!("invalid header name `{name}`"));
        let value = HeaderValue::try_from(value)
            .unwrap_or_else(|_| panic!("invalid value for header `{name}`"));
        self.headers.insert(name, value);
        self
    }

    /// Terminate with a JSON body serialized from `value`.
    pub fn json<T: Serialize>(self, value: &T) -> Response {
        let mut res = Response::json(value);
        if res.status_code() == StatusCode::OK {
            res.status = self.status;
        }
        res.headers.extend(self.headers);
        res
    }

    /// Terminate with a pre-encoded body of the given content type.
    pub fn bytes(mut self, content_type: &str, body: Vec<u8>) -> Response {
        let value = HeaderValue::try_from(content_type)
            .unwrap_or_else(|_| panic!("invalid content type `{content_type}`"));
        self.headers.insert(header::CONTENT_TYPE, value);
        Response { status: self.status, headers: self.headers, body: body.into() }
    }

    /// Terminate with no body.
    pub fn empty(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`], for flexible handler return types.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

/// Return a bare status from a handler: `Ok(StatusCode::NO_CONTENT)`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_sets_content_type_and_body() {
        let res = Response::json(&serde_json::json!({ "ok": true }));
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["ok"], true);
    }

    #[test]
    fn builder_keeps_status_and_custom_headers() {
        let res = Response::builder()
            .status(StatusCode::CREATED)
            .header("location", "/api/collections/7")
            .json(&serde_json::json!({ "id": 7 }));
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.headers().get("location").unwrap(), "/api/collections/7");
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn into_inner_carries_status_and_headers() {
        let inner = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header("vary", "Origin")
            .empty()
            .into_inner();
        assert_eq!(inner.status(), StatusCode::NO_CONTENT);
        assert_eq!(inner.headers().get("vary").unwrap(), "Origin");
    }
}
