//! Incoming HTTP request type.
//!
//! A [`Request`] reaches a handler only after the admission pipeline has
//! run: the origin has been checked, the body has been read under the size
//! cap and decoded, and the request has been logged. Handlers therefore
//! never see a raw socket-backed body — just the collected bytes and the
//! decoded [`Payload`] view.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

use crate::error::Error;

/// The decoded request body, produced by the body-decoding stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No body, or a content type the shell does not decode.
    Empty,
    /// An `application/json` body.
    Json(serde_json::Value),
    /// An `application/x-www-form-urlencoded` body, in field order.
    Form(Vec<(String, String)>),
}

/// An incoming HTTP request, after admission.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    payload: Payload,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        payload: Payload,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, uri, headers, body, payload, params }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path as received, before any mount-prefix stripping.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header lookup by name; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The raw collected body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The decoded body, as classified by the body-decoding stage.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Deserializes the raw body as JSON into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::PayloadInvalid {
            content_type: "application/json",
            reason: e.to_string(),
        })
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/quiz/{id}`, `req.param("id")` on `/quiz/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
