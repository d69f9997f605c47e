//! Size-capped body collection and decoding, stage two of the pipeline.
//!
//! The cap is enforced *while reading*: `Limited` aborts the collect as
//! soon as the stream exceeds [`MAX_PAYLOAD_BYTES`], so an oversized body
//! is classified [`Error::PayloadTooLarge`] before any handler — or even
//! the logging stage — sees the request. JSON and form-encoded payloads
//! are decoded eagerly into [`Payload`]; other content types pass through
//! as raw bytes for the route sets to interpret.

use bytes::Bytes;
use http::header::{self, HeaderMap};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::error::Error;
use crate::request::Payload;

/// Decoding cap for request bodies: 10 MiB.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Collects the body under the cap, then decodes it per content type.
pub(crate) async fn read<B>(headers: &HeaderMap, body: B) -> Result<(Bytes, Payload), Error>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let collected = Limited::new(body, MAX_PAYLOAD_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                Error::PayloadTooLarge { limit: MAX_PAYLOAD_BYTES }
            } else {
                Error::Io(std::io::Error::other(e))
            }
        })?;

    let bytes = collected.to_bytes();
    let payload = decode(content_type_of(headers), &bytes)?;
    Ok((bytes, payload))
}

/// Decodes collected bytes according to the declared content type.
pub(crate) fn decode(content_type: Option<&str>, bytes: &[u8]) -> Result<Payload, Error> {
    if bytes.is_empty() {
        return Ok(Payload::Empty);
    }

    match content_type {
        Some(ct) if ct.eq_ignore_ascii_case("application/json") => {
            let value = serde_json::from_slice(bytes).map_err(|e| Error::PayloadInvalid {
                content_type: "application/json",
                reason: e.to_string(),
            })?;
            Ok(Payload::Json(value))
        }
        Some(ct) if ct.eq_ignore_ascii_case("application/x-www-form-urlencoded") => {
            let pairs = url::form_urlencoded::parse(bytes).into_owned().collect();
            Ok(Payload::Form(pairs))
        }
        _ => Ok(Payload::Empty),
    }
}

/// The media type without parameters: `application/json; charset=utf-8`
/// reads as `application/json`.
fn content_type_of(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http_body_util::Full;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        map
    }

    #[tokio::test]
    async fn json_bodies_decode_into_values() {
        let (bytes, payload) = read(
            &headers("application/json; charset=utf-8"),
            Full::new(Bytes::from_static(br#"{"answer":42}"#)),
        )
        .await
        .unwrap();

        assert_eq!(bytes, Bytes::from_static(br#"{"answer":42}"#));
        assert_eq!(payload, Payload::Json(serde_json::json!({ "answer": 42 })));
    }

    #[tokio::test]
    async fn form_bodies_decode_into_pairs() {
        let (_, payload) = read(
            &headers("application/x-www-form-urlencoded"),
            Full::new(Bytes::from_static(b"name=ada&score=97")),
        )
        .await
        .unwrap();

        assert_eq!(
            payload,
            Payload::Form(vec![
                ("name".to_owned(), "ada".to_owned()),
                ("score".to_owned(), "97".to_owned()),
            ])
        );
    }

    #[tokio::test]
    async fn undeclared_content_types_stay_raw() {
        let (bytes, payload) = read(
            &HeaderMap::new(),
            Full::new(Bytes::from_static(b"opaque bytes")),
        )
        .await
        .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"opaque bytes"));
        assert_eq!(payload, Payload::Empty);
    }

    #[tokio::test]
    async fn malformed_json_is_classified_not_500_here() {
        let err = read(
            &headers("application/json"),
            Full::new(Bytes::from_static(b"{broken")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::PayloadInvalid { content_type: "application/json", .. }));
    }

    #[tokio::test]
    async fn bodies_over_the_cap_are_rejected() {
        let oversized = Bytes::from(vec![b'x'; MAX_PAYLOAD_BYTES + 1]);
        let err = read(&headers("application/json"), Full::new(oversized))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { limit: MAX_PAYLOAD_BYTES }));
    }

    #[tokio::test]
    async fn bodies_at_the_cap_pass() {
        let at_cap = Bytes::from(vec![b'x'; MAX_PAYLOAD_BYTES]);
        let (bytes, _) = read(&HeaderMap::new(), Full::new(at_cap)).await.unwrap();
        assert_eq!(bytes.len(), MAX_PAYLOAD_BYTES);
    }
}
