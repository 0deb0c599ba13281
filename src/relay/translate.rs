//! Response translation.
//!
//! # Responsibilities
//! - Copy every handler response header onto the outbound response, in order
//! - Set the outbound status to the handler's status
//! - Decode declared-JSON bodies and re-encode them; pass raw text unchanged
//!
//! # Design Decisions
//! - The outbound response is constructed in full before being returned, so a
//!   decode failure never produces a half-written response
//! - Framing headers (content-length, transfer-encoding) are recomputed for
//!   the re-encoded payload rather than copied from the wire form

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use bytes::Bytes;

/// A framework-independent representation of the identity handler's response.
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers, in the order the handler produced them.
    pub headers: HeaderMap,
    /// Wire-form body. Whether it is structured JSON or raw text is declared
    /// by the `content-type` header and resolved during translation.
    pub body: Bytes,
}

/// Translate a handler response into the outbound framework response.
///
/// A body declared as JSON that fails to decode is a translation failure; the
/// caller maps it to the generic authentication error response.
pub fn to_outbound(response: NormalizedResponse) -> Result<Response<Body>, serde_json::Error> {
    let payload = if declares_json(&response.headers) {
        let value: serde_json::Value = serde_json::from_slice(&response.body)?;
        Bytes::from(serde_json::to_vec(&value)?)
    } else {
        response.body
    };

    let mut out = Response::new(Body::from(payload.clone()));
    *out.status_mut() = response.status;

    let headers = out.headers_mut();
    for (name, value) in response.headers.iter() {
        headers.append(name, value.clone());
    }
    headers.remove(header::TRANSFER_ENCODING);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));

    Ok(out)
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(content_type: Option<&str>, body: &'static [u8]) -> NormalizedResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        NormalizedResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(body),
        }
    }

    async fn body_bytes(response: Response<Body>) -> Bytes {
        axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_round_trips() {
        let response = response_with(Some("application/json"), b"{ \"token\" : \"abc\" }");
        let out = to_outbound(response).unwrap();

        let bytes = body_bytes(out).await;
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::json!({"token": "abc"}));
    }

    #[tokio::test]
    async fn test_raw_body_passes_through_byte_for_byte() {
        let raw = b"<html>redirecting...</html>";
        let response = response_with(Some("text/html"), raw);
        let out = to_outbound(response).unwrap();

        assert_eq!(&body_bytes(out).await[..], raw);
    }

    #[tokio::test]
    async fn test_missing_content_type_treated_as_raw() {
        let response = response_with(None, b"{\"still\":\"raw\"}");
        let out = to_outbound(response).unwrap();

        assert_eq!(&body_bytes(out).await[..], b"{\"still\":\"raw\"}");
    }

    #[test]
    fn test_undecodable_json_is_an_error() {
        let response = response_with(Some("application/json"), b"not-json");
        assert!(to_outbound(response).is_err());
    }

    #[test]
    fn test_status_and_headers_copied_in_order() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2; Path=/"));

        let response = NormalizedResponse {
            status: StatusCode::UNAUTHORIZED,
            headers,
            body: Bytes::from_static(b"no session"),
        };
        let out = to_outbound(response).unwrap();

        assert_eq!(out.status(), StatusCode::UNAUTHORIZED);
        let cookies: Vec<_> = out
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies, vec!["a=1; Path=/", "b=2; Path=/"]);
    }

    #[test]
    fn test_content_length_reflects_reencoded_payload() {
        let response = response_with(Some("application/json"), b"{ \"a\" : 1 }");
        let out = to_outbound(response).unwrap();

        // "{\"a\":1}" after re-encoding.
        assert_eq!(out.headers()[header::CONTENT_LENGTH], "7");
    }
}
