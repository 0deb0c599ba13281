//! Request normalization.
//!
//! # Responsibilities
//! - Rebuild the absolute target URL from the configured base origin
//! - Copy inbound headers verbatim (ordered, case-insensitive, multi-value)
//! - Leave the body absent for GET/HEAD; re-serialize parsed payloads otherwise
//!
//! # Design Decisions
//! - No header validation: malformed values pass through and the identity
//!   provider rejects them
//! - A payload that is not valid JSON is forwarded as-is

use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};
use bytes::Bytes;

/// A framework-independent representation of an inbound HTTP request.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute target URL (base origin + path + query).
    pub url: String,
    /// Inbound headers, copied verbatim. `HeaderMap` preserves insertion
    /// order, compares names case-insensitively, and keeps multiple values
    /// per name.
    pub headers: HeaderMap,
    /// Payload. Absent for GET/HEAD; an empty body and an absent body are
    /// different things to the identity provider.
    pub body: Option<Bytes>,
}

/// Build a [`NormalizedRequest`] from inbound request parts.
///
/// Pure construction: no I/O, no side effects.
pub fn normalize(parts: &Parts, base_origin: &str, body: Bytes) -> NormalizedRequest {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(parts.uri.path());
    let url = format!("{}{}", base_origin.trim_end_matches('/'), path_and_query);

    let body = if parts.method == Method::GET || parts.method == Method::HEAD {
        None
    } else {
        Some(reserialize(body))
    };

    NormalizedRequest {
        method: parts.method.clone(),
        url,
        headers: parts.headers.clone(),
        body,
    }
}

/// Re-serialize a payload that upstream middleware parsed as JSON.
///
/// Mirrors the frontend contract: structured bodies arrive as JSON and are
/// forwarded in canonical serialized form. Anything that does not parse is
/// passed through untouched.
fn reserialize(raw: Bytes) -> Bytes {
    match serde_json::from_slice::<serde_json::Value>(&raw) {
        Ok(value) => serde_json::to_vec(&value).map(Bytes::from).unwrap_or(raw),
        Err(_) => raw,
    }
}
