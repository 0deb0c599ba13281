//! The identity relay itself.
//!
//! Per request the relay moves through two states: awaiting the handler's
//! result, then exactly one of response-written or error-response-written.
//! There is no cancellation path and no relay-level timeout; a hung handler
//! call hangs only its own request task.

use std::sync::Arc;
use std::time::Instant;

use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;

use crate::config::AuthConfig;
use crate::http::request::X_REQUEST_ID;
use crate::identity::IdentityHandler;
use crate::observability::metrics;
use crate::relay::{normalizer, translate};

/// Relays prefix-matched requests to the identity handler.
///
/// Holds the initialized-once handler context explicitly, so tests can
/// substitute a fake at construction. No state is shared between concurrent
/// relay invocations.
pub struct IdentityRelay {
    handler: Arc<dyn IdentityHandler>,
    path_prefix: String,
    base_origin: String,
}

impl IdentityRelay {
    /// Create a relay around an identity handler.
    pub fn new(handler: Arc<dyn IdentityHandler>, auth: &AuthConfig) -> Self {
        Self {
            handler,
            path_prefix: auth.path_prefix.clone(),
            base_origin: auth.base_origin.clone(),
        }
    }

    /// Whether a request path is selected for relaying.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }

    /// Relay one inbound request: normalize, invoke the handler exactly once,
    /// translate its response. All failure modes collapse to the generic
    /// authentication error response; detail is logged for operators only.
    pub async fn relay(&self, parts: &Parts, body: Bytes) -> Response {
        let start_time = Instant::now();
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let normalized = normalizer::normalize(parts, &self.base_origin, body);
        let method = normalized.method.to_string();

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %normalized.url,
            body_present = normalized.body.is_some(),
            "Relaying authentication request"
        );

        match self.handler.handle(normalized).await {
            Ok(response) => {
                let status = response.status;
                match translate::to_outbound(response) {
                    Ok(outbound) => {
                        metrics::record_relay_request(&method, status.as_u16(), start_time);
                        outbound
                    }
                    Err(error) => {
                        tracing::error!(
                            request_id = %request_id,
                            error = %error,
                            "Identity response declared JSON but failed to decode"
                        );
                        metrics::record_identity_failure();
                        metrics::record_relay_request(&method, 500, start_time);
                        failure_response()
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    request_id = %request_id,
                    error = %error,
                    "Identity handler failed"
                );
                metrics::record_identity_failure();
                metrics::record_relay_request(&method, 500, start_time);
                failure_response()
            }
        }
    }
}

/// The fixed response returned for any identity handler failure.
///
/// Internal error detail never reaches the client.
fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Authentication error"})),
    )
        .into_response()
}
