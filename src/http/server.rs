//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler and liveness route
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Bind server to listener, serve with graceful shutdown
//! - Gate requests on the configured auth prefix

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::request::RequestIdLayer;
use crate::identity::{HttpIdentityProvider, IdentityError, IdentityHandler};
use crate::lifecycle::signals;
use crate::relay::IdentityRelay;

/// Largest request body the relay will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<IdentityRelay>,
}

/// HTTP server for the authentication relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server backed by the HTTP identity provider from config.
    pub fn new(config: RelayConfig) -> Result<Self, IdentityError> {
        let provider = Arc::new(HttpIdentityProvider::new(&config.identity)?);
        Ok(Self::with_handler(config, provider))
    }

    /// Create a server around an explicit identity handler.
    ///
    /// This is the seam tests use to substitute a fake handler.
    pub fn with_handler(config: RelayConfig, handler: Arc<dyn IdentityHandler>) -> Self {
        let relay = Arc::new(IdentityRelay::new(handler, &config.auth));
        let state = AppState { relay };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(liveness))
            .route("/{*path}", any(relay_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        // Origin validity is checked at config load; a parse failure here
        // means CORS was deliberately misconfigured and is skipped.
        if let Ok(origin) = config.cors.allowed_origin.parse::<HeaderValue>() {
            router = router.layer(cors_layer(origin));
        }

        router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_prefix = %self.config.auth.path_prefix,
            "HTTP server starting"
        );

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {}
                    _ = signals::shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Credentialed CORS for the SPA origin.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
}

/// Liveness route, kept for the frontend's reachability probe.
async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({"message": "Backend server is running!"}))
}

/// Wildcard handler: prefix-matched requests go to the relay, everything else
/// belongs to application routing (out of scope here, answered with 404).
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();
    if !state.relay.matches(&path) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(path = %path, error = %error, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    state.relay.relay(&parts, body).await
}
