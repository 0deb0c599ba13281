//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use bytes::Bytes;
use tokio::net::TcpListener;

use auth_relay::config::RelayConfig;
use auth_relay::http::HttpServer;
use auth_relay::identity::{IdentityError, IdentityHandler};
use auth_relay::lifecycle::Shutdown;
use auth_relay::relay::{NormalizedRequest, NormalizedResponse};

type RespondFn =
    dyn Fn(&NormalizedRequest) -> Result<NormalizedResponse, IdentityError> + Send + Sync;

/// Programmable fake identity handler.
///
/// Records every request it sees so tests can assert on the normalized form.
pub struct FakeIdentity {
    respond: Box<RespondFn>,
    seen: Mutex<Vec<NormalizedRequest>>,
}

impl FakeIdentity {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&NormalizedRequest) -> Result<NormalizedResponse, IdentityError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            respond: Box::new(respond),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> Option<NormalizedRequest> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityHandler for FakeIdentity {
    async fn handle(
        &self,
        request: NormalizedRequest,
    ) -> Result<NormalizedResponse, IdentityError> {
        let result = (self.respond)(&request);
        self.seen.lock().unwrap().push(request);
        result
    }
}

/// Build a JSON handler response.
pub fn json_response(status: u16, body: &str) -> NormalizedResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    NormalizedResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers,
        body: Bytes::from(body.to_string()),
    }
}

/// Build a raw-text handler response with an arbitrary content type.
#[allow(dead_code)]
pub fn text_response(status: u16, content_type: &str, body: &'static str) -> NormalizedResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type).unwrap(),
    );
    NormalizedResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers,
        body: Bytes::from_static(body.as_bytes()),
    }
}

/// Spawn a relay server around a fake handler on an ephemeral port.
pub async fn spawn_relay(handler: Arc<FakeIdentity>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = RelayConfig::default();
    config.listener.bind_address = addr.to_string();
    config.auth.base_origin = format!("http://{}", addr);
    // Never dialed: the fake handler replaces the HTTP provider.
    config.identity.endpoint = "http://127.0.0.1:1".into();
    config.identity.secret = "test-secret".into();
    config.identity.database_url = "mongodb://127.0.0.1:27017/steady".into();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_handler(config, handler);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait until the server answers.
    let client = client();
    for _ in 0..50 {
        if client
            .get(format!("http://{}/", addr))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    (addr, shutdown)
}

/// Non-pooling reqwest client for test isolation.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
