//! HTTP-backed identity provider.
//!
//! The production [`IdentityHandler`]: forwards normalized requests to the
//! externally hosted identity service over HTTP. The provider swaps the
//! request's origin for its configured endpoint, attaches the shared secret,
//! and treats everything else as opaque.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Uri};
use http_body_util::BodyExt;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use url::Url;

use crate::config::IdentityConfig;
use crate::identity::{IdentityError, IdentityHandler};
use crate::relay::{NormalizedRequest, NormalizedResponse};

/// Identity provider reached over HTTP.
pub struct HttpIdentityProvider {
    client: Client<HttpConnector, Body>,
    endpoint: Url,
    secret: String,
    database_url: String,
}

impl HttpIdentityProvider {
    /// Initialize the provider from configuration.
    ///
    /// The secret and storage connection string are consumed here, once, and
    /// never interpreted by the relay.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| IdentityError::Request(e.to_string()))?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            endpoint,
            secret: config.secret.clone(),
            database_url: config.database_url.clone(),
        })
    }

    /// Storage connection string this provider was initialized with.
    ///
    /// Held for the identity service's own use; the relay never reads it.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Rewrite the normalized absolute URL onto the identity endpoint,
    /// keeping path and query intact.
    fn target_uri(&self, url: &str) -> Result<Uri, IdentityError> {
        let inbound = Url::parse(url).map_err(|e| IdentityError::Request(e.to_string()))?;
        let mut target = self.endpoint.clone();
        target.set_path(inbound.path());
        target.set_query(inbound.query());
        target
            .as_str()
            .parse::<Uri>()
            .map_err(|e| IdentityError::Request(e.to_string()))
    }
}

#[async_trait]
impl IdentityHandler for HttpIdentityProvider {
    async fn handle(
        &self,
        request: NormalizedRequest,
    ) -> Result<NormalizedResponse, IdentityError> {
        let uri = self.target_uri(&request.url)?;

        let body = match request.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        };

        let mut forwarded = Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .body(body)
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        for (name, value) in request.headers.iter() {
            forwarded.headers_mut().append(name, value.clone());
        }
        // The inbound host names this relay, not the identity service.
        forwarded.headers_mut().remove(header::HOST);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.secret))
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        forwarded.headers_mut().insert(header::AUTHORIZATION, bearer);

        let response = self
            .client
            .request(forwarded)
            .await
            .map_err(|e| IdentityError::Unreachable(e.to_string()))?;

        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|e| IdentityError::Body(e.to_string()))?
            .to_bytes();

        Ok(NormalizedResponse {
            status: parts.status,
            headers: parts.headers,
            body: bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HttpIdentityProvider {
        HttpIdentityProvider::new(&IdentityConfig {
            endpoint: "http://identity.internal:3100".into(),
            secret: "s3cret".into(),
            database_url: "mongodb://localhost:27017/steady".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_target_uri_swaps_origin_keeps_path_and_query() {
        let uri = provider()
            .target_uri("http://localhost:3000/api/auth/callback?code=123")
            .unwrap();

        assert_eq!(
            uri.to_string(),
            "http://identity.internal:3100/api/auth/callback?code=123"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected_at_init() {
        let result = HttpIdentityProvider::new(&IdentityConfig {
            endpoint: "not a url".into(),
            secret: "s".into(),
            database_url: "mongodb://localhost".into(),
        });

        assert!(result.is_err());
    }
}
