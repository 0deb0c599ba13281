//! Identity provider boundary.
//!
//! The identity provider is opaque to this crate: credential checks, session
//! issuance, and error payloads are entirely its concern. The relay depends on
//! one capability only, expressed by [`IdentityHandler`]: accept a normalized
//! request, return a normalized response, asynchronously, once per request.

pub mod provider;

pub use provider::HttpIdentityProvider;

use async_trait::async_trait;
use thiserror::Error;

use crate::relay::{NormalizedRequest, NormalizedResponse};

/// Error type for identity handler invocations.
///
/// These never reach the client; the relay collapses them into its fixed
/// failure response.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service unreachable: {0}")]
    Unreachable(String),

    #[error("identity request could not be built: {0}")]
    Request(String),

    #[error("identity response body could not be read: {0}")]
    Body(String),
}

/// The single entry point the relay requires from an identity provider.
#[async_trait]
pub trait IdentityHandler: Send + Sync {
    /// Handle one normalized authentication request.
    ///
    /// Called exactly once per inbound request; the relay never retries.
    async fn handle(&self, request: NormalizedRequest)
        -> Result<NormalizedResponse, IdentityError>;
}
