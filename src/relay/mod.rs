//! Authentication request relay subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (prefix-matched)
//!     → normalizer.rs (framework-native → NormalizedRequest)
//!     → identity handler (opaque, invoked exactly once)
//!     → translate.rs (NormalizedResponse → framework-native)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Both normalized forms are per-request transients; no cross-request state
//! - The outbound response is built fully before it is written, so a
//!   translation failure never leaves a partially written response
//! - Handler failures collapse to one fixed 500 body; detail goes to the logs
//! - No retries: authentication side effects are not known-idempotent

pub mod engine;
pub mod normalizer;
pub mod translate;

pub use engine::IdentityRelay;
pub use normalizer::NormalizedRequest;
pub use translate::NormalizedResponse;
