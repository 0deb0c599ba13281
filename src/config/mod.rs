//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     TOML file (optional) → schema.rs (serde structs)
//!         → loader.rs (environment overlay for secrets)
//!         → validation.rs (all errors collected)
//!         → accepted RelayConfig
//! ```
//!
//! # Design Decisions
//! - Configuration is read once at startup; no hot reload
//! - Secrets come from the environment, never from defaults
//! - Validation is a pure function returning every error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{
    AuthConfig, CorsConfig, IdentityConfig, ListenerConfig, ObservabilityConfig, RelayConfig,
    TimeoutConfig,
};
