//! # Functional Common
//!
//! Shared errors and configuration for the functional toolkit.
//!
//! - [`FunctionalError`]: unified error type with the protocol sub-errors
//! - [`FunctionalConfig`]: registry and obligation settings loaded from the environment

pub mod config;
pub mod error;

pub use config::{FunctionalConfig, ObligationSettings, RegistrySettings};
pub use error::{FunctionalError, ProtocolError, Result};

/// Toolkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default threshold after which an untimed wait logs a warning
pub const DEFAULT_SLOW_WAIT_WARN_MS: u64 = 5_000;

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "FUNCTIONAL_";
