//! # Functional
//!
//! Two primitives for a small functional toolkit:
//!
//! - [`obligation`]: a one-shot asynchronous result holder with blocking,
//!   timeout-bounded retrieval
//! - [`protocol`]: named structural protocols and a runtime conformance checker
//!
//! Call [`init`] once at startup, before values are checked concurrently.

pub use functional_common as common;
pub use functional_obligation as obligation;
pub use functional_protocol as protocol;

pub use functional_common::{FunctionalConfig, FunctionalError, ProtocolError, Result};
pub use functional_obligation::{Obligation, ObligationCell, Resolver, State};
pub use functional_protocol::{
    define_protocol, ensure_satisfies, lookup_protocol, protocols_defined, require_protocols,
    satisfies, Descriptor, Object, ProtocolBuilder, Reflect, Registry, TypeInfo,
};

use tracing::info;

/// Apply `config` to the global registry and obligation defaults
pub fn init(config: &FunctionalConfig) -> Result<()> {
    init_with(config, Registry::global())
}

/// Apply `config` to `registry` and the obligation defaults
pub fn init_with(config: &FunctionalConfig, registry: &Registry) -> Result<()> {
    functional_obligation::configure(&config.obligation);

    if config.registry.preload_builtins {
        functional_obligation::register_obligation_protocols(registry)?;
    }

    info!(
        version = functional_common::VERSION,
        protocols = registry.len(),
        preload_builtins = config.registry.preload_builtins,
        "Functional toolkit initialized"
    );
    Ok(())
}

/// Load configuration from the environment and [`init`] with it
pub fn init_from_env() -> Result<FunctionalConfig> {
    let config = FunctionalConfig::load()?;
    init(&config)?;
    Ok(config)
}
