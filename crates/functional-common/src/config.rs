//! Toolkit configuration

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FunctionalError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionalConfig {
    /// Protocol registry settings
    pub registry: RegistrySettings,
    /// Obligation settings
    pub obligation: ObligationSettings,
}

impl FunctionalConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(val) = lookup(&var("PRELOAD_BUILTINS")) {
            cfg.registry.preload_builtins = parse_bool(&val)
                .ok_or_else(|| invalid("PRELOAD_BUILTINS", &val))?;
        }
        if let Some(val) = lookup(&var("SLOW_WAIT_WARN_MS")) {
            cfg.obligation.slow_wait_warn_ms = val
                .trim()
                .parse()
                .map_err(|_| invalid("SLOW_WAIT_WARN_MS", &val))?;
        }

        debug!(?cfg, "Loaded functional configuration");
        Ok(cfg)
    }

    /// Parse configuration from JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Protocol registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Register the built-in `future` and `promise` protocols on init
    pub preload_builtins: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            preload_builtins: true,
        }
    }
}

/// Obligation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObligationSettings {
    /// Untimed waits longer than this log a warning (0 disables)
    pub slow_wait_warn_ms: u64,
}

impl Default for ObligationSettings {
    fn default() -> Self {
        Self {
            slow_wait_warn_ms: crate::DEFAULT_SLOW_WAIT_WARN_MS,
        }
    }
}

fn var(suffix: &str) -> String {
    format!("{}{}", crate::ENV_PREFIX, suffix)
}

fn invalid(suffix: &str, value: &str) -> FunctionalError {
    FunctionalError::Config(format!("invalid {}: {value:?}", var(suffix)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = FunctionalConfig::from_lookup(|_| None).unwrap();
        assert!(cfg.registry.preload_builtins);
        assert_eq!(cfg.obligation.slow_wait_warn_ms, 5_000);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = FunctionalConfig::from_lookup(lookup_from(&[
            ("FUNCTIONAL_PRELOAD_BUILTINS", "off"),
            ("FUNCTIONAL_SLOW_WAIT_WARN_MS", "250"),
        ]))
        .unwrap();
        assert!(!cfg.registry.preload_builtins);
        assert_eq!(cfg.obligation.slow_wait_warn_ms, 250);
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let err = FunctionalConfig::from_lookup(lookup_from(&[(
            "FUNCTIONAL_SLOW_WAIT_WARN_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, FunctionalError::Config(msg) if msg.contains("SLOW_WAIT_WARN_MS")));
    }

    #[test]
    fn test_partial_json() {
        let cfg = FunctionalConfig::from_json(r#"{"obligation":{"slow_wait_warn_ms":10}}"#).unwrap();
        assert!(cfg.registry.preload_builtins);
        assert_eq!(cfg.obligation.slow_wait_warn_ms, 10);
    }
}
