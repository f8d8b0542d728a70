//! Error types for the functional toolkit
//!
//! Provides a unified error type and the protocol-specific error variants

use thiserror::Error;

/// Result type alias using FunctionalError
pub type Result<T> = std::result::Result<T, FunctionalError>;

/// Unified error type for toolkit operations
#[derive(Debug, Error)]
pub enum FunctionalError {
    // Protocol registry and conformance errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Protocol registry and conformance errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error(":{name} has already been defined")]
    Duplicate { name: String },

    #[error("The following protocols are undefined: {}.", join_names(.names))]
    Undefined { names: Vec<String> },

    #[error(
        "Value ({type_name}) '{target}' does not behave as all of: {}.",
        join_names(.protocols)
    )]
    Unsatisfied {
        type_name: String,
        target: String,
        protocols: Vec<String>,
    },
}

impl ProtocolError {
    /// Protocol names carried by the error
    pub fn names(&self) -> Vec<&str> {
        match self {
            ProtocolError::Duplicate { name } => vec![name.as_str()],
            ProtocolError::Undefined { names } => names.iter().map(String::as_str).collect(),
            ProtocolError::Unsatisfied { protocols, .. } => {
                protocols.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Render names as `:a; :b`
fn join_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!(":{name}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for FunctionalError {
    fn from(err: serde_json::Error) -> Self {
        FunctionalError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display() {
        let err = ProtocolError::Duplicate {
            name: "counter".to_string(),
        };
        assert_eq!(err.to_string(), ":counter has already been defined");
    }

    #[test]
    fn test_undefined_lists_every_name() {
        let err = ProtocolError::Undefined {
            names: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "The following protocols are undefined: :a; :b.");
        assert_eq!(err.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_unsatisfied_names_target() {
        let err = ProtocolError::Unsatisfied {
            type_name: "Counter".to_string(),
            target: "#<Counter 3>".to_string(),
            protocols: vec!["counter".to_string(), "resettable".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("(Counter)"));
        assert!(msg.contains("'#<Counter 3>'"));
        assert!(msg.contains(":counter; :resettable"));
    }

    #[test]
    fn test_wraps_into_unified_error() {
        let err: FunctionalError = ProtocolError::Duplicate {
            name: "p".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Protocol error: :p"));
    }
}
