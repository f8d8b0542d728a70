//! Method arity as declared by candidates and as demanded by protocols

use std::fmt;

use serde::{Deserialize, Serialize};

/// Arity a candidate member actually declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodArity {
    /// Exactly this many positional parameters
    Fixed(usize),
    /// Accepts any number of positional parameters
    Variadic,
}

/// Arity a protocol requires of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredArity {
    /// Any declared arity is acceptable
    #[default]
    Any,
    /// The member must take exactly this many parameters (or be variadic)
    Exactly(usize),
}

impl RequiredArity {
    /// Whether a candidate declaring `candidate` meets this requirement
    #[inline]
    pub fn accepts(self, candidate: MethodArity) -> bool {
        match (self, candidate) {
            (RequiredArity::Any, _) => true,
            (RequiredArity::Exactly(_), MethodArity::Variadic) => true,
            (RequiredArity::Exactly(expected), MethodArity::Fixed(actual)) => expected == actual,
        }
    }
}

impl From<usize> for RequiredArity {
    fn from(n: usize) -> Self {
        RequiredArity::Exactly(n)
    }
}

impl From<usize> for MethodArity {
    fn from(n: usize) -> Self {
        MethodArity::Fixed(n)
    }
}

impl fmt::Display for MethodArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodArity::Fixed(n) => write!(f, "{n}"),
            MethodArity::Variadic => f.write_str("*"),
        }
    }
}

impl fmt::Display for RequiredArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredArity::Any => f.write_str("any"),
            RequiredArity::Exactly(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_requirement() {
        let req = RequiredArity::Exactly(2);
        assert!(req.accepts(MethodArity::Fixed(2)));
        assert!(req.accepts(MethodArity::Variadic));
        assert!(!req.accepts(MethodArity::Fixed(1)));
        assert!(!req.accepts(MethodArity::Fixed(3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(RequiredArity::Any.to_string(), "any");
        assert_eq!(RequiredArity::from(3).to_string(), "3");
        assert_eq!(MethodArity::Variadic.to_string(), "*");
    }

    proptest! {
        #[test]
        fn any_accepts_every_candidate(n in 0usize..64) {
            prop_assert!(RequiredArity::Any.accepts(MethodArity::Fixed(n)));
            prop_assert!(RequiredArity::Any.accepts(MethodArity::Variadic));
        }

        #[test]
        fn exact_accepts_only_equal_or_variadic(expected in 0usize..16, actual in 0usize..16) {
            let req = RequiredArity::Exactly(expected);
            prop_assert_eq!(req.accepts(MethodArity::Fixed(actual)), expected == actual);
            prop_assert!(req.accepts(MethodArity::Variadic));
        }
    }
}
