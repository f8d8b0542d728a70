//! Obligation lifecycle state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where an obligation is in its single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Pending,
    Fulfilled,
    Rejected,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Pending => "pending",
            State::Fulfilled => "fulfilled",
            State::Rejected => "rejected",
        }
    }

    /// Neither fulfilled nor rejected
    #[inline]
    pub fn is_pending(self) -> bool {
        !(self.is_fulfilled() || self.is_rejected())
    }

    #[inline]
    pub fn is_fulfilled(self) -> bool {
        self == State::Fulfilled
    }

    #[inline]
    pub fn is_rejected(self) -> bool {
        self == State::Rejected
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
