//! The obligation capability set

use std::time::Duration;

use crate::state::State;

/// Eventual result of a computation that may not be available yet
///
/// The state moves at most once, from pending to fulfilled or rejected, and
/// the payload never changes afterwards.
pub trait Obligation {
    /// Payload of a fulfilled obligation
    type Value;
    /// Payload of a rejected obligation
    type Reason;

    /// Current state
    fn state(&self) -> State;

    /// The fulfilled payload
    ///
    /// Returns immediately once settled (`None` when rejected). While
    /// pending, blocks until settled, or for at most `timeout`; running out
    /// of time yields `None` and does not affect the producer.
    fn value(&self, timeout: Option<Duration>) -> Option<Self::Value>;

    /// The rejection payload, if rejected
    fn reason(&self) -> Option<Self::Reason>;

    fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    fn is_fulfilled(&self) -> bool {
        self.state().is_fulfilled()
    }

    fn is_rejected(&self) -> bool {
        self.state().is_rejected()
    }

    /// Alias of [`Obligation::is_fulfilled`]
    fn is_realized(&self) -> bool {
        self.is_fulfilled()
    }
}
