//! # Functional Obligation
//!
//! A one-shot result holder: pending until its single producer fulfills or
//! rejects it, readable by any number of threads or tasks.
//!
//! - [`ObligationCell`] / [`Resolver`]: reader and producer handles
//! - [`Obligation`]: the capability set (`state`, `value`, predicates)
//! - [`capability`]: helpers that probe arbitrary values and degrade gracefully
//! - [`builtin`]: the `future` and `promise` protocols
//!
//! ```
//! use std::time::Duration;
//! use functional_obligation::{Obligation, ObligationCell};
//!
//! let (resolver, cell) = ObligationCell::<u32>::pending();
//! assert_eq!(cell.value(Some(Duration::from_millis(1))), None);
//!
//! resolver.fulfill(3);
//! assert_eq!(cell.value(None), Some(3));
//! ```

pub mod builtin;
pub mod capability;
pub mod cell;
pub mod obligation;
pub mod state;

pub use builtin::{register_obligation_protocols, FUTURE, PROMISE};
pub use capability::{deref, is_fulfilled, is_pending, is_realized, is_rejected, Capabilities};
pub use cell::{configure, ObligationCell, Resolver};
pub use obligation::Obligation;
pub use state::State;
