//! # Functional Protocol
//!
//! Named structural protocols and a runtime conformance checker.
//!
//! A protocol names the instance methods (with arity), type-level methods and
//! constants a value's type must provide. Protocols are registered once in a
//! [`Registry`] and never updated. Values describe themselves through
//! [`Reflect`]; where the set of implementers is known at compile time a
//! trait bound is the better tool, and this checker is meant for values that
//! only arrive at runtime (plugins, manifests).
//!
//! The free functions below operate on [`Registry::global`]. Define global
//! protocols during startup, before concurrent checks begin.
//!
//! ```
//! use functional_protocol::{define_protocol, satisfies, TypeInfo};
//!
//! define_protocol("doc_counter", |p| {
//!     p.method("increment", 0).class_method("reset", 0);
//! })
//! .unwrap();
//!
//! let counter = TypeInfo::new("Counter")
//!     .with_class_method("increment", 0)
//!     .with_class_method("reset", 0);
//! assert!(satisfies(&counter, &["doc_counter"]));
//! ```

pub mod arity;
pub mod checker;
pub mod descriptor;
pub mod reflect;
pub mod registry;

use std::sync::Arc;

use functional_common::ProtocolError;

pub use arity::{MethodArity, RequiredArity};
pub use descriptor::{Descriptor, ProtocolBuilder};
pub use reflect::{Object, ProbeError, Reflect, TypeInfo};
pub use registry::Registry;

/// Define a protocol in the global registry
pub fn define_protocol<F>(name: &str, build: F) -> Result<Arc<Descriptor>, ProtocolError>
where
    F: FnOnce(&mut ProtocolBuilder),
{
    Registry::global().define(name, build)
}

/// Look up a protocol in the global registry
pub fn lookup_protocol(name: &str) -> Option<Arc<Descriptor>> {
    Registry::global().lookup(name)
}

/// Whether `target` satisfies every named global protocol
pub fn satisfies<R, S>(target: &R, names: &[S]) -> bool
where
    R: Reflect + ?Sized,
    S: AsRef<str>,
{
    Registry::global().satisfies_all(target, names)
}

/// Return `target` if it satisfies every named global protocol
pub fn ensure_satisfies<'a, R, S>(target: &'a R, names: &[S]) -> Result<&'a R, ProtocolError>
where
    R: Reflect + ?Sized,
    S: AsRef<str>,
{
    Registry::global().ensure_satisfies(target, names)
}

/// Whether every name is a defined global protocol
pub fn protocols_defined<S: AsRef<str>>(names: &[S]) -> bool {
    Registry::global().all_defined(names)
}

/// Fail listing every name that is not a defined global protocol
pub fn require_protocols<S: AsRef<str>>(names: &[S]) -> Result<(), ProtocolError> {
    Registry::global().require_defined(names)
}
