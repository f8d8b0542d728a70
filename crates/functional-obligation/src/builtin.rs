//! Protocols describing obligation-like values
//!
//! `future` covers anything that can be waited on and polled; `promise`
//! adds rejection and chaining. [`ObligationCell`] reflects its own shape,
//! so it satisfies `future` but not `promise`.

use functional_common::ProtocolError;
use functional_protocol::{ProtocolBuilder, Reflect, Registry, TypeInfo};
use lazy_static::lazy_static;
use tracing::debug;

use crate::cell::ObligationCell;
use crate::obligation::Obligation;

/// Name of the future protocol
pub const FUTURE: &str = "future";

/// Name of the promise protocol
pub const PROMISE: &str = "promise";

lazy_static! {
    static ref OBLIGATION_SHAPE: TypeInfo = TypeInfo::new("Obligation")
        .with_method("state", 0)
        .with_variadic_method("value")
        .with_method("reason", 0)
        .with_method("pending?", 0)
        .with_method("fulfilled?", 0)
        .with_method("rejected?", 0)
        .with_method("realized?", 0)
        .with_variadic_method("deref");
}

fn future(p: &mut ProtocolBuilder) {
    p.method_any("value")
        .method("pending?", 0)
        .method("fulfilled?", 0);
}

fn promise(p: &mut ProtocolBuilder) {
    p.method("state", 0)
        .method_any("value")
        .method("pending?", 0)
        .method("fulfilled?", 0)
        .method("rejected?", 0)
        .method("then", 0)
        .method_any("rescue");
}

/// Register `future` and `promise`, skipping names already present
pub fn register_obligation_protocols(registry: &Registry) -> Result<(), ProtocolError> {
    let builtins: [(&str, fn(&mut ProtocolBuilder)); 2] = [(FUTURE, future), (PROMISE, promise)];

    for (name, build) in builtins {
        match registry.define(name, build) {
            Ok(_) => {}
            Err(ProtocolError::Duplicate { .. }) => {
                debug!(protocol = %name, "Built-in protocol already registered");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl<T: Clone, E: Clone> Reflect for ObligationCell<T, E> {
    fn type_info(&self) -> &TypeInfo {
        &OBLIGATION_SHAPE
    }

    fn inspect(&self) -> String {
        format!("#<Obligation {}>", self.state())
    }
}
