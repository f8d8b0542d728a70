//! Structural conformance of a reflected value against a descriptor

use tracing::debug;

use crate::arity::{MethodArity, RequiredArity};
use crate::descriptor::Descriptor;
use crate::reflect::{ProbeError, Reflect};

/// Whether `target` meets every requirement of `descriptor`
///
/// Constants are checked first, then instance methods, then type-level
/// methods; the first unmet requirement ends the check.
pub fn conforms<R: Reflect + ?Sized>(target: &R, descriptor: &Descriptor) -> bool {
    let protocol = descriptor.name();

    for constant in descriptor.constants() {
        if !probe_ok(target.has_constant(constant), protocol, constant) {
            debug!(protocol = %protocol, constant = %constant, "Missing constant");
            return false;
        }
    }

    for (method, required) in descriptor.methods() {
        if !arity_ok(target.instance_method(method), *required, protocol, method) {
            debug!(
                protocol = %protocol,
                method = %method,
                arity = %required,
                "Missing or incompatible instance method"
            );
            return false;
        }
    }

    for (method, required) in descriptor.class_methods() {
        if !arity_ok(target.class_method(method), *required, protocol, method) {
            debug!(
                protocol = %protocol,
                method = %method,
                arity = %required,
                "Missing or incompatible class method"
            );
            return false;
        }
    }

    true
}

fn probe_ok(probe: Result<bool, ProbeError>, protocol: &str, member: &str) -> bool {
    match probe {
        Ok(found) => found,
        Err(e) => {
            debug!(protocol = %protocol, member = %member, error = %e, "Probe failed");
            false
        }
    }
}

fn arity_ok(
    probe: Result<Option<MethodArity>, ProbeError>,
    required: RequiredArity,
    protocol: &str,
    member: &str,
) -> bool {
    match probe {
        Ok(Some(declared)) => required.accepts(declared),
        Ok(None) => false,
        Err(e) => {
            debug!(protocol = %protocol, member = %member, error = %e, "Probe failed");
            false
        }
    }
}
