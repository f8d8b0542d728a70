//! Protocol registry
//!
//! Append-only mapping from protocol name to [`Descriptor`]. Registration is
//! serialized under the write lock, so two threads defining the same name
//! race to exactly one winner. Lookups and checks take the read lock only
//! long enough to clone the descriptor handle.

use std::collections::HashMap;
use std::sync::Arc;

use functional_common::ProtocolError;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::checker;
use crate::descriptor::{Descriptor, ProtocolBuilder};
use crate::reflect::Reflect;

lazy_static! {
    static ref GLOBAL: Registry = Registry::new();
}

/// Registry of protocol descriptors
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashMap<String, Arc<Descriptor>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Define a protocol from the builder's declarations
    pub fn define<F>(&self, name: &str, build: F) -> Result<Arc<Descriptor>, ProtocolError>
    where
        F: FnOnce(&mut ProtocolBuilder),
    {
        let mut builder = ProtocolBuilder::new();
        build(&mut builder);
        self.insert(builder.build(name))
    }

    /// Register an already-built descriptor
    pub fn insert(&self, descriptor: Descriptor) -> Result<Arc<Descriptor>, ProtocolError> {
        let mut entries = self.entries.write();
        if entries.contains_key(descriptor.name()) {
            warn!(protocol = %descriptor.name(), "Protocol already defined");
            return Err(ProtocolError::Duplicate {
                name: descriptor.name().to_string(),
            });
        }

        let descriptor = Arc::new(descriptor);
        entries.insert(descriptor.name().to_string(), Arc::clone(&descriptor));
        info!(
            protocol = %descriptor.name(),
            methods = descriptor.methods().len(),
            class_methods = descriptor.class_methods().len(),
            constants = descriptor.constants().len(),
            "Protocol defined"
        );
        Ok(descriptor)
    }

    /// Look up a registered protocol
    pub fn lookup(&self, name: &str) -> Option<Arc<Descriptor>> {
        self.entries.read().get(name).cloned()
    }

    /// Define when a builder is given, otherwise look up
    ///
    /// With a builder this fails on an existing name and leaves the
    /// registered descriptor untouched. Without one it never fails.
    pub fn define_or_lookup<F>(
        &self,
        name: &str,
        build: Option<F>,
    ) -> Result<Option<Arc<Descriptor>>, ProtocolError>
    where
        F: FnOnce(&mut ProtocolBuilder),
    {
        match build {
            Some(build) => self.define(name, build).map(Some),
            None => Ok(self.lookup(name)),
        }
    }

    /// Whether a protocol is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered protocol names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every registration
    ///
    /// Test isolation only; protocols are otherwise never removed.
    pub fn reset(&self) {
        let mut entries = self.entries.write();
        debug!(count = entries.len(), "Resetting protocol registry");
        entries.clear();
    }

    // ============ CONFORMANCE ============

    /// Whether `target` satisfies the named protocol
    ///
    /// An unregistered name is never satisfied.
    pub fn satisfies<R: Reflect + ?Sized>(&self, target: &R, name: &str) -> bool {
        match self.lookup(name) {
            Some(descriptor) => checker::conforms(target, &descriptor),
            None => {
                debug!(protocol = %name, "Protocol not defined");
                false
            }
        }
    }

    /// Whether `target` satisfies every named protocol
    pub fn satisfies_all<R, S>(&self, target: &R, names: &[S]) -> bool
    where
        R: Reflect + ?Sized,
        S: AsRef<str>,
    {
        names.iter().all(|name| self.satisfies(target, name.as_ref()))
    }

    /// Return `target` if it satisfies every named protocol
    ///
    /// Fails with [`ProtocolError::Undefined`] if any name is unregistered,
    /// otherwise with [`ProtocolError::Unsatisfied`] when a check fails.
    pub fn ensure_satisfies<'a, R, S>(&self, target: &'a R, names: &[S]) -> Result<&'a R, ProtocolError>
    where
        R: Reflect + ?Sized,
        S: AsRef<str>,
    {
        self.require_defined(names)?;

        if self.satisfies_all(target, names) {
            return Ok(target);
        }

        Err(ProtocolError::Unsatisfied {
            type_name: target.type_info().name.clone(),
            target: target.inspect(),
            protocols: names.iter().map(|name| name.as_ref().to_string()).collect(),
        })
    }

    /// Whether every named protocol is registered
    pub fn all_defined<S: AsRef<str>>(&self, names: &[S]) -> bool {
        let entries = self.entries.read();
        names.iter().all(|name| entries.contains_key(name.as_ref()))
    }

    /// Fail listing every unregistered name, in the order given
    pub fn require_defined<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ProtocolError> {
        let undefined = self.undefined(names);
        if undefined.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::Undefined { names: undefined })
        }
    }

    fn undefined<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let entries = self.entries.read();
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            let name: &str = name.as_ref();
            if !entries.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        missing
    }
}
