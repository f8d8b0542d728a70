//! Reflectable type information
//!
//! Conformance is checked against what a value reports about itself. Types
//! known at compile time describe their shape once (usually in a
//! `lazy_static!`); values crossing a dynamic boundary carry a [`TypeInfo`]
//! parsed from a manifest inside an [`Object`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use functional_common::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arity::MethodArity;

/// Failure to introspect a member
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot introspect `{member}`: {reason}")]
pub struct ProbeError {
    pub member: String,
    pub reason: String,
}

impl ProbeError {
    pub fn new(member: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            reason: reason.into(),
        }
    }
}

/// Structural shape of a runtime type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Runtime type name
    pub name: String,
    /// Instance methods: name -> declared arity
    #[serde(default)]
    pub methods: BTreeMap<String, MethodArity>,
    /// Type-level methods: name -> declared arity
    #[serde(default)]
    pub class_methods: BTreeMap<String, MethodArity>,
    /// Constants defined by the type
    #[serde(default)]
    pub constants: BTreeSet<String>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a shape from a JSON manifest
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_method(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.methods.insert(name.into(), MethodArity::Fixed(arity));
        self
    }

    pub fn with_variadic_method(mut self, name: impl Into<String>) -> Self {
        self.methods.insert(name.into(), MethodArity::Variadic);
        self
    }

    pub fn with_class_method(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.class_methods.insert(name.into(), MethodArity::Fixed(arity));
        self
    }

    pub fn with_variadic_class_method(mut self, name: impl Into<String>) -> Self {
        self.class_methods.insert(name.into(), MethodArity::Variadic);
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>) -> Self {
        self.constants.insert(name.into());
        self
    }

    #[inline]
    pub fn method_arity(&self, name: &str) -> Option<MethodArity> {
        self.methods.get(name).copied()
    }

    #[inline]
    pub fn class_method_arity(&self, name: &str) -> Option<MethodArity> {
        self.class_methods.get(name).copied()
    }

    #[inline]
    pub fn defines_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }
}

/// A value whose structure can be probed at runtime
///
/// Only [`Reflect::type_info`] is required. The probes default to reading it
/// and may be overridden for members that cannot always be introspected; a
/// probe error never escapes a conformance check.
pub trait Reflect {
    /// Shape of the value's runtime type
    fn type_info(&self) -> &TypeInfo;

    /// Textual form used in error messages
    fn inspect(&self) -> String {
        format!("#<{}>", self.type_info().name)
    }

    /// Arity of an instance method, `None` if absent
    fn instance_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        Ok(self.type_info().method_arity(name))
    }

    /// Arity of a type-level method, `None` if absent
    fn class_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        Ok(self.type_info().class_method_arity(name))
    }

    /// Whether the value's type defines a constant
    fn has_constant(&self, name: &str) -> std::result::Result<bool, ProbeError> {
        Ok(self.type_info().defines_constant(name))
    }
}

impl<R: Reflect + ?Sized> Reflect for &R {
    fn type_info(&self) -> &TypeInfo {
        (**self).type_info()
    }

    fn inspect(&self) -> String {
        (**self).inspect()
    }

    fn instance_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        (**self).instance_method(name)
    }

    fn class_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        (**self).class_method(name)
    }

    fn has_constant(&self, name: &str) -> std::result::Result<bool, ProbeError> {
        (**self).has_constant(name)
    }
}

/// A type treated as a value: its methods are its type-level methods
impl Reflect for TypeInfo {
    fn type_info(&self) -> &TypeInfo {
        self
    }

    fn inspect(&self) -> String {
        self.name.clone()
    }

    fn instance_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        Ok(self.class_method_arity(name))
    }
}

/// Dynamically shaped value, e.g. a plugin described by a manifest
#[derive(Debug, Clone)]
pub struct Object {
    shape: Arc<TypeInfo>,
    repr: String,
    opaque: BTreeSet<String>,
}

impl Object {
    pub fn new(shape: Arc<TypeInfo>) -> Self {
        let repr = format!("#<{}>", shape.name);
        Self {
            shape,
            repr,
            opaque: BTreeSet::new(),
        }
    }

    /// Override the textual form
    pub fn with_repr(mut self, repr: impl Into<String>) -> Self {
        self.repr = repr.into();
        self
    }

    /// Mark a member whose signature cannot be introspected
    pub fn with_opaque_member(mut self, name: impl Into<String>) -> Self {
        self.opaque.insert(name.into());
        self
    }

    pub fn shape(&self) -> &Arc<TypeInfo> {
        &self.shape
    }

    fn probe(&self, name: &str) -> std::result::Result<(), ProbeError> {
        if self.opaque.contains(name) {
            return Err(ProbeError::new(name, "signature is opaque"));
        }
        Ok(())
    }
}

impl Reflect for Object {
    fn type_info(&self) -> &TypeInfo {
        &self.shape
    }

    fn inspect(&self) -> String {
        self.repr.clone()
    }

    fn instance_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        self.probe(name)?;
        Ok(self.shape.method_arity(name))
    }

    fn class_method(&self, name: &str) -> std::result::Result<Option<MethodArity>, ProbeError> {
        self.probe(name)?;
        Ok(self.shape.class_method_arity(name))
    }

    fn has_constant(&self, name: &str) -> std::result::Result<bool, ProbeError> {
        self.probe(name)?;
        Ok(self.shape.defines_constant(name))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
