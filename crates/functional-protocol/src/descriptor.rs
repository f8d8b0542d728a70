//! Protocol descriptors and the builder that accumulates them

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::arity::RequiredArity;

/// Immutable requirements of a registered protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    name: String,
    methods: BTreeMap<String, RequiredArity>,
    class_methods: BTreeMap<String, RequiredArity>,
    constants: BTreeSet<String>,
}

impl Descriptor {
    /// Protocol name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required instance methods
    pub fn methods(&self) -> &BTreeMap<String, RequiredArity> {
        &self.methods
    }

    /// Required type-level methods
    pub fn class_methods(&self) -> &BTreeMap<String, RequiredArity> {
        &self.class_methods
    }

    /// Required constants
    pub fn constants(&self) -> &BTreeSet<String> {
        &self.constants
    }

    /// True when the protocol requires nothing
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.class_methods.is_empty() && self.constants.is_empty()
    }
}

/// Accumulates requirements before they are committed to a registry
///
/// Redeclaring a member replaces its arity.
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    methods: BTreeMap<String, RequiredArity>,
    class_methods: BTreeMap<String, RequiredArity>,
    constants: BTreeSet<String>,
}

impl ProtocolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an instance method taking exactly `arity` parameters
    pub fn method(&mut self, name: impl Into<String>, arity: usize) -> &mut Self {
        self.methods.insert(name.into(), RequiredArity::Exactly(arity));
        self
    }

    /// Require an instance method of any arity
    pub fn method_any(&mut self, name: impl Into<String>) -> &mut Self {
        self.methods.insert(name.into(), RequiredArity::Any);
        self
    }

    /// Require a type-level method taking exactly `arity` parameters
    pub fn class_method(&mut self, name: impl Into<String>, arity: usize) -> &mut Self {
        self.class_methods
            .insert(name.into(), RequiredArity::Exactly(arity));
        self
    }

    /// Require a type-level method of any arity
    pub fn class_method_any(&mut self, name: impl Into<String>) -> &mut Self {
        self.class_methods.insert(name.into(), RequiredArity::Any);
        self
    }

    /// Require a constant on the value's type
    pub fn constant(&mut self, name: impl Into<String>) -> &mut Self {
        self.constants.insert(name.into());
        self
    }

    pub fn attr_reader(&mut self, name: &str) -> &mut Self {
        self.method(name, 0)
    }

    pub fn attr_writer(&mut self, name: &str) -> &mut Self {
        self.method(format!("{name}="), 1)
    }

    pub fn attr_accessor(&mut self, name: &str) -> &mut Self {
        self.attr_reader(name).attr_writer(name)
    }

    pub fn class_attr_reader(&mut self, name: &str) -> &mut Self {
        self.class_method(name, 0)
    }

    pub fn class_attr_writer(&mut self, name: &str) -> &mut Self {
        self.class_method(format!("{name}="), 1)
    }

    pub fn class_attr_accessor(&mut self, name: &str) -> &mut Self {
        self.class_attr_reader(name).class_attr_writer(name)
    }

    /// Finalize into an immutable descriptor
    pub fn build(self, name: impl Into<String>) -> Descriptor {
        Descriptor {
            name: name.into(),
            methods: self.methods,
            class_methods: self.class_methods,
            constants: self.constants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_sugar() {
        let mut builder = ProtocolBuilder::new();
        builder.attr_accessor("name").class_attr_accessor("count");
        let desc = builder.build("named");

        assert_eq!(desc.name(), "named");
        assert_eq!(desc.methods().get("name"), Some(&RequiredArity::Exactly(0)));
        assert_eq!(desc.methods().get("name="), Some(&RequiredArity::Exactly(1)));
        assert_eq!(desc.class_methods().get("count"), Some(&RequiredArity::Exactly(0)));
        assert_eq!(desc.class_methods().get("count="), Some(&RequiredArity::Exactly(1)));
        assert!(desc.constants().is_empty());
    }

    #[test]
    fn test_redeclaration_replaces_arity() {
        let mut builder = ProtocolBuilder::new();
        builder.method("call", 1).method_any("call").constant("ID").constant("ID");
        let desc = builder.build("callable");

        assert_eq!(desc.methods().get("call"), Some(&RequiredArity::Any));
        assert_eq!(desc.constants().len(), 1);
    }

    #[test]
    fn test_empty_descriptor() {
        assert!(ProtocolBuilder::new().build("anything").is_empty());
    }
}
