//! Context threaded through modifier unwrapping

use crate::validation::{DefaultProducer, NodeAttributes, Refinement};

/// What the modifiers seen so far have contributed to the field being built.
#[derive(Debug, Clone)]
pub(crate) struct FieldContext {
    pub required: bool,
    pub default: Option<DefaultProducer>,
    /// A nullable wrapper was seen; supplies a null default when no explicit
    /// default exists anywhere in the chain
    pub nullable: bool,
    pub validator: Option<Refinement>,
    pub unique: bool,
    pub sparse: bool,
}

impl Default for FieldContext {
    fn default() -> Self {
        Self {
            required: true,
            default: None,
            nullable: false,
            validator: None,
            unique: false,
            sparse: false,
        }
    }
}

impl FieldContext {
    /// Fold a node's unique / sparse attributes into the context
    pub fn absorb(&mut self, attributes: &NodeAttributes) {
        self.unique |= attributes.unique;
        self.sparse |= attributes.sparse;
    }

    pub fn relax(&mut self) {
        self.required = false;
    }

    /// Default to attach to the finished descriptor
    pub fn resolved_default(&self) -> Option<DefaultProducer> {
        match &self.default {
            Some(producer) => Some(producer.clone()),
            None if self.nullable => Some(DefaultProducer::null()),
            None => None,
        }
    }
}
