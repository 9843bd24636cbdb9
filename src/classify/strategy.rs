//! Detection strategies
//!
//! Capability metadata reaches a node in three ways, tried in this order:
//! 1. Marker: the identifier record set by the identifier factory
//! 2. Structural: the node definition, and Rust type identity for custom nodes
//! 3. Annotation: a description or custom type name registered as an
//!    identifier annotation
//!
//! A union annotated as an identifier is an identifier, not a union, so the
//! default chain also runs a union-only annotation pass ahead of structural.
//!
//! A custom type defined twice (say, by two crates) fails the identity check
//! but still carries its name, which is why annotations come last.

use crate::extensions::Extensions;
use crate::validation::{ObjectIdType, TypeDef, TypeNode, UuidType};

use super::kind::Kind;

/// One way of recognising a node's kind
pub trait DetectionStrategy: Send + Sync {
    /// Strategy name for diagnostics
    fn name(&self) -> &'static str;

    /// Kind of the node, or `None` when this strategy cannot tell
    fn detect(&self, node: &TypeNode) -> Option<Kind>;
}

/// Reads the identifier marker record
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerStrategy;

impl DetectionStrategy for MarkerStrategy {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn detect(&self, node: &TypeNode) -> Option<Kind> {
        node.attributes()
            .identifier
            .as_ref()
            .map(|attrs| Kind::from(attrs.kind))
    }
}

/// Matches the node definition
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralStrategy;

impl DetectionStrategy for StructuralStrategy {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn detect(&self, node: &TypeNode) -> Option<Kind> {
        let kind = match node.def() {
            TypeDef::String(_) => Kind::String,
            TypeDef::Number(_) => Kind::Number,
            TypeDef::Boolean => Kind::Boolean,
            TypeDef::Date(_) => Kind::Date,
            TypeDef::Object(_) => Kind::Object,
            TypeDef::Array(_) => Kind::Array,
            TypeDef::Enum(_) => Kind::Enum,
            TypeDef::Record { .. } | TypeDef::Map { .. } => Kind::Map,
            TypeDef::Optional(_) => Kind::Optional,
            TypeDef::Nullable(_) => Kind::Nullable,
            TypeDef::Default { .. } => Kind::Default,
            TypeDef::Effects { .. } => Kind::Effects,
            TypeDef::Union(_) => Kind::Union,
            TypeDef::Any => Kind::Any,
            TypeDef::Custom(custom) => {
                let any = custom.as_any();
                if any.is::<ObjectIdType>() {
                    Kind::ObjectId
                } else if any.is::<UuidType>() {
                    Kind::Uuid
                } else {
                    return None;
                }
            }
            TypeDef::Unknown | TypeDef::Literal(_) | TypeDef::Tuple(_) => return None,
        };
        Some(kind)
    }
}

/// Looks up annotations in the installed extension table
#[derive(Debug, Clone, Copy)]
pub struct AnnotationStrategy {
    extensions: &'static Extensions,
    unions_only: bool,
}

impl AnnotationStrategy {
    pub fn new(extensions: &'static Extensions) -> Self {
        Self {
            extensions,
            unions_only: false,
        }
    }

    /// Annotation lookup restricted to union nodes
    pub fn unions(extensions: &'static Extensions) -> Self {
        Self {
            extensions,
            unions_only: true,
        }
    }
}

impl DetectionStrategy for AnnotationStrategy {
    fn name(&self) -> &'static str {
        if self.unions_only {
            "union-annotation"
        } else {
            "annotation"
        }
    }

    fn detect(&self, node: &TypeNode) -> Option<Kind> {
        if self.unions_only && !matches!(node.def(), TypeDef::Union(_)) {
            return None;
        }
        let by_description = node
            .description()
            .and_then(|d| self.extensions.identifier_for(d));
        let by_type_name = || {
            node.custom()
                .and_then(|c| self.extensions.identifier_for(c.type_name()))
        };
        by_description.or_else(by_type_name).map(Kind::from)
    }
}
