//! Type classifier
//!
//! Maps any validation node onto the closed `Kind` enumeration. The
//! translator only ever looks at kinds and node accessors, never at how a
//! capability was attached to a node.
//!
//! Classification is total: nodes no strategy recognises are
//! `Kind::Unsupported`.

mod kind;
mod strategy;

pub use kind::Kind;
pub use strategy::{AnnotationStrategy, DetectionStrategy, MarkerStrategy, StructuralStrategy};

use crate::extensions;
use crate::validation::{IdentifierKind, TypeNode};

/// Ordered chain of detection strategies; the first match wins.
pub struct Classifier {
    strategies: Vec<Box<dyn DetectionStrategy>>,
}

impl Classifier {
    /// Classifier with the default chain: marker, union annotation,
    /// structural, annotation.
    ///
    /// Installs the identifier extensions if that has not happened yet.
    pub fn new() -> Self {
        let extensions = extensions::install();
        Self::with_strategies(vec![
            Box::new(MarkerStrategy),
            Box::new(AnnotationStrategy::unions(extensions)),
            Box::new(StructuralStrategy),
            Box::new(AnnotationStrategy::new(extensions)),
        ])
    }

    /// Classifier with a custom chain
    pub fn with_strategies(strategies: Vec<Box<dyn DetectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in precedence order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Classify a node
    pub fn classify(&self, node: &TypeNode) -> Kind {
        self.strategies
            .iter()
            .find_map(|s| s.detect(node))
            .unwrap_or(Kind::Unsupported)
    }

    /// Identifier kind of a node, if it is one
    pub fn identifier_kind(&self, node: &TypeNode) -> Option<IdentifierKind> {
        self.classify(node).identifier()
    }

    pub fn is_object_id(&self, node: &TypeNode) -> bool {
        self.identifier_kind(node) == Some(IdentifierKind::ObjectId)
    }

    pub fn is_uuid(&self, node: &TypeNode) -> bool {
        self.identifier_kind(node) == Some(IdentifierKind::Uuid)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
