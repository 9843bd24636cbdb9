//! Identifier factory
//!
//! `object_id()` and `uuid()` produce string-shaped nodes that carry an
//! `IdentifierAttributes` marker. Reference target, dynamic reference path,
//! uniqueness and sparsity are configured fluently and resolved into the
//! node's attribute record when the builder is converted into a `TypeNode`.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::effects::DefaultProducer;
use super::node::{CustomType, NodeAttributes, StringChecks, TypeDef, TypeNode};

/// The two identifier kinds known to the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// Document reference key (12-byte object id)
    ObjectId,
    /// Opaque UUID key
    Uuid,
}

impl IdentifierKind {
    /// Type name in the document-database vocabulary
    pub fn type_name(&self) -> &'static str {
        match self {
            IdentifierKind::ObjectId => "ObjectId",
            IdentifierKind::Uuid => "UUID",
        }
    }
}

/// Marker record attached to identifier nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierAttributes {
    pub kind: IdentifierKind,
    /// Static target collection
    pub reference: Option<String>,
    /// Name of the sibling field holding the target collection
    pub ref_path: Option<String>,
}

impl IdentifierAttributes {
    pub fn new(kind: IdentifierKind) -> Self {
        Self {
            kind,
            reference: None,
            ref_path: None,
        }
    }
}

/// Instance type recognised by identity as an object id
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdType;

impl CustomType for ObjectIdType {
    fn type_name(&self) -> &str {
        "ObjectId"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Instance type recognised by identity as a UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidType;

impl CustomType for UuidType {
    fn type_name(&self) -> &str {
        "UUID"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fluent builder for identifier nodes
#[derive(Debug, Clone)]
pub struct IdentifierType {
    attributes: IdentifierAttributes,
    unique: bool,
    sparse: bool,
    default: Option<DefaultProducer>,
}

impl IdentifierType {
    fn new(kind: IdentifierKind) -> Self {
        Self {
            attributes: IdentifierAttributes::new(kind),
            unique: false,
            sparse: false,
            default: None,
        }
    }

    /// Object id builder
    pub fn object_id() -> Self {
        Self::new(IdentifierKind::ObjectId)
    }

    /// UUID builder
    pub fn uuid() -> Self {
        Self::new(IdentifierKind::Uuid)
    }

    pub fn kind(&self) -> IdentifierKind {
        self.attributes.kind
    }

    /// Target collection of the reference
    pub fn reference(mut self, collection: impl Into<String>) -> Self {
        self.attributes.reference = Some(collection.into());
        self
    }

    /// Sibling field naming the target collection at runtime
    pub fn ref_path(mut self, field: impl Into<String>) -> Self {
        self.attributes.ref_path = Some(field.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// Constant default value
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultProducer::constant(value));
        self
    }

    /// Generate a fresh identifier when none is supplied.
    ///
    /// Only UUIDs can be generated locally; object ids are assigned by the
    /// database and are left untouched.
    pub fn auto(mut self) -> Self {
        if self.attributes.kind == IdentifierKind::Uuid {
            self.default = Some(DefaultProducer::random_uuid());
        }
        self
    }

    /// Resolve the builder into a node
    pub fn into_node(self) -> TypeNode {
        let base = TypeNode::with_parts(
            TypeDef::String(StringChecks::default()),
            NodeAttributes {
                unique: self.unique,
                sparse: self.sparse,
                identifier: Some(self.attributes),
            },
            None,
        );
        match self.default {
            Some(producer) => TypeNode::new(TypeDef::Default {
                inner: base,
                producer,
            }),
            None => base,
        }
    }
}

impl From<IdentifierType> for TypeNode {
    fn from(builder: IdentifierType) -> Self {
        builder.into_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_resolves_to_marker_record() {
        let node = IdentifierType::object_id()
            .reference("Company")
            .unique()
            .into_node();

        let attrs = node.attributes();
        assert!(attrs.unique);
        assert!(!attrs.sparse);
        let id = attrs.identifier.as_ref().unwrap();
        assert_eq!(id.kind, IdentifierKind::ObjectId);
        assert_eq!(id.reference.as_deref(), Some("Company"));
        assert!(id.ref_path.is_none());
        assert!(node.string_checks().is_some());
    }

    #[test]
    fn test_ref_path_is_distinct_from_reference() {
        let node = IdentifierType::object_id().ref_path("ownerModel").into_node();
        let id = node.attributes().identifier.as_ref().unwrap();
        assert!(id.reference.is_none());
        assert_eq!(id.ref_path.as_deref(), Some("ownerModel"));
    }

    #[test]
    fn test_auto_wraps_uuid_in_default() {
        let node = IdentifierType::uuid().auto().into_node();
        assert!(node.default_producer().is_some());
        assert_eq!(
            node.inner().unwrap().attributes().identifier.as_ref().unwrap().kind,
            IdentifierKind::Uuid
        );
    }

    #[test]
    fn test_auto_is_noop_for_object_id() {
        let node = IdentifierType::object_id().auto().into_node();
        assert!(node.default_producer().is_none());
    }

    #[test]
    fn test_instance_type_names() {
        assert_eq!(ObjectIdType.type_name(), "ObjectId");
        assert_eq!(UuidType.type_name(), "UUID");
        assert_eq!(IdentifierKind::Uuid.type_name(), "UUID");
    }
}
