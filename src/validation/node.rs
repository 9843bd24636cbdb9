//! Validation node model
//!
//! A `TypeNode` is one immutable schema rule. Nodes share their definition
//! through an `Arc`, so cloning a node never copies a subtree. Builders always
//! return new nodes; an existing node is never mutated.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::effects::{DefaultProducer, Effect};
use super::identifier::IdentifierAttributes;

/// String constraints readable without running any validator
#[derive(Debug, Clone, Default)]
pub struct StringChecks {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
}

/// Number constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberChecks {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

/// Date constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateChecks {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

/// Permitted values of an enumerable node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValues {
    /// String literal members
    Strings(Vec<String>),
    /// Fixed-integer members of a native enum
    Integers(Vec<i64>),
}

impl EnumValues {
    /// Returns the members as JSON values, in declaration order
    pub fn to_values(&self) -> Vec<Value> {
        match self {
            EnumValues::Strings(values) => values.iter().cloned().map(Value::String).collect(),
            EnumValues::Integers(values) => values.iter().map(|v| Value::from(*v)).collect(),
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        match self {
            EnumValues::Strings(values) => values.len(),
            EnumValues::Integers(values) => values.len(),
        }
    }

    /// Whether the enumeration has no members
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered mapping of child names to nodes.
///
/// Inserting an existing name replaces the node in place, keeping the
/// original position.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    entries: Vec<(String, TypeNode)>,
}

impl Shape {
    /// Create an empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a child
    pub fn insert(&mut self, name: impl Into<String>, node: TypeNode) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((name, node)),
        }
    }

    /// Look up a child by name
    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Iterate children in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.entries.iter().map(|(n, node)| (n.as_str(), node))
    }

    /// Child names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An opaque instance type that is not part of the built-in definitions.
///
/// Custom types are recognised either by Rust type identity (downcast through
/// `as_any`) or by their `type_name` annotation.
pub trait CustomType: Any + fmt::Debug + Send + Sync {
    /// Name reported for this type in annotations and error messages
    fn type_name(&self) -> &str;

    /// Upcast used for identity checks
    fn as_any(&self) -> &dyn Any;
}

/// Node definitions
#[derive(Debug, Clone)]
pub enum TypeDef {
    String(StringChecks),
    Number(NumberChecks),
    Boolean,
    Date(DateChecks),
    Object(Shape),
    Array(TypeNode),
    Enum(EnumValues),
    /// Dictionary with string-like keys
    Record { key: TypeNode, value: TypeNode },
    /// Keyed map
    Map { key: TypeNode, value: TypeNode },
    Optional(TypeNode),
    Nullable(TypeNode),
    Default { inner: TypeNode, producer: DefaultProducer },
    Effects { inner: TypeNode, effect: Effect },
    Union(Vec<TypeNode>),
    /// Accepts any value, explicitly marked as mixed
    Any,
    /// Accepts any value without the mixed marker
    Unknown,
    Literal(Value),
    Tuple(Vec<TypeNode>),
    Custom(Arc<dyn CustomType>),
}

/// Out-of-band attributes attached to a node by builders and the
/// identifier factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    pub unique: bool,
    pub sparse: bool,
    pub identifier: Option<IdentifierAttributes>,
}

#[derive(Debug)]
struct NodeInner {
    def: TypeDef,
    attributes: NodeAttributes,
    description: Option<String>,
}

/// One validation rule in a schema tree
#[derive(Clone)]
pub struct TypeNode {
    inner: Arc<NodeInner>,
}

impl TypeNode {
    /// Create a node with default attributes
    pub fn new(def: TypeDef) -> Self {
        Self::with_parts(def, NodeAttributes::default(), None)
    }

    pub(crate) fn with_parts(
        def: TypeDef,
        attributes: NodeAttributes,
        description: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                def,
                attributes,
                description,
            }),
        }
    }

    /// The node definition
    pub fn def(&self) -> &TypeDef {
        &self.inner.def
    }

    /// Out-of-band attributes
    pub fn attributes(&self) -> &NodeAttributes {
        &self.inner.attributes
    }

    /// Free-form description annotation
    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    /// Returns a copy of this node with modified attributes
    pub fn map_attributes(&self, f: impl FnOnce(&mut NodeAttributes)) -> Self {
        let mut attributes = self.inner.attributes.clone();
        f(&mut attributes);
        Self::with_parts(self.inner.def.clone(), attributes, self.inner.description.clone())
    }

    /// Returns a copy of this node with a description annotation
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self::with_parts(
            self.inner.def.clone(),
            self.inner.attributes.clone(),
            Some(description.into()),
        )
    }

    /// Runtime type tag, used in error messages
    pub fn type_name(&self) -> &str {
        match self.def() {
            TypeDef::String(_) => "String",
            TypeDef::Number(_) => "Number",
            TypeDef::Boolean => "Boolean",
            TypeDef::Date(_) => "Date",
            TypeDef::Object(_) => "Object",
            TypeDef::Array(_) => "Array",
            TypeDef::Enum(EnumValues::Strings(_)) => "Enum",
            TypeDef::Enum(EnumValues::Integers(_)) => "NativeEnum",
            TypeDef::Record { .. } => "Record",
            TypeDef::Map { .. } => "Map",
            TypeDef::Optional(_) => "Optional",
            TypeDef::Nullable(_) => "Nullable",
            TypeDef::Default { .. } => "Default",
            TypeDef::Effects { .. } => "Effects",
            TypeDef::Union(_) => "Union",
            TypeDef::Any => "Any",
            TypeDef::Unknown => "Unknown",
            TypeDef::Literal(_) => "Literal",
            TypeDef::Tuple(_) => "Tuple",
            TypeDef::Custom(custom) => custom.type_name(),
        }
    }

    /// The wrapped node of a modifier (optional, nullable, default, effects)
    pub fn inner(&self) -> Option<&TypeNode> {
        match self.def() {
            TypeDef::Optional(inner) | TypeDef::Nullable(inner) => Some(inner),
            TypeDef::Default { inner, .. } | TypeDef::Effects { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// Children of an object node
    pub fn shape(&self) -> Option<&Shape> {
        match self.def() {
            TypeDef::Object(shape) => Some(shape),
            _ => None,
        }
    }

    /// Element of an array node
    pub fn element(&self) -> Option<&TypeNode> {
        match self.def() {
            TypeDef::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Key and value nodes of a record or map node
    pub fn key_value(&self) -> Option<(&TypeNode, &TypeNode)> {
        match self.def() {
            TypeDef::Record { key, value } | TypeDef::Map { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// Alternatives of a union node
    pub fn options(&self) -> Option<&[TypeNode]> {
        match self.def() {
            TypeDef::Union(options) => Some(options),
            _ => None,
        }
    }

    /// Members of an enumerable node
    pub fn enum_values(&self) -> Option<&EnumValues> {
        match self.def() {
            TypeDef::Enum(values) => Some(values),
            _ => None,
        }
    }

    /// Producer of a default wrapper
    pub fn default_producer(&self) -> Option<&DefaultProducer> {
        match self.def() {
            TypeDef::Default { producer, .. } => Some(producer),
            _ => None,
        }
    }

    /// Effect of an effects wrapper
    pub fn effect(&self) -> Option<&Effect> {
        match self.def() {
            TypeDef::Effects { effect, .. } => Some(effect),
            _ => None,
        }
    }

    pub fn string_checks(&self) -> Option<&StringChecks> {
        match self.def() {
            TypeDef::String(checks) => Some(checks),
            _ => None,
        }
    }

    pub fn number_checks(&self) -> Option<&NumberChecks> {
        match self.def() {
            TypeDef::Number(checks) => Some(checks),
            _ => None,
        }
    }

    pub fn date_checks(&self) -> Option<&DateChecks> {
        match self.def() {
            TypeDef::Date(checks) => Some(checks),
            _ => None,
        }
    }

    /// The custom instance type, if this is a custom node
    pub fn custom(&self) -> Option<&dyn CustomType> {
        match self.def() {
            TypeDef::Custom(custom) => Some(custom.as_ref()),
            _ => None,
        }
    }

    /// Whether two handles point at the same node
    pub fn ptr_eq(&self, other: &TypeNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNode")
            .field("def", &self.inner.def)
            .field("attributes", &self.inner.attributes)
            .field("description", &self.inner.description)
            .finish()
    }
}

impl From<TypeDef> for TypeNode {
    fn from(def: TypeDef) -> Self {
        TypeNode::new(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_preserves_order_and_replaces_in_place() {
        let mut shape = Shape::new();
        shape.insert("b", TypeNode::new(TypeDef::Boolean));
        shape.insert("a", TypeNode::new(TypeDef::Any));
        shape.insert("b", TypeNode::new(TypeDef::Unknown));

        assert_eq!(shape.names(), vec!["b", "a"]);
        assert_eq!(shape.get("b").unwrap().type_name(), "Unknown");
        assert_eq!(shape.len(), 2);
    }

    #[test]
    fn test_map_attributes_leaves_original_untouched() {
        let node = TypeNode::new(TypeDef::String(StringChecks::default()));
        let unique = node.map_attributes(|a| a.unique = true);

        assert!(!node.attributes().unique);
        assert!(unique.attributes().unique);
        assert!(!node.ptr_eq(&unique));
    }

    #[test]
    fn test_modifier_inner_access() {
        let base = TypeNode::new(TypeDef::Boolean);
        let optional = TypeNode::new(TypeDef::Optional(base.clone()));

        assert!(optional.inner().unwrap().ptr_eq(&base));
        assert!(base.inner().is_none());
    }

    #[test]
    fn test_enum_values_to_json() {
        let strings = EnumValues::Strings(vec!["a".into(), "b".into()]);
        let ints = EnumValues::Integers(vec![0, 1]);

        assert_eq!(strings.to_values(), vec![Value::from("a"), Value::from("b")]);
        assert_eq!(ints.to_values(), vec![Value::from(0), Value::from(1)]);
        assert_eq!(ints.len(), 2);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TypeNode::new(TypeDef::Unknown).type_name(), "Unknown");
        assert_eq!(TypeNode::new(TypeDef::Tuple(vec![])).type_name(), "Tuple");
        assert_eq!(
            TypeNode::new(TypeDef::Enum(EnumValues::Integers(vec![1]))).type_name(),
            "NativeEnum"
        );
    }
}
