//! Fluent builders for validation trees
//!
//! ```ignore
//! use schemaport::validation::*;
//!
//! let user = object()
//!     .field("name", string().min(3).max(255))
//!     .field("age", number().min(18).max(100).default_value(18))
//!     .field("tags", array(string()))
//!     .field("company", object_id().reference("Company").unique());
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use super::effects::{DefaultProducer, Effect, Refinement};
use super::identifier::IdentifierType;
use super::node::{
    CustomType, DateChecks, EnumValues, NumberChecks, Shape, StringChecks, TypeDef, TypeNode,
};

/// Modifiers available on anything convertible into a `TypeNode`
pub trait TypeNodeExt: Into<TypeNode> + Sized {
    /// Convert into a node
    fn into_node(self) -> TypeNode {
        self.into()
    }

    /// Value may be absent
    fn optional(self) -> TypeNode {
        TypeNode::new(TypeDef::Optional(self.into()))
    }

    /// Value may be absent or null
    fn nullable(self) -> TypeNode {
        TypeNode::new(TypeDef::Nullable(self.into()))
    }

    /// Constant default
    fn default_value(self, value: impl Into<Value>) -> TypeNode {
        TypeNode::new(TypeDef::Default {
            inner: self.into(),
            producer: DefaultProducer::constant(value),
        })
    }

    /// Computed default, invoked once per produced value
    fn default_with<F>(self, producer: F) -> TypeNode
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        TypeNode::new(TypeDef::Default {
            inner: self.into(),
            producer: DefaultProducer::new(producer),
        })
    }

    /// Attach a predicate and its failure message
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> TypeNode
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        TypeNode::new(TypeDef::Effects {
            inner: self.into(),
            effect: Effect::Refinement(Refinement::new(predicate, message)),
        })
    }

    /// Map the validated value
    fn transform<F>(self, mapping: F) -> TypeNode
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        TypeNode::new(TypeDef::Effects {
            inner: self.into(),
            effect: Effect::Transform(Arc::new(mapping)),
        })
    }

    /// Mark values as unique across documents
    fn unique(self) -> TypeNode {
        self.into().map_attributes(|a| a.unique = true)
    }

    /// Exclude documents missing this value from its index
    fn sparse(self) -> TypeNode {
        self.into().map_attributes(|a| a.sparse = true)
    }

    /// Attach a description annotation
    fn describe(self, description: impl Into<String>) -> TypeNode {
        self.into().with_description(description)
    }

    /// List of this type
    fn array(self) -> TypeNode {
        TypeNode::new(TypeDef::Array(self.into()))
    }
}

impl<T: Into<TypeNode>> TypeNodeExt for T {}

/// String builder
#[derive(Debug, Clone, Default)]
pub struct StringType {
    checks: StringChecks,
}

impl StringType {
    /// Minimum length
    pub fn min(mut self, len: usize) -> Self {
        self.checks.min_length = Some(len);
        self
    }

    /// Maximum length
    pub fn max(mut self, len: usize) -> Self {
        self.checks.max_length = Some(len);
        self
    }

    /// Exact length
    pub fn length(mut self, len: usize) -> Self {
        self.checks.min_length = Some(len);
        self.checks.max_length = Some(len);
        self
    }

    /// Value must match the pattern
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.checks.pattern = Some(pattern);
        self
    }

    pub fn trim(mut self) -> Self {
        self.checks.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.checks.lowercase = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.checks.uppercase = true;
        self
    }

    pub fn checks(&self) -> &StringChecks {
        &self.checks
    }
}

impl From<StringType> for TypeNode {
    fn from(builder: StringType) -> Self {
        TypeNode::new(TypeDef::String(builder.checks))
    }
}

/// Number builder
#[derive(Debug, Clone, Default)]
pub struct NumberType {
    checks: NumberChecks,
}

impl NumberType {
    /// Inclusive lower bound
    pub fn min(mut self, value: impl Into<f64>) -> Self {
        self.checks.min = Some(value.into());
        self
    }

    /// Inclusive upper bound
    pub fn max(mut self, value: impl Into<f64>) -> Self {
        self.checks.max = Some(value.into());
        self
    }

    /// Restrict to integers
    pub fn int(mut self) -> Self {
        self.checks.integer = true;
        self
    }

    pub fn checks(&self) -> &NumberChecks {
        &self.checks
    }
}

impl From<NumberType> for TypeNode {
    fn from(builder: NumberType) -> Self {
        TypeNode::new(TypeDef::Number(builder.checks))
    }
}

/// Date builder
#[derive(Debug, Clone, Default)]
pub struct DateType {
    checks: DateChecks,
}

impl DateType {
    /// Earliest accepted instant
    pub fn min(mut self, instant: DateTime<Utc>) -> Self {
        self.checks.min = Some(instant);
        self
    }

    /// Latest accepted instant
    pub fn max(mut self, instant: DateTime<Utc>) -> Self {
        self.checks.max = Some(instant);
        self
    }

    pub fn checks(&self) -> &DateChecks {
        &self.checks
    }
}

impl From<DateType> for TypeNode {
    fn from(builder: DateType) -> Self {
        TypeNode::new(TypeDef::Date(builder.checks))
    }
}

/// Object builder; fields keep the order they are declared in
#[derive(Debug, Clone, Default)]
pub struct ObjectType {
    shape: Shape,
}

impl ObjectType {
    /// Declare a field
    pub fn field(mut self, name: impl Into<String>, node: impl Into<TypeNode>) -> Self {
        self.shape.insert(name, node.into());
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl From<ObjectType> for TypeNode {
    fn from(builder: ObjectType) -> Self {
        TypeNode::new(TypeDef::Object(builder.shape))
    }
}

pub fn string() -> StringType {
    StringType::default()
}

pub fn number() -> NumberType {
    NumberType::default()
}

pub fn boolean() -> TypeNode {
    TypeNode::new(TypeDef::Boolean)
}

pub fn date() -> DateType {
    DateType::default()
}

pub fn object() -> ObjectType {
    ObjectType::default()
}

pub fn array(element: impl Into<TypeNode>) -> TypeNode {
    TypeNode::new(TypeDef::Array(element.into()))
}

/// Closed set of string literals
pub fn enumeration<I, S>(values: I) -> TypeNode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TypeNode::new(TypeDef::Enum(EnumValues::Strings(
        values.into_iter().map(Into::into).collect(),
    )))
}

/// Closed set of fixed integers
pub fn native_enum(values: impl IntoIterator<Item = i64>) -> TypeNode {
    TypeNode::new(TypeDef::Enum(EnumValues::Integers(values.into_iter().collect())))
}

/// Dictionary from keys to values
pub fn record(key: impl Into<TypeNode>, value: impl Into<TypeNode>) -> TypeNode {
    TypeNode::new(TypeDef::Record {
        key: key.into(),
        value: value.into(),
    })
}

pub fn map(key: impl Into<TypeNode>, value: impl Into<TypeNode>) -> TypeNode {
    TypeNode::new(TypeDef::Map {
        key: key.into(),
        value: value.into(),
    })
}

/// Ordered alternatives
pub fn union(options: impl IntoIterator<Item = TypeNode>) -> TypeNode {
    TypeNode::new(TypeDef::Union(options.into_iter().collect()))
}

/// Any value, stored as mixed
pub fn any() -> TypeNode {
    TypeNode::new(TypeDef::Any)
}

/// Any value, with no storage mapping
pub fn unknown() -> TypeNode {
    TypeNode::new(TypeDef::Unknown)
}

pub fn literal(value: impl Into<Value>) -> TypeNode {
    TypeNode::new(TypeDef::Literal(value.into()))
}

pub fn tuple(items: impl IntoIterator<Item = TypeNode>) -> TypeNode {
    TypeNode::new(TypeDef::Tuple(items.into_iter().collect()))
}

/// Opaque instance node
pub fn custom(instance: impl CustomType) -> TypeNode {
    TypeNode::new(TypeDef::Custom(Arc::new(instance)))
}

/// Map the raw input before `inner` validates it
pub fn preprocess<F>(mapping: F, inner: impl Into<TypeNode>) -> TypeNode
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    TypeNode::new(TypeDef::Effects {
        inner: inner.into(),
        effect: Effect::Preprocess(Arc::new(mapping)),
    })
}

pub fn object_id() -> IdentifierType {
    IdentifierType::object_id()
}

pub fn uuid() -> IdentifierType {
    IdentifierType::uuid()
}
