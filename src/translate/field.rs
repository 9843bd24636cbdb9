//! Output field descriptors
//!
//! Descriptors mirror the document-database schema vocabulary. Their
//! `Serialize` impls produce the raw form a schema constructor accepts:
//!
//! ```text
//! { "name": { "type": "String", "required": true, "minLength": 3 },
//!   "tags": { "type": [ { "type": "String", "required": true } ], "required": true } }
//! ```
//!
//! Field order is declaration order, both in memory and when serialized.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::validation::{DefaultProducer, IdentifierKind, Refinement};

/// Scalar storage kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Date,
}

impl ScalarKind {
    /// Type name in the document-database vocabulary
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Number => "Number",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Date => "Date",
        }
    }
}

/// Value bound of a number or date field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Number(f64),
    Date(DateTime<Utc>),
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::Number(n) => serialize_number(*n, serializer),
            Bound::Date(d) => d.serialize(serializer),
        }
    }
}

/// Integral values render as JSON integers
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

/// Scalar field: string, number, boolean, date or enumeration
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub kind: ScalarKind,
    pub required: bool,
    pub default: Option<DefaultProducer>,
    pub validator: Option<Refinement>,
    pub unique: bool,
    pub sparse: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    /// Permitted values of an enumeration
    pub enum_values: Option<Vec<Value>>,
}

impl ScalarField {
    /// Required field of the given kind with no constraints
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            validator: None,
            unique: false,
            sparse: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            trim: false,
            lowercase: false,
            uppercase: false,
            enum_values: None,
        }
    }
}

/// Reference or opaque identifier field
#[derive(Debug, Clone)]
pub struct IdentifierField {
    pub kind: IdentifierKind,
    pub required: bool,
    pub unique: bool,
    pub sparse: bool,
    /// Static target collection
    pub reference: Option<String>,
    /// Sibling field holding the target collection
    pub ref_path: Option<String>,
    pub default: Option<DefaultProducer>,
    pub validator: Option<Refinement>,
}

#[derive(Debug, Clone)]
pub struct ArrayField {
    pub of: Box<FieldDescriptor>,
    pub required: bool,
    pub default: Option<DefaultProducer>,
    pub validator: Option<Refinement>,
}

/// Key constructor of a map, display-only
#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    String,
    ObjectId,
    Uuid,
    Enum(Vec<Value>),
}

impl MapKey {
    pub fn type_name(&self) -> &'static str {
        match self {
            MapKey::String | MapKey::Enum(_) => "String",
            MapKey::ObjectId => "ObjectId",
            MapKey::Uuid => "UUID",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapField {
    /// Value descriptor
    pub of: Box<FieldDescriptor>,
    /// `None` when the key node could not be resolved
    pub key: Option<MapKey>,
    pub required: bool,
    pub default: Option<DefaultProducer>,
    pub validator: Option<Refinement>,
}

/// Embedded document
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub fields: FieldMap,
    /// Whether the embedded document as a whole must be present
    pub required: bool,
    pub default: Option<DefaultProducer>,
}

/// Accepts any value
#[derive(Debug, Clone)]
pub struct MixedField {
    pub required: bool,
    pub default: Option<DefaultProducer>,
}

/// One translated field
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Scalar(ScalarField),
    Identifier(IdentifierField),
    Array(ArrayField),
    Map(MapField),
    Object(ObjectField),
    Mixed(MixedField),
}

impl FieldDescriptor {
    /// Whether the field must be present
    pub fn required(&self) -> bool {
        match self {
            FieldDescriptor::Scalar(f) => f.required,
            FieldDescriptor::Identifier(f) => f.required,
            FieldDescriptor::Array(f) => f.required,
            FieldDescriptor::Map(f) => f.required,
            FieldDescriptor::Object(f) => f.required,
            FieldDescriptor::Mixed(f) => f.required,
        }
    }

    /// Default producer, if any
    pub fn default(&self) -> Option<&DefaultProducer> {
        match self {
            FieldDescriptor::Scalar(f) => f.default.as_ref(),
            FieldDescriptor::Identifier(f) => f.default.as_ref(),
            FieldDescriptor::Array(f) => f.default.as_ref(),
            FieldDescriptor::Map(f) => f.default.as_ref(),
            FieldDescriptor::Object(f) => f.default.as_ref(),
            FieldDescriptor::Mixed(f) => f.default.as_ref(),
        }
    }

    /// Default value, produced now
    pub fn default_value(&self) -> Option<Value> {
        self.default().map(DefaultProducer::produce)
    }

    /// Attached validator, if any
    pub fn validator(&self) -> Option<&Refinement> {
        match self {
            FieldDescriptor::Scalar(f) => f.validator.as_ref(),
            FieldDescriptor::Identifier(f) => f.validator.as_ref(),
            FieldDescriptor::Array(f) => f.validator.as_ref(),
            FieldDescriptor::Map(f) => f.validator.as_ref(),
            FieldDescriptor::Object(_) | FieldDescriptor::Mixed(_) => None,
        }
    }

    /// Type name in the document-database vocabulary
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldDescriptor::Scalar(f) => f.kind.type_name(),
            FieldDescriptor::Identifier(f) => f.kind.type_name(),
            FieldDescriptor::Array(_) => "Array",
            FieldDescriptor::Map(_) => "Map",
            FieldDescriptor::Object(_) => "Object",
            FieldDescriptor::Mixed(_) => "Mixed",
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarField> {
        match self {
            FieldDescriptor::Scalar(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&IdentifierField> {
        match self {
            FieldDescriptor::Identifier(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayField> {
        match self {
            FieldDescriptor::Array(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapField> {
        match self {
            FieldDescriptor::Map(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectField> {
        match self {
            FieldDescriptor::Object(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_mixed(&self) -> Option<&MixedField> {
        match self {
            FieldDescriptor::Mixed(f) => Some(f),
            _ => None,
        }
    }

    /// Raw form as a JSON value
    pub fn to_raw(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Ordered mapping of field names to descriptors
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, FieldDescriptor)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; an existing name is replaced in place
    pub fn insert(&mut self, name: impl Into<String>, field: FieldDescriptor) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = field,
            None => self.entries.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw form as a JSON value.
    ///
    /// `serde_json::Value` objects do not keep insertion order; serialize
    /// the map itself when order matters.
    pub fn to_raw(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, field) in &self.entries {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// Validator rendering; predicates are not serializable
struct ValidateRepr<'a>(&'a Refinement);

impl Serialize for ValidateRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("message", self.0.message())?;
        map.end()
    }
}

/// Single-element list marking an array type
struct ArrayTypeRepr<'a>(&'a FieldDescriptor);

impl Serialize for ArrayTypeRepr<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.0].serialize(serializer)
    }
}

fn serialize_common<M: SerializeMap>(
    map: &mut M,
    default: &Option<DefaultProducer>,
    validator: &Option<Refinement>,
) -> Result<(), M::Error> {
    if let Some(producer) = default {
        map.serialize_entry("default", &producer.produce())?;
    }
    if let Some(refinement) = validator {
        map.serialize_entry("validate", &ValidateRepr(refinement))?;
    }
    Ok(())
}

impl Serialize for FieldDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldDescriptor::Scalar(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", f.kind.type_name())?;
                map.serialize_entry("required", &f.required)?;
                serialize_common(&mut map, &f.default, &f.validator)?;
                map.serialize_entry("unique", &f.unique)?;
                map.serialize_entry("sparse", &f.sparse)?;
                if let Some(min) = &f.min {
                    map.serialize_entry("min", min)?;
                }
                if let Some(max) = &f.max {
                    map.serialize_entry("max", max)?;
                }
                if let Some(len) = f.min_length {
                    map.serialize_entry("minLength", &len)?;
                }
                if let Some(len) = f.max_length {
                    map.serialize_entry("maxLength", &len)?;
                }
                if let Some(pattern) = &f.pattern {
                    map.serialize_entry("match", pattern.as_str())?;
                }
                if f.trim {
                    map.serialize_entry("trim", &true)?;
                }
                if f.lowercase {
                    map.serialize_entry("lowercase", &true)?;
                }
                if f.uppercase {
                    map.serialize_entry("uppercase", &true)?;
                }
                if let Some(values) = &f.enum_values {
                    map.serialize_entry("enum", values)?;
                }
                map.end()
            }
            FieldDescriptor::Identifier(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", f.kind.type_name())?;
                map.serialize_entry("required", &f.required)?;
                map.serialize_entry("unique", &f.unique)?;
                map.serialize_entry("sparse", &f.sparse)?;
                if let Some(reference) = &f.reference {
                    map.serialize_entry("ref", reference)?;
                }
                if let Some(path) = &f.ref_path {
                    map.serialize_entry("refPath", path)?;
                }
                serialize_common(&mut map, &f.default, &f.validator)?;
                map.end()
            }
            FieldDescriptor::Array(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &ArrayTypeRepr(&f.of))?;
                map.serialize_entry("required", &f.required)?;
                serialize_common(&mut map, &f.default, &f.validator)?;
                map.end()
            }
            FieldDescriptor::Map(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "Map")?;
                map.serialize_entry("of", f.of.as_ref())?;
                map.serialize_entry("required", &f.required)?;
                if let Some(key) = &f.key {
                    map.serialize_entry("keyType", key.type_name())?;
                }
                serialize_common(&mut map, &f.default, &f.validator)?;
                map.end()
            }
            FieldDescriptor::Object(f) if f.required && f.default.is_none() => {
                f.fields.serialize(serializer)
            }
            FieldDescriptor::Object(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &f.fields)?;
                map.serialize_entry("required", &f.required)?;
                serialize_common(&mut map, &f.default, &None)?;
                map.end()
            }
            FieldDescriptor::Mixed(f) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "Mixed")?;
                map.serialize_entry("required", &f.required)?;
                serialize_common(&mut map, &f.default, &None)?;
                map.end()
            }
        }
    }
}
