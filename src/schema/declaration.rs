//! JSON schema declarations
//!
//! A declaration file describes one document schema:
//!
//! ```json
//! {
//!   "name": "User",
//!   "options": { "timestamps": true },
//!   "fields": {
//!     "name":    { "type": "string", "minLength": 3, "maxLength": 255 },
//!     "age":     { "type": "number", "min": 18, "max": 100, "default": 18 },
//!     "company": { "type": "objectId", "ref": "Company", "optional": true },
//!     "tags":    { "type": "array", "items": { "type": "string" } }
//!   }
//! }
//! ```
//!
//! Field order in the file is kept. Modifiers are applied innermost first:
//! refine, nullable, optional, default.

use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::validation::{
    self, IdentifierType, TypeNode, TypeNodeExt, DEFAULT_REFINEMENT_MESSAGE,
};

/// One schema declaration
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    /// Schema name
    pub name: String,
    /// Schema-level options, forwarded verbatim
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Top-level fields in file order
    pub fields: OrderedFields,
}

impl Declaration {
    /// Parse a declaration from JSON text
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Build the validation node for this declaration
    pub fn to_node(&self) -> Result<TypeNode, String> {
        self.fields.to_object()
    }
}

/// Field declarations in file order
#[derive(Debug, Clone, Default)]
pub struct OrderedFields(Vec<(String, FieldDecl)>);

impl OrderedFields {
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDecl> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_object(&self) -> Result<TypeNode, String> {
        let mut object = validation::object();
        for (name, decl) in &self.0 {
            let node = decl
                .to_node()
                .map_err(|e| format!("field '{}': {}", name, e))?;
            object = object.field(name.as_str(), node);
        }
        Ok(object.into_node())
    }
}

impl<'de> Deserialize<'de> for OrderedFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = OrderedFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field declarations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, FieldDecl)> = Vec::new();
                while let Some((name, decl)) = access.next_entry::<String, FieldDecl>()? {
                    if entries.iter().any(|(n, _)| *n == name) {
                        return Err(de::Error::custom(format!("duplicate field '{}'", name)));
                    }
                    entries.push((name, decl));
                }
                Ok(OrderedFields(entries))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Pattern refinement on a declared field
#[derive(Debug, Clone, Deserialize)]
pub struct RefineDecl {
    /// Regular expression string values must match
    pub pattern: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One field declaration: a type plus modifiers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    #[serde(flatten)]
    pub kind: TypeDecl,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: bool,
    /// Present whenever the key is, so `"default": null` declares a null default
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub sparse: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub refine: Option<RefineDecl>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Declared field types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeDecl {
    #[serde(rename_all = "camelCase")]
    String {
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        length: Option<usize>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        trim: bool,
        #[serde(default)]
        lowercase: bool,
        #[serde(default)]
        uppercase: bool,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        int: bool,
    },
    Boolean,
    Date {
        #[serde(default)]
        min: Option<DateTime<Utc>>,
        #[serde(default)]
        max: Option<DateTime<Utc>>,
    },
    Object {
        fields: OrderedFields,
    },
    Array {
        items: Box<FieldDecl>,
    },
    Enum {
        values: Vec<String>,
    },
    NativeEnum {
        values: Vec<i64>,
    },
    Record {
        key: Box<FieldDecl>,
        value: Box<FieldDecl>,
    },
    Map {
        key: Box<FieldDecl>,
        value: Box<FieldDecl>,
    },
    Union {
        options: Vec<FieldDecl>,
    },
    #[serde(rename_all = "camelCase")]
    ObjectId {
        #[serde(default, rename = "ref")]
        reference: Option<String>,
        #[serde(default)]
        ref_path: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Uuid {
        #[serde(default, rename = "ref")]
        reference: Option<String>,
        #[serde(default)]
        ref_path: Option<String>,
        #[serde(default)]
        auto: bool,
    },
    Any,
    Unknown,
}

impl TypeDecl {
    /// Declared type name
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeDecl::String { .. } => "string",
            TypeDecl::Number { .. } => "number",
            TypeDecl::Boolean => "boolean",
            TypeDecl::Date { .. } => "date",
            TypeDecl::Object { .. } => "object",
            TypeDecl::Array { .. } => "array",
            TypeDecl::Enum { .. } => "enum",
            TypeDecl::NativeEnum { .. } => "nativeEnum",
            TypeDecl::Record { .. } => "record",
            TypeDecl::Map { .. } => "map",
            TypeDecl::Union { .. } => "union",
            TypeDecl::ObjectId { .. } => "objectId",
            TypeDecl::Uuid { .. } => "uuid",
            TypeDecl::Any => "any",
            TypeDecl::Unknown => "unknown",
        }
    }

    fn to_node(&self) -> Result<TypeNode, String> {
        let node = match self {
            TypeDecl::String {
                min_length,
                max_length,
                length,
                pattern,
                trim,
                lowercase,
                uppercase,
            } => {
                let mut builder = validation::string();
                if let Some(len) = length {
                    builder = builder.length(*len);
                }
                if let Some(len) = min_length {
                    builder = builder.min(*len);
                }
                if let Some(len) = max_length {
                    builder = builder.max(*len);
                }
                if let Some(pattern) = pattern {
                    builder = builder.pattern(compile_pattern(pattern)?);
                }
                if *trim {
                    builder = builder.trim();
                }
                if *lowercase {
                    builder = builder.lowercase();
                }
                if *uppercase {
                    builder = builder.uppercase();
                }
                builder.into_node()
            }
            TypeDecl::Number { min, max, int } => {
                let mut builder = validation::number();
                if let Some(min) = min {
                    builder = builder.min(*min);
                }
                if let Some(max) = max {
                    builder = builder.max(*max);
                }
                if *int {
                    builder = builder.int();
                }
                builder.into_node()
            }
            TypeDecl::Boolean => validation::boolean(),
            TypeDecl::Date { min, max } => {
                let mut builder = validation::date();
                if let Some(min) = min {
                    builder = builder.min(*min);
                }
                if let Some(max) = max {
                    builder = builder.max(*max);
                }
                builder.into_node()
            }
            TypeDecl::Object { fields } => fields.to_object()?,
            TypeDecl::Array { items } => validation::array(items.to_node()?),
            TypeDecl::Enum { values } => {
                if values.is_empty() {
                    return Err("enum must declare at least one value".into());
                }
                validation::enumeration(values.iter().cloned())
            }
            TypeDecl::NativeEnum { values } => {
                if values.is_empty() {
                    return Err("nativeEnum must declare at least one value".into());
                }
                validation::native_enum(values.iter().copied())
            }
            TypeDecl::Record { key, value } => validation::record(key.to_node()?, value.to_node()?),
            TypeDecl::Map { key, value } => validation::map(key.to_node()?, value.to_node()?),
            TypeDecl::Union { options } => {
                let options = options
                    .iter()
                    .map(FieldDecl::to_node)
                    .collect::<Result<Vec<_>, _>>()?;
                validation::union(options)
            }
            TypeDecl::ObjectId {
                reference,
                ref_path,
            } => identifier(IdentifierType::object_id(), reference, ref_path).into_node(),
            TypeDecl::Uuid {
                reference,
                ref_path,
                auto,
            } => {
                let mut builder = identifier(IdentifierType::uuid(), reference, ref_path);
                if *auto {
                    builder = builder.auto();
                }
                builder.into_node()
            }
            TypeDecl::Any => validation::any(),
            TypeDecl::Unknown => validation::unknown(),
        };
        Ok(node)
    }
}

fn identifier(
    builder: IdentifierType,
    reference: &Option<String>,
    ref_path: &Option<String>,
) -> IdentifierType {
    let builder = match reference {
        Some(collection) => builder.reference(collection.as_str()),
        None => builder,
    };
    match ref_path {
        Some(field) => builder.ref_path(field.as_str()),
        None => builder,
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|e| format!("invalid pattern '{}': {}", pattern, e))
}

impl FieldDecl {
    /// Build the validation node: type, then refine, nullable, optional,
    /// default.
    pub fn to_node(&self) -> Result<TypeNode, String> {
        let mut node = self.kind.to_node()?;

        if self.unique {
            node = node.unique();
        }
        if self.sparse {
            node = node.sparse();
        }
        if let Some(description) = &self.description {
            node = node.describe(description.as_str());
        }
        if let Some(refine) = &self.refine {
            let regex = compile_pattern(&refine.pattern)?;
            let message = refine
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_REFINEMENT_MESSAGE.to_string());
            node = node.refine(
                move |value| value.as_str().map_or(false, |s| regex.is_match(s)),
                message,
            );
        }
        if self.nullable {
            node = node.nullable();
        }
        if self.optional {
            node = node.optional();
        }
        if let Some(value) = &self.default {
            node = node.default_value(value.clone());
        }
        Ok(node)
    }
}
