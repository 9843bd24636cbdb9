//! Compiled document schema
//!
//! A `DocumentSchema` is the constructed form handed to the database
//! mapping layer: the schema name, the raw ordered field map and any
//! schema-level options, forwarded untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::translate::{FieldDescriptor, FieldMap};

/// Compiled schema ready for the database mapping layer
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSchema {
    /// Schema (model) name
    pub name: String,
    /// Translated fields in declaration order
    pub fields: FieldMap,
    /// Schema-level options, passed through verbatim
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl DocumentSchema {
    /// Create a schema with no options
    pub fn new(name: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            name: name.into(),
            fields,
            options: Map::new(),
        }
    }

    /// Replace the schema-level options
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    /// Looks up a schema-level option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Validates the schema name and that every field name, at any depth,
    /// is storable.
    ///
    /// Field names must be non-empty, must not contain '.' and must not
    /// start with '$'.
    pub fn validate_structure(&self) -> Result<(), String> {
        validate_schema_name(&self.name)?;
        validate_fields(&self.fields, "")
    }
}

/// Checks that a schema name is usable as a single file-name component.
///
/// Rejects empty names, path separators, NUL and any `..` sequence.
pub fn validate_schema_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Schema name must not be empty".into());
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(format!("Schema name '{}' must not contain a path separator", name));
    }
    if name.contains("..") {
        return Err(format!("Schema name '{}' must not contain '..'", name));
    }
    Ok(())
}

fn validate_fields(fields: &FieldMap, prefix: &str) -> Result<(), String> {
    for (name, field) in fields.iter() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };

        if name.is_empty() {
            return Err(format!("Empty field name under '{}'", prefix));
        }
        if name.contains('.') {
            return Err(format!("Field name '{}' must not contain '.'", path));
        }
        if name.starts_with('$') {
            return Err(format!("Field name '{}' must not start with '$'", path));
        }
        validate_nested(field, &path)?;
    }
    Ok(())
}

fn validate_nested(field: &FieldDescriptor, path: &str) -> Result<(), String> {
    match field {
        FieldDescriptor::Object(object) => validate_fields(&object.fields, path),
        FieldDescriptor::Array(array) => validate_nested(&array.of, &format!("{}[]", path)),
        FieldDescriptor::Map(map) => validate_nested(&map.of, &format!("{}{{}}", path)),
        _ => Ok(()),
    }
}
