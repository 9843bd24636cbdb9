//! Recursive field translator
//!
//! Each field is translated by an explicit unwrap loop: modifier and union
//! steps rewrite the current node and loop, collecting required-ness,
//! default, validator, unique and sparse into a `FieldContext`. Only
//! structural children (object fields, array elements, map values) recurse,
//! each with a fresh context.
//!
//! Failures are only returned, never logged here; a degraded map key is the
//! one condition reported as a log line.

use crate::classify::{Classifier, Kind};
use crate::observability::{log_event, Event};
use crate::validation::{Effect, IdentifierKind, TypeNode};

use super::context::FieldContext;
use super::errors::{TranslateError, TranslateResult};
use super::field::{
    ArrayField, Bound, FieldDescriptor, FieldMap, IdentifierField, MapField, MapKey, MixedField,
    ObjectField, ScalarField, ScalarKind,
};

/// Result of translating one node
enum Outcome {
    Field(FieldDescriptor),
    /// No storage mapping; carries the node's type name
    Unsupported(String),
}

/// Translates validation nodes into field descriptors.
pub struct Translator {
    classifier: Classifier,
}

impl Translator {
    /// Translator with the default classifier
    pub fn new() -> Self {
        Self::with_classifier(Classifier::new())
    }

    pub fn with_classifier(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Translate an object node into an ordered field map.
    ///
    /// Fails on the first field that has no storage mapping; no partial
    /// output is returned.
    pub fn translate_object(&self, node: &TypeNode) -> TranslateResult<FieldMap> {
        if self.classifier.classify(node) != Kind::Object {
            return Err(TranslateError::RootNotObject {
                type_name: node.type_name().to_string(),
            });
        }
        self.translate_children(node, "")
    }

    /// Translate a single node.
    ///
    /// Returns `Ok(None)` when the node itself has no storage mapping.
    /// Unsupported nodes nested below it still fail with an error.
    pub fn translate_field(&self, node: &TypeNode) -> TranslateResult<Option<FieldDescriptor>> {
        match self.translate_node(node, "")? {
            Outcome::Field(field) => Ok(Some(field)),
            Outcome::Unsupported(_) => Ok(None),
        }
    }

    fn translate_children(&self, node: &TypeNode, prefix: &str) -> TranslateResult<FieldMap> {
        let mut fields = FieldMap::new();
        let Some(shape) = node.shape() else {
            return Ok(fields);
        };

        for (name, child) in shape.iter() {
            let path = make_path(prefix, name);
            match self.translate_node(child, &path)? {
                Outcome::Field(field) => fields.insert(name, field),
                Outcome::Unsupported(type_name) => {
                    return Err(TranslateError::UnsupportedFieldKind {
                        field: path,
                        type_name,
                    });
                }
            }
        }
        Ok(fields)
    }

    fn translate_node(&self, node: &TypeNode, path: &str) -> TranslateResult<Outcome> {
        let mut ctx = FieldContext::default();
        let mut current = node.clone();

        loop {
            let kind = self.classifier.classify(&current);
            if kind == Kind::Union {
                // The first alternative alone decides the field
                let Some(first) = current.options().and_then(|o| o.first()).cloned() else {
                    return Ok(Outcome::Unsupported(current.type_name().to_string()));
                };
                ctx = FieldContext::default();
                current = first;
                continue;
            }
            ctx.absorb(current.attributes());

            let field = match kind {
                Kind::ObjectId => identifier_field(&current, IdentifierKind::ObjectId, ctx),
                Kind::Uuid => identifier_field(&current, IdentifierKind::Uuid, ctx),
                Kind::Object => FieldDescriptor::Object(ObjectField {
                    fields: self.translate_children(&current, path)?,
                    required: ctx.required,
                    default: ctx.resolved_default(),
                }),
                Kind::String | Kind::Number | Kind::Boolean | Kind::Date => {
                    scalar_field(&current, kind, ctx)
                }
                Kind::Enum => enum_field(&current, ctx),
                Kind::Array => {
                    let Some(element) = current.element() else {
                        return Ok(Outcome::Unsupported(current.type_name().to_string()));
                    };
                    let element_path = format!("{}[]", path);
                    let of = match self.translate_node(element, &element_path)? {
                        Outcome::Field(field) => field,
                        Outcome::Unsupported(type_name) => {
                            return Err(TranslateError::UnsupportedArrayElementKind {
                                field: element_path,
                                type_name,
                            });
                        }
                    };
                    FieldDescriptor::Array(ArrayField {
                        of: Box::new(of),
                        required: ctx.required,
                        default: ctx.resolved_default(),
                        validator: ctx.validator,
                    })
                }
                Kind::Map => {
                    let Some((key, value)) = current.key_value() else {
                        return Ok(Outcome::Unsupported(current.type_name().to_string()));
                    };
                    let value_path = format!("{}{{}}", path);
                    let of = match self.translate_node(value, &value_path)? {
                        Outcome::Field(field) => field,
                        Outcome::Unsupported(type_name) => {
                            return Err(TranslateError::UnsupportedMapValueKind {
                                field: value_path,
                                type_name,
                            });
                        }
                    };
                    FieldDescriptor::Map(MapField {
                        of: Box::new(of),
                        key: self.resolve_map_key(key, path),
                        required: ctx.required,
                        default: ctx.resolved_default(),
                        validator: ctx.validator,
                    })
                }
                Kind::Any => FieldDescriptor::Mixed(MixedField {
                    required: ctx.required,
                    default: ctx.resolved_default(),
                }),
                Kind::Default | Kind::Optional | Kind::Nullable | Kind::Effects => {
                    match kind {
                        Kind::Default => ctx.default = current.default_producer().cloned(),
                        Kind::Optional => ctx.relax(),
                        Kind::Nullable => {
                            ctx.relax();
                            ctx.nullable = true;
                        }
                        _ => {
                            if let Some(Effect::Refinement(refinement)) = current.effect() {
                                ctx.validator = Some(refinement.clone());
                            }
                        }
                    }
                    let Some(inner) = current.inner().cloned() else {
                        return Ok(Outcome::Unsupported(current.type_name().to_string()));
                    };
                    current = inner;
                    continue;
                }
                Kind::Union | Kind::Unsupported => {
                    return Ok(Outcome::Unsupported(current.type_name().to_string()));
                }
            };
            return Ok(Outcome::Field(field));
        }
    }

    /// Key constructor of a map; `None` degrades the field without failing
    fn resolve_map_key(&self, key: &TypeNode, path: &str) -> Option<MapKey> {
        let mut current = key;
        loop {
            let kind = self.classifier.classify(current);
            let resolved = match kind {
                Kind::String => Some(MapKey::String),
                Kind::ObjectId => Some(MapKey::ObjectId),
                Kind::Uuid => Some(MapKey::Uuid),
                Kind::Enum => current.enum_values().map(|v| MapKey::Enum(v.to_values())),
                k if k.is_modifier() => match current.inner() {
                    Some(inner) => {
                        current = inner;
                        continue;
                    }
                    None => None,
                },
                _ => None,
            };
            if resolved.is_none() {
                log_event(
                    Event::MapKeyDegraded,
                    &[("field", path), ("key_type", current.type_name())],
                );
            }
            return resolved;
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn identifier_field(node: &TypeNode, kind: IdentifierKind, ctx: FieldContext) -> FieldDescriptor {
    let attrs = node.attributes().identifier.as_ref();

    FieldDescriptor::Identifier(IdentifierField {
        kind,
        required: ctx.required,
        unique: ctx.unique,
        sparse: ctx.sparse,
        reference: attrs.and_then(|a| a.reference.clone()),
        ref_path: attrs.and_then(|a| a.ref_path.clone()),
        default: ctx.resolved_default(),
        validator: ctx.validator,
    })
}

fn scalar_field(node: &TypeNode, kind: Kind, ctx: FieldContext) -> FieldDescriptor {
    let scalar_kind = match kind {
        Kind::Number => ScalarKind::Number,
        Kind::Boolean => ScalarKind::Boolean,
        Kind::Date => ScalarKind::Date,
        _ => ScalarKind::String,
    };
    let mut field = ScalarField::new(scalar_kind);
    field.required = ctx.required;
    field.default = ctx.resolved_default();
    field.validator = ctx.validator;
    field.unique = ctx.unique;
    field.sparse = ctx.sparse;

    if let Some(checks) = node.string_checks() {
        field.min_length = checks.min_length;
        field.max_length = checks.max_length;
        field.pattern = checks.pattern.clone();
        field.trim = checks.trim;
        field.lowercase = checks.lowercase;
        field.uppercase = checks.uppercase;
    }
    if let Some(checks) = node.number_checks() {
        field.min = checks.min.map(Bound::Number);
        field.max = checks.max.map(Bound::Number);
    }
    if let Some(checks) = node.date_checks() {
        field.min = checks.min.map(Bound::Date);
        field.max = checks.max.map(Bound::Date);
    }
    FieldDescriptor::Scalar(field)
}

/// Enumerations are string fields restricted to their values, never unique
fn enum_field(node: &TypeNode, ctx: FieldContext) -> FieldDescriptor {
    let mut field = ScalarField::new(ScalarKind::String);
    field.required = ctx.required;
    field.default = ctx.resolved_default();
    field.validator = ctx.validator;
    field.sparse = ctx.sparse;
    field.enum_values = node.enum_values().map(|v| v.to_values());
    FieldDescriptor::Scalar(field)
}
