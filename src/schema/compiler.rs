//! Schema compiler
//!
//! Turns declarations (or hand-built validation nodes) into checked
//! `DocumentSchema`s.

use serde_json::{Map, Value};

use crate::observability::{log_event, Event, ObservationScope};
use crate::translate::{TranslateError, Translator};
use crate::validation::TypeNode;

use super::declaration::Declaration;
use super::errors::{SchemaError, SchemaResult};
use super::loader::DeclarationLoader;
use super::types::DocumentSchema;

/// Compiles registered declarations into document schemas.
pub struct SchemaCompiler<'a> {
    loader: &'a DeclarationLoader,
    translator: Translator,
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler over a loader's declarations.
    pub fn new(loader: &'a DeclarationLoader) -> Self {
        Self::with_translator(loader, Translator::new())
    }

    pub fn with_translator(loader: &'a DeclarationLoader, translator: Translator) -> Self {
        Self { loader, translator }
    }

    /// Compiles one declaration by name.
    pub fn compile(&self, name: &str) -> SchemaResult<DocumentSchema> {
        let declaration = self.loader.require(name)?;
        compile_with(&self.translator, declaration)
    }

    /// Compiles every declaration in name order, stopping at the first
    /// failure.
    pub fn compile_all(&self) -> SchemaResult<Vec<DocumentSchema>> {
        let dir = self.loader.schema_dir().display().to_string();
        let scope = ObservationScope::with_fields("COMPILE_ALL", &[("dir", dir.as_str())]);

        let mut schemas = Vec::with_capacity(self.loader.count());
        for declaration in self.loader.declarations() {
            match compile_with(&self.translator, declaration) {
                Ok(schema) => schemas.push(schema),
                Err(e) => {
                    scope.fail(&e.to_string());
                    return Err(e);
                }
            }
        }

        let count = schemas.len().to_string();
        scope.complete_with_fields(&[("count", count.as_str())]);
        Ok(schemas)
    }
}

/// Compiles a single declaration with the default translator.
pub fn compile_declaration(declaration: &Declaration) -> SchemaResult<DocumentSchema> {
    compile_with(&Translator::new(), declaration)
}

fn compile_with(
    translator: &Translator,
    declaration: &Declaration,
) -> SchemaResult<DocumentSchema> {
    let node = declaration
        .to_node()
        .map_err(|reason| SchemaError::malformed(&declaration.name, reason))?;
    translate_node(
        translator,
        &declaration.name,
        &node,
        declaration.options.clone(),
    )
}

/// Compiles a validation object node into a named document schema.
///
/// `options` are forwarded verbatim to the schema.
pub fn compile_node(
    name: &str,
    node: &TypeNode,
    options: Map<String, Value>,
) -> SchemaResult<DocumentSchema> {
    translate_node(&Translator::new(), name, node, options)
}

fn translate_node(
    translator: &Translator,
    name: &str,
    node: &TypeNode,
    options: Map<String, Value>,
) -> SchemaResult<DocumentSchema> {
    let fields = translator.translate_object(node).map_err(|e| {
        if let Some(fields) = unsupported_fields(name, &e) {
            log_event(Event::FieldUnsupported, &fields);
        }
        SchemaError::translation_failed(name, e)
    })?;

    let schema = DocumentSchema::new(name, fields).with_options(options);
    schema
        .validate_structure()
        .map_err(|reason| SchemaError::invalid_structure(name, reason))?;

    let count = schema.fields.len().to_string();
    log_event(
        Event::SchemaCompiled,
        &[("fields", count.as_str()), ("schema", name)],
    );
    Ok(schema)
}

/// Log fields for a field that has no storage mapping; `None` for root errors
fn unsupported_fields<'a>(
    name: &'a str,
    err: &'a TranslateError,
) -> Option<Vec<(&'a str, &'a str)>> {
    if err.field().is_empty() {
        return None;
    }
    Some(vec![
        ("field", err.field()),
        ("schema", name),
        ("type", err.type_name()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use crate::validation::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn loader_with(declarations: &[&str]) -> (TempDir, DeclarationLoader) {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path());
        for content in declarations {
            loader.register(Declaration::from_json(content).unwrap()).unwrap();
        }
        (temp_dir, loader)
    }

    #[test]
    fn test_compile_by_name() {
        let (_dir, loader) = loader_with(&[
            r#"{ "name": "users", "options": { "timestamps": true },
                 "fields": { "email": { "type": "string", "unique": true } } }"#,
        ]);

        let schema = SchemaCompiler::new(&loader).compile("users").unwrap();
        assert_eq!(schema.name, "users");
        assert_eq!(schema.option("timestamps"), Some(&json!(true)));
        assert!(schema.fields.get("email").unwrap().as_scalar().unwrap().unique);
    }

    #[test]
    fn test_compile_unknown_name() {
        let (_dir, loader) = loader_with(&[]);
        let err = SchemaCompiler::new(&loader).compile("ghost").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaUnknown);
    }

    #[test]
    fn test_compile_all_stops_at_first_failure() {
        let (_dir, loader) = loader_with(&[
            r#"{ "name": "a", "fields": { "x": { "type": "string" } } }"#,
            r#"{ "name": "b", "fields": { "y": { "type": "unknown" } } }"#,
        ]);

        let err = SchemaCompiler::new(&loader).compile_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaTranslationFailed);
        assert_eq!(err.schema(), Some("b"));
        assert_eq!(err.translate_error().unwrap().field(), "y");
    }

    #[test]
    fn test_unsupported_field_log_fields() {
        let err = Translator::new()
            .translate_object(&object().field("tags", array(unknown())).into_node())
            .unwrap_err();
        assert_eq!(
            unsupported_fields("posts", &err),
            Some(vec![("field", "tags[]"), ("schema", "posts"), ("type", "Unknown")])
        );

        let root = Translator::new()
            .translate_object(&string().into_node())
            .unwrap_err();
        assert_eq!(unsupported_fields("posts", &root), None);
    }

    #[test]
    fn test_compile_all_in_name_order() {
        let (_dir, loader) = loader_with(&[
            r#"{ "name": "zeta", "fields": {} }"#,
            r#"{ "name": "alpha", "fields": {} }"#,
        ]);

        let schemas = SchemaCompiler::new(&loader).compile_all().unwrap();
        let names: Vec<_> = schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_compile_node_rejects_unstorable_names() {
        let node = object().field("$where", string()).into_node();
        let err = compile_node("users", &node, Map::new()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaInvalidStructure);
    }

    #[test]
    fn test_compile_node_rejects_non_object_root() {
        let err = compile_node("users", &string().into_node(), Map::new()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaTranslationFailed);
        assert_eq!(err.translate_error().unwrap().code(), "TRANSLATE_ROOT_NOT_OBJECT");
    }

    #[test]
    fn test_invalid_declaration_pattern_is_malformed() {
        let declaration = Declaration::from_json(
            r#"{ "name": "p", "fields": { "code": { "type": "string", "pattern": "[" } } }"#,
        )
        .unwrap();
        let err = compile_declaration(&declaration).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaMalformedDeclaration);
    }
}
