//! Declaration Loading Tests
//!
//! End-to-end behaviour of JSON declarations:
//! - File field order survives into compiled output
//! - Malformed and duplicate declarations are rejected
//! - Compiled schemas are structurally checked
//! - Extension installation is idempotent

use std::fs;
use std::path::Path;

use schemaport::extensions;
use schemaport::schema::{
    compile_declaration, Declaration, DeclarationLoader, SchemaCompiler, SchemaErrorCode,
};
use schemaport::translate::FieldDescriptor;
use schemaport::validation::IdentifierKind;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const ORDER: &str = r#"{
    "name": "Order",
    "options": { "collection": "orders", "timestamps": true },
    "fields": {
        "number": { "type": "string", "pattern": "^ORD-[0-9]+$", "unique": true },
        "customer": { "type": "objectId", "ref": "Customer" },
        "status": { "type": "enum", "values": ["open", "paid", "shipped"], "default": "open" },
        "priority": { "type": "nativeEnum", "values": [1, 2, 3], "optional": true },
        "placedAt": { "type": "date", "min": "2000-01-01T00:00:00Z" },
        "lines": {
            "type": "array",
            "items": {
                "type": "object",
                "fields": {
                    "sku": { "type": "string", "refine": { "pattern": "^[A-Z]{3}", "message": "bad sku" } },
                    "qty": { "type": "number", "min": 1, "int": true }
                }
            }
        },
        "attributes": { "type": "record", "key": { "type": "string" }, "value": { "type": "any" } },
        "note": { "type": "string", "nullable": true, "trim": true }
    }
}"#;

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

fn loader_for(temp_dir: &TempDir) -> DeclarationLoader {
    let mut loader = DeclarationLoader::new(temp_dir.path());
    loader.load_all().unwrap();
    loader
}

// =============================================================================
// Order Preservation
// =============================================================================

#[test]
fn test_file_order_survives_compilation() {
    let declaration = Declaration::from_json(ORDER).unwrap();
    let schema = compile_declaration(&declaration).unwrap();

    let expected = vec![
        "number",
        "customer",
        "status",
        "priority",
        "placedAt",
        "lines",
        "attributes",
        "note",
    ];
    assert_eq!(schema.fields.names(), expected);

    let text = serde_json::to_string(&schema.fields).unwrap();
    let positions: Vec<usize> = expected
        .iter()
        .map(|name| text.find(&format!("\"{}\"", name)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================================
// Compiled Shape
// =============================================================================

#[test]
fn test_declaration_compiles_to_expected_fields() {
    let schema = compile_declaration(&Declaration::from_json(ORDER).unwrap()).unwrap();
    let raw = serde_json::to_value(&schema).unwrap();

    assert_eq!(raw["name"], "Order");
    assert_eq!(raw["options"], json!({ "collection": "orders", "timestamps": true }));

    let fields = &raw["fields"];
    assert_eq!(fields["number"]["match"], "^ORD-[0-9]+$");
    assert_eq!(fields["number"]["unique"], true);
    assert_eq!(fields["customer"]["type"], "ObjectId");
    assert_eq!(fields["customer"]["ref"], "Customer");
    assert_eq!(fields["status"]["enum"], json!(["open", "paid", "shipped"]));
    assert_eq!(fields["status"]["default"], "open");
    assert_eq!(fields["priority"]["type"], "String");
    assert_eq!(fields["priority"]["enum"], json!([1, 2, 3]));
    assert_eq!(fields["priority"]["required"], false);
    assert_eq!(fields["placedAt"]["min"], "2000-01-01T00:00:00Z");
    assert_eq!(fields["lines"]["type"][0]["qty"]["min"], 1);
    assert_eq!(fields["lines"]["type"][0]["sku"]["validate"]["message"], "bad sku");
    assert_eq!(fields["attributes"]["type"], "Map");
    assert_eq!(fields["attributes"]["keyType"], "String");
    assert_eq!(fields["attributes"]["of"]["type"], "Mixed");
    assert_eq!(fields["note"]["required"], false);
    assert_eq!(fields["note"]["default"], json!(null));
    assert_eq!(fields["note"]["trim"], true);
}

#[test]
fn test_declared_null_default_survives() {
    let declaration = Declaration::from_json(
        r#"{ "name": "N", "fields": { "nickname": { "type": "string", "default": null } } }"#,
    )
    .unwrap();
    let schema = compile_declaration(&declaration).unwrap();
    let raw = serde_json::to_value(&schema).unwrap();

    let nickname = raw["fields"]["nickname"].as_object().unwrap();
    assert_eq!(nickname.get("default"), Some(&json!(null)));
    assert_eq!(nickname["required"], true);
}

#[test]
fn test_identifier_field_from_declaration() {
    let schema = compile_declaration(&Declaration::from_json(ORDER).unwrap()).unwrap();
    match schema.fields.get("customer").unwrap() {
        FieldDescriptor::Identifier(id) => {
            assert_eq!(id.kind, IdentifierKind::ObjectId);
            assert_eq!(id.reference.as_deref(), Some("Customer"));
            assert!(id.required);
        }
        other => panic!("expected identifier, got {}", other.type_name()),
    }
}

// =============================================================================
// Loader Rejections
// =============================================================================

#[test]
fn test_malformed_declaration_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "bad.json", r#"{ "name": "Bad", "fields": { "x": { "type": "tuple" } } }"#);

    let mut loader = DeclarationLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaMalformedDeclaration);
    assert!(err.is_fatal());
}

#[test]
fn test_missing_type_rejected() {
    assert!(Declaration::from_json(r#"{ "name": "T", "fields": { "x": { "optional": true } } }"#).is_err());
}

#[test]
fn test_path_like_declaration_name_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "x.json", r#"{ "name": "../../escaped", "fields": {} }"#);

    let mut loader = DeclarationLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaMalformedDeclaration);
}

#[test]
fn test_duplicate_names_across_files_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a.json", r#"{ "name": "Same", "fields": {} }"#);
    write(temp_dir.path(), "b.json", r#"{ "name": "Same", "fields": {} }"#);

    let mut loader = DeclarationLoader::new(temp_dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaDuplicate);
    assert_eq!(err.schema(), Some("Same"));
}

// =============================================================================
// Structure Checks
// =============================================================================

#[test]
fn test_operator_prefixed_field_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "q.json",
        r#"{ "name": "Q", "fields": { "filter": { "type": "object", "fields": { "$gt": { "type": "number" } } } } }"#,
    );

    let loader = loader_for(&temp_dir);
    let err = SchemaCompiler::new(&loader).compile("Q").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaInvalidStructure);
    assert!(err.message().contains("filter.$gt"));
}

#[test]
fn test_dotted_field_rejected() {
    let declaration =
        Declaration::from_json(r#"{ "name": "D", "fields": { "a.b": { "type": "string" } } }"#).unwrap();
    let err = compile_declaration(&declaration).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaInvalidStructure);
}

#[test]
fn test_unsupported_type_names_field_path() {
    let declaration = Declaration::from_json(
        r#"{ "name": "U", "fields": { "meta": { "type": "object", "fields": { "blob": { "type": "unknown" } } } } }"#,
    )
    .unwrap();

    let err = compile_declaration(&declaration).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaTranslationFailed);
    let cause = err.translate_error().unwrap();
    assert_eq!(cause.field(), "meta.blob");
    assert_eq!(cause.type_name(), "Unknown");
}

// =============================================================================
// Extensions
// =============================================================================

#[test]
fn test_extensions_install_is_idempotent() {
    let first = extensions::install();
    let second = extensions::install_with(&[("Ref", IdentifierKind::ObjectId)]);
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.identifier_for("ObjectId"), Some(IdentifierKind::ObjectId));
}

#[test]
fn test_annotated_unknown_is_identifier() {
    let declaration = Declaration::from_json(
        r#"{ "name": "A", "fields": { "owner": { "type": "unknown", "description": "UUID" } } }"#,
    )
    .unwrap();
    let schema = compile_declaration(&declaration).unwrap();
    assert_eq!(schema.fields.get("owner").unwrap().type_name(), "UUID");
}
