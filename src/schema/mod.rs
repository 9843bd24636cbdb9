//! Document schemas
//!
//! The sink side of translation plus the declaration surface:
//!
//! - `DocumentSchema`: name, ordered raw field map and verbatim options
//! - `Declaration`: JSON description of one schema
//! - `DeclarationLoader`: directory of declarations, keyed by name
//! - `SchemaCompiler`: declarations to checked document schemas

mod compiler;
mod declaration;
mod errors;
mod loader;
mod types;

pub use compiler::{compile_declaration, compile_node, SchemaCompiler};
pub use declaration::{Declaration, FieldDecl, OrderedFields, RefineDecl, TypeDecl};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::{read_declaration, DeclarationLoader};
pub use types::{validate_schema_name, DocumentSchema};
