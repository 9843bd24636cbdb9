//! schemaport - compile validation schemas into document-database schemas
//!
//! A validation schema tree (`validation`) is classified node by node
//! (`classify`) and translated into an ordered map of field descriptors
//! (`translate`), which `schema` wraps into named document schemas.

pub mod classify;
pub mod cli;
pub mod extensions;
pub mod observability;
pub mod schema;
pub mod translate;
pub mod validation;
