//! Declaration loader
//!
//! Reads `*.json` declaration files from a directory into an in-memory
//! registry keyed by schema name. Unreadable or malformed files are fatal;
//! two declarations with the same name are rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::{log_event, Event};

use super::declaration::Declaration;
use super::errors::{SchemaError, SchemaResult};
use super::types::validate_schema_name;

/// Loads declarations from disk and keeps them by name.
pub struct DeclarationLoader {
    /// Directory containing declaration files
    schema_dir: PathBuf,
    /// Loaded declarations indexed by name
    declarations: BTreeMap<String, Declaration>,
}

impl DeclarationLoader {
    /// Creates a loader for the given directory.
    pub fn new(schema_dir: impl AsRef<Path>) -> Self {
        Self {
            schema_dir: schema_dir.as_ref().to_path_buf(),
            declarations: BTreeMap::new(),
        }
    }

    /// Returns the declaration directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `.json` file in the declaration directory.
    ///
    /// Files are read in name order so duplicate reports are stable.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(
                self.schema_dir.display().to_string(),
                format!("Failed to read declaration directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        let count = self.declarations.len().to_string();
        let dir = self.schema_dir.display().to_string();
        log_event(
            Event::DeclarationsLoaded,
            &[("count", count.as_str()), ("dir", dir.as_str())],
        );
        Ok(paths.len())
    }

    /// Loads and registers a single declaration file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<&Declaration> {
        let declaration = read_declaration(path)?;
        let display = path.display().to_string();
        log_event(
            Event::DeclarationLoaded,
            &[("name", declaration.name.as_str()), ("path", display.as_str())],
        );
        self.register(declaration)
    }

    /// Registers a declaration directly.
    pub fn register(&mut self, declaration: Declaration) -> SchemaResult<&Declaration> {
        if let Err(reason) = validate_schema_name(&declaration.name) {
            return Err(SchemaError::malformed(&declaration.name, reason));
        }
        if self.declarations.contains_key(&declaration.name) {
            return Err(SchemaError::duplicate(&declaration.name));
        }

        let name = declaration.name.clone();
        Ok(self.declarations.entry(name).or_insert(declaration))
    }

    /// Gets a declaration by name.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// Gets a declaration by name, failing when it is not registered.
    pub fn require(&self, name: &str) -> SchemaResult<&Declaration> {
        self.get(name).ok_or_else(|| SchemaError::unknown(name))
    }

    /// Checks if a declaration exists.
    pub fn exists(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.declarations.keys().map(String::as_str).collect()
    }

    /// Returns all declarations in name order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    /// Returns the number of loaded declarations.
    pub fn count(&self) -> usize {
        self.declarations.len()
    }
}

/// Reads one declaration file without registering it.
pub fn read_declaration(path: &Path) -> SchemaResult<Declaration> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    Declaration::from_json(&content).map_err(|e| {
        SchemaError::malformed(path.display().to_string(), format!("Invalid declaration: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use tempfile::TempDir;

    const USERS: &str = r#"{ "name": "users", "fields": { "name": { "type": "string" } } }"#;
    const POSTS: &str = r#"{ "name": "posts", "fields": { "title": { "type": "string" } } }"#;

    fn write(dir: &TempDir, file: &str, content: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path());

        loader.register(Declaration::from_json(USERS).unwrap()).unwrap();

        assert!(loader.exists("users"));
        assert_eq!(loader.get("users").unwrap().fields.names(), vec!["name"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path());

        loader.register(Declaration::from_json(USERS).unwrap()).unwrap();
        let result = loader.register(Declaration::from_json(USERS).unwrap());
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::SchemaDuplicate);
    }

    #[test]
    fn test_path_like_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path());

        let declaration =
            Declaration::from_json(r#"{ "name": "../../escaped", "fields": {} }"#).unwrap();
        let err = loader.register(declaration).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaMalformedDeclaration);
        assert!(!loader.exists("../../escaped"));
    }

    #[test]
    fn test_load_all_skips_non_json() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir, "users.json", USERS);
        write(&temp_dir, "posts.json", POSTS);
        write(&temp_dir, "README.md", "not a declaration");

        let mut loader = DeclarationLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 2);
        assert_eq!(loader.names(), vec!["posts", "users"]);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "broken.json", r#"{ "name": "x", "fields": "#);

        let mut loader = DeclarationLoader::new(temp_dir.path());
        let err = loader.load_file(&path).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaMalformedDeclaration);
        assert!(err.is_fatal());
        assert!(err.message().contains("broken.json"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path().join("absent"));
        assert!(loader.load_all().unwrap_err().is_fatal());
    }

    #[test]
    fn test_unknown_declaration() {
        let temp_dir = TempDir::new().unwrap();
        let loader = DeclarationLoader::new(temp_dir.path());

        assert!(loader.get("nonexistent").is_none());
        assert_eq!(
            loader.require("nonexistent").unwrap_err().code(),
            SchemaErrorCode::SchemaUnknown
        );
    }

    #[test]
    fn test_load_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = DeclarationLoader::new(temp_dir.path());

        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.count(), 0);
    }
}
