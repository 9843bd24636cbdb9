//! CLI command implementations
//!
//! `translate` works on a single declaration file. `compile` and `check`
//! read a configuration file naming a declaration directory, load every
//! declaration in it and compile them all; any failure aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::observability::{log_event, Event, Logger, Severity};
use crate::schema::{
    compile_declaration, read_declaration, validate_schema_name, DeclarationLoader,
    DocumentSchema, SchemaCompiler,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_json, write_json_file, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding declaration files (required)
    pub schema_dir: String,

    /// Directory compiled schemas are written to; stdout when absent
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Pretty-print JSON output (optional, default true)
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_pretty() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::config_error("schema_dir must not be empty"));
        }

        if let Some(dir) = &self.output_dir {
            if dir.trim().is_empty() {
                return Err(CliError::config_error("output_dir must not be empty when set"));
            }
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            ))
        })
    }

    /// Get declaration directory as Path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }

    /// Get output directory as Path, if configured
    pub fn output_path(&self) -> Option<&Path> {
        self.output_dir.as_deref().map(Path::new)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Translate { input, compact } => translate(&input, compact),
        Command::Compile { config } => compile(&config),
        Command::Check { config } => check(&config),
    }
}

/// Compile a single declaration file and print the schema
pub fn translate(input: &Path, compact: bool) -> CliResult<()> {
    let schema = translate_file(input)?;
    write_json(&schema, !compact)
}

/// Compile a single declaration file
pub fn translate_file(input: &Path) -> CliResult<DocumentSchema> {
    let declaration = read_declaration(input)?;
    Ok(compile_declaration(&declaration)?)
}

/// Compile every declaration in the configured directory.
///
/// With `output_dir` set, each schema is written to
/// `<output_dir>/<name>.schema.json` and a summary is printed; otherwise the
/// schemas are printed in name order.
pub fn compile(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let schemas = compile_all(&config)?;

    match config.output_path() {
        Some(dir) => {
            let written = write_schemas(dir, &schemas, config.pretty)?;
            let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
            write_response(json!({ "compiled": schemas.len(), "files": paths }))
        }
        None => {
            for schema in &schemas {
                write_json(schema, config.pretty)?;
            }
            Ok(())
        }
    }
}

/// Compile every declaration and report the outcome without writing files
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    match compile_all(&config) {
        Ok(schemas) => {
            let names: Vec<&str> = schemas.iter().map(|s| s.name.as_str()).collect();
            write_response(json!({ "checked": schemas.len(), "schemas": names }))
        }
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    log_event(
        Event::ConfigLoaded,
        &[("path", path.as_str()), ("schema_dir", config.schema_dir.as_str())],
    );
    Ok(config)
}

fn compile_all(config: &Config) -> CliResult<Vec<DocumentSchema>> {
    let mut loader = DeclarationLoader::new(config.schema_path());
    loader.load_all()?;
    Ok(SchemaCompiler::new(&loader).compile_all()?)
}

/// Write each schema to `<dir>/<name>.schema.json`
pub fn write_schemas(
    dir: &Path,
    schemas: &[DocumentSchema],
    pretty: bool,
) -> CliResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| {
        CliError::io_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    let mut written = Vec::with_capacity(schemas.len());
    for schema in schemas {
        validate_schema_name(&schema.name).map_err(CliError::io_error)?;
        let path = dir.join(format!("{}.schema.json", schema.name));
        write_json_file(&path, schema, pretty)?;

        let display = path.display().to_string();
        log_event(
            Event::SchemaWritten,
            &[("path", display.as_str()), ("schema", schema.name.as_str())],
        );
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::translate::FieldMap;
    use serde_json::Value;
    use tempfile::TempDir;

    const USER: &str = r#"{
        "name": "User",
        "fields": {
            "name": { "type": "string", "minLength": 3, "maxLength": 255 },
            "age": { "type": "number", "min": 18, "max": 100, "default": 18 },
            "tags": { "type": "array", "items": { "type": "string" } }
        }
    }"#;

    fn create_config(temp_dir: &TempDir, extra: Value) -> PathBuf {
        let config_path = temp_dir.path().join("schemaport.json");
        let schema_dir = temp_dir.path().join("schemas");
        fs::create_dir_all(&schema_dir).unwrap();

        let mut config = json!({ "schema_dir": schema_dir.to_string_lossy() });
        if let (Some(target), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    fn write_declaration(temp_dir: &TempDir, file: &str, content: &str) -> PathBuf {
        let path = temp_dir.path().join("schemas").join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));

        let config = Config::load(&config_path).unwrap();
        assert!(config.pretty);
        assert_eq!(config.log_level, "info");
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_config_validates_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({ "log_level": "loud" }));

        let result = Config::load(&config_path);
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_requires_schema_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("schemaport.json");
        fs::write(&config_path, "{}").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_translate_file() {
        let temp_dir = TempDir::new().unwrap();
        create_config(&temp_dir, json!({}));
        let input = write_declaration(&temp_dir, "user.json", USER);

        let schema = translate_file(&input).unwrap();
        assert_eq!(schema.name, "User");
        assert_eq!(schema.fields.names(), vec!["name", "age", "tags"]);
    }

    #[test]
    fn test_compile_writes_schema_files() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let config_path = create_config(
            &temp_dir,
            json!({ "output_dir": out_dir.to_string_lossy(), "pretty": false }),
        );
        write_declaration(&temp_dir, "user.json", USER);

        compile(&config_path).unwrap();

        let content = fs::read_to_string(out_dir.join("User.schema.json")).unwrap();
        let raw: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(raw["name"], "User");
        assert_eq!(raw["fields"]["age"]["default"], 18);
        assert_eq!(raw["fields"]["tags"]["type"][0]["type"], "String");
    }

    #[test]
    fn test_compile_rejects_escaping_name() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out").join("nested");
        let config_path = create_config(
            &temp_dir,
            json!({ "output_dir": out_dir.to_string_lossy() }),
        );
        write_declaration(
            &temp_dir,
            "escaped.json",
            r#"{ "name": "../../escaped", "fields": { "a": { "type": "string" } } }"#,
        );

        assert!(compile(&config_path).is_err());
        assert!(!temp_dir.path().join("escaped.schema.json").exists());
    }

    #[test]
    fn test_write_schemas_rejects_path_names() {
        let temp_dir = TempDir::new().unwrap();
        let schema = DocumentSchema::new("../outside", FieldMap::new());

        let err = write_schemas(temp_dir.path(), &[schema], true).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
        assert!(!temp_dir.path().join("../outside.schema.json").exists());
    }

    #[test]
    fn test_check_reports_translation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir, json!({}));
        write_declaration(
            &temp_dir,
            "bad.json",
            r#"{ "name": "Bad", "fields": { "blob": { "type": "unknown" } } }"#,
        );

        let err = check(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::CompileFailed);
        assert!(err.message().contains("blob"));
    }
}
