//! JSON output for the CLI
//!
//! - Command results go to stdout as JSON
//! - Log lines go to stderr (see `observability::Logger`)
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Write a value as JSON to any writer, followed by a newline
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a value as JSON to stdout
pub fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CliResult<()> {
    let mut stdout = io::stdout();
    write_json_to(&mut stdout, value, pretty)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_json(&response, false)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_json(&response, false)
}

/// Write a value as JSON to a file, replacing any previous content
pub fn write_json_file<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> CliResult<()> {
    let mut buffer = Vec::new();
    write_json_to(&mut buffer, value, pretty)?;
    fs::write(path, buffer).map_err(|e| {
        CliError::io_error(format!("Failed to write {}: {}", path.display(), e))
    })
}
