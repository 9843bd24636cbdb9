//! CLI module for schemaport
//!
//! Provides command-line interface for:
//! - translate: Compile one declaration file to stdout
//! - compile: Compile a declaration directory to files or stdout
//! - check: Compile a declaration directory and report

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, compile, run, run_command, translate, translate_file, write_schemas, Config,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_json, write_json_file, write_json_to, write_response};
