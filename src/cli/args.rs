//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaport translate --input <path> [--compact]
//! - schemaport compile --config <path>
//! - schemaport check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemaport - compile validation schemas into document-database schemas
#[derive(Parser, Debug)]
#[command(name = "schemaport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile one declaration file and print the schema
    Translate {
        /// Path to the declaration file
        #[arg(long)]
        input: PathBuf,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Compile every declaration in the configured directory
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./schemaport.json")]
        config: PathBuf,
    },

    /// Compile every declaration and report, writing nothing
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./schemaport.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_args() {
        let cli = Cli::try_parse_from([
            "schemaport",
            "translate",
            "--input",
            "user.json",
            "--compact",
        ])
        .unwrap();
        match cli.command {
            Command::Translate { input, compact } => {
                assert_eq!(input, PathBuf::from("user.json"));
                assert!(compact);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_default() {
        let cli = Cli::try_parse_from(["schemaport", "check"]).unwrap();
        match cli.command {
            Command::Check { config } => assert_eq!(config, PathBuf::from("./schemaport.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_translate_requires_input() {
        assert!(Cli::try_parse_from(["schemaport", "translate"]).is_err());
    }
}
