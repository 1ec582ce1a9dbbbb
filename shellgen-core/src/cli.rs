//! CLI argument parsing for shellgen
//!
//! Makes the TUI wizard the default entry point when no subcommand is provided.

use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shellgen")]
#[command(version, about = "Web Shell Generator - guided terminal front-end")]
#[command(long_about = "Web Shell Generator - guided terminal front-end\n\n\
    Walks through shell technology, features, output and client choices and submits\n\
    them to the generation service.\n\n\
    Run without arguments to launch the interactive TUI wizard.\n\
    Or use subcommands for scripting.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the generation service (env: SHELLGEN_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// HTTP timeout in seconds (env: SHELLGEN_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log file used while the TUI is running
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Dump every wizard screen as text to stdout and exit
    #[arg(long, global = true)]
    pub dump_tui: bool,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List what the generation service offers
    List {
        #[command(subcommand)]
        target: ListTarget,
    },

    /// Build and submit a generation request without the TUI
    Generate {
        /// Shell technology (e.g. php)
        #[arg(long)]
        shell: String,

        /// Feature key; `key=value` for features that take an argument (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Output format key (e.g. jpg)
        #[arg(long)]
        format: String,

        /// Output option key to enable (repeatable)
        #[arg(long = "option")]
        options: Vec<String>,

        /// Client technology (e.g. python)
        #[arg(long)]
        client: String,

        /// Download and verify the generated files into this directory
        #[arg(long)]
        download_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ListTarget {
    /// Shell technologies
    Shells,
    /// Client technologies
    Clients,
    /// Features, protections and output choices of a shell technology
    Features { technology: String },
}

/// Split a `--feature` value into key and optional argument value.
pub fn parse_feature_spec(raw: &str) -> (String, Option<String>) {
    match raw.split_once('=') {
        Some((key, value)) => (key.trim().to_string(), Some(value.to_string())),
        None => (raw.trim().to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::parse_from(["shellgen", "--api-base", "http://x"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config_overrides().api_base.as_deref(), Some("http://x"));
    }

    #[test]
    fn generate_collects_repeatable_flags() {
        let cli = Cli::parse_from([
            "shellgen",
            "generate",
            "--shell",
            "php",
            "--feature",
            "command-execution",
            "--feature",
            "ip-validation=10.0.0.1, ::1",
            "--format",
            "jpg",
            "--option",
            "obfuscate-code",
            "--client",
            "ruby",
        ]);
        match cli.command {
            Some(Command::Generate {
                features, options, ..
            }) => {
                assert_eq!(features.len(), 2);
                assert_eq!(options, ["obfuscate-code"]);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn feature_spec_splits_on_first_equals() {
        assert_eq!(
            parse_feature_spec("ip-validation=a=b"),
            ("ip-validation".to_string(), Some("a=b".to_string()))
        );
        assert_eq!(parse_feature_spec("file-upload"), ("file-upload".to_string(), None));
    }
}
