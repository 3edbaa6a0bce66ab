//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod formatters;
pub mod output;

/// Techstack explorer - filter and rank a company directory
#[derive(Parser, Debug)]
#[command(name = "tse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Force plain output (no colors)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: TSE_CONFIG, then ~/.config/techstack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective output format.
    ///
    /// Priority order:
    /// 1. `--plain` → Plain format
    /// 2. `--output-format` → Explicit format
    /// 3. `--machine` → JSON format (shorthand)
    /// 4. Default → Human format
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.plain {
            return OutputFormat::Plain;
        }
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.machine {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }

    /// Whether errors and logs should be emitted as JSON.
    #[must_use]
    pub fn machine_mode(&self) -> bool {
        matches!(self.output_format(), OutputFormat::Json | OutputFormat::Jsonl)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and rank companies
    Search(commands::search::SearchArgs),

    /// Describe the companies you want in plain language
    Ask(commands::ask::AskArgs),

    /// Suggest filters related to a partial search
    Suggest(commands::suggest::SuggestArgs),

    /// List the facet values available for filtering
    Options(commands::options::OptionsArgs),

    /// Export matching companies as CSV or JSON
    Export(commands::export::ExportArgs),

    /// Load companies into the SQLite directory
    Seed(commands::seed::SeedArgs),

    /// Run the HTTP query service
    Serve(commands::serve::ServeArgs),

    /// Show or edit configuration
    Config(commands::config::ConfigArgs),
}
