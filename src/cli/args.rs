//! Command line argument parsing for the folio CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Folio - catalog search with ranking, highlighting and autocomplete
#[derive(Parser, Debug, Clone)]
#[command(name = "folio")]
#[command(about = "Search a book catalog with ranked, highlighted results")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FolioArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FolioArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }

    /// Default tracing filter directive for the verbosity level.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search a catalog
    Search(SearchArgs),

    /// Autocomplete titles and authors
    Suggest(SuggestArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Catalog file (JSON array or JSON lines of documents)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Results per page (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Highlight matched words in titles and descriptions
    #[arg(long)]
    pub highlight: bool,

    /// Marker inserted before a highlighted word
    #[arg(long, requires = "highlight")]
    pub start_marker: Option<String>,

    /// Marker inserted after a highlighted word
    #[arg(long, requires = "highlight")]
    pub end_marker: Option<String>,

    /// Disable prefix matching of query terms
    #[arg(long)]
    pub exact: bool,
}

/// Arguments for autocomplete
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Catalog file (JSON array or JSON lines of documents)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Partial query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of suggestions (default from configuration)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
