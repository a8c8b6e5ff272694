//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlsift")]
#[command(author, version, about = "SQL tokenizer, lineage and lint tool for notebook queries")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the nearest sqlsift.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQL dialect
    #[arg(short, long, global = true)]
    pub dialect: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the token stream of a query as JSON
    Tokens {
        /// SQL file, or `-` for stdin
        file: PathBuf,

        /// Emit tokens for characters no rule recognizes
        #[arg(long)]
        include_unknown: bool,
    },

    /// Show the tables and aliases each statement references
    Lineage {
        /// SQL file, or `-` for stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Lint SQL files, optionally against a metastore snapshot
    Lint {
        /// SQL files to lint (supports glob patterns)
        files: Vec<PathBuf>,

        /// Metastore snapshot (JSON) to check table references against
        #[arg(short, long, value_name = "FILE")]
        metastore: Option<PathBuf>,

        /// Metastore id to query (defaults to the snapshot's id)
        #[arg(long)]
        metastore_id: Option<i64>,

        /// Rules to disable, by code or name (e.g. L002, missing-limit)
        #[arg(long, value_name = "RULE")]
        disable: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Append a LIMIT to every SELECT that lacks one
    Limit {
        /// SQL file, or `-` for stdin
        file: PathBuf,

        /// Row limit to apply
        #[arg(short = 'n', long)]
        row_limit: Option<u64>,
    },

    /// Format a query
    Format {
        /// SQL file, or `-` for stdin
        file: PathBuf,

        /// Lowercase keywords
        #[arg(long)]
        lowercase: bool,

        /// Spaces per indent level
        #[arg(long)]
        tab_width: Option<usize>,

        /// Indent with tabs
        #[arg(long)]
        use_tabs: bool,

        /// Fail instead of printing the query unchanged when it cannot be formatted
        #[arg(long)]
        strict: bool,
    },

    /// List tables a query leaves dropped
    Dropped {
        /// SQL file, or `-` for stdin
        file: PathBuf,
    },

    /// Aggregate, pivot and sort a JSON result table
    Chart {
        /// JSON array of rows, header first
        file: PathBuf,

        /// JSON transform options
        #[arg(short, long, value_name = "FILE")]
        options: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// SARIF output (for GitHub Code Scanning)
    Sarif,
}
