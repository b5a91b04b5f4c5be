use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A small JSON document store with a boolean query language
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides `storage.path` from the config)
    #[arg(long, global = true, env = "JSONDB_PATH")]
    pub db: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a record under a generated id
    Create {
        collection: String,
        /// Record as a JSON object
        record: String,
    },
    /// Add several records under generated ids
    CreateMany {
        collection: String,
        /// Records as a JSON array of objects
        records: String,
    },
    /// Add a record under a chosen id
    Insert {
        collection: String,
        id: String,
        /// Record as a JSON object
        record: String,
    },
    /// Add several records under chosen ids
    InsertMany {
        collection: String,
        /// Comma-separated ids, one per record
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        /// Records as a JSON array of objects
        records: String,
    },
    /// Read one record, the records matching a query, or the whole collection
    Read {
        collection: String,
        /// Record id
        #[arg(long, conflicts_with = "filter")]
        id: Option<String>,
        /// Query expression, e.g. "age > 25 and city == 'Boston'"
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,
    },
    /// Merge fields into an existing record
    Update {
        collection: String,
        id: String,
        /// Fields as a JSON object
        fields: String,
    },
    /// Delete a record
    Delete { collection: String, id: String },
    /// List all collections
    Collections,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
