//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use pob::trade::TradeStatus;
use pob::ModRef;
use std::path::PathBuf;

use super::builds::BuildsCommand;

#[derive(Parser)]
#[command(name = "pob")]
#[command(about = "Path of Building export code decoder", long_about = None)]
pub struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for decoded builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Where to read an export code from
#[derive(Args, Debug, Clone, Default)]
pub struct CodeInput {
    /// Export code, or - to read from stdin
    #[arg(required_unless_present = "file")]
    pub code: Option<String>,

    /// Read the export code from a file
    #[arg(short, long, conflicts_with = "code")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TradeArgs {
    #[command(flatten)]
    pub input: CodeInput,

    /// Item id within the build (see `pob decode`)
    #[arg(short, long)]
    pub item: u32,

    /// Trade league (uses configured default if not provided)
    #[arg(short, long)]
    pub league: Option<String>,

    /// Seller status: online, onlineleague, any
    #[arg(long)]
    pub status: Option<TradeStatus>,

    /// Search by slot category instead of base type
    #[arg(long)]
    pub category: bool,

    /// Modifier to search for, as group:index (e.g. explicit:0). Repeatable.
    #[arg(short = 'm', long = "mod")]
    pub mods: Vec<ModRef>,

    /// Search for every modifier with a known stat
    #[arg(long)]
    pub searchable: bool,

    /// Plain name/type search without a query
    #[arg(long, conflicts_with_all = ["mods", "searchable", "category"])]
    pub simple: bool,

    /// Also print the query JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode an export code and show the build's items
    #[command(visible_alias = "d")]
    Decode {
        #[command(flatten)]
        input: CodeInput,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Print every item parser decision to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Check an export code and report which stage fails
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        input: CodeInput,
    },

    /// Print the decoded build document
    Xml {
        #[command(flatten)]
        input: CodeInput,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Turn a build document into an export code
    Encode {
        /// Path to the XML file, or - for stdin
        input: PathBuf,
    },

    /// Build a trade site search URL for one item
    #[command(visible_alias = "t")]
    Trade(TradeArgs),

    /// Saved builds
    #[command(visible_alias = "b")]
    Builds {
        #[command(subcommand)]
        command: BuildsCommand,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default trade league
        #[arg(long)]
        league: Option<String>,

        /// Set default seller status: online, onlineleague, any
        #[arg(long)]
        status: Option<TradeStatus>,

        /// Set saved builds database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
