//! Saved builds CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

use super::core::{CodeInput, OutputFormat};

#[derive(Subcommand)]
pub enum BuildsCommand {
    /// Save an export code under a name
    Save {
        /// Name for the build (defaults to the ascendancy or class)
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        input: CodeInput,

        /// Path to the builds database
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List saved builds, newest first
    List {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to the builds database
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show a saved build
    Show {
        /// Build id
        id: String,

        /// Decode the stored code and show its items
        #[arg(short, long)]
        decode: bool,

        /// Path to the builds database
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Delete a saved build
    Delete {
        /// Build id
        id: String,

        /// Path to the builds database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}
