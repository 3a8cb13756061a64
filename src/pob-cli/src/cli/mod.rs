//! CLI argument definitions for pob
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod builds;
mod core;

pub use builds::BuildsCommand;
pub use core::{Cli, CodeInput, Commands, OutputFormat, TradeArgs};
