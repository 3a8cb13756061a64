//! Command handlers for pob CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod builds;
pub mod configure;
pub mod decode;
pub mod input;
pub mod trade;
