//! # pob
//!
//! Path of Building export code decoder.
//!
//! This library provides functionality to:
//! - Validate and decode export codes (URL-safe base64 over deflate)
//! - Pull build metadata, item blocks, and slot assignments out of the document
//! - Parse item text into structured items with grouped modifiers
//! - Build trade site search queries for parsed items
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = std::fs::read_to_string("build.txt")?;
//!
//! let build = pob::import(&code)?;
//! println!("Class: {:?}", build.metadata.class_name);
//!
//! for item in build.equipped() {
//!     println!("{}: {} ({})", pob::slot::display_name(item.slot.as_deref()), item.name, item.rarity);
//!     for (id, m) in item.all_mods() {
//!         println!("  [{}] {}", id, m.display);
//!     }
//! }
//!
//! // Search URL for the first item
//! if let Some(item) = build.items.first() {
//!     let query = pob::trade::build_query(item, &pob::trade::QueryOptions::default());
//!     println!("{}", pob::trade::search_url(&query, pob::trade::DEFAULT_LEAGUE)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod code;
pub mod diagnostics;
pub mod document;
pub mod import;
pub mod item;
pub mod slot;
pub mod trade;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used items
#[doc(inline)]
pub use code::{
    decode, decode_with, encode, is_valid, validate, Compression, DecodeError, DecodeErrorKind,
    DecodeOptions, Decoded, FormatError,
};
#[doc(inline)]
pub use diagnostics::{DiagnosticSink, NoopSink, ParseEvent, Trace, TracingSink};
#[doc(inline)]
pub use document::{extract, BuildMetadata, Document, ItemBlock};
#[doc(inline)]
pub use import::{import, import_with, parse_document, parse_document_with, Build, ImportError};
#[doc(inline)]
pub use item::{parse_item, parse_item_with, Influence, Item, ModGroup, ModRef, Modifier, Rarity};
