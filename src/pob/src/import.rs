//! Export code -> build pipeline
//!
//! Ties the stages together: pre-validation, decoding, document extraction,
//! per-item parsing, and slot enrichment.

use serde::{Deserialize, Serialize};

use crate::code::{self, DecodeError, FormatError};
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::document::{self, BuildMetadata};
use crate::item::{parse_item_with, Item};
use crate::slot;

/// Errors that abort an import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid export code format: {0}. Paste a Path of Building export code.")]
    Format(#[from] FormatError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("No items found in the build. Re-export the build with equipped items.")]
    NoItems,
}

/// A decoded build: character info plus parsed items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    #[serde(flatten)]
    pub metadata: BuildMetadata,
    pub items: Vec<Item>,
}

impl Build {
    pub fn item(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Slotted items in canonical slot order
    pub fn equipped(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().filter(|i| i.slot.is_some()).collect();
        items.sort_by_key(|i| i.slot.as_deref().map_or(usize::MAX, slot::order));
        items
    }

    /// Items without a slot (socketed jewels, spare gear)
    pub fn unslotted(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.slot.is_none()).collect()
    }

    /// Suggested name when saving this build
    pub fn default_name(&self) -> &str {
        self.metadata
            .ascendancy_name
            .as_deref()
            .or(self.metadata.class_name.as_deref())
            .unwrap_or("My Build")
    }
}

/// Parse a decoded document into a build
pub fn parse_document(xml: &str) -> Build {
    parse_document_with(xml, &mut NoopSink)
}

/// Parse a decoded document, reporting item-level decisions to `sink`
///
/// Blocks that do not parse are left out of the result.
pub fn parse_document_with<S: DiagnosticSink + ?Sized>(xml: &str, sink: &mut S) -> Build {
    let doc = document::extract(xml);
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for block in doc.blocks() {
        match parse_item_with(block.text, block.id, sink) {
            Some(mut item) => {
                item.slot = doc.slot_of(item.id).map(str::to_string);
                items.push(item);
            }
            None => skipped += 1,
        }
    }

    tracing::debug!(
        items = items.len(),
        skipped,
        slots = doc.slots.len(),
        "parsed build document"
    );

    Build {
        metadata: doc.metadata,
        items,
    }
}

/// Validate, decode, and parse an export code
pub fn import(code: &str) -> Result<Build, ImportError> {
    import_with(code, &mut NoopSink)
}

/// [`import`] with a diagnostic sink
pub fn import_with<S: DiagnosticSink + ?Sized>(
    code: &str,
    sink: &mut S,
) -> Result<Build, ImportError> {
    code::validate(code)?;
    let decoded = code::decode(code)?;
    let build = parse_document_with(&decoded.xml, sink);

    if build.items.is_empty() {
        return Err(ImportError::NoItems);
    }
    Ok(build)
}
