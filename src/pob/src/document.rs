//! Build document extraction
//!
//! Pulls build metadata, slot assignments, and raw item blocks out of a
//! decoded document by scanning tag boundaries. This is deliberately not an
//! XML parser: it targets the one document shape Path of Building writes and
//! treats every missing section as empty rather than as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classify::decode_entities;

/// Item id -> slot name ("Helmet", "Ring 1", "Weapon 1 Swap", ...)
pub type SlotAssignment = BTreeMap<u32, String>;

static BUILD_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<Build\b[^>]*>").unwrap());
static ITEMS_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Items\b[^>]*>(.*?)</Items>").unwrap());
static SLOT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<Slot\b[^>]*>").unwrap());
static ITEM_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Item\b([^>]*)>(.*?)</Item>").unwrap());
static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][A-Za-z0-9_.:-]*)\s*=\s*"([^"]*)""#).unwrap());

/// Character info from the `<Build>` element
///
/// Fields the document does not declare stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascendancy_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// One `<Item id="..">` block, still as raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemBlock<'a> {
    pub id: u32,
    pub text: &'a str,
}

/// The parts of a build document the item pipeline cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document<'a> {
    pub metadata: BuildMetadata,
    /// Inner text of `<Items>`, empty when the section is missing
    pub items: &'a str,
    pub slots: SlotAssignment,
}

impl<'a> Document<'a> {
    /// Item blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = ItemBlock<'a>> + 'a {
        item_blocks(self.items)
    }

    /// Slot assigned to an item id, if any
    pub fn slot_of(&self, id: u32) -> Option<&str> {
        self.slots.get(&id).map(String::as_str)
    }
}

/// Extract metadata, the items section, and slot assignments from a document
pub fn extract(xml: &str) -> Document<'_> {
    let metadata = build_metadata(xml);

    let Some(section) = ITEMS_SECTION.captures(xml).and_then(|c| c.get(1)) else {
        tracing::debug!("document has no <Items> section");
        return Document {
            metadata,
            ..Document::default()
        };
    };

    let items = section.as_str();
    let slots = slot_assignments(items);
    Document {
        metadata,
        items,
        slots,
    }
}

/// Read className / ascendClassName / level from the `<Build>` opening tag
pub fn build_metadata(xml: &str) -> BuildMetadata {
    let Some(tag) = BUILD_TAG.find(xml) else {
        return BuildMetadata::default();
    };
    let attrs = attributes(tag.as_str());

    BuildMetadata {
        class_name: attrs.get("className").map(|v| decode_entities(v)),
        ascendancy_name: attrs.get("ascendClassName").map(|v| decode_entities(v)),
        level: attrs.get("level").and_then(|v| v.trim().parse().ok()),
    }
}

/// Collect `<Slot name=".." itemId=".."/>` declarations, in either attribute order
///
/// A later declaration for the same item id replaces an earlier one.
pub fn slot_assignments(items: &str) -> SlotAssignment {
    let mut slots = SlotAssignment::new();

    for tag in SLOT_TAG.find_iter(items) {
        let attrs = attributes(tag.as_str());
        let (Some(name), Some(id)) = (attrs.get("name"), attrs.get("itemId")) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if let Ok(id) = id.parse::<u32>() {
            slots.insert(id, decode_entities(name));
        }
    }

    slots
}

/// Iterate `<Item id="..">...</Item>` blocks; blocks without a numeric id are skipped
pub fn item_blocks(items: &str) -> impl Iterator<Item = ItemBlock<'_>> + '_ {
    ITEM_BLOCK.captures_iter(items).filter_map(|caps| {
        let open = caps.get(1)?.as_str();
        let id = attributes(open).get("id")?.parse().ok()?;
        Some(ItemBlock {
            id,
            text: caps.get(2)?.as_str(),
        })
    })
}

/// Attribute name -> raw value for a single tag
fn attributes(tag: &str) -> BTreeMap<&str, &str> {
    ATTRIBUTE
        .captures_iter(tag)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect()
}
