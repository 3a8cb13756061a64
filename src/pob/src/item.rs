//! Parsed item records
//!
//! An [`Item`] is built once from the raw text of an `<Item>` block by
//! [`parse_item`] and is not modified afterwards, apart from the slot which
//! is attached from the document's slot assignments.

mod parser;

pub use parser::{parse_item, parse_item_with};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Item rarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Normal,
    Magic,
    #[default]
    Rare,
    Unique,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Self::Normal, Self::Magic, Self::Rare, Self::Unique];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Magic => "Magic",
            Self::Rare => "Rare",
            Self::Unique => "Unique",
        }
    }

    /// Case-insensitive lookup ("UNIQUE", "unique", "Unique")
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// Magic and rare items are searched by their modifiers
    pub fn has_random_mods(&self) -> bool {
        matches!(self, Self::Magic | Self::Rare)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Influence an item was generated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Influence {
    Shaper,
    Elder,
    Crusader,
    Hunter,
    Redeemer,
    Warlord,
}

impl Influence {
    pub const ALL: [Influence; 6] = [
        Self::Shaper,
        Self::Elder,
        Self::Crusader,
        Self::Hunter,
        Self::Redeemer,
        Self::Warlord,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shaper => "Shaper",
            Self::Elder => "Elder",
            Self::Crusader => "Crusader",
            Self::Hunter => "Hunter",
            Self::Redeemer => "Redeemer",
            Self::Warlord => "Warlord",
        }
    }

    /// The line Path of Building writes for this influence, e.g. "Shaper Item"
    pub fn marker(&self) -> &'static str {
        crate::classify::INFLUENCE_MARKERS[*self as usize]
    }

    /// Influence whose marker appears anywhere in `line`
    pub fn from_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| line.contains(i.marker()))
    }
}

impl std::fmt::Display for Influence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which list a modifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModGroup {
    Implicit,
    Explicit,
    Crafted,
    Fractured,
    Enchant,
}

impl ModGroup {
    /// Display order
    pub const ALL: [ModGroup; 5] = [
        Self::Enchant,
        Self::Implicit,
        Self::Explicit,
        Self::Crafted,
        Self::Fractured,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Implicit => "implicit",
            Self::Explicit => "explicit",
            Self::Crafted => "crafted",
            Self::Fractured => "fractured",
            Self::Enchant => "enchant",
        }
    }

    /// Group named by a brace tag (`crafted`, `fractured`, `enchant`, `scourge`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "crafted" => Some(Self::Crafted),
            "fractured" => Some(Self::Fractured),
            "enchant" | "scourge" => Some(Self::Enchant),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ModGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown modifier group: {}", s))
    }
}

/// A modifier line with markup removed
///
/// `display` is what gets shown; `original` is what gets matched against
/// trade stats. They currently hold the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub display: String,
    pub original: String,
}

impl Modifier {
    /// Build from a raw line, stripping tags and markup
    pub fn from_line(line: &str) -> Self {
        let original = crate::classify::clean_modifier(line);
        Self {
            display: original.clone(),
            original,
        }
    }
}

/// Stable reference to one modifier of an item: its group and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModRef {
    pub group: ModGroup,
    pub index: usize,
}

impl std::fmt::Display for ModRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.index)
    }
}

impl std::str::FromStr for ModRef {
    type Err = String;

    /// Parse `group:index`, e.g. `explicit:2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, index) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected group:index, got {}", s))?;
        Ok(Self {
            group: group.trim().parse()?,
            index: index
                .trim()
                .parse()
                .map_err(|_| format!("Invalid modifier index: {}", index))?,
        })
    }
}

/// A single item from a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    pub rarity: Rarity,
    pub name: String,
    pub base_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_requirement: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<String>,
    pub implicits: Vec<Modifier>,
    pub explicits: Vec<Modifier>,
    pub crafted: Vec<Modifier>,
    pub fractured: Vec<Modifier>,
    pub enchant: Vec<Modifier>,
    pub corrupted: bool,
    pub influences: BTreeSet<Influence>,
    /// Lines in the properties section that matched nothing and were dropped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
    /// The block text after entity decoding
    pub raw_text: String,
}

impl Item {
    /// Modifiers of one group, in source order
    pub fn mods(&self, group: ModGroup) -> &[Modifier] {
        match group {
            ModGroup::Implicit => &self.implicits,
            ModGroup::Explicit => &self.explicits,
            ModGroup::Crafted => &self.crafted,
            ModGroup::Fractured => &self.fractured,
            ModGroup::Enchant => &self.enchant,
        }
    }

    pub(crate) fn mods_mut(&mut self, group: ModGroup) -> &mut Vec<Modifier> {
        match group {
            ModGroup::Implicit => &mut self.implicits,
            ModGroup::Explicit => &mut self.explicits,
            ModGroup::Crafted => &mut self.crafted,
            ModGroup::Fractured => &mut self.fractured,
            ModGroup::Enchant => &mut self.enchant,
        }
    }

    /// Every modifier with its stable reference, groups in display order
    pub fn all_mods(&self) -> impl Iterator<Item = (ModRef, &Modifier)> {
        ModGroup::ALL.into_iter().flat_map(move |group| {
            self.mods(group)
                .iter()
                .enumerate()
                .map(move |(index, m)| (ModRef { group, index }, m))
        })
    }

    /// Look up a modifier by reference
    pub fn modifier(&self, r: ModRef) -> Option<&Modifier> {
        self.mods(r.group).get(r.index)
    }

    pub fn mod_count(&self) -> usize {
        ModGroup::ALL.iter().map(|g| self.mods(*g).len()).sum()
    }

    pub fn is_influenced(&self, influence: Influence) -> bool {
        self.influences.contains(&influence)
    }

    /// Whether the base type is printed separately from the name
    pub fn has_distinct_base(&self) -> bool {
        self.base_type != self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_from_name() {
        assert_eq!(Rarity::from_name("UNIQUE"), Some(Rarity::Unique));
        assert_eq!(Rarity::from_name("magic"), Some(Rarity::Magic));
        assert_eq!(Rarity::from_name(" Normal "), Some(Rarity::Normal));
        assert_eq!(Rarity::from_name("Relic"), None);
        assert_eq!(Rarity::default(), Rarity::Rare);
    }

    #[test]
    fn test_influence_markers() {
        assert_eq!(Influence::Shaper.marker(), "Shaper Item");
        assert_eq!(Influence::Warlord.marker(), "Warlord Item");
        assert_eq!(Influence::from_line("Redeemer Item"), Some(Influence::Redeemer));
        assert_eq!(Influence::from_line("Hunter"), None);
    }

    #[test]
    fn test_group_from_tag() {
        assert_eq!(ModGroup::from_tag("crafted"), Some(ModGroup::Crafted));
        assert_eq!(ModGroup::from_tag("scourge"), Some(ModGroup::Enchant));
        assert_eq!(ModGroup::from_tag("range:0.5"), None);
    }

    #[test]
    fn test_mod_ref_parse() {
        let r: ModRef = "explicit:2".parse().unwrap();
        assert_eq!(
            r,
            ModRef {
                group: ModGroup::Explicit,
                index: 2
            }
        );
        assert_eq!(r.to_string(), "explicit:2");
        assert!("explicit".parse::<ModRef>().is_err());
        assert!("bogus:1".parse::<ModRef>().is_err());
        assert!("crafted:x".parse::<ModRef>().is_err());
    }

    #[test]
    fn test_all_mods_order() {
        let item = Item {
            implicits: vec![Modifier::from_line("+1 to A")],
            explicits: vec![Modifier::from_line("+2 to B"), Modifier::from_line("+3 to C")],
            enchant: vec![Modifier::from_line("{enchant}+4 to D")],
            ..Item::default()
        };
        let refs: Vec<String> = item.all_mods().map(|(r, _)| r.to_string()).collect();
        assert_eq!(refs, ["enchant:0", "implicit:0", "explicit:0", "explicit:1"]);
        assert_eq!(item.mod_count(), 4);
        assert_eq!(
            item.modifier("explicit:1".parse().unwrap()).map(|m| m.original.as_str()),
            Some("+3 to C")
        );
        assert_eq!(item.enchant[0].display, "+4 to D");
    }
}
