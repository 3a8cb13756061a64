//! Item text parser
//!
//! Item blocks are loosely structured plain text:
//!
//! ```text
//! Rarity: RARE
//! Doom Loop                      <- name
//! Hubris Circlet                 <- base type (optional)
//! Unique ID: ...                 <- properties / metadata
//! Item Level: 86
//! Implicits: 1
//! {crafted}+10 to Strength       <- implicit section (N lines)
//! +80 to maximum Life            <- explicit section (everything else)
//! Corrupted
//! ```
//!
//! The parser walks the trimmed, non-empty lines once with a small state
//! machine: header -> properties -> implicits -> explicits. It never fails
//! on an odd line; lines it cannot place are reported to the sink.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Influence, Item, ModGroup, Modifier, Rarity};
use crate::classify::{
    classify_line, decode_entities, is_modifier_line, leading_tags, starts_with_tag, LineClass,
    CORRUPTED_MARKER, WEAPON_CLASS_PREFIXES,
};
use crate::diagnostics::{DiagnosticSink, NoopSink, ParseEvent};

static RARITY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^rarity ?:(.*)$").unwrap());
static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(LevelReq|Item ?Level|Quality|Sockets|Implicits)\s*:(.*)$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Properties,
    Implicits,
    Explicits,
}

/// Typed property lines that fill item fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    LevelRequirement,
    ItemLevel,
    Quality,
    Sockets,
    Implicits,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        let label = label.replace(' ', "").to_ascii_lowercase();
        match label.as_str() {
            "levelreq" => Some(Self::LevelRequirement),
            "itemlevel" => Some(Self::ItemLevel),
            "quality" => Some(Self::Quality),
            "sockets" => Some(Self::Sockets),
            "implicits" => Some(Self::Implicits),
            _ => None,
        }
    }
}

/// Parse one item block
///
/// Returns `None` when the block has fewer than two non-empty lines, or no
/// line that could serve as a name.
pub fn parse_item(text: &str, id: u32) -> Option<Item> {
    parse_item_with(text, id, &mut NoopSink)
}

/// Parse one item block, reporting every decision to `sink`
pub fn parse_item_with<S: DiagnosticSink + ?Sized>(
    text: &str,
    id: u32,
    sink: &mut S,
) -> Option<Item> {
    let decoded = decode_entities(text.trim());
    let lines: Vec<&str> = decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return None;
    }

    let mut parser = ItemParser::new(id, sink);
    for (index, line) in lines.iter().enumerate() {
        parser.feed(index, line);
    }
    parser.finish(decoded)
}

struct ItemParser<'s, S: ?Sized> {
    item: Item,
    section: Section,
    rarity_found: bool,
    name_index: usize,
    base_type: Option<String>,
    pending_implicits: u32,
    sink: &'s mut S,
}

impl<'s, S: DiagnosticSink + ?Sized> ItemParser<'s, S> {
    fn new(id: u32, sink: &'s mut S) -> Self {
        Self {
            item: Item {
                id,
                ..Item::default()
            },
            section: Section::Header,
            rarity_found: false,
            name_index: 0,
            base_type: None,
            pending_implicits: 0,
            sink,
        }
    }

    fn emit(&mut self, event: ParseEvent) {
        self.sink.record(self.item.id, event);
    }

    fn feed(&mut self, index: usize, line: &str) {
        let section = self.section;
        match section {
            Section::Header => self.header(index, line),
            _ if self.intercept(line) => {}
            Section::Properties => self.property(index, line),
            Section::Implicits => self.implicit(line),
            Section::Explicits => self.explicit(line),
        }
    }

    /// Rarity declarations, then the name line
    fn header(&mut self, index: usize, line: &str) {
        if let Some(caps) = RARITY_LINE.captures(line) {
            let declared = caps.get(1).map_or("", |m| m.as_str()).trim();
            match Rarity::from_name(declared) {
                Some(rarity) if !self.rarity_found => {
                    self.item.rarity = rarity;
                    self.rarity_found = true;
                    self.emit(ParseEvent::Rarity(rarity));
                }
                Some(_) => self.emit(ParseEvent::Skipped(line.to_string())),
                None => self.emit(ParseEvent::UnknownRarity(declared.to_string())),
            }
            return;
        }

        self.item.name = line.to_string();
        self.name_index = index;
        self.section = Section::Properties;
        self.emit(ParseEvent::Name(line.to_string()));
    }

    /// Influence and corruption markers, valid anywhere after the name
    fn intercept(&mut self, line: &str) -> bool {
        if let Some(influence) = Influence::from_line(line) {
            self.item.influences.insert(influence);
            self.emit(ParseEvent::Influence(influence));
            return true;
        }
        if line == CORRUPTED_MARKER {
            self.item.corrupted = true;
            self.emit(ParseEvent::Corrupted);
            return true;
        }
        false
    }

    fn property(&mut self, index: usize, line: &str) {
        if self.base_type.is_none() && index == self.name_index + 1 && is_base_type(line) {
            self.base_type = Some(line.to_string());
            self.emit(ParseEvent::BaseType(line.to_string()));
            return;
        }

        if self.field(line) {
            return;
        }

        match classify_line(line) {
            LineClass::Property | LineClass::Metadata => {
                self.emit(ParseEvent::Skipped(line.to_string()));
            }
            LineClass::Modifier => {
                // No "Implicits:" line was seen; mods start here
                self.section = Section::Explicits;
                self.explicit(line);
            }
            LineClass::Other => {
                self.item.unrecognized.push(line.to_string());
                self.emit(ParseEvent::Dropped(line.to_string()));
            }
        }
    }

    /// Fill typed fields from `Label: value` lines. Returns true if consumed.
    fn field(&mut self, line: &str) -> bool {
        let Some(caps) = FIELD_LINE.captures(line) else {
            return false;
        };
        let Some(field) = caps.get(1).and_then(|m| Field::from_label(m.as_str())) else {
            return false;
        };
        let value = caps.get(2).map_or("", |m| m.as_str()).trim();

        match field {
            Field::LevelRequirement => self.item.level_requirement = leading_number(value),
            Field::ItemLevel => self.item.item_level = leading_number(value),
            Field::Quality => self.item.quality = leading_number(value),
            Field::Sockets => {
                self.item.sockets = (!value.is_empty()).then(|| value.to_string());
            }
            Field::Implicits => {
                let count = leading_number(value).unwrap_or(0);
                self.pending_implicits = count;
                self.section = if count > 0 {
                    Section::Implicits
                } else {
                    Section::Explicits
                };
                self.emit(ParseEvent::ImplicitCount(count));
                return true;
            }
        }

        self.emit(ParseEvent::Skipped(line.to_string()));
        true
    }

    fn implicit(&mut self, line: &str) {
        self.push(route(line, ModGroup::Implicit), line);
        self.pending_implicits = self.pending_implicits.saturating_sub(1);
        if self.pending_implicits == 0 {
            self.section = Section::Explicits;
        }
    }

    fn explicit(&mut self, line: &str) {
        self.push(route(line, ModGroup::Explicit), line);
    }

    fn push(&mut self, group: ModGroup, line: &str) {
        let modifier = Modifier::from_line(line);
        if modifier.original.is_empty() {
            self.emit(ParseEvent::Skipped(line.to_string()));
            return;
        }
        self.emit(ParseEvent::Modifier {
            group,
            text: modifier.original.clone(),
        });
        self.item.mods_mut(group).push(modifier);
    }

    fn finish(mut self, raw_text: String) -> Option<Item> {
        if self.item.name.is_empty() {
            return None;
        }
        self.item.base_type = self
            .base_type
            .take()
            .unwrap_or_else(|| self.item.name.clone());
        self.item.raw_text = raw_text;
        Some(self.item)
    }
}

/// Whether the line right after the name can be the item's base type
fn is_base_type(line: &str) -> bool {
    let colon_allowed =
        !line.contains(':') || WEAPON_CLASS_PREFIXES.iter().any(|p| line.starts_with(p));
    colon_allowed && !is_modifier_line(line) && !starts_with_tag(line)
}

/// Group named by the line's leading brace tags, or `default`
fn route(line: &str, default: ModGroup) -> ModGroup {
    leading_tags(line)
        .into_iter()
        .find_map(ModGroup::from_tag)
        .unwrap_or(default)
}

/// Digits at the start of a value ("20", "+20%", "86 (max)"), ignoring a leading `+`
fn leading_number(value: &str) -> Option<u32> {
    let digits: String = value
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Trace;

    fn texts(mods: &[Modifier]) -> Vec<&str> {
        mods.iter().map(|m| m.original.as_str()).collect()
    }

    #[test]
    fn test_unique_with_crafted_implicit() {
        let text = "Rarity: UNIQUE\nThe Example\nExample Base\nImplicits: 1\n{crafted}+10 to Strength\n20% increased Life\nCorrupted";
        let item = parse_item(text, 4).unwrap();

        assert_eq!(item.id, 4);
        assert_eq!(item.rarity, Rarity::Unique);
        assert_eq!(item.name, "The Example");
        assert_eq!(item.base_type, "Example Base");
        assert_eq!(texts(&item.crafted), ["+10 to Strength"]);
        assert_eq!(texts(&item.explicits), ["20% increased Life"]);
        assert!(item.implicits.is_empty());
        assert!(item.corrupted);
        assert_eq!(item.crafted[0].display, item.crafted[0].original);
    }

    #[test]
    fn test_zero_implicits_goes_to_explicits() {
        let text = "Rarity: RARE\nGale Coil\nLeather Belt\nImplicits: 0\n+25 to Strength\n+40 to maximum Life";
        let item = parse_item(text, 1).unwrap();
        assert!(item.implicits.is_empty());
        assert_eq!(texts(&item.explicits), ["+25 to Strength", "+40 to maximum Life"]);
    }

    #[test]
    fn test_implicit_count_consumed_exactly() {
        let text = "Rarity: RARE\nDoom Loop\nHubris Circlet\nImplicits: 2\n{enchant}Enemies you Hit have 5% reduced Armour\n+30 to maximum Energy Shield\n{fractured}+15% increased Critical Strike Chance\n+70 to maximum Life";
        let item = parse_item(text, 1).unwrap();
        assert_eq!(texts(&item.enchant), ["Enemies you Hit have 5% reduced Armour"]);
        assert_eq!(texts(&item.implicits), ["+30 to maximum Energy Shield"]);
        assert_eq!(texts(&item.fractured), ["+15% increased Critical Strike Chance"]);
        assert_eq!(texts(&item.explicits), ["+70 to maximum Life"]);
    }

    #[test]
    fn test_fractured_in_explicits_never_explicit() {
        let text = "Rarity: RARE\nX\nY\nImplicits: 0\n{fractured}+15% increased Critical Strike Chance";
        let item = parse_item(text, 1).unwrap();
        assert_eq!(texts(&item.fractured), ["+15% increased Critical Strike Chance"]);
        assert!(item.explicits.is_empty());
    }

    #[test]
    fn test_group_tag_after_other_tags() {
        let text = "Rarity: RARE\nX\nY\nImplicits: 0\n{tags:life}{crafted}{range:0.5}+40 to maximum Life\n{scourge}10% increased Damage";
        let item = parse_item(text, 1).unwrap();
        assert_eq!(texts(&item.crafted), ["+40 to maximum Life"]);
        assert_eq!(texts(&item.enchant), ["10% increased Damage"]);
    }

    #[test]
    fn test_entity_decoding_in_name() {
        let item = parse_item("Rarity: UNIQUE\nTyrael&apos;s Might\nSacrificial Garb", 1).unwrap();
        assert_eq!(item.name, "Tyrael's Might");
        assert_eq!(item.base_type, "Sacrificial Garb");
        assert!(item.raw_text.contains("Tyrael's Might"));
    }

    #[test]
    fn test_too_few_lines() {
        assert!(parse_item("", 1).is_none());
        assert!(parse_item("   \n\n  ", 1).is_none());
        assert!(parse_item("Rarity: RARE\n   \n", 1).is_none());
        assert!(parse_item("Rarity: RARE\nRarity: MAGIC", 1).is_none());
    }

    #[test]
    fn test_missing_rarity_uses_first_line_as_name() {
        let item = parse_item("Iron Ring\n+10 to Strength", 1).unwrap();
        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.name, "Iron Ring");
        assert_eq!(item.base_type, "Iron Ring");
        assert_eq!(texts(&item.explicits), ["+10 to Strength"]);
    }

    #[test]
    fn test_rarity_variants() {
        let item = parse_item("rarity : magic\nSomething\nUnique ID: abc", 1).unwrap();
        assert_eq!(item.rarity, Rarity::Magic);
        assert_eq!(item.name, "Something");

        let mut trace = Trace::new();
        let item = parse_item_with("Rarity: RELIC\nFoulborn Thing\nBase", 2, &mut trace).unwrap();
        assert_eq!(item.rarity, Rarity::Rare);
        assert_eq!(item.name, "Foulborn Thing");
        assert!(trace
            .for_item(2)
            .any(|e| *e == ParseEvent::UnknownRarity("RELIC".to_string())));
    }

    #[test]
    fn test_influences_intercepted() {
        let text = "Rarity: RARE\nX\nY\nShaper Item\nImplicits: 0\n+1 to Z\nWarlord Item\nCorrupted";
        let item = parse_item(text, 1).unwrap();
        assert!(item.is_influenced(Influence::Shaper));
        assert!(item.is_influenced(Influence::Warlord));
        assert!(!item.is_influenced(Influence::Elder));
        assert_eq!(item.influences.len(), 2);
        assert_eq!(texts(&item.explicits), ["+1 to Z"]);
        assert!(item.corrupted);
    }

    #[test]
    fn test_influence_does_not_consume_implicit_slot() {
        let text = "Rarity: RARE\nX\nY\nImplicits: 1\nElder Item\n+12% to Cold Resistance\n+5 to Dexterity";
        let item = parse_item(text, 1).unwrap();
        assert!(item.is_influenced(Influence::Elder));
        assert_eq!(texts(&item.implicits), ["+12% to Cold Resistance"]);
        assert_eq!(texts(&item.explicits), ["+5 to Dexterity"]);
    }

    #[test]
    fn test_influence_right_after_name_is_not_base() {
        let item = parse_item("Rarity: RARE\nX\nHunter Item\n+1 to Y", 1).unwrap();
        assert!(item.is_influenced(Influence::Hunter));
        assert_eq!(item.base_type, "X");
    }

    #[test]
    fn test_property_fields() {
        let text = "Rarity: RARE\nX\nVaal Regalia\nUnique ID: 9f8e\nItem Level: 86\nQuality: +20%\nSockets: B-B-B-B-B-B\nLevelReq: 68\nEnergy Shield: 400\nArmourBasePercentile: 0.5\nImplicits: 0\n+80 to maximum Life";
        let item = parse_item(text, 1).unwrap();
        assert_eq!(item.item_level, Some(86));
        assert_eq!(item.quality, Some(20));
        assert_eq!(item.sockets.as_deref(), Some("B-B-B-B-B-B"));
        assert_eq!(item.level_requirement, Some(68));
        assert_eq!(texts(&item.explicits), ["+80 to maximum Life"]);
        assert!(item.unrecognized.is_empty());
    }

    #[test]
    fn test_malformed_field_values() {
        let item = parse_item("Rarity: RARE\nX\nY\nItem Level: ??\nSockets:", 1).unwrap();
        assert_eq!(item.item_level, None);
        assert_eq!(item.sockets, None);
    }

    #[test]
    fn test_base_type_rejections() {
        // A modifier right after the name is a modifier, not a base
        let item = parse_item("Rarity: MAGIC\nSeething Ring\n+20 to maximum Life", 1).unwrap();
        assert_eq!(item.base_type, "Seething Ring");
        assert_eq!(texts(&item.explicits), ["+20 to maximum Life"]);

        // Colon lines are properties, not bases
        let item = parse_item("Rarity: RARE\nX\nArmour: 500", 1).unwrap();
        assert_eq!(item.base_type, "X");

        let item = parse_item("Rarity: RARE\nX\nTwo Handed Sword: Reaver", 1).unwrap();
        assert_eq!(item.base_type, "Two Handed Sword: Reaver");
    }

    #[test]
    fn test_base_type_only_directly_after_name() {
        let item = parse_item("Rarity: RARE\nX\nUnique ID: 1\nLooks Like A Base", 1).unwrap();
        assert_eq!(item.base_type, "X");
        assert_eq!(item.unrecognized, ["Looks Like A Base"]);
    }

    #[test]
    fn test_dropped_lines_reported() {
        let mut trace = Trace::new();
        let item = parse_item_with(
            "Rarity: UNIQUE\nX\nBase\nShaped Nothing\nImplicits: 0\nFree text modifier",
            7,
            &mut trace,
        )
        .unwrap();
        assert_eq!(item.unrecognized, ["Shaped Nothing"]);
        assert_eq!(trace.dropped(7), vec!["Shaped Nothing"]);
        // In the explicit section every line is kept
        assert_eq!(texts(&item.explicits), ["Free text modifier"]);
    }

    #[test]
    fn test_markup_removed_from_mods() {
        let text = "Rarity: RARE\nX\nY\nImplicits: 1\n{range:0.5}<ModRange id=\"1\"/>+10 to Strength\n{crafted}{range:1}Adds 1 to 2 Fire Damage";
        let item = parse_item(text, 1).unwrap();
        for (_, m) in item.all_mods() {
            assert!(!m.original.contains('{') && !m.original.contains('<'), "{:?}", m);
        }
        assert_eq!(texts(&item.implicits), ["+10 to Strength"]);
        assert_eq!(texts(&item.crafted), ["Adds 1 to 2 Fire Damage"]);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("86"), Some(86));
        assert_eq!(leading_number("+20%"), Some(20));
        assert_eq!(leading_number("12 (augmented)"), Some(12));
        assert_eq!(leading_number("x"), None);
        assert_eq!(leading_number(""), None);
    }
}
