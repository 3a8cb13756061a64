//! Line classification and text cleanup for item blocks
//!
//! Item text has no formal grammar, so lines are told apart by fixed pattern
//! tables. The tables are plain data: extend them here without touching the
//! parser's control flow, and bump [`PATTERN_TABLE_VERSION`] when behavior
//! changes.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet, RegexSetBuilder};

/// Revision of the property/metadata/keyword tables below
pub const PATTERN_TABLE_VERSION: u32 = 1;

/// Item property lines (damage, defences, requirements). Never modifiers.
pub const PROPERTY_PATTERNS: &[&str] = &[
    r"^(Physical|Fire|Cold|Lightning|Chaos) Damage:",
    r"^Critical Strike Chance:",
    r"^Attacks per Second:",
    r"^Weapon Range:",
    r"^Armour:",
    r"^Evasion( Rating)?:",
    r"^Energy Shield:",
    r"^Ward:",
    r"^Block( Chance)?:",
    r"^Chance to Block:",
    r"^Level:",
    r"^Requires Level",
    r"^Requirements:",
    r"^Str:",
    r"^Dex:",
    r"^Int:",
    r"^Limited to:",
    r"^Radius:",
];

/// Internal bookkeeping lines written by Path of Building
pub const METADATA_PATTERNS: &[&str] = &[
    r"^Unique ?ID:",
    r"^(Armour|Evasion|EnergyShield|Ward)BasePercentile:",
    r"^(PhysicalDamage|ElementalDamage|ChaosDamage|CritChance|AttackSpeed)BasePercentile:",
    r"^BasePercentile:",
    r"^Variant:",
    r"^Selected Variant:",
    r"^Has Alt Variant:",
    r"^Has Variant:",
    r"^League:",
    r"^Source:",
    r"^Crafted:",
    r"^Prefix:",
    r"^Suffix:",
    r"^Catalyst:",
    r"^CatalystQuality:",
    r"^LevelReq:",
    r"^Item ?Level:",
    r"^Quality:",
    r"^Sockets:",
    r"^Implicits:",
    r"^Rarity ?:",
    r"^[A-Za-z]+Percentile:",
];

/// Words that make an otherwise unremarkable line look like a modifier
pub const MODIFIER_KEYWORDS: &[&str] = &[
    "increased", "reduced", "more", "less", "added", "to ", "with ",
];

/// Weapon class prefixes that may legitimately contain a colon on a base type line
pub const WEAPON_CLASS_PREFIXES: &[&str] = &["Two Handed", "One Handed"];

/// The six influence marker lines
pub const INFLUENCE_MARKERS: &[&str] = &[
    "Shaper Item",
    "Elder Item",
    "Crusader Item",
    "Hunter Item",
    "Redeemer Item",
    "Warlord Item",
];

/// The corruption marker line
pub const CORRUPTED_MARKER: &str = "Corrupted";

fn build_set(patterns: &[&str]) -> RegexSet {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .expect("static pattern table must compile")
}

static PROPERTY_SET: Lazy<RegexSet> = Lazy::new(|| build_set(PROPERTY_PATTERNS));
static METADATA_SET: Lazy<RegexSet> = Lazy::new(|| build_set(METADATA_PATTERNS));

static LEADING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{[^}]+\}").unwrap());
static BRACE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());
static ANGLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// What a line inside an item block looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Item property (damage, defences, requirements)
    Property,
    /// Path of Building bookkeeping
    Metadata,
    /// Looks like a stat modifier
    Modifier,
    /// None of the above
    Other,
}

/// Classify a trimmed line. Properties win over metadata, which wins over modifiers.
pub fn classify_line(line: &str) -> LineClass {
    if is_property_line(line) {
        LineClass::Property
    } else if is_metadata_line(line) {
        LineClass::Metadata
    } else if looks_like_modifier(line) {
        LineClass::Modifier
    } else {
        LineClass::Other
    }
}

/// Index of the first property pattern matching `line`
pub fn property_pattern(line: &str) -> Option<usize> {
    PROPERTY_SET.matches(line).iter().next()
}

/// Index of the first metadata pattern matching `line`
pub fn metadata_pattern(line: &str) -> Option<usize> {
    METADATA_SET.matches(line).iter().next()
}

pub fn is_property_line(line: &str) -> bool {
    PROPERTY_SET.is_match(line)
}

pub fn is_metadata_line(line: &str) -> bool {
    METADATA_SET.is_match(line)
}

/// Permissive modifier heuristic
///
/// Biased toward "yes": a dropped modifier costs more downstream than a
/// stray property line in a modifier list.
pub fn is_modifier_line(line: &str) -> bool {
    !is_property_line(line) && !is_metadata_line(line) && looks_like_modifier(line)
}

fn looks_like_modifier(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit() || c == '%')
        || line.starts_with('+')
        || line.starts_with('-')
        || line.starts_with('{')
        || MODIFIER_KEYWORDS.iter().any(|kw| line.contains(kw))
}

/// Whether `line` starts with a brace-delimited tag like `{crafted}`
pub fn starts_with_tag(line: &str) -> bool {
    LEADING_TAG.is_match(line)
}

/// Names of the brace tags at the start of a line, in order
///
/// `{tags:life}{crafted}{range:0.5}+40 to maximum Life` yields
/// `["tags:life", "crafted", "range:0.5"]`.
pub fn leading_tags(line: &str) -> Vec<&str> {
    let mut tags = Vec::new();
    let mut rest = line;
    while let Some(m) = LEADING_TAG.find(rest) {
        tags.push(&rest[1..m.end() - 1]);
        rest = &rest[m.end()..];
    }
    tags
}

/// Strip one leading tag, all inline brace tags and angle-bracket markup, then trim
pub fn clean_modifier(line: &str) -> String {
    let without_leading = LEADING_TAG.replace(line, "");
    strip_tags(&without_leading).trim().to_string()
}

/// Remove every brace tag and angle-bracket tag
pub fn strip_tags(text: &str) -> String {
    let no_braces = BRACE_TAG.replace_all(text, "");
    ANGLE_TAG.replace_all(&no_braces, "").into_owned()
}

/// Named entities understood by [`decode_entities`]
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("apos", '\''),
    ("quot", '"'),
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
];

/// Decode XML character entities in a single pass
///
/// Handles the five named entities plus decimal (`&#39;`) and hex (`&#x27;`)
/// references. Unknown or malformed entities are left as-is.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';').and_then(|semi| Some((semi, resolve_entity(&tail[1..semi])?))) {
            Some((semi, ch)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|&(_, ch)| ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lines() {
        for line in [
            "Physical Damage: 10-20",
            "critical strike chance: 5.00%",
            "Attacks per Second: 1.50",
            "Evasion Rating: 300",
            "Evasion: 300",
            "Energy Shield: 80",
            "Chance to Block: 24%",
            "Requires Level 68, 120 Str",
            "Limited to: 1",
            "Radius: Large",
        ] {
            assert!(is_property_line(line), "{line}");
            assert_eq!(classify_line(line), LineClass::Property);
            assert!(!is_modifier_line(line), "{line}");
        }
    }

    #[test]
    fn test_metadata_lines() {
        for line in [
            "Unique ID: 0123abcd",
            "UniqueID: 0123abcd",
            "ArmourBasePercentile: 0.5",
            "SomethingNewPercentile: 1",
            "Selected Variant: 2",
            "Item Level: 86",
            "ItemLevel: 86",
            "LevelReq: 60",
            "Rarity : RARE",
            "Catalyst: Abrasive",
            "Prefix: {range:0.5}IncreasedLife6",
        ] {
            assert!(is_metadata_line(line), "{line}");
            assert_eq!(classify_line(line), LineClass::Metadata);
            assert!(!is_modifier_line(line), "{line}");
        }
    }

    #[test]
    fn test_modifier_heuristic() {
        assert!(is_modifier_line("+45 to maximum Life"));
        assert!(is_modifier_line("-10% to Chaos Resistance"));
        assert!(is_modifier_line("Cannot be Frozen with Ice"));
        assert!(is_modifier_line("{crafted}Hits can't be Evaded"));
        assert!(is_modifier_line("Adds 5 to 10 Fire Damage"));
        assert!(is_modifier_line("Gain Onslaught for 4 seconds on Kill"));
        assert!(is_modifier_line("Minions deal more Damage"));
        assert!(!is_modifier_line("Sacrificial Garb"));
        assert!(!is_modifier_line("Hubris Circlet"));
        assert_eq!(classify_line("Hubris Circlet"), LineClass::Other);
    }

    #[test]
    fn test_pattern_indices() {
        assert_eq!(property_pattern("Armour: 500"), Some(4));
        assert_eq!(property_pattern("Hubris Circlet"), None);
        assert_eq!(metadata_pattern("Variant: Pre 3.19"), Some(4));
    }

    #[test]
    fn test_leading_tags() {
        assert_eq!(
            leading_tags("{tags:life}{crafted}{range:0.5}+40 to maximum Life"),
            vec!["tags:life", "crafted", "range:0.5"]
        );
        assert!(leading_tags("+40 to {maximum} Life").is_empty());
        assert!(starts_with_tag("{fractured}+1 to Level"));
        assert!(!starts_with_tag("+1 to Level"));
    }

    #[test]
    fn test_clean_modifier() {
        assert_eq!(clean_modifier("{crafted}+10 to Strength"), "+10 to Strength");
        assert_eq!(
            clean_modifier("{tags:attack}{range:0.5}Adds 1 to 2 Physical Damage"),
            "Adds 1 to 2 Physical Damage"
        );
        assert_eq!(
            clean_modifier("  <ModRange range=\"0.5\" id=\"1\"/>+20% increased Life {x} "),
            "+20% increased Life"
        );
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a{b}c<d e=\"f\">g"), "acg");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Tyrael&apos;s Might"), "Tyrael's Might");
        assert_eq!(
            decode_entities("&quot;a&quot; &lt;b&gt; &amp; c"),
            "\"a\" <b> & c"
        );
        assert_eq!(decode_entities("it&#39;s &#x41;"), "it's A");
    }

    #[test]
    fn test_decode_entities_single_pass() {
        // "&amp;lt;" is a literal "&lt;", not "<"
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_entities_leaves_unknown() {
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(decode_entities("&bogus; &#xZZ; &"), "&bogus; &#xZZ; &");
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
    }
}
