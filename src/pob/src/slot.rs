//! Equipment slot names

/// Canonical display order for equipped items
pub const SLOT_ORDER: &[&str] = &[
    "Helmet",
    "Amulet",
    "Body Armour",
    "Weapon 1",
    "Weapon 2",
    "Gloves",
    "Ring 1",
    "Ring 2",
    "Belt",
    "Boots",
    "Flask 1",
    "Flask 2",
    "Flask 3",
    "Flask 4",
    "Flask 5",
    "Weapon 1 Swap",
    "Weapon 2 Swap",
];

/// Friendly names for slots whose internal name is unclear
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("Weapon 1", "Main Hand"),
    ("Weapon 2", "Off Hand"),
    ("Weapon 1 Swap", "Swap Main Hand"),
    ("Weapon 2 Swap", "Swap Off Hand"),
    ("Ring 1", "Left Ring"),
    ("Ring 2", "Right Ring"),
];

/// Sort key for a slot; unknown slots sort after all known ones
pub fn order(slot: &str) -> usize {
    SLOT_ORDER
        .iter()
        .position(|s| *s == slot)
        .unwrap_or(SLOT_ORDER.len())
}

/// Human-readable slot name
pub fn display_name(slot: Option<&str>) -> &str {
    let Some(slot) = slot else {
        return "Unknown Slot";
    };
    DISPLAY_NAMES
        .iter()
        .find(|(name, _)| *name == slot)
        .map_or(slot, |&(_, display)| display)
}
