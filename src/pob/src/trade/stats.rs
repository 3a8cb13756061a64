//! Modifier text -> trade stat id
//!
//! A small keyword table covering the stats people search for most. It is
//! not a stat catalog: anything it does not recognize is simply left out of
//! the query.

/// One keyword rule. A lowercased modifier matches when it contains every
/// `all` keyword, at least one `any` keyword (if any are given), and none of
/// the `none` keywords.
#[derive(Debug, Clone, Copy)]
pub struct StatRule {
    pub id: &'static str,
    pub all: &'static [&'static str],
    pub any: &'static [&'static str],
    pub none: &'static [&'static str],
}

impl StatRule {
    const fn any(id: &'static str, any: &'static [&'static str]) -> Self {
        Self {
            id,
            all: &[],
            any,
            none: &[],
        }
    }

    const fn all(id: &'static str, all: &'static [&'static str]) -> Self {
        Self {
            id,
            all,
            any: &[],
            none: &[],
        }
    }

    const fn except(self, none: &'static [&'static str]) -> Self {
        Self { none, ..self }
    }

    pub fn matches(&self, lower: &str) -> bool {
        self.all.iter().all(|k| lower.contains(k))
            && (self.any.is_empty() || self.any.iter().any(|k| lower.contains(k)))
            && !self.none.iter().any(|k| lower.contains(k))
    }
}

/// Rules in priority order; the first match wins
pub const STAT_RULES: &[StatRule] = &[
    // Life on kill / hit
    StatRule::any(
        "explicit.stat_3695891184",
        &["life per enemy killed", "life gained on kill"],
    ),
    StatRule::all("explicit.stat_3695891184", &["gain", "life", "kill"]),
    StatRule::any(
        "explicit.stat_3593843976",
        &[
            "life gained on hit",
            "life gain on hit",
            "life gained for each enemy hit",
        ],
    ),
    // Combined attributes
    StatRule::any("pseudo.pseudo_total_all_attributes", &["all attributes"]),
    StatRule::any("explicit.stat_538848803", &["strength and dexterity"]),
    StatRule::any("explicit.stat_1535626285", &["strength and intelligence"]),
    StatRule::any("explicit.stat_2300185227", &["dexterity and intelligence"]),
    // Life, mana, energy shield
    StatRule::any("pseudo.pseudo_total_life", &["maximum life"]),
    StatRule::all("pseudo.pseudo_total_life", &["to life"]).except(&["kill", "hit", "leech"]),
    StatRule::any("pseudo.pseudo_total_mana", &["maximum mana", "to mana"]),
    StatRule::any(
        "pseudo.pseudo_total_energy_shield",
        &["maximum energy shield", "to energy shield"],
    ),
    // Single attributes
    StatRule::all("pseudo.pseudo_total_strength", &["to strength"])
        .except(&["and dexterity", "and intelligence"]),
    StatRule::all("pseudo.pseudo_total_dexterity", &["to dexterity"])
        .except(&["and strength", "and intelligence"]),
    StatRule::all("pseudo.pseudo_total_intelligence", &["to intelligence"])
        .except(&["and strength", "and dexterity"]),
    // Resistances; two-element lines before single elements
    StatRule::any(
        "pseudo.pseudo_total_elemental_resistance",
        &["all elemental resistances"],
    ),
    StatRule::any("explicit.stat_3441501978", &["fire and cold resistance"]),
    StatRule::any("explicit.stat_2915988346", &["fire and lightning resistance"]),
    StatRule::any("explicit.stat_4277795662", &["cold and lightning resistance"]),
    StatRule::all("pseudo.pseudo_total_fire_resistance", &["fire resistance"])
        .except(&["and cold", "and lightning"]),
    StatRule::all("pseudo.pseudo_total_cold_resistance", &["cold resistance"])
        .except(&["and fire", "and lightning"]),
    StatRule::all(
        "pseudo.pseudo_total_lightning_resistance",
        &["lightning resistance"],
    )
    .except(&["and fire", "and cold"]),
    StatRule::any("pseudo.pseudo_total_chaos_resistance", &["chaos resistance"]),
    // Added damage to attacks
    StatRule::all(
        "explicit.stat_3032590688",
        &["adds", "physical damage", "to attacks"],
    ),
    StatRule::all("explicit.stat_1573130764", &["adds", "fire damage", "to attacks"]),
    StatRule::all("explicit.stat_4067062424", &["adds", "cold damage", "to attacks"]),
    StatRule::all(
        "explicit.stat_1754445556",
        &["adds", "lightning damage", "to attacks"],
    ),
    StatRule::all("explicit.stat_674553446", &["adds", "chaos damage", "to attacks"]),
    // Added damage to spells
    StatRule::all("explicit.stat_2231156303", &["adds", "fire damage", "to spells"]),
    StatRule::all("explicit.stat_2469416729", &["adds", "cold damage", "to spells"]),
    StatRule::all(
        "explicit.stat_2831165374",
        &["adds", "lightning damage", "to spells"],
    ),
    StatRule::all("explicit.stat_1011413412", &["adds", "chaos damage", "to spells"]),
    // Added damage, generic
    StatRule::all(
        "pseudo.pseudo_adds_physical_damage",
        &["adds", "physical damage"],
    ),
    StatRule::all("pseudo.pseudo_adds_fire_damage", &["adds", "fire damage"]),
    StatRule::all("pseudo.pseudo_adds_cold_damage", &["adds", "cold damage"]),
    StatRule::all(
        "pseudo.pseudo_adds_lightning_damage",
        &["adds", "lightning damage"],
    ),
    StatRule::all("pseudo.pseudo_adds_chaos_damage", &["adds", "chaos damage"]),
    // Critical strikes
    StatRule::any(
        "pseudo.pseudo_critical_strike_chance",
        &["critical strike chance"],
    ),
    StatRule::any(
        "pseudo.pseudo_critical_strike_multiplier",
        &["critical strike multiplier"],
    ),
    // Speed
    StatRule::any("pseudo.pseudo_increased_attack_speed", &["attack speed"]),
    StatRule::any("pseudo.pseudo_increased_cast_speed", &["cast speed"]),
    StatRule::any("pseudo.pseudo_increased_movement_speed", &["movement speed"]),
    // Misc
    StatRule::any(
        "pseudo.pseudo_total_accuracy_rating",
        &["accuracy rating", "to accuracy"],
    ),
    StatRule::any("pseudo.pseudo_increased_mana_regen", &["mana regeneration"]),
];

/// Trade stat id for a modifier's text, if the table knows it
pub fn identify_stat(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    STAT_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.id)
}

/// Whether a modifier can become a stat filter
pub fn is_searchable(text: &str) -> bool {
    identify_stat(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_and_defences() {
        assert_eq!(
            identify_stat("+80 to maximum Life"),
            Some("pseudo.pseudo_total_life")
        );
        assert_eq!(
            identify_stat("+93 to maximum Energy Shield"),
            Some("pseudo.pseudo_total_energy_shield")
        );
        assert_eq!(
            identify_stat("+45 to maximum Mana"),
            Some("pseudo.pseudo_total_mana")
        );
    }

    #[test]
    fn test_life_on_kill_before_life() {
        assert_eq!(
            identify_stat("Gain 10 Life per Enemy Killed"),
            Some("explicit.stat_3695891184")
        );
        assert_eq!(
            identify_stat("+5 Life gained for each Enemy hit by your Attacks"),
            Some("explicit.stat_3593843976")
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            identify_stat("+41 to Strength"),
            Some("pseudo.pseudo_total_strength")
        );
        assert_eq!(
            identify_stat("+20 to Strength and Intelligence"),
            Some("explicit.stat_1535626285")
        );
        assert_eq!(
            identify_stat("+15 to all Attributes"),
            Some("pseudo.pseudo_total_all_attributes")
        );
    }

    #[test]
    fn test_resistances() {
        assert_eq!(
            identify_stat("+12% to Fire Resistance"),
            Some("pseudo.pseudo_total_fire_resistance")
        );
        assert_eq!(
            identify_stat("+16% to Fire and Cold Resistances"),
            Some("explicit.stat_3441501978")
        );
        assert_eq!(
            identify_stat("+13% to Chaos Resistance"),
            Some("pseudo.pseudo_total_chaos_resistance")
        );
        assert_eq!(
            identify_stat("+10% to all Elemental Resistances"),
            Some("pseudo.pseudo_total_elemental_resistance")
        );
    }

    #[test]
    fn test_added_damage() {
        assert_eq!(
            identify_stat("Adds 5 to 10 Fire Damage to Attacks"),
            Some("explicit.stat_1573130764")
        );
        assert_eq!(
            identify_stat("Adds 3 to 50 Lightning Damage to Spells"),
            Some("explicit.stat_2831165374")
        );
        assert_eq!(
            identify_stat("Adds 1 to 2 Physical Damage"),
            Some("pseudo.pseudo_adds_physical_damage")
        );
    }

    #[test]
    fn test_unknown_mods() {
        assert_eq!(identify_stat("Minions deal 20% increased Damage"), None);
        assert_eq!(identify_stat("+1 to Level of all Minion Skill Gems"), None);
        assert!(!is_searchable(""));
        assert!(is_searchable("30% increased Movement Speed"));
    }
}
