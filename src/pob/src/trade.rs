//! Trade site search queries for parsed items
//!
//! Maps an [`Item`] to the JSON query the official trade site accepts and
//! to a search URL carrying that query.

pub mod stats;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::item::{Item, ModRef, Rarity};

pub const TRADE_SEARCH_URL: &str = "https://www.pathofexile.com/trade/search";

/// Leagues offered by default
pub const LEAGUES: &[&str] = &["Phrecia", "Hardcore Phrecia", "Standard", "Hardcore"];

pub const DEFAULT_LEAGUE: &str = "Standard";

/// Seller status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Online,
    OnlineLeague,
    Any,
}

impl TradeStatus {
    pub const ALL: [TradeStatus; 3] = [Self::Online, Self::OnlineLeague, Self::Any];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::OnlineLeague => "onlineleague",
            Self::Any => "any",
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown trade status: {} (online, onlineleague, any)", s))
    }
}

/// Modifiers picked for a stat search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModSelection(BTreeSet<ModRef>);

impl ModSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every modifier of `item` that maps to a known stat
    pub fn searchable(item: &Item) -> Self {
        item.all_mods()
            .filter(|(_, m)| stats::is_searchable(&m.original))
            .map(|(r, _)| r)
            .collect()
    }

    pub fn insert(&mut self, r: ModRef) -> bool {
        self.0.insert(r)
    }

    pub fn remove(&mut self, r: &ModRef) -> bool {
        self.0.remove(r)
    }

    pub fn contains(&self, r: &ModRef) -> bool {
        self.0.contains(r)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModRef> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ModRef> for ModSelection {
    fn from_iter<I: IntoIterator<Item = ModRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Knobs for [`build_query`]
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub status: TradeStatus,
    /// Search by slot category instead of base type, where the slot has one
    pub use_category: bool,
    pub mods: ModSelection,
}

/// `{ "option": value }`, the trade API's wrapper for filter values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opt<T> {
    pub option: T,
}

impl<T> Opt<T> {
    pub fn new(option: T) -> Self {
        Self { option }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuery {
    pub query: Query,
    pub sort: Sort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub status: Opt<TradeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_filters: Option<TypeFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc_filters: Option<MiscFilters>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFilters {
    pub filters: CategoryFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub category: Opt<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscFilters {
    pub filters: BTreeMap<String, Opt<bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub filters: Vec<StatFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFilter {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub price: String,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            price: "asc".to_string(),
        }
    }
}

/// Trade category for an equipment slot
pub fn slot_category(slot: &str) -> Option<&'static str> {
    match slot {
        "Amulet" => Some("accessory.amulet"),
        "Ring 1" | "Ring 2" => Some("accessory.ring"),
        "Belt" => Some("accessory.belt"),
        "Helmet" => Some("armour.helmet"),
        "Body Armour" => Some("armour.chest"),
        "Gloves" => Some("armour.gloves"),
        "Boots" => Some("armour.boots"),
        _ => None,
    }
}

/// Build the search query for one item
pub fn build_query(item: &Item, options: &QueryOptions) -> TradeQuery {
    let unique = item.rarity == Rarity::Unique;
    let mut query = Query {
        status: Opt::new(options.status),
        name: None,
        item_type: None,
        filters: Filters::default(),
        stats: Vec::new(),
    };

    let category = options
        .use_category
        .then_some(item.slot.as_deref())
        .flatten()
        .and_then(slot_category);

    if unique {
        query.name = Some(item.name.clone());
        if item.has_distinct_base() && !item.base_type.is_empty() {
            query.item_type = Some(item.base_type.clone());
        }
    } else if let Some(category) = category {
        query.filters.type_filters = Some(TypeFilters {
            filters: CategoryFilter {
                category: Opt::new(category.to_string()),
            },
        });
    } else if !item.base_type.is_empty() {
        query.item_type = Some(item.base_type.clone());
    }

    let mut misc = MiscFilters::default();
    for influence in &item.influences {
        let key = format!("{}_item", influence.name().to_ascii_lowercase());
        misc.filters.insert(key, Opt::new(true));
    }
    if unique && item.corrupted {
        misc.filters.insert("corrupted".to_string(), Opt::new(true));
    }
    if !misc.filters.is_empty() {
        query.filters.misc_filters = Some(misc);
    }

    if !unique {
        let filters: Vec<StatFilter> = options
            .mods
            .iter()
            .filter_map(|r| item.modifier(*r))
            .filter_map(|m| stats::identify_stat(&m.original))
            .map(|id| StatFilter { id: id.to_string() })
            .collect();
        if !filters.is_empty() {
            query.stats.push(StatGroup {
                kind: "and".to_string(),
                filters,
            });
        }
    }

    tracing::debug!(
        item_id = item.id,
        stats = query.stats.first().map_or(0, |g| g.filters.len()),
        "built trade query"
    );

    TradeQuery {
        query,
        sort: Sort::default(),
    }
}

fn league_url(league: &str) -> String {
    format!("{}/{}", TRADE_SEARCH_URL, urlencoding::encode(league))
}

/// Search URL that carries the full query
pub fn search_url(query: &TradeQuery, league: &str) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(query)?;
    Ok(format!(
        "{}?q={}",
        league_url(league),
        urlencoding::encode(&json)
    ))
}

/// Search URL by name (uniques) or base type only
pub fn simple_search_url(item: &Item, league: &str) -> String {
    let (key, value) = if item.rarity == Rarity::Unique {
        ("name", &item.name)
    } else {
        ("type", &item.base_type)
    };
    format!(
        "{}?{}={}",
        league_url(league),
        key,
        urlencoding::encode(value)
    )
}
