//! Saved build records

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Only the newest builds are kept
pub const MAX_SAVED_BUILDS: usize = 20;

/// A saved export code with the character info shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBuild {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendancy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Unix time in milliseconds
    pub saved_at: i64,
}

impl SavedBuild {
    /// "Deadeye 92", "Witch", or "" depending on what is known
    pub fn summary(&self) -> String {
        let class = self
            .ascendancy_name
            .as_deref()
            .or(self.class_name.as_deref())
            .unwrap_or_default();
        match self.level {
            Some(level) if !class.is_empty() => format!("{} {}", class, level),
            Some(level) => format!("Level {}", level),
            None => class.to_string(),
        }
    }
}

/// Current unix time in milliseconds
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
