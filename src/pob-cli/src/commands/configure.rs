//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up pob CLI defaults.

use crate::config::Config;
use anyhow::Result;
use pob::trade::{TradeStatus, LEAGUES};
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `league` - Default trade league
/// * `status` - Default seller status
/// * `db` - Saved builds database path
/// * `show` - If true, show current configuration
pub fn handle(
    league: Option<String>,
    status: Option<TradeStatus>,
    db: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        print!("{}", describe(&config));
        if let Ok(path) = Config::config_path() {
            println!("Config file: {}", path.display());
        }
        return Ok(());
    }

    if !apply(&mut config, league, status, db) {
        show_usage();
        return Ok(());
    }

    config.save()?;
    print!("{}", describe(&config));
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }
    Ok(())
}

/// Apply the given settings; returns false if there was nothing to set
fn apply(
    config: &mut Config,
    league: Option<String>,
    status: Option<TradeStatus>,
    db: Option<PathBuf>,
) -> bool {
    let changed = league.is_some() || status.is_some() || db.is_some();
    if let Some(league) = league {
        if !LEAGUES.contains(&league.as_str()) {
            tracing::warn!(league = league.as_str(), "league is not in the known list");
        }
        config.league = Some(league);
    }
    if status.is_some() {
        config.trade_status = status;
    }
    if db.is_some() {
        config.db_path = db;
    }
    changed
}

/// Current settings, one per line
fn describe(config: &Config) -> String {
    let db = config
        .db_path()
        .map_or_else(|_| "(unavailable)".to_string(), |p| p.display().to_string());
    format!(
        "League: {}\nTrade status: {}\nBuilds database: {}\n",
        config.league(),
        config.trade_status(),
        db
    )
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: pob configure --league LEAGUE --status online|onlineleague|any");
    println!("   or: pob configure --db PATH");
    println!("   or: pob configure --show");
    println!();
    println!("Known leagues: {}", LEAGUES.join(", "));
}
