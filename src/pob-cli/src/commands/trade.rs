//! Trade command handler

use anyhow::{bail, Context, Result};
use pob::trade::{self, ModSelection, QueryOptions};
use pob::{Build, Item};

use crate::cli::TradeArgs;
use crate::commands::input::read_code;
use crate::config::Config;

/// Handle `pob trade`
pub fn handle(args: &TradeArgs) -> Result<()> {
    let config = Config::load()?;
    let code = read_code(&args.input)?;
    let build = pob::import(&code)?;

    let league = args.league.as_deref().unwrap_or_else(|| config.league());
    let output = trade_output(&build, args, &config, league)?;
    print!("{}", output);
    Ok(())
}

/// Everything `pob trade` prints, given a decoded build
pub fn trade_output(build: &Build, args: &TradeArgs, config: &Config, league: &str) -> Result<String> {
    let item = find_item(build, args.item)?;

    if args.simple {
        return Ok(format!("{}\n", trade::simple_search_url(item, league)));
    }

    let options = query_options(item, args, config)?;
    let query = trade::build_query(item, &options);
    let url = trade::search_url(&query, league).context("Failed to encode trade query")?;

    let mut out = String::new();
    if args.json {
        out.push_str(&serde_json::to_string_pretty(&query).context("Failed to serialize query")?);
        out.push('\n');
    }
    out.push_str(&url);
    out.push('\n');
    Ok(out)
}

fn find_item(build: &Build, id: u32) -> Result<&Item> {
    match build.item(id) {
        Some(item) => Ok(item),
        None => {
            let ids: Vec<String> = build.items.iter().map(|i| i.id.to_string()).collect();
            bail!("No item with id {} (items: {})", id, ids.join(", "))
        }
    }
}

fn query_options(item: &Item, args: &TradeArgs, config: &Config) -> Result<QueryOptions> {
    let mut mods = if args.searchable {
        ModSelection::searchable(item)
    } else {
        ModSelection::new()
    };

    for r in &args.mods {
        let Some(m) = item.modifier(*r) else {
            bail!("Item {} has no modifier {}", item.id, r);
        };
        if !trade::stats::is_searchable(&m.original) {
            tracing::warn!(modifier = %r, text = m.original.as_str(), "no trade stat for modifier, skipping");
        }
        mods.insert(*r);
    }

    Ok(QueryOptions {
        status: args.status.unwrap_or_else(|| config.trade_status()),
        use_category: args.category,
        mods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CodeInput;
    use pob::trade::TradeStatus;

    const XML: &str = r#"<PathOfBuilding><Build level="90" className="Duelist"/><Items>
<Item id="7">
Rarity: RARE
Storm Coil
Leather Belt
Implicits: 1
+30 to maximum Life
+40 to Strength
Minions deal 20% increased Damage
</Item>
<Slot name="Belt" itemId="7"/>
</Items></PathOfBuilding>"#;

    fn args(item: u32) -> TradeArgs {
        TradeArgs {
            input: CodeInput::default(),
            item,
            league: None,
            status: None,
            category: false,
            mods: Vec::new(),
            searchable: false,
            simple: false,
            json: false,
        }
    }

    #[test]
    fn test_unknown_item() {
        let build = pob::parse_document(XML);
        let err = trade_output(&build, &args(3), &Config::default(), "Standard").unwrap_err();
        assert!(err.to_string().contains("items: 7"));
    }

    #[test]
    fn test_simple_url() {
        let build = pob::parse_document(XML);
        let mut a = args(7);
        a.simple = true;
        let out = trade_output(&build, &a, &Config::default(), "Standard").unwrap();
        assert_eq!(
            out,
            "https://www.pathofexile.com/trade/search/Standard?type=Leather%20Belt\n"
        );
    }

    #[test]
    fn test_options_from_args_and_config() {
        let build = pob::parse_document(XML);
        let item = build.item(7).unwrap();
        let config = Config {
            trade_status: Some(TradeStatus::Any),
            ..Config::default()
        };

        let mut a = args(7);
        a.searchable = true;
        a.category = true;
        let options = query_options(item, &a, &config).unwrap();
        assert_eq!(options.status, TradeStatus::Any);
        assert!(options.use_category);
        assert_eq!(options.mods.len(), 2);

        a.status = Some(TradeStatus::Online);
        a.mods = vec!["explicit:9".parse().unwrap()];
        assert!(query_options(item, &a, &config).is_err());
    }

    #[test]
    fn test_json_output() {
        let build = pob::parse_document(XML);
        let mut a = args(7);
        a.json = true;
        a.category = true;
        a.mods = vec!["implicit:0".parse().unwrap()];
        let out = trade_output(&build, &a, &Config::default(), "Hardcore").unwrap();
        assert!(out.contains("\"accessory.belt\""));
        assert!(out.contains("\"pseudo.pseudo_total_life\""));
        assert!(out.lines().last().unwrap().starts_with("https://www.pathofexile.com/trade/search/Hardcore?q="));
    }
}
