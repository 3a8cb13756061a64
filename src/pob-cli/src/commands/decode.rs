//! Decode, validate, xml, and encode command handlers

use anyhow::{bail, Context, Result};
use pob::code::{self, DecodeErrorKind};
use pob::{Build, ImportError, Item, Trace};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::cli::{CodeInput, OutputFormat};
use crate::commands::input::{read_code, read_text};

/// Handle `pob decode`
pub fn decode(input: &CodeInput, format: OutputFormat, trace: bool) -> Result<()> {
    let code = read_code(input)?;

    let build = if trace {
        let mut sink = Trace::new();
        let result = pob::import_with(&code, &mut sink);
        print_trace(&sink);
        result?
    } else {
        pob::import(&code)?
    };

    print!("{}", format_build(&build, format)?);
    Ok(())
}

/// Render a build in the requested format
pub fn format_build(build: &Build, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_build(build)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(build).context("Failed to serialize build")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => serde_yaml::to_string(build).context("Failed to serialize build"),
    }
}

fn print_trace(trace: &Trace) {
    for (item_id, event) in &trace.events {
        eprintln!("[item {}] {:?}", item_id, event);
    }
}

/// Human-readable build summary with one card per item
pub fn render_build(build: &Build) -> String {
    let mut out = String::new();
    let meta = &build.metadata;

    let class = match (&meta.class_name, &meta.ascendancy_name) {
        (Some(class), Some(asc)) => format!("{} ({})", asc, class),
        (Some(class), None) => class.clone(),
        (None, Some(asc)) => asc.clone(),
        (None, None) => "Unknown class".to_string(),
    };
    let _ = write!(out, "{}", class);
    if let Some(level) = meta.level {
        let _ = write!(out, ", level {}", level);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{} items", build.items.len());

    for item in build.equipped() {
        let _ = writeln!(out);
        out.push_str(&render_item(item));
    }

    let others = build.unslotted();
    if !others.is_empty() {
        let _ = writeln!(out, "\nOther items");
        for item in others {
            let _ = writeln!(out);
            out.push_str(&render_item(item));
        }
    }
    out
}

/// One item card
pub fn render_item(item: &Item) -> String {
    let mut out = String::new();
    let slot = pob::slot::display_name(item.slot.as_deref());

    let _ = writeln!(out, "#{} {}: {} [{}]", item.id, slot, item.name, item.rarity);
    if item.has_distinct_base() {
        let _ = writeln!(out, "    {}", item.base_type);
    }

    let mut props = Vec::new();
    if let Some(ilvl) = item.item_level {
        props.push(format!("Item Level {}", ilvl));
    }
    if let Some(req) = item.level_requirement {
        props.push(format!("Requires Level {}", req));
    }
    if let Some(quality) = item.quality {
        props.push(format!("Quality {}%", quality));
    }
    if let Some(sockets) = &item.sockets {
        props.push(format!("Sockets {}", sockets));
    }
    if !props.is_empty() {
        let _ = writeln!(out, "    {}", props.join(" | "));
    }

    if !item.influences.is_empty() {
        let names: Vec<&str> = item.influences.iter().map(|i| i.name()).collect();
        let _ = writeln!(out, "    Influences: {}", names.join(", "));
    }

    for (id, m) in item.all_mods() {
        let _ = writeln!(out, "    {:<12} {}", id.to_string(), m.display);
    }

    if item.corrupted {
        let _ = writeln!(out, "    Corrupted");
    }
    out
}

/// Handle `pob validate`
pub fn validate(input: &CodeInput) -> Result<()> {
    let code = read_code(input)?;

    code::validate(&code).context("Format check failed")?;
    println!("format: ok ({} characters)", code::clean(&code).len());

    let decoded = match code::decode(&code) {
        Ok(decoded) => decoded,
        Err(e) => {
            let stage = match e.kind() {
                DecodeErrorKind::Encoding => "base64",
                DecodeErrorKind::Decompression => "decompress",
                DecodeErrorKind::Document => "document",
            };
            bail!("{} stage failed: {}", stage, e);
        }
    };
    println!(
        "decode: ok ({}, {} bytes)",
        decoded.compression,
        decoded.xml.len()
    );

    let build = pob::parse_document(&decoded.xml);
    if build.items.is_empty() {
        return Err(ImportError::NoItems.into());
    }
    println!("items:  ok ({} parsed)", build.items.len());
    Ok(())
}

/// Handle `pob xml`
pub fn xml(input: &CodeInput, output: Option<&Path>) -> Result<()> {
    let code = read_code(input)?;
    let xml = code::decode_xml(&code)?;

    match output {
        Some(path) => {
            fs::write(path, &xml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} bytes to {}", xml.len(), path.display());
        }
        None => println!("{}", xml),
    }
    Ok(())
}

/// Handle `pob encode`
pub fn encode(input: &Path) -> Result<()> {
    let xml = read_text(input)?;
    if pob::extract(&xml).metadata == pob::BuildMetadata::default() {
        tracing::warn!("document has no <Build> metadata");
    }
    let code = code::encode(&xml).context("Failed to compress document")?;
    println!("{}", code);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pob::Influence;

    const XML: &str = r#"<PathOfBuilding><Build level="90" className="Duelist" ascendClassName="Slayer"/><Items>
<Item id="1">
Rarity: RARE
Hate Grip
Titan Gauntlets
Item Level: 84
Quality: 20
Elder Item
Implicits: 0
+70 to maximum Life
Corrupted
</Item>
<Item id="2">
Rarity: UNIQUE
Watcher's Eye
Prismatic Jewel
6% increased maximum Energy Shield
</Item>
<Slot name="Gloves" itemId="1"/>
</Items></PathOfBuilding>"#;

    #[test]
    fn test_render_build() {
        let build = pob::parse_document(XML);
        let text = render_build(&build);
        assert!(text.starts_with("Slayer (Duelist), level 90\n2 items\n"));
        assert!(text.contains("#1 Gloves: Hate Grip [Rare]"));
        assert!(text.contains("    Titan Gauntlets\n"));
        assert!(text.contains("Item Level 84 | Quality 20%"));
        assert!(text.contains("Influences: Elder"));
        assert!(text.contains("explicit:0   +70 to maximum Life"));
        assert!(text.contains("    Corrupted\n"));
        assert!(text.contains("Other items\n\n#2 Unknown Slot: Watcher's Eye [Unique]"));
    }

    #[test]
    fn test_render_item_without_base() {
        let item = pob::parse_item("Rarity: MAGIC\nSeething Ring\n+20 to maximum Life", 5).unwrap();
        let card = render_item(&item);
        assert_eq!(
            card,
            "#5 Unknown Slot: Seething Ring [Magic]\n    explicit:0   +20 to maximum Life\n"
        );
    }

    #[test]
    fn test_format_json_and_yaml() {
        let build = pob::parse_document(XML);
        let json = format_build(&build, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ascendancyName"], "Slayer");
        assert_eq!(value["items"][0]["slot"], "Gloves");

        let yaml = format_build(&build, OutputFormat::Yaml).unwrap();
        let back: Build = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, build);
        assert!(back.items[0].is_influenced(Influence::Elder));
    }
}
