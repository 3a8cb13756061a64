//! Saved builds command handlers

use anyhow::{bail, Context, Result};
use pob_builds::{BuildsRepository, SavedBuild, SqliteStore};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{BuildsCommand, CodeInput, OutputFormat};
use crate::commands::decode::render_build;
use crate::commands::input::read_code;
use crate::config::Config;

/// Dispatch a `pob builds` subcommand
pub fn handle(command: BuildsCommand) -> Result<()> {
    match command {
        BuildsCommand::Save { name, input, db } => {
            let store = open_store(db)?;
            save(&store, name.as_deref(), &input)
        }
        BuildsCommand::List { format, db } => {
            let store = open_store(db)?;
            print!("{}", list(&store, format)?);
            Ok(())
        }
        BuildsCommand::Show { id, decode, db } => {
            let store = open_store(db)?;
            print!("{}", show(&store, &id, decode)?);
            Ok(())
        }
        BuildsCommand::Delete { id, db } => {
            let store = open_store(db)?;
            if !store.delete_build(&id)? {
                bail!("Build not found: {}", id);
            }
            println!("Deleted {}", id);
            Ok(())
        }
    }
}

/// Open the store at `db`, or the configured location
fn open_store(db: Option<PathBuf>) -> Result<SqliteStore> {
    let path = match db {
        Some(path) => path,
        None => Config::load()?.db_path()?,
    };
    open_store_at(&path)
}

fn open_store_at(path: &Path) -> Result<SqliteStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = SqliteStore::open(path)
        .with_context(|| format!("Failed to open builds database {}", path.display()))?;
    store.init()?;
    Ok(store)
}

/// Decode the code first so only working codes are stored
fn save(store: &impl BuildsRepository, name: Option<&str>, input: &CodeInput) -> Result<()> {
    let code = read_code(input)?;
    let build = pob::import(&code)?;
    let name = name.unwrap_or_else(|| build.default_name());

    let saved = store.save_build(name, &code, &build.metadata)?;
    println!("Saved \"{}\" as {}", saved.name, saved.id);
    Ok(())
}

fn list(store: &impl BuildsRepository, format: OutputFormat) -> Result<String> {
    let builds = store.list_builds()?;
    match format {
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&builds).context("Failed to serialize builds")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => serde_yaml::to_string(&builds).context("Failed to serialize builds"),
        OutputFormat::Text => {
            if builds.is_empty() {
                return Ok("No saved builds\n".to_string());
            }
            let mut out = String::new();
            for build in &builds {
                let _ = writeln!(out, "{}  {:<24} {}", build.id, build.name, build.summary());
            }
            Ok(out)
        }
    }
}

fn show(store: &impl BuildsRepository, id: &str, decode: bool) -> Result<String> {
    let build = store.require_build(id)?;
    let mut out = describe(&build);
    if decode {
        let decoded = pob::import(&build.code)
            .with_context(|| format!("Stored code for {} no longer decodes", build.id))?;
        out.push('\n');
        out.push_str(&render_build(&decoded));
    }
    Ok(out)
}

fn describe(build: &SavedBuild) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Id:       {}", build.id);
    let _ = writeln!(out, "Name:     {}", build.name);
    let summary = build.summary();
    if !summary.is_empty() {
        let _ = writeln!(out, "Build:    {}", summary);
    }
    let _ = writeln!(out, "Saved at: {} (unix ms)", build.saved_at);
    let _ = writeln!(out, "Code:     {}", build.code);
    out
}
