//! tse config - Show or edit configuration

use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::Config;
use crate::error::{MsError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key to get or set, e.g. search.fuzzy
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Remove the key from the config file
    #[arg(long)]
    pub unset: bool,

    /// Print the config file location
    #[arg(long)]
    pub path: bool,
}

#[derive(Serialize)]
struct PathReport<'a> {
    path: Option<&'a Path>,
    exists: bool,
    source: String,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.path {
        return emit_path(ctx);
    }

    let Some(key) = args.key.as_deref() else {
        return emit_config(ctx);
    };

    match (&args.value, args.unset) {
        (Some(_), true) => Err(MsError::Config(
            "cannot use --unset with a value".to_string(),
        )),
        (Some(value), false) => edit_file(ctx, |doc| set_path(doc, key, parse_value(value)?)),
        (None, true) => edit_file(ctx, |doc| unset_path(doc, key)),
        (None, false) => get_key(ctx, key),
    }
}

fn emit_path(ctx: &AppContext) -> Result<()> {
    let path = ctx.config_path.as_deref();
    let source = ctx
        .source()
        .map_or_else(|err| format!("unavailable: {err}"), |source| source.describe());
    let report = PathReport {
        path,
        exists: path.is_some_and(Path::exists),
        source,
    };
    if ctx.output_format.is_machine_readable() {
        return output::emit_json(&report);
    }
    match path {
        Some(path) => println!("{}", path.display()),
        None => println!("(no config location)"),
    }
    println!("source: {}", report.source);
    Ok(())
}

fn emit_config(ctx: &AppContext) -> Result<()> {
    if ctx.output_format.is_machine_readable() {
        return output::emit_json(&ctx.config);
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| MsError::Config(format!("render config: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn get_key(ctx: &AppContext, key: &str) -> Result<()> {
    let value = config_value_at(&ctx.config, key)?;
    if ctx.output_format.is_machine_readable() {
        return output::emit_json(&value);
    }
    println!("{}", format_value(&value));
    Ok(())
}

/// Apply `change` to the config file, refusing edits that would not load.
fn edit_file(ctx: &AppContext, change: impl FnOnce(&mut toml::Value) -> Result<()>) -> Result<()> {
    let path = ctx
        .config_path
        .as_deref()
        .ok_or_else(|| MsError::MissingConfig("config file location".to_string()))?;

    let mut doc = load_config_doc(path)?;
    change(&mut doc)?;

    let rendered = toml::to_string_pretty(&doc)
        .map_err(|err| MsError::Config(format!("render config: {err}")))?;
    let mut check = Config::default();
    check.merge_toml(&rendered)?;
    check.validate()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| MsError::Config(format!("create config dir: {err}")))?;
    }
    std::fs::write(path, rendered)
        .map_err(|err| MsError::Config(format!("write config: {err}")))?;
    Ok(())
}

fn load_config_doc(path: &Path) -> Result<toml::Value> {
    if !path.exists() {
        return Ok(toml::Value::Table(toml::map::Map::new()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|err| MsError::Config(format!("read config: {err}")))?;
    toml::from_str(&raw).map_err(|err| MsError::Config(format!("parse config: {err}")))
}

/// Parse a TOML literal, falling back to a bare string.
fn parse_value(raw: &str) -> Result<toml::Value> {
    let direct = format!("value = {raw}");
    if let Some(parsed) = toml::from_str::<toml::Value>(&direct)
        .ok()
        .and_then(|doc| doc.get("value").cloned())
    {
        return Ok(parsed);
    }
    Ok(toml::Value::String(raw.to_string()))
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| MsError::Config(format!("serialize config: {err}")))?;
    get_path(&doc, key)
}

fn get_path(doc: &toml::Value, key: &str) -> Result<toml::Value> {
    key.split('.')
        .try_fold(doc, |current, part| {
            current
                .get(part)
                .ok_or_else(|| MsError::Config(format!("unknown key: {key}")))
        })
        .cloned()
}

fn split_key(key: &str) -> Result<(Vec<&str>, &str)> {
    let mut parts: Vec<&str> = key.split('.').collect();
    match parts.pop() {
        Some(last) if !last.is_empty() => Ok((parts, last)),
        _ => Err(MsError::Config("empty key".to_string())),
    }
}

fn table_mut<'a>(
    value: &'a mut toml::Value,
    key: &str,
) -> Result<&'a mut toml::map::Map<String, toml::Value>> {
    value
        .as_table_mut()
        .ok_or_else(|| MsError::Config(format!("{key}: config path is not a table")))
}

fn set_path(doc: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (parents, last) = split_key(key)?;
    let mut current = doc;
    for part in parents {
        current = table_mut(current, key)?
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    table_mut(current, key)?.insert(last.to_string(), value);
    Ok(())
}

fn unset_path(doc: &mut toml::Value, key: &str) -> Result<()> {
    let (parents, last) = split_key(key)?;
    let mut current = doc;
    for part in parents {
        current = table_mut(current, key)?
            .get_mut(part)
            .ok_or_else(|| MsError::Config(format!("unknown key: {key}")))?;
    }
    table_mut(current, key)?.remove(last);
    Ok(())
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
