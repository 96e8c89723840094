//! Handler functions for config CLI commands.
//!
//! Implements the config subcommands (`path`, `get`, `set`, `init`, `export`)
//! on top of [`FolioConfig`], plus the TOML dotted-key helpers they share.

use std::io::Write;
use std::path::PathBuf;

use folio_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::FolioConfig;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand, writing its output to `out`.
pub fn handle_config_command(
    config_path: Option<&str>,
    action: ConfigAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path, out),
        ConfigAction::Get { key } => {
            let config = FolioConfig::load(config_path)?;
            cmd_config_get(&config, &key, out)
        }
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value, out),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force, out),
        ConfigAction::Export { docker_env } => {
            let config = FolioConfig::load(config_path)?;
            cmd_config_export(&config, docker_env, out)
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>, out: &mut impl Write) -> Result<()> {
    let path = FolioConfig::resolve_config_path(config_path).ok_or_else(|| {
        Error::config("Could not determine config directory for this platform")
    })?;

    writeln!(out, "{}", path.display())?;
    if !path.exists() {
        eprintln!("(file does not exist; run `folio config init` to create it)");
    }
    Ok(())
}

/// Print a configuration value by dotted key.
///
/// Known optional keys without a value print `(unset)`.
pub fn cmd_config_get(config: &FolioConfig, key: &str, out: &mut impl Write) -> Result<()> {
    let value = toml::Value::try_from(config).map_err(|e| Error::config(e.to_string()))?;
    match get_nested_value(&value, key) {
        Some(val) => writeln!(out, "{}", format_toml_value(val))?,
        None if FolioConfig::OPTIONAL_KEYS.contains(&key) => writeln!(out, "(unset)")?,
        None => {
            return Err(Error::config(format!(
                "Key '{key}' not found in configuration"
            )));
        }
    }
    Ok(())
}

/// Set a configuration value by dotted key in the config file.
///
/// The edited file must still load as a [`FolioConfig`]; a value of the
/// wrong type is rejected before anything is written.
pub fn cmd_config_set(
    config_path: Option<&str>,
    key: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    let path = FolioConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `folio config init` first.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut doc: toml::Table = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    set_nested_value(&mut doc, key, parse_value(value))?;

    let toml_str = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    toml::from_str::<FolioConfig>(&toml_str)
        .map_err(|e| Error::config(format!("Invalid value for '{key}': {e}")))?;
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    tracing::info!("Updated {key} in {}", path.display());
    writeln!(out, "Set {key} = {value} in {}", path.display())?;
    Ok(())
}

/// Create a default configuration file.
pub fn cmd_config_init(file: Option<&str>, force: bool, out: &mut impl Write) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => FolioConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = FolioConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    writeln!(out, "Config file created at {}", path.display())?;
    Ok(())
}

/// Export configuration as environment variables.
pub fn cmd_config_export(
    config: &FolioConfig,
    docker_env: bool,
    out: &mut impl Write,
) -> Result<()> {
    for (key, value) in config.to_env_vars()? {
        if docker_env {
            writeln!(out, "--env {key}={value}")?;
        } else {
            writeln!(out, "{key}={value}")?;
        }
    }
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Table, key: &str, value: toml::Value) -> Result<()> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let last = match parts.pop() {
        Some(last) if !last.is_empty() => last,
        _ => return Err(Error::config("Empty key path")),
    };

    let mut current = root;
    for part in parts {
        let next = current
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        current = next
            .as_table_mut()
            .ok_or_else(|| Error::config(format!("Cannot navigate into non-table '{part}'")))?;
    }

    current.insert(last.to_string(), value);
    Ok(())
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool, integer, float, inline array, string.
pub fn parse_value(s: &str) -> toml::Value {
    if s == "true" {
        return toml::Value::Boolean(true);
    }
    if s == "false" {
        return toml::Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    if s.starts_with('[')
        && let Ok(mut table) = toml::from_str::<toml::Table>(&format!("v = {s}"))
        && let Some(array) = table.remove("v")
    {
        return array;
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_toml_value).collect();
            parts.join(",")
        }
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
