//! Configuration for the `folio` CLI.
//!
//! Provides the [`FolioConfig`] struct that loads from a TOML file,
//! environment variables, and defaults using the `config` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FOLIO_CONFIG` environment variable
//! 3. XDG default: `~/.config/folio/config.toml`
//! 4. Built-in defaults
//!
//! Values from `FOLIO_<SECTION>__<KEY>` environment variables override the
//! file, e.g. `FOLIO_LOADER__STRICT=true` or
//! `FOLIO_CONTENT__EXTENSIONS=md,markdown`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use folio_content::{LoaderOptions, ValidationOptions};
use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "FOLIO";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

const SECTION_SEPARATOR: &str = "__";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the `folio` CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Where content lives and what counts as content.
    pub content: ContentConfig,

    /// Batch loading behaviour.
    pub loader: LoaderConfig,

    /// Body checks.
    pub validation: ValidationConfig,
}

/// Content location configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content directory used when a command is given none.
    pub path: Option<String>,

    /// File extensions treated as content.
    pub extensions: Vec<String>,
}

/// Loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Files processed at once (defaults to the number of CPUs).
    pub concurrency: Option<usize>,

    /// Exclude documents whose body has errors.
    pub strict: bool,
}

/// Validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check footnote references against definitions.
    pub footnotes: bool,

    /// Check that code fences are closed.
    pub code_fences: bool,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: None,
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            footnotes: true,
            code_fences: true,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl FolioConfig {
    /// Keys that are valid but have no default value.
    pub const OPTIONAL_KEYS: &[&str] = &["content.path", "loader.concurrency"];

    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Load configuration, reading overrides from `env` instead of the
    /// process environment when it is given.
    pub fn load_with_env(
        config_path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = Self::resolve_config_path(config_path) {
            tracing::debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(SECTION_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("content.extensions")
                .source(env),
        );

        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("folio").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into `FOLIO_<SECTION>__<KEY>` variable pairs.
    ///
    /// The names match what [`FolioConfig::load`] reads back.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        if let toml::Value::Table(table) = &value {
            for (section, val) in table {
                let key = format!("{ENV_PREFIX}_{}", section.to_uppercase());
                flatten_toml_value(val, &key, &mut vars);
            }
        }
        Ok(vars)
    }

    /// Content directory: the explicit one, else `content.path`, else `.`.
    pub fn content_dir(&self, explicit: Option<&Path>) -> PathBuf {
        match (explicit, &self.content.path) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => PathBuf::from("."),
        }
    }

    /// Loader settings described by this config.
    pub fn loader_options(&self) -> LoaderOptions {
        let mut options = LoaderOptions::default()
            .with_strict(self.loader.strict)
            .with_validation(ValidationOptions {
                code_fences: self.validation.code_fences,
                footnotes: self.validation.footnotes,
            });
        if !self.content.extensions.is_empty() {
            options = options.with_extensions(&self.content.extensions);
        }
        if let Some(concurrency) = self.loader.concurrency {
            options = options.with_concurrency(concurrency);
        }
        options
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{prefix}{SECTION_SEPARATOR}{}", key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        toml::Value::String(s) => {
            out.push((prefix.to_string(), s.clone()));
        }
        toml::Value::Integer(i) => {
            out.push((prefix.to_string(), i.to_string()));
        }
        toml::Value::Float(f) => {
            out.push((prefix.to_string(), f.to_string()));
        }
        toml::Value::Boolean(b) => {
            out.push((prefix.to_string(), b.to_string()));
        }
        toml::Value::Datetime(dt) => {
            out.push((prefix.to_string(), dt.to_string()));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
