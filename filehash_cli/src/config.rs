use crate::output::OutputFormat;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use filehash_core::{AlgorithmSelection, HashAlgorithm, HashConfig, StrategyHint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config directory
const APP_CONFIG_DIR: &str = "filehash";

/// Environment variable prefix, nested keys are separated by `__`
const ENV_PREFIX: &str = "FILEHASH_";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub hashing: HashConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub default_format: OutputFormat,
    pub default_algorithms: AlgorithmSelection,
    pub color_enabled: bool,
    pub progress_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            default_algorithms: [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256]
                .into(),
            color_enabled: true,
            progress_enabled: true,
        }
    }
}

/// Flag values that take precedence over every configuration layer
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub chunk_size: Option<usize>,
    pub strategy: Option<StrategyHint>,
    pub format: Option<OutputFormat>,
    pub no_progress: bool,
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(size) = overrides.chunk_size {
            self.hashing.chunk_size = size;
        }
        if let Some(strategy) = overrides.strategy {
            self.hashing.strategy = strategy;
        }
        if let Some(format) = overrides.format {
            self.output.default_format = format;
        }
        if overrides.no_progress {
            self.output.progress_enabled = false;
        }
    }
}

/// Loads layered configuration and edits the user config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Manager for the platform default config file
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// `$XDG_CONFIG_HOME/filehash/config.toml` or the platform equivalent
    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config)
                .join(APP_CONFIG_DIR)
                .join("config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_CONFIG_DIR)
            .join("config.toml")
    }

    fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    ///
    /// CLI flags are applied afterwards through [`AppConfig::apply_cli_overrides`].
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self.figment().extract().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_path.display()
            )
        })?;
        config
            .hashing
            .validate()
            .context("Invalid [hashing] configuration")?;
        Ok(config)
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;

        let mut current = &value;
        for part in key.split('.') {
            current = current
                .as_table()
                .ok_or_else(|| anyhow::anyhow!("Invalid key path: {key}"))?
                .get(part)
                .ok_or_else(|| anyhow::anyhow!("Key '{key}' not found"))?;
        }

        Ok(render_value(current))
    }

    /// Set a configuration value by key (dot notation) in the config file
    ///
    /// The edited file is validated as a whole before it is written.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut document = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path).with_context(|| {
                format!("Failed to read {}", self.config_path.display())
            })?;
            toml::from_str::<toml::Table>(&content)?
        } else {
            toml::Table::new()
        };

        let parts: Vec<&str> = key.split('.').collect();
        let Some((last, sections)) = parts.split_last() else {
            anyhow::bail!("Empty key");
        };

        let mut current = &mut document;
        for section in sections {
            current = current
                .entry(section.to_string())
                .or_insert(toml::Value::Table(toml::Table::new()))
                .as_table_mut()
                .ok_or_else(|| {
                    anyhow::anyhow!("Invalid key path: expected table at '{section}'")
                })?;
        }
        current.insert(last.to_string(), parse_value(value));

        let rendered = toml::to_string_pretty(&document)?;
        let candidate: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(&rendered))
            .extract()
            .with_context(|| format!("Invalid value for '{key}': {value}"))?;
        candidate
            .hashing
            .validate()
            .with_context(|| format!("Invalid value for '{key}': {value}"))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, rendered)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        log::debug!("Set {key} = {value} in {}", self.config_path.display());
        Ok(())
    }

    /// List all effective configuration values as `section.key` pairs
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;
        let mut items = Vec::new();
        collect_values(&value, String::new(), &mut items);
        items.sort();
        Ok(items)
    }
}

fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_values(nested, path, items);
            }
        }
        other => items.push((prefix, render_value(other))),
    }
}

fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integers and booleans keep their type, everything else is a string
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(integer) = raw.parse::<i64>() {
        toml::Value::Integer(integer)
    } else if let Ok(boolean) = raw.parse::<bool>() {
        toml::Value::Boolean(boolean)
    } else {
        toml::Value::String(raw.to_string())
    }
}
