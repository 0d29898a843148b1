//! muster.toml parsing and validation.

use std::path::PathBuf;

use serde::Deserialize;

use muster_recon::FlatFileOptions;

#[derive(Debug)]
pub enum ConfigError {
    Parse(String),
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize)]
pub struct MusterConfig {
    pub store: StoreConfig,
    pub flatfile: FlatFileConfig,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub table: String,
    /// Environment variable holding the API token. The token itself never
    /// lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Deserialize)]
pub struct FlatFileConfig {
    /// Directory containing `<faction-slug>/troops.<extension>` exports.
    pub dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
    /// Factions to validate. Empty means every faction in the static
    /// catalog.
    #[serde(default)]
    pub factions: Vec<String>,
}

fn default_api_key_env() -> String {
    "MUSTER_STORE_TOKEN".into()
}

fn default_extension() -> String {
    "csv".into()
}

fn default_delimiter() -> String {
    ",".into()
}

fn default_list_delimiter() -> String {
    "|".into()
}

impl MusterConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: MusterConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("store.base_url is empty".into()));
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Validation("store.table is empty".into()));
        }
        if self.flatfile.delimiter.len() != 1 || !self.flatfile.delimiter.is_ascii() {
            return Err(ConfigError::Validation(format!(
                "flatfile.delimiter must be a single ASCII character, got {:?}",
                self.flatfile.delimiter
            )));
        }
        if self.flatfile.list_delimiter.chars().count() != 1 {
            return Err(ConfigError::Validation(format!(
                "flatfile.list_delimiter must be a single character, got {:?}",
                self.flatfile.list_delimiter
            )));
        }
        Ok(())
    }

    /// Factions to validate, defaulting to the static catalog's.
    pub fn factions(&self) -> Vec<String> {
        if self.flatfile.factions.is_empty() {
            muster_core::static_factions()
        } else {
            self.flatfile.factions.clone()
        }
    }

    /// `<dir>/<faction-slug>/troops.<extension>` by convention.
    pub fn flat_file_path(&self, faction_slug: &str) -> PathBuf {
        self.flatfile
            .dir
            .join(faction_slug)
            .join(format!("troops.{}", self.flatfile.extension))
    }

    pub fn flat_file_options(&self) -> FlatFileOptions {
        FlatFileOptions {
            delimiter: self.flatfile.delimiter.as_bytes()[0],
            list_delimiter: self.flatfile.list_delimiter.chars().next().unwrap_or('|'),
        }
    }
}
