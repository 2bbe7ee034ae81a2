//! TOML configuration file.
//!
//! Search settings persist between invocations in a config file that `set` and
//! `reset` rewrite:
//!
//! ```toml
//! # domdb.toml
//! [database]
//! path = "domdb.json"
//! mode = "pos"
//!
//! [search]
//! ppm_diff = 0.5
//! rt_diff = 30.0
//! with_ms2 = false
//! attrs = ["media"]
//! int_over_controls = 2.0
//!
//! [search.exclude_attrs]
//! media = "LB"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

use domdb::model::IonMode;
use domdb::search::SearchOptions;

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "domdb.toml";
/// Snapshot file used when the config does not name one
pub const DEFAULT_DATABASE_FILE: &str = "domdb.json";

/// Root configuration structure for domdb.toml files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database location and partition.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Search options.
    #[serde(default)]
    pub search: SearchOptions,
}

/// Where the database lives and which partition commands use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// JSON snapshot path.
    pub path: PathBuf,

    /// Ionization mode partition.
    pub mode: IonMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_FILE),
            mode: IonMode::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration")
    }

    /// Write the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
