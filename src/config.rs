//! Configuration loading and management
//!
//! Handles parsing of `.taskflow.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::model::{is_hex_color, NewCategory};
use crate::view::View;

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE: &str = ".taskflow.toml";

/// File name of the default data file inside the platform data directory
pub const DATA_FILE: &str = "tasks.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Persistence backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Categories created in a fresh store
    #[serde(default)]
    pub categories: CategoriesConfig,

    /// List view defaults
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    File,
}

/// Store-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend to open at startup
    #[serde(default)]
    pub backend: Backend,

    /// Data file for the file backend (defaults to the platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// How long to wait for the data file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Resolved data file path for the file backend
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "taskflow").ok_or_else(|| {
            Error::InvalidConfig(
                "no home directory found; set store.path in .taskflow.toml".to_string(),
            )
        })?;
        Ok(dirs.data_dir().join(DATA_FILE))
    }
}

/// Seed categories configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_seed_categories")]
    pub seed: Vec<NewCategory>,
}

fn default_seed_categories() -> Vec<NewCategory> {
    vec![
        NewCategory::new("Personal", "#5B47E0"),
        NewCategory::new("Work", "#3B82F6"),
        NewCategory::new("Shopping", "#10B981"),
    ]
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            seed: default_seed_categories(),
        }
    }
}

/// View configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View used by `taskflow list` without `--view`
    #[serde(default = "default_view")]
    pub default: String,
}

fn default_view() -> String {
    "all".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default: default_view(),
        }
    }
}

impl ViewConfig {
    pub fn default_view(&self) -> Result<View> {
        self.default
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("view.default: unknown view '{}'", self.default)))
    }
}

impl Config {
    /// Load configuration from a `.taskflow.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.taskflow.toml` from `dir`, or return defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for category in &self.categories.seed {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(Error::InvalidConfig(
                    "categories.seed cannot include empty names".to_string(),
                ));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(Error::InvalidConfig(format!(
                    "categories.seed has duplicate entry '{name}'"
                )));
            }
            if !is_hex_color(&category.color) {
                return Err(Error::InvalidConfig(format!(
                    "categories.seed '{name}': invalid color '{}'",
                    category.color
                )));
            }
        }

        self.view.default_view()?;
        Ok(())
    }
}
