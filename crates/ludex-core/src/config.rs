//! Persistent configuration for Ludex.
//!
//! Loads/saves a TOML config at `~/.ludex/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::LudexError;

/// Top-level Ludex configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LudexConfig {
    pub vault: VaultConfig,
    pub storage: StorageConfig,
}

impl LudexConfig {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self, LudexError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LudexError::Config(e.to_string()))
    }

    /// Save configuration to the given path.
    pub fn save(&self, path: &Path) -> Result<(), LudexError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| LudexError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the default path, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Default config path: `~/.ludex/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ludex")
            .join("config.toml")
    }
}

/// Vault layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory holding the `games/`, `studios/`, `publishers/`,
    /// and `designers/` document directories.
    pub root: String,
    /// Catalog file, relative to the vault root when not absolute.
    pub catalog: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            catalog: "games.csv".to_string(),
        }
    }
}

impl VaultConfig {
    /// Resolve the catalog path against the vault root.
    pub fn catalog_path(&self) -> PathBuf {
        let catalog = Path::new(&self.catalog);
        if catalog.is_absolute() {
            catalog.to_path_buf()
        } else {
            Path::new(&self.root).join(catalog)
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "./ludex.db".to_string(),
        }
    }
}
