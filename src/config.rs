//! Sort-order preference persistence
//!
//! Stored as YAML in `~/.config/capl-outline/config.yaml`:
//!
//! ```yaml
//! sort_order: alphabetical
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::OutlineError;
use crate::outline::{SortOrder, SortPreference};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineConfig {
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl OutlineConfig {
    /// Parse a config file. A missing file is the default config.
    pub fn load_from(path: &Path) -> Result<Self, OutlineError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| OutlineError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| OutlineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), OutlineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| OutlineError::ConfigWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| OutlineError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

/// A config bound to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    pub config: OutlineConfig,
}

impl ConfigFile {
    /// Load from `path`, falling back to defaults when the file is
    /// unreadable or malformed.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match OutlineConfig::load_from(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                OutlineConfig::default()
            }
        };
        Self { path, config }
    }

    /// Open the per-user config file.
    pub fn open_default() -> Result<Self, OutlineError> {
        let path = crate::config_paths::config_file().ok_or(OutlineError::NoConfigDir)?;
        Ok(Self::open(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SortPreference for ConfigFile {
    fn persist(&mut self, order: SortOrder) -> Result<(), OutlineError> {
        self.config.sort_order = order;
        self.config.save_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutlineConfig::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.sort_order, SortOrder::Position);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = OutlineConfig {
            sort_order: SortOrder::Alphabetical,
        };
        config.save_to(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("sort_order: alphabetical"));
        assert_eq!(OutlineConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sort_order: sideways\n").unwrap();
        let err = OutlineConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, OutlineError::ConfigParse { .. }));
    }

    #[test]
    fn config_file_falls_back_on_bad_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sort_order: [").unwrap();
        let file = ConfigFile::open(&path);
        assert_eq!(file.config, OutlineConfig::default());
    }

    #[test]
    fn persist_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = ConfigFile::open(&path);
        file.persist(SortOrder::Alphabetical).unwrap();
        assert_eq!(ConfigFile::open(&path).config.sort_order, SortOrder::Alphabetical);
    }
}
