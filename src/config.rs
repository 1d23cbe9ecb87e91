//! # Storage Configuration
//!
//! This module defines [`StorageConfig`], which tells the repository where
//! configuration documents live and how they are named on disk, together with
//! the YAML parsing used to load it.
//!
//! ```yaml
//! subdirectory: Config/Settings   # relative to the asset root
//! extension: ini                  # file extension, no leading dot
//! verbose: false                  # log every merge and lookup at info level
//! ```
//!
//! Every field is optional; missing fields take the values from
//! [`crate::defaults`].

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{default_extension, default_subdirectory};
use crate::error::{Error, Result};

/// Where and how documents are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Subdirectory below the asset root, `/`-separated.
    #[serde(default = "default_subdirectory")]
    pub subdirectory: String,
    /// File extension without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Log individual merges and lookups at `info` instead of `debug`.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            subdirectory: default_subdirectory(),
            extension: default_extension(),
            verbose: false,
        }
    }
}

impl StorageConfig {
    /// Check that the configuration can only resolve paths below the root
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() || self.extension.contains(&['.', '/', '\\'][..]) {
            return Err(Error::ConfigParse {
                message: format!(
                    "extension '{}' must be non-empty and contain no '.' or path separators",
                    self.extension
                ),
            });
        }

        let subdirectory = Path::new(&self.subdirectory);
        let escapes = subdirectory
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::ConfigParse {
                message: format!(
                    "subdirectory '{}' must be a relative path without '..'",
                    self.subdirectory
                ),
            });
        }

        Ok(())
    }

    /// Directory holding the documents below `root`
    pub fn config_dir(&self, root: &Path) -> PathBuf {
        self.subdirectory
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }

    /// Full path of document `file_name` inside `dir`
    pub fn document_path(&self, dir: &Path, file_name: &str) -> PathBuf {
        dir.join(format!("{}.{}", file_name, self.extension))
    }
}

/// Parse a YAML storage configuration
pub fn parse(yaml: &str) -> Result<StorageConfig> {
    // An empty file means "all defaults".
    if yaml.trim().is_empty() {
        return Ok(StorageConfig::default());
    }
    let config: StorageConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Load and parse a YAML storage configuration file
pub fn load(path: &Path) -> Result<StorageConfig> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
