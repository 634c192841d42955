//! Tree configuration
//!
//! Loaded from JSON. The CLI looks for `~/.config/csmt/config.json` unless
//! an explicit path is given; every field has a default.
//!
//! ```
//! use csmt::{HasherKind, TreeConfig};
//!
//! let config: TreeConfig = serde_json::from_str(r#"{"atomic_batches": true}"#).unwrap();
//! assert!(config.atomic_batches);
//! assert_eq!(config.hasher, HasherKind::Sha256);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hash function used for every digest in a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    #[default]
    Sha256,
    Blake3,
}

impl std::str::FromStr for HasherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(HasherKind::Sha256),
            "blake3" => Ok(HasherKind::Blake3),
            other => Err(Error::Config(format!("Unknown hasher: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Which hasher the CLI builds trees with
    pub hasher: HasherKind,

    /// Undo the applied prefix of a batch when a later entry fails.
    /// Off by default: entries before the failing one stay committed.
    pub atomic_batches: bool,

    /// Emit every stored node as a debug event after a batch insert
    pub debug_dump: bool,
}

impl TreeConfig {
    /// Default config location (`<config_dir>/csmt/config.json`)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("csmt").join("config.json"))
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config {}: {}", path.display(), e)))
    }

    /// Load from `path` if given, else from the default location, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}
