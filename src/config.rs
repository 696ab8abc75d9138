//! Configuration for the ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DATA_DIR, EVIDENCE_DIR};
use crate::evidence::CollisionPolicy;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the chain store
    pub data_dir: PathBuf,

    /// Directory where evidence images are written
    pub evidence_dir: PathBuf,

    /// How evidence name collisions are handled
    pub collision_policy: CollisionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            evidence_dir: PathBuf::from(EVIDENCE_DIR),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(dir) = std::env::var("FACTURA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("FACTURA_EVIDENCE_DIR") {
            config.evidence_dir = PathBuf::from(dir);
        }

        config
    }
}
