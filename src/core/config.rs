//! Project configuration, stored as YAML under `.stockroom/`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::project::ProjectError;

fn default_expiration_hours() -> u64 {
    24
}

fn default_database() -> String {
    "stockroom.db".to_string()
}

/// Contents of `.stockroom/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hours a request may sit unactioned before the sweeper reclaims it.
    pub expiration_hours: u64,

    /// Database filename, relative to the `.stockroom` directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiration_hours: default_expiration_hours(),
            database: default_database(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents).map_err(|e| ProjectError::Config {
            message: e.to_string(),
        })?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let contents = serde_yml::to_string(self).map_err(|e| ProjectError::Config {
            message: e.to_string(),
        })?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
