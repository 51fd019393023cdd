//! Project discovery - locating and initializing the `.stockroom` directory

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::Config;
use crate::core::error::StockError;
use crate::core::store::Store;

/// Errors that can occur locating or initializing a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not inside a stockroom project. Run 'stockroom init' first")]
    NotFound,

    #[error("A stockroom project already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invalid config: {message}")]
    Config { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StockError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A located stockroom project: the directory containing `.stockroom/`.
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    pub const DIR: &'static str = ".stockroom";
    pub const CONFIG_FILE: &'static str = "config.yaml";

    /// Initialize a new project at `dir`, writing the default config and
    /// creating an empty database.
    pub fn init(dir: &Path) -> Result<Self, ProjectError> {
        let project_dir = dir.join(Self::DIR);
        if project_dir.exists() {
            return Err(ProjectError::AlreadyInitialized(project_dir));
        }
        std::fs::create_dir_all(&project_dir)?;

        let config = Config::default();
        config.save(&project_dir.join(Self::CONFIG_FILE))?;

        let project = Self {
            root: dir.to_path_buf(),
            config,
        };
        // creates the database file and schema up front
        project.open_store()?;
        Ok(project)
    }

    /// Locate the project by walking up from the current directory.
    pub fn find() -> Result<Self, ProjectError> {
        Self::find_from(&std::env::current_dir()?)
    }

    /// Locate the project by walking up from `start`.
    pub fn find_from(start: &Path) -> Result<Self, ProjectError> {
        let mut dir = start;
        loop {
            let candidate = dir.join(Self::DIR);
            if candidate.is_dir() {
                let config = Config::load(&candidate.join(Self::CONFIG_FILE))?;
                return Ok(Self {
                    root: dir.to_path_buf(),
                    config,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Err(ProjectError::NotFound),
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(Self::DIR).join(&self.config.database)
    }

    pub fn open_store(&self) -> Result<Store, StockError> {
        Store::open(&self.db_path())
    }
}
