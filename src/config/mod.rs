//! Configuration document and its on-disk store.
//!
//! suggest keeps everything the user sets up (API keys, aliases, system
//! prompts, templates) in a single YAML file at `~/.suggest/config.yaml`.
//! Documents written by older versions are upgraded in memory on every load
//! by [`migrate`].

mod loader;
mod migrate;
mod paths;
mod resolve;
mod types;

pub use resolve::{mask_key, normalize_host};
pub use types::{Config, SystemPrompt, Template};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A config file location, handed to every command that reads or edits config.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `override_path`, or at `~/.suggest/config.yaml` when none is given.
    pub fn locate(override_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = match override_path {
            Some(p) => p,
            None => Config::default_path()?,
        };
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document exactly as persisted (after migration).
    ///
    /// Commands that edit and save the config use this so environment
    /// overrides never end up on disk.
    pub fn load(&self) -> Result<Config> {
        Config::load_from(&self.path)
    }

    /// Loads the document and applies environment overrides for this invocation.
    pub fn load_effective(&self) -> Result<Config> {
        let mut config = self.load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.save_to(&self.path)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
