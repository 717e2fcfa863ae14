//! Path resolution for the suggest configuration file.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns the directory that holds the config file.
    ///
    /// Returns `~/.suggest/` on every platform, matching where earlier
    /// versions stored their document.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
            .join(crate::constants::CONFIG_DIR_NAME);
        Ok(dir)
    }

    /// Returns the default path of the config file, `~/.suggest/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Config::config_dir`] fails.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }
}
