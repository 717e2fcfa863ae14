//! Reading and writing the configuration file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::migrate::{migrate, RawConfig};
use super::types::Config;
use crate::error::{Result, SuggestError};

impl Config {
    /// Loads and migrates the config at `path`.
    ///
    /// A missing file is not an error: it yields [`Config::default`], whose
    /// collections are all empty. A file that exists but cannot be read or
    /// parsed is.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SuggestError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(&contents).map_err(|e| SuggestError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), "loaded config");
        Ok(migrate(raw))
    }

    /// Writes the whole document to `path`, replacing whatever was there.
    ///
    /// Creates the parent directory if it does not exist yet.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| SuggestError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| SuggestError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, yaml).map_err(io_err)?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }
}
