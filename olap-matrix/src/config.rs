use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{OverlapError, Result};

///
/// Settings that can be kept in a `.toml` file instead of being passed on
/// every invocation. Every key is optional.
///
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OverlapConfig {
    pub bedtools: Option<PathBuf>,
    pub threads: Option<usize>,
    pub window_size: Option<u32>,
}

impl OverlapConfig {
    ///
    /// Read a config file.
    ///
    /// # Arguments
    /// - path: Path to the config file (a .toml) file.
    pub fn try_from(path: &Path) -> Result<OverlapConfig> {
        let toml_str = read_to_string(path).map_err(|e| OverlapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&toml_str).map_err(|e| OverlapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
