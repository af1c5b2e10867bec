use std::{fs, path::PathBuf};

use serde_derive::Deserialize;

use crate::Error;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inputs at least this long are counted in parallel.
    pub parallel_threshold: usize,
    /// Symbols per partial tally when counting in parallel.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel_threshold: 1 << 20,
            chunk_size: 1 << 16,
        }
    }
}

impl Config {
    pub fn new(path: &PathBuf) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|e| Error::MissingConfigurationFile {
            config_file_path: path.clone(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(Error::InvalidConfig)
    }
}
