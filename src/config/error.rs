//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config or definition file.
    #[error("failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a definitions directory.
    #[error("failed to list directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid TOML or lacks required keys.
    #[error("failed to parse '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn read_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }
}
