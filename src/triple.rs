//! The resolved `{RESULTS_DIR, DATASET_DIR, INDEX_FILE}` record.
//!
//! Every component between the run-mode table and the caller passes this
//! record around. Unset fields stand for an unrecognised run mode; callers
//! check them before touching the filesystem.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One field of a [`DirectoryTriple`], addressed by its configuration name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathKey {
    ResultsDir,
    DatasetDir,
    IndexFile,
}

impl PathKey {
    pub const ALL: [PathKey; 3] = [PathKey::ResultsDir, PathKey::DatasetDir, PathKey::IndexFile];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathKey::ResultsDir => "RESULTS_DIR",
            PathKey::DatasetDir => "DATASET_DIR",
            PathKey::IndexFile => "INDEX_FILE",
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PathKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown path key '{value}'"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryTriple {
    #[serde(rename = "RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,
    #[serde(rename = "DATASET_DIR")]
    pub dataset_dir: Option<PathBuf>,
    #[serde(rename = "INDEX_FILE")]
    pub index_file: Option<PathBuf>,
}

impl DirectoryTriple {
    pub fn get(&self, key: PathKey) -> Option<&Path> {
        match key {
            PathKey::ResultsDir => self.results_dir.as_deref(),
            PathKey::DatasetDir => self.dataset_dir.as_deref(),
            PathKey::IndexFile => self.index_file.as_deref(),
        }
    }

    pub fn set(&mut self, key: PathKey, value: Option<PathBuf>) {
        let slot = match key {
            PathKey::ResultsDir => &mut self.results_dir,
            PathKey::DatasetDir => &mut self.dataset_dir,
            PathKey::IndexFile => &mut self.index_file,
        };
        *slot = value;
    }

    /// Keys whose values differ between `self` and `other`, in `PathKey::ALL` order.
    pub fn changed_keys(&self, other: &DirectoryTriple) -> Vec<PathKey> {
        PathKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) != other.get(*key))
            .collect()
    }
}
