//! Dataset, results and package-home directory lifecycle.
//!
//! Dataset problems are soft: they are logged and reported through
//! [`DatasetStatus`]. A results directory that cannot be created is an error.
//! Package-home handling lives in [`home`].

pub mod home;

pub use home::{HomeError, HomePrompt, HomeStrategy, TerminalPrompt, ensure_home, ensure_home_or_exit};

use crate::config::PACKAGE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// What [`ensure`] observed or did to the dataset directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetStatus {
    /// No dataset directory was resolved.
    Unset,
    Ready,
    /// Exists but holds no entries.
    Empty,
    /// Created just now and left empty for the user to fill.
    Created,
    CreationFailed(String),
    /// Exists but could not be listed.
    Unreadable(String),
}

impl DatasetStatus {
    /// The directory was created during this run and the pipeline should be re-run once populated.
    pub fn needs_restart(&self) -> bool {
        matches!(self, DatasetStatus::Created)
    }

    /// The directory exists and can be listed, whether or not it holds files.
    pub fn is_usable(&self) -> bool {
        matches!(
            self,
            DatasetStatus::Ready | DatasetStatus::Empty | DatasetStatus::Created
        )
    }
}

/// Check the dataset directory and make sure the results directory exists.
///
/// Only a failure to create the results directory is returned as an error.
pub fn ensure(dataset_dir: Option<&Path>, results_dir: Option<&Path>) -> Result<DatasetStatus> {
    let dataset = match dataset_dir {
        Some(dir) => check_dataset_dir(dir),
        None => {
            debug!("No dataset directory set, skipping check");
            DatasetStatus::Unset
        }
    };

    match results_dir {
        Some(dir) => ensure_results_dir(dir)?,
        None => debug!("No results directory set, skipping creation"),
    }
    Ok(dataset)
}

/// Create a missing dataset directory (non-recursively) or warn when it is empty.
pub fn check_dataset_dir(dir: &Path) -> DatasetStatus {
    if !dir.is_dir() {
        warn!(
            path = %dir.display(),
            "The datafiles directory does not exist yet, trying to create it"
        );
        return match create_dir_if_absent(dir) {
            Ok(()) => {
                warn!(
                    path = %dir.display(),
                    "The datafiles directory has been created. Place your Raman data files in it and run {PACKAGE_NAME} again"
                );
                DatasetStatus::Created
            }
            Err(err) => {
                warn!(
                    path = %dir.display(),
                    error = %err,
                    "The datafiles directory could not be created. Redefine DATASET_DIR in the config settings"
                );
                DatasetStatus::CreationFailed(err.to_string())
            }
        };
    }

    match is_empty_dir(dir) {
        Ok(true) => {
            warn!(
                path = %dir.display(),
                "The datafiles directory is empty. Place your files in it or change DATASET_DIR in the config settings"
            );
            DatasetStatus::Empty
        }
        Ok(false) => DatasetStatus::Ready,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "The datafiles directory could not be listed");
            DatasetStatus::Unreadable(err.to_string())
        }
    }
}

/// Create the results directory and its parents when missing.
pub fn ensure_results_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("creating results directory {}", dir.display()))?;
    info!(path = %dir.display(), "The results directory did not exist and was created");
    Ok(())
}

/// `mkdir` that treats losing a creation race as success.
pub(crate) fn create_dir_if_absent(dir: &Path) -> io::Result<()> {
    match fs::create_dir(dir) {
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        other => other,
    }
}

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_dataset_dir_is_created_empty() {
        let temp = TempDir::new().unwrap();
        let dataset = temp.path().join("datafiles");
        assert_eq!(check_dataset_dir(&dataset), DatasetStatus::Created);
        assert!(dataset.is_dir());
        assert_eq!(fs::read_dir(&dataset).unwrap().count(), 0);
        assert!(DatasetStatus::Created.needs_restart());
    }

    #[test]
    fn dataset_dir_is_not_created_recursively() {
        let temp = TempDir::new().unwrap();
        let dataset = temp.path().join("missing_parent/datafiles");
        let status = check_dataset_dir(&dataset);
        assert!(matches!(status, DatasetStatus::CreationFailed(_)));
        assert!(!status.is_usable());
        assert!(!dataset.exists());
    }

    #[test]
    fn empty_and_populated_dataset_dirs() {
        let temp = TempDir::new().unwrap();
        assert_eq!(check_dataset_dir(temp.path()), DatasetStatus::Empty);
        fs::write(temp.path().join("sample.txt"), "1 2\n").unwrap();
        assert_eq!(check_dataset_dir(temp.path()), DatasetStatus::Ready);
    }

    #[test]
    fn results_dir_is_created_with_parents() {
        let temp = TempDir::new().unwrap();
        let results = temp.path().join("a/b/results");
        let status = ensure(None, Some(results.as_path())).unwrap();
        assert_eq!(status, DatasetStatus::Unset);
        assert!(results.is_dir());
    }

    #[test]
    fn results_dir_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = ensure(None, Some(blocker.join("results").as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("creating results directory"));
    }

    #[test]
    fn create_dir_if_absent_tolerates_existing() {
        let temp = TempDir::new().unwrap();
        create_dir_if_absent(temp.path()).unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();
        assert!(create_dir_if_absent(&blocker).is_err());
    }
}
