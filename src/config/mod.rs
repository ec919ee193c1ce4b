//! Layered path configuration.
//!
//! Paths come from two layers, later layers replacing earlier ones:
//!
//! ```text
//! 1. Compiled-in defaults derived from the package home (~/.ramanfit)
//! 2. Local override (~/.ramanfit/local_config.toml), all three keys or nothing
//! ```
//!
//! The run-mode table in [`ConfigStore`] is built from the merged values.
//! Model/peak definitions live next to the package sources in
//! `default_models/` and are loaded separately by [`load_definitions_from`].
//!
//! # Example local override
//!
//! ```toml
//! DATASET_DIR = "/data/raman/spectra"
//! RESULTS_DIR = "/data/raman/results"
//! INDEX_FILE = "/data/raman/results/ramanfit_index.csv"
//! ```

mod definitions;
mod error;
mod store;

pub use definitions::{ModelDefinitions, default_definitions, load_definitions_from};
pub use error::ConfigError;
pub use store::{BasePaths, ConfigStore, OverlayOutcome, RunModeEntry, load_local_override};

use std::path::{Path, PathBuf};

/// Name used for the package home directory and the index file.
pub const PACKAGE_NAME: &str = "ramanfit";

/// Mapping key holding the base paths and the index file.
pub const DEFAULTS_MODE: &str = "defaults";

pub const LOCAL_CONFIG_FILE: &str = "local_config.toml";
pub const DEFAULT_MODELS_DIR: &str = "default_models";

/// Root of the package sources, baked in at build time.
///
/// `RAMANFIT_ROOT_HINT` at build time relocates it; a baked root that no
/// longer exists falls back to the manifest directory.
pub fn package_root() -> PathBuf {
    let baked = PathBuf::from(env!("RAMANFIT_PACKAGE_ROOT"));
    if baked.is_dir() {
        return baked;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Directory scanned for bundled model and peak definitions.
pub fn default_models_dir() -> PathBuf {
    package_root().join(DEFAULT_MODELS_DIR)
}

/// Filesystem anchors from which the compiled-in defaults are derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locations {
    pub package_home: PathBuf,
    pub tests_root: PathBuf,
}

impl Locations {
    /// Package home under the current user's profile, tests under the package root.
    pub fn detect() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::from_home(&home)
    }

    /// Package home under `user_home`; tests stay under the package root.
    pub fn from_home(user_home: &Path) -> Self {
        Self {
            package_home: user_home.join(format!(".{PACKAGE_NAME}")),
            tests_root: package_root().join("tests"),
        }
    }

    pub fn local_config_file(&self) -> PathBuf {
        self.package_home.join(LOCAL_CONFIG_FILE)
    }

    pub fn tests_dataset_dir(&self) -> PathBuf {
        self.tests_root.join("test_data")
    }

    pub fn tests_results_dir(&self) -> PathBuf {
        self.tests_root.join("test_results")
    }

    pub fn example_results_dir(&self) -> PathBuf {
        self.package_home.join("example_results")
    }

    /// The three overridable values before any local override is applied.
    pub fn compiled_defaults(&self) -> BasePaths {
        let results_dir = self.package_home.join("results");
        BasePaths {
            dataset_dir: self.package_home.join("datafiles"),
            index_file: results_dir.join(format!("{PACKAGE_NAME}_index.csv")),
            results_dir,
        }
    }
}
