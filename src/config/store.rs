//! Process-wide run-mode table built from defaults plus an optional local override.

use super::{ConfigError, DEFAULTS_MODE, Locations};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// The three values a local override replaces together.
///
/// All three keys are required; other keys in the file are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BasePaths {
    #[serde(rename = "DATASET_DIR")]
    pub dataset_dir: PathBuf,
    #[serde(rename = "RESULTS_DIR")]
    pub results_dir: PathBuf,
    #[serde(rename = "INDEX_FILE")]
    pub index_file: PathBuf,
}

impl BasePaths {
    fn anchored(self, base: &Path) -> Self {
        Self {
            dataset_dir: base.join(self.dataset_dir),
            results_dir: base.join(self.results_dir),
            index_file: base.join(self.index_file),
        }
    }
}

/// Result of looking for the local override file.
#[derive(Debug)]
pub enum OverlayOutcome {
    /// No override file on disk; compiled-in defaults apply.
    Absent,
    Applied { path: PathBuf, paths: BasePaths },
    /// The file exists but could not be used; compiled-in defaults apply.
    Failed { path: PathBuf, error: ConfigError },
}

impl OverlayOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OverlayOutcome::Applied { .. })
    }
}

/// Read the local override at `path`. Never fails; problems become [`OverlayOutcome::Failed`].
pub fn load_local_override(path: &Path) -> OverlayOutcome {
    if !path.is_file() {
        debug!(path = %path.display(), "No local config override");
        return OverlayOutcome::Absent;
    }
    match read_local_override(path) {
        Ok(paths) => OverlayOutcome::Applied {
            path: path.to_path_buf(),
            paths,
        },
        Err(error) => OverlayOutcome::Failed {
            path: path.to_path_buf(),
            error,
        },
    }
}

fn read_local_override(path: &Path) -> Result<BasePaths, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let paths: BasePaths = toml::from_str(&raw).map_err(|e| ConfigError::parse_toml(path, e))?;
    // Relative entries are relative to the override file, not the cwd.
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(paths.anchored(base))
}

/// Dataset/results pair for one run mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunModeEntry {
    pub dataset_dir: PathBuf,
    pub results_dir: PathBuf,
}

#[derive(Debug)]
pub struct ConfigStore {
    modes: BTreeMap<String, RunModeEntry>,
    index_file: PathBuf,
    locations: Locations,
    overlay: OverlayOutcome,
}

impl ConfigStore {
    /// Shared store for the process, built on first access.
    pub fn global() -> &'static ConfigStore {
        static STORE: OnceLock<ConfigStore> = OnceLock::new();
        STORE.get_or_init(ConfigStore::load)
    }

    /// Build from the current user's home directory.
    pub fn load() -> Self {
        Self::load_from(Locations::detect())
    }

    /// Build from explicit locations, reading the local override if present.
    pub fn load_from(locations: Locations) -> Self {
        let overlay = load_local_override(&locations.local_config_file());
        Self::layered(locations, overlay)
    }

    /// Merge compiled-in defaults with an overlay outcome.
    pub fn layered(locations: Locations, overlay: OverlayOutcome) -> Self {
        let base = match &overlay {
            OverlayOutcome::Applied { path, paths } => {
                info!(
                    path = %path.display(),
                    results_dir = %paths.results_dir.display(),
                    "Importing settings from local config"
                );
                paths.clone()
            }
            OverlayOutcome::Failed { path, error } => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed importing settings from local config, using defaults"
                );
                locations.compiled_defaults()
            }
            OverlayOutcome::Absent => locations.compiled_defaults(),
        };

        let base_entry = RunModeEntry {
            dataset_dir: base.dataset_dir.clone(),
            results_dir: base.results_dir.clone(),
        };
        let mut modes = BTreeMap::new();
        modes.insert(DEFAULTS_MODE.to_string(), base_entry.clone());
        modes.insert("normal".to_string(), base_entry);
        modes.insert(
            "testing".to_string(),
            RunModeEntry {
                dataset_dir: locations.tests_dataset_dir(),
                results_dir: locations.tests_results_dir(),
            },
        );
        modes.insert(
            "make_examples".to_string(),
            RunModeEntry {
                dataset_dir: locations.tests_dataset_dir(),
                results_dir: locations.example_results_dir(),
            },
        );

        Self {
            modes,
            index_file: base.index_file,
            locations,
            overlay,
        }
    }

    /// Entry for an already-canonical run-mode name.
    pub fn entry(&self, run_mode: &str) -> Option<&RunModeEntry> {
        self.modes.get(run_mode)
    }

    /// Run-mode names in stable order.
    pub fn run_modes(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    /// `INDEX_FILE` of the `defaults` entry.
    pub fn index_file(&self) -> &Path {
        &self.index_file
    }

    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn overlay(&self) -> &OverlayOutcome {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn locations(temp: &TempDir) -> Locations {
        Locations {
            package_home: temp.path().join(".ramanfit"),
            tests_root: temp.path().join("tests"),
        }
    }

    fn write_override(locations: &Locations, body: &str) {
        fs::create_dir_all(&locations.package_home).unwrap();
        fs::write(locations.local_config_file(), body).unwrap();
    }

    #[test]
    fn defaults_apply_without_override() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        let store = ConfigStore::load_from(locations.clone());

        assert!(matches!(store.overlay(), OverlayOutcome::Absent));
        let defaults = locations.compiled_defaults();
        let normal = store.entry("normal").unwrap();
        assert_eq!(normal.dataset_dir, defaults.dataset_dir);
        assert_eq!(normal.results_dir, defaults.results_dir);
        assert_eq!(store.index_file(), defaults.index_file.as_path());
        assert_eq!(store.entry(DEFAULTS_MODE), Some(normal));
    }

    #[test]
    fn override_replaces_all_three_values() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        write_override(
            &locations,
            "DATASET_DIR = \"/srv/spectra\"\nRESULTS_DIR = \"/srv/out\"\nINDEX_FILE = \"/srv/out/idx.csv\"\n",
        );
        let store = ConfigStore::load_from(locations.clone());

        assert!(store.overlay().is_applied());
        let normal = store.entry("normal").unwrap();
        assert_eq!(normal.dataset_dir, PathBuf::from("/srv/spectra"));
        assert_eq!(normal.results_dir, PathBuf::from("/srv/out"));
        assert_eq!(store.index_file(), Path::new("/srv/out/idx.csv"));
        // Testing and example modes are not overridable.
        assert_eq!(
            store.entry("testing").unwrap().dataset_dir,
            locations.tests_dataset_dir()
        );
        assert_eq!(
            store.entry("make_examples").unwrap().results_dir,
            locations.example_results_dir()
        );
    }

    #[test]
    fn extra_override_keys_are_ignored() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        write_override(
            &locations,
            "DATASET_DIR = \"/srv/spectra\"\nRESULTS_DIR = \"/srv/out\"\nINDEX_FILE = \"/srv/out/idx.csv\"\nMODEL_DIR = \"/srv/m\"\n",
        );
        let store = ConfigStore::load_from(locations);

        assert!(store.overlay().is_applied());
        assert_eq!(
            store.entry("normal").unwrap().dataset_dir,
            PathBuf::from("/srv/spectra")
        );
    }

    #[test]
    fn relative_override_paths_resolve_against_the_file() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        write_override(
            &locations,
            "DATASET_DIR = \"data\"\nRESULTS_DIR = \"out\"\nINDEX_FILE = \"out/index.csv\"\n",
        );
        let store = ConfigStore::load_from(locations.clone());
        assert_eq!(
            store.entry("normal").unwrap().dataset_dir,
            locations.package_home.join("data")
        );
    }

    #[test]
    fn partial_override_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        write_override(&locations, "DATASET_DIR = \"/srv/spectra\"\n");
        let store = ConfigStore::load_from(locations.clone());

        assert!(matches!(
            store.overlay(),
            OverlayOutcome::Failed {
                error: ConfigError::ParseToml { .. },
                ..
            }
        ));
        assert_eq!(
            store.entry("normal").unwrap().dataset_dir,
            locations.compiled_defaults().dataset_dir
        );
    }

    #[test]
    fn malformed_override_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let locations = locations(&temp);
        write_override(&locations, "DATASET_DIR = [not toml");
        let store = ConfigStore::load_from(locations.clone());
        assert!(!store.overlay().is_applied());
        assert_eq!(
            store.index_file(),
            locations.compiled_defaults().index_file.as_path()
        );
    }

    #[test]
    fn run_modes_are_listed_in_order() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::load_from(locations(&temp));
        let modes: Vec<&str> = store.run_modes().collect();
        assert_eq!(modes, vec!["defaults", "make_examples", "normal", "testing"]);
    }
}
