//! Run-mode resolution.
//!
//! Run modes are table-driven: the alias table maps alternate spellings to
//! canonical names and the [`ConfigStore`] holds one entry per canonical name.
//! Adding a mode means adding a row, not a branch.

use crate::config::ConfigStore;
use crate::triple::DirectoryTriple;
use tracing::{debug, warn};

/// Alternate run-mode spellings and the canonical entry they read from.
pub const RUN_MODE_ALIASES: &[(&str, &str)] = &[("make_index", "normal"), ("debug", "testing")];

/// Lower-case `run_mode` and follow the alias table; unknown names pass through.
pub fn canonical_run_mode(run_mode: &str) -> String {
    let lowered = run_mode.to_lowercase();
    RUN_MODE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, target)| (*target).to_string())
        .unwrap_or(lowered)
}

pub struct RunModeResolver<'a> {
    store: &'a ConfigStore,
}

impl<'a> RunModeResolver<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    /// Map a run mode to its directory triple.
    ///
    /// An unrecognised mode logs one warning and leaves the dataset and
    /// results directories unset. `INDEX_FILE` always comes from `defaults`.
    pub fn resolve(&self, run_mode: &str) -> DirectoryTriple {
        let canonical = canonical_run_mode(run_mode);
        let (dataset_dir, results_dir) = match self.store.entry(&canonical) {
            Some(entry) => {
                debug!(run_mode, canonical = %canonical, "Resolved run mode");
                (Some(entry.dataset_dir.clone()), Some(entry.results_dir.clone()))
            }
            None => {
                warn!(run_mode, "Run mode not recognized, dataset and results directories unset");
                (None, None)
            }
        };

        DirectoryTriple {
            results_dir,
            dataset_dir,
            index_file: Some(self.store.index_file().to_path_buf()),
        }
    }
}
