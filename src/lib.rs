//! Directory and configuration resolution for the Raman fitting pipeline.
//!
//! A run mode (`normal`, `testing`, `make_examples`, or an alias such as
//! `make_index`) selects a dataset directory, a results directory and the
//! index file path. [`get_paths`] resolves the mode against the layered
//! [`ConfigStore`], applies caller [`Overrides`], prepares the directories and
//! returns the final [`DirectoryTriple`].

pub mod config;
pub mod lifecycle;
pub mod overrides;
pub mod run_mode;
pub mod triple;

pub use config::{
    ConfigError, ConfigStore, Locations, ModelDefinitions, OverlayOutcome, default_definitions,
    load_definitions_from,
};
pub use lifecycle::{DatasetStatus, HomePrompt, HomeStrategy, ensure, ensure_home};
pub use overrides::{Overrides, merge};
pub use run_mode::{RUN_MODE_ALIASES, RunModeResolver, canonical_run_mode};
pub use triple::{DirectoryTriple, PathKey};

use anyhow::Result;

/// Resolve `run_mode` against `store`, apply `overrides` and prepare the directories.
///
/// Unrecognised modes and dataset problems are logged, not returned; the
/// triple then carries unset directories. The only error is a results
/// directory that cannot be created.
pub fn get_paths(
    store: &ConfigStore,
    run_mode: &str,
    overrides: &Overrides,
) -> Result<DirectoryTriple> {
    prepare_paths(store, run_mode, overrides).map(|(triple, _)| triple)
}

/// [`get_paths`], also returning what happened to the dataset directory.
///
/// A dataset directory that could not be created or listed is cleared from
/// the triple; [`DatasetStatus::needs_restart`] tells callers a fresh empty
/// directory was just created.
pub fn prepare_paths(
    store: &ConfigStore,
    run_mode: &str,
    overrides: &Overrides,
) -> Result<(DirectoryTriple, DatasetStatus)> {
    let mut triple = RunModeResolver::new(store).resolve(run_mode);
    if !overrides.is_empty() {
        triple = merge(&triple, overrides);
    }
    let dataset = ensure(triple.dataset_dir.as_deref(), triple.results_dir.as_deref())?;
    if !dataset.is_usable() {
        triple.dataset_dir = None;
    }
    Ok((triple, dataset))
}

/// [`get_paths`] against the process-wide [`ConfigStore::global`].
pub fn get_directory_paths_for_run_mode(
    run_mode: &str,
    overrides: &Overrides,
) -> Result<DirectoryTriple> {
    get_paths(ConfigStore::global(), run_mode, overrides)
}
