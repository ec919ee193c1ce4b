//! Caller-supplied path overrides.

use crate::triple::{DirectoryTriple, PathKey};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Keyword overrides keyed by configuration name (`DATASET_DIR`, ...).
///
/// A value that is unset or an empty path does not override anything. Keys
/// outside the triple are accepted and ignored by [`merge`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    values: BTreeMap<String, Option<PathBuf>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        self.values.insert(normalize_key(key.into()), Some(value.into()));
        self
    }

    #[must_use]
    pub fn with_unset(mut self, key: impl Into<String>) -> Self {
        self.values.insert(normalize_key(key.into()), None);
        self
    }

    /// Record `value` for `key` when present; `None` records an unset override.
    pub fn set(&mut self, key: PathKey, value: Option<PathBuf>) {
        self.values.insert(key.as_str().to_string(), value);
    }

    /// Parse `KEY=VALUE`. Known keys are normalised to their upper-case name.
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((key, value)) = assignment.split_once('=') else {
            bail!("override '{assignment}' must look like KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("override '{assignment}' has an empty key");
        }
        let value = value.trim();
        let value = (!value.is_empty()).then(|| PathBuf::from(value));
        self.values.insert(normalize_key(key.to_string()), value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The override for `key` if it is set to a non-empty path.
    pub fn effective(&self, key: PathKey) -> Option<&PathBuf> {
        self.values
            .get(key.as_str())
            .and_then(Option::as_ref)
            .filter(|path| !path.as_os_str().is_empty())
    }

    fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|name| !PathKey::ALL.iter().any(|key| key.as_str() == *name))
    }
}

// Known keys map to their canonical upper-case name; anything else is kept as given.
fn normalize_key(key: String) -> String {
    key.parse::<PathKey>()
        .map(|known| known.as_str().to_string())
        .unwrap_or(key)
}

/// Apply `overrides` on top of `triple`, returning a new triple.
pub fn merge(triple: &DirectoryTriple, overrides: &Overrides) -> DirectoryTriple {
    let mut merged = triple.clone();
    for key in PathKey::ALL {
        if let Some(path) = overrides.effective(key) {
            merged.set(key, Some(path.clone()));
        }
    }

    for unknown in overrides.unknown_keys() {
        debug!(key = unknown, "Ignoring override for unknown key");
    }
    let changed = triple.changed_keys(&merged);
    if !changed.is_empty() {
        debug!(keys = ?changed, "Overrides replaced resolved paths");
    }
    merged
}
