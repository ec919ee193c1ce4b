//! Bundled model and peak definitions.
//!
//! Each `*.toml` file in the definitions directory contributes its top-level
//! tables to one mapping. Files are read in file-name order and a later file
//! replaces any key an earlier one defined. The content is opaque here; the
//! deconvolution side interprets it.

use super::{ConfigError, default_models_dir};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelDefinitions {
    table: toml::Table,
}

impl ModelDefinitions {
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_table(&self) -> &toml::Table {
        &self.table
    }

    fn absorb(&mut self, source: &Path, incoming: toml::Table) {
        for (key, value) in incoming {
            if self.table.insert(key.clone(), value).is_some() {
                debug!(key = %key, path = %source.display(), "Definition key overwritten");
            }
        }
    }
}

/// Definitions from the bundled `default_models/` directory, loaded once.
pub fn default_definitions() -> Result<&'static ModelDefinitions, ConfigError> {
    static DEFINITIONS: OnceLock<ModelDefinitions> = OnceLock::new();
    if let Some(loaded) = DEFINITIONS.get() {
        return Ok(loaded);
    }
    let loaded = load_definitions_from(&default_models_dir())?;
    Ok(DEFINITIONS.get_or_init(|| loaded))
}

/// Merge every `*.toml` file directly inside `dir`.
///
/// A missing directory yields an empty mapping; an unreadable or invalid file
/// is an error naming that file.
pub fn load_definitions_from(dir: &Path) -> Result<ModelDefinitions, ConfigError> {
    let mut definitions = ModelDefinitions::default();
    if !dir.is_dir() {
        debug!(path = %dir.display(), "Definitions directory missing");
        return Ok(definitions);
    }

    for path in definition_files(dir)? {
        let raw = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
        let table: toml::Table =
            toml::from_str(&raw).map_err(|e| ConfigError::parse_toml(&path, e))?;
        definitions.absorb(&path, table);
    }
    Ok(definitions)
}

fn definition_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|e| ConfigError::read_dir(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ConfigError::read_dir(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
