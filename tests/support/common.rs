#![allow(dead_code)]

use ramanfit::{ConfigStore, Locations, OverlayOutcome};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// Package home and tests root under one temp dir, so run modes never touch the
// real home directory or the checked-in tests/ tree.
pub struct Sandbox {
    pub temp: TempDir,
    pub locations: Locations,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to allocate sandbox");
        let locations = Locations {
            package_home: temp.path().join(".ramanfit"),
            tests_root: temp.path().join("tests"),
        };
        // Mirrors a checkout with tests/ and a prepared package home.
        fs::create_dir_all(&locations.package_home).expect("create package home");
        fs::create_dir_all(&locations.tests_root).expect("create tests root");
        Self { temp, locations }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::layered(self.locations.clone(), OverlayOutcome::Absent)
    }

    pub fn store_with_local_config(&self, body: &str) -> ConfigStore {
        fs::create_dir_all(&self.locations.package_home).expect("create package home");
        fs::write(self.locations.local_config_file(), body).expect("write local config");
        ConfigStore::load_from(self.locations.clone())
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }
}

// Sorted listing of everything below `root`, used to detect filesystem mutation.
pub fn snapshot(root: &Path) -> Vec<PathBuf> {
    let mut seen = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path.clone());
            }
            seen.push(path);
        }
    }
    seen.sort();
    seen
}

/// Run `f` with a thread-local subscriber and return the WARN messages it emitted.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let records = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(WarningCollector {
        records: Arc::clone(&records),
    });
    let output = tracing::subscriber::with_default(subscriber, f);
    let warnings = records.lock().unwrap_or_else(|err| err.into_inner()).clone();
    (output, warnings)
}

struct WarningCollector {
    records: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(visitor.message);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}
