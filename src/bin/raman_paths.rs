//! Resolve and prepare the pipeline directories from the command line.
//!
//! Usage:
//!   raman-paths resolve testing
//!   raman-paths resolve normal --dataset-dir /data/spectra
//!   raman-paths resolve make_index --set RESULTS_DIR=/tmp/out
//!   raman-paths home --yes
//!   raman-paths modes
//!   raman-paths definitions --dir default_models
//!   raman-paths definitions --keys

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ramanfit::config::{Locations, default_models_dir};
use ramanfit::lifecycle::{HomeStrategy, TerminalPrompt, ensure_home_or_exit};
use ramanfit::{
    ConfigStore, OverlayOutcome, Overrides, PathKey, RUN_MODE_ALIASES, get_directory_paths_for_run_mode,
    load_definitions_from,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "raman-paths")]
#[command(about = "Resolve dataset, results and index locations for a run mode")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the directory triple for a run mode as JSON.
    Resolve {
        /// Run mode name or alias (normal, testing, make_examples, make_index, ...).
        #[arg(default_value = "")]
        run_mode: String,
        /// Override DATASET_DIR.
        #[arg(long)]
        dataset_dir: Option<PathBuf>,
        /// Override RESULTS_DIR.
        #[arg(long)]
        results_dir: Option<PathBuf>,
        /// Override INDEX_FILE.
        #[arg(long)]
        index_file: Option<PathBuf>,
        /// Additional KEY=VALUE override; may repeat.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
    /// Make sure the package home directory exists.
    Home {
        /// Create without asking.
        #[arg(long)]
        yes: bool,
        /// Package home to check instead of the default.
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// List run modes, aliases and where the local override is read from.
    Modes,
    /// Print merged model and peak definitions as JSON.
    Definitions {
        /// Directory of *.toml definition files.
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Print only the top-level definition names.
        #[arg(long)]
        keys: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Resolve {
            run_mode,
            dataset_dir,
            results_dir,
            index_file,
            assignments,
        } => {
            let mut overrides = Overrides::new();
            for assignment in &assignments {
                overrides.parse_assignment(assignment)?;
            }
            for (key, value) in [
                (PathKey::DatasetDir, dataset_dir),
                (PathKey::ResultsDir, results_dir),
                (PathKey::IndexFile, index_file),
            ] {
                if value.is_some() {
                    overrides.set(key, value);
                }
            }
            let triple = get_directory_paths_for_run_mode(&run_mode, &overrides)?;
            print_json(&triple)
        }
        Command::Home { yes, path } => {
            let path = path.unwrap_or_else(|| Locations::detect().package_home);
            let home = if yes {
                ensure_home_or_exit(&path, HomeStrategy::AutoCreate)
            } else {
                let mut prompt = TerminalPrompt::stdio();
                ensure_home_or_exit(&path, HomeStrategy::Prompt(&mut prompt))
            };
            println!("{}", home.display());
            Ok(())
        }
        Command::Modes => {
            let store = ConfigStore::global();
            for mode in store.run_modes() {
                println!("{mode}");
            }
            for (alias, target) in RUN_MODE_ALIASES {
                println!("{alias} -> {target}");
            }
            let locations = store.locations();
            let overlay = match store.overlay() {
                OverlayOutcome::Absent => "absent",
                OverlayOutcome::Applied { .. } => "applied",
                OverlayOutcome::Failed { .. } => "failed",
            };
            println!("package home: {}", locations.package_home.display());
            println!(
                "local config: {} ({overlay})",
                locations.local_config_file().display()
            );
            Ok(())
        }
        Command::Definitions { dir, keys } => {
            let dir = dir.unwrap_or_else(default_models_dir);
            let definitions = load_definitions_from(&dir)
                .with_context(|| format!("loading definitions from {}", dir.display()))?;
            if keys {
                for key in definitions.keys() {
                    println!("{key}");
                }
                return Ok(());
            }
            print_json(definitions.as_table())
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
