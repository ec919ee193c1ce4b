//! Package home directory check.
//!
//! When the home directory is missing the caller decides how to proceed
//! through a [`HomeStrategy`]: create it outright, or ask through a
//! [`HomePrompt`] which may offer an alternate location.

use super::create_dir_if_absent;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Interactive capability used when the package home has to be created.
pub trait HomePrompt {
    /// Ask whether `path` should be created. `false` means the user wants another location.
    fn confirm_create(&mut self, path: &Path) -> io::Result<bool>;

    /// Ask for an alternate directory. `None` means nothing was chosen.
    fn choose_directory(&mut self, proposed: &Path) -> io::Result<Option<PathBuf>>;
}

pub enum HomeStrategy<'a> {
    AutoCreate,
    Prompt(&'a mut dyn HomePrompt),
}

#[derive(Debug, Error)]
pub enum HomeError {
    #[error("failed to prompt for the package home directory: {0}")]
    Prompt(#[source] io::Error),

    #[error("no alternate package home directory was chosen")]
    NoSelection,

    #[error("package home directory '{path}' could not be created: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Make sure the package home exists, returning the directory actually used.
pub fn ensure_home(path: &Path, strategy: HomeStrategy<'_>) -> Result<PathBuf, HomeError> {
    if path.is_dir() {
        info!(path = %path.display(), "Package home directory exists");
        return Ok(path.to_path_buf());
    }

    let target = match strategy {
        HomeStrategy::AutoCreate => path.to_path_buf(),
        HomeStrategy::Prompt(prompt) => {
            if prompt.confirm_create(path).map_err(HomeError::Prompt)? {
                path.to_path_buf()
            } else {
                prompt
                    .choose_directory(path)
                    .map_err(HomeError::Prompt)?
                    .filter(|chosen| !chosen.as_os_str().is_empty())
                    .ok_or(HomeError::NoSelection)?
            }
        }
    };

    warn!(path = %target.display(), "Package home directory did not exist, creating it");
    create_dir_if_absent(&target).map_err(|source| HomeError::Create {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// [`ensure_home`], exiting the process with status 1 on failure.
pub fn ensure_home_or_exit(path: &Path, strategy: HomeStrategy<'_>) -> PathBuf {
    match ensure_home(path, strategy) {
        Ok(home) => home,
        Err(err) => {
            error!(error = %err, "Package home directory unavailable, exiting");
            std::process::exit(1);
        }
    }
}

/// Line-oriented [`HomePrompt`] over any reader/writer pair.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut reply = String::new();
        if self.input.read_line(&mut reply)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a reply was given",
            ));
        }
        Ok(reply.trim().to_string())
    }
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> HomePrompt for TerminalPrompt<R, W> {
    fn confirm_create(&mut self, path: &Path) -> io::Result<bool> {
        let reply = self.ask(&format!(
            "Package home directory does not exist, it will be created at:\n  {}\nChoose yes (y) to continue or no (n) to select another directory: ",
            path.display()
        ))?;
        Ok(!reply.to_lowercase().starts_with('n'))
    }

    fn choose_directory(&mut self, _proposed: &Path) -> io::Result<Option<PathBuf>> {
        let reply = self.ask("Directory to use as package home: ")?;
        Ok((!reply.is_empty()).then(|| PathBuf::from(reply)))
    }
}
