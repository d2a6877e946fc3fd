//! CLI error types.
//!
//! [`CliError`] wraps failures from configuration loading, the bundler
//! pipeline and file watching. [`into_report`] turns it into a miette
//! report, keeping the bundler's diagnostic codes and help text.

use std::path::PathBuf;

use launchpad_bundler::Error as BundlerError;
use launchpad_config::ConfigError;
use miette::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Project config or context resolution failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Env or CLI overrides could not be extracted
    #[error("Invalid setting: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// The build pipeline failed
    #[error(transparent)]
    Build(#[from] BundlerError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Settings(Box::new(err))
    }
}

/// Convert to a miette report for display in `main`.
pub fn into_report(err: CliError) -> Report {
    match err {
        CliError::Build(err) => Report::new(err),
        CliError::Config(err) => Report::new(BundlerError::Config(err)),
        CliError::Settings(err) => miette::miette!(
            help = "LAUNCHPAD_* variables must hold values of the right type, e.g. LAUNCHPAD_MINIFY=false",
            "{err}"
        ),
        CliError::DirectoryNotFound(path) => miette::miette!(
            help = "Pass the project directory with --root",
            "Directory not found: {}",
            path.display()
        ),
        other => miette::miette!("{other}"),
    }
}
