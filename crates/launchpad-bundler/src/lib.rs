//! # launchpad-bundler
//!
//! Turns user options into deployable server bundles.
//!
//! ## Pipeline
//!
//! 1. [`ContextResolver`] merges user input, the selected target preset and
//!    system defaults into a frozen [`ResolvedContext`].
//! 2. [`build_bundle_config`] derives the bundler-facing [`BundleConfig`].
//! 3. [`Orchestrator`] runs the `prepare`, `generate` and `build` phases,
//!    firing lifecycle hooks around each and handing the config to a
//!    [`Bundler`].
//! 4. [`DevSession`] rebuilds on file changes.
//!
//! ```no_run
//! use std::sync::Arc;
//! use launchpad_bundler::{ContextResolver, ExternalBundler, Orchestrator};
//! use launchpad_config::{ContextInput, HostOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = HostOptions::new("/app");
//! let ctx = ContextResolver::new().resolve(&host, ContextInput::with_preset("node"))?;
//! let bundler = ExternalBundler::for_context(&ctx);
//! Orchestrator::new(Arc::new(bundler)).run_scoped(&ctx).await?;
//! # Ok(()) }
//! ```

pub mod build;
pub mod builder;
pub mod bundler;
pub mod context;
pub mod dev;
pub mod fs;

pub use build::{BuildPhase, BuildReport, Orchestrator, Prerenderer};
pub use builder::{NODE_BUILTINS, build_bundle_config};
pub use bundler::{BundleOutput, Bundler, ExternalBundler};
pub use context::{ContextResolver, default_runtime_dir};
pub use dev::{DEFAULT_DEBOUNCE, DevSession, DevSummary};

pub use launchpad_config::{BundleConfig, ConfigError, HookError, ResolvedContext};

/// Error types for launchpad-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Context resolution failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A module the bundle depends on could not be found.
    #[error("Cannot resolve '{specifier}' (searched: {searched})")]
    Resolution { specifier: String, searched: String },

    /// The bundler rejected the input.
    #[error("Compilation failed: {0}")]
    Compilation(String),

    /// A lifecycle hook handler failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// The prerenderer failed for a route.
    #[error("Prerendering '{route}' failed: {source}")]
    Prerender {
        route: String,
        #[source]
        source: anyhow::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for launchpad-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }

    /// Whether a dev session may keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(ConfigError::UnknownPreset(_)) => "UNKNOWN_PRESET",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Resolution { .. } => "RESOLUTION_ERROR",
            Error::Compilation(_) => "COMPILATION_ERROR",
            Error::Hook(_) => "HOOK_ERROR",
            Error::Prerender { .. } => "PRERENDER_ERROR",
            Error::Io(_) | Error::IoError { .. } => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(ConfigError::UnknownPreset(name)) => Some(Box::new(format!(
                "No built-in preset is named '{}' and no '{}.toml' or '{}.json' was found in the project root.\nBuilt-in presets: {}",
                name,
                name,
                name,
                launchpad_target::PresetRegistry::with_builtins()
                    .names()
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
            Error::Resolution { specifier, .. } if specifier == "~renderer" => Some(Box::new(
                "Check the `renderer` option. It must name a file under the runtime `ssr/` directory.",
            )),
            Error::Resolution { .. } => Some(Box::new(
                "Check that the file exists and the path is correct.",
            )),
            Error::Compilation(_) => Some(Box::new(
                "The bundler reported errors in the application code. Fix them and rebuild.",
            )),
            Error::Hook(err) => Some(Box::new(format!(
                "A handler registered for '{}' failed; the remaining build steps were skipped.",
                err.event
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn unknown_preset_has_code_and_help() {
        let err = Error::from(ConfigError::UnknownPreset("nope".into()));
        assert_eq!(err.code().unwrap().to_string(), "UNKNOWN_PRESET");
        let help = err.help().unwrap().to_string();
        assert!(help.contains("nope.toml"));
        assert!(help.contains("node"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn compilation_errors_are_recoverable() {
        assert!(Error::Compilation("syntax".into()).is_recoverable());
    }
}
