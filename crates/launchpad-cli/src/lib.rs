//! launchpad CLI.
//!
//! - [`cli`] - clap argument definitions
//! - [`config`] - project config loading with env and flag overrides
//! - [`commands`] - `build` and `dev`
//! - [`dev`] - file watching for `dev`
//! - [`error`] - [`CliError`] and miette reporting
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal messages and summaries

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
