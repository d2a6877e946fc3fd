//! Command-line interface definition.
//!
//! - `launchpad build` - resolve the target preset and produce deployable output
//! - `launchpad dev` - build, then rebuild on file changes

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, Command, DevArgs, ProjectArgs};

/// launchpad - target-based server bundles
#[derive(Parser, Debug)]
#[command(
    name = "launchpad",
    version,
    about = "Bundle a server-rendered app for a deployment target",
    long_about = "launchpad resolves a deployment target preset (node, vercel, netlify,\n\
                  cloudflare, ...), assembles the server bundle configuration and\n\
                  drives the bundler, writing output ready to deploy."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
