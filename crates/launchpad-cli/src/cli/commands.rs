use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build deployable server output
    ///
    /// Cleans the output directory, prerenders static routes for static
    /// targets, then bundles the server entry for the selected preset.
    Build(BuildArgs),

    /// Build, then rebuild whenever project files change
    Dev(DevArgs),
}

/// Options shared by every command that works on a project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Target preset (e.g. node, server, vercel, netlify, cloudflare)
    ///
    /// Falls back to LAUNCHPAD_PRESET, then to the hosting provider detected
    /// from the environment.
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Config file to load instead of discovering one in the root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host build directory, relative to the root
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Output directory template, e.g. `dist` or `{{ _host.rootDir }}/out`
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Command that compiles the bundle config, e.g. "node scripts/bundle.js"
    ///
    /// The path of the generated bundle config is appended as the last
    /// argument. Without a command only the config is written.
    #[arg(long, value_name = "COMMAND")]
    pub bundler: Option<String>,

    /// Disable minification
    #[arg(long)]
    pub no_minify: bool,

    /// Add the bundle analyzer stage
    #[arg(long)]
    pub analyze: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DevArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Quiet period before a rebuild, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub debounce: u64,
}
