//! Command implementations.

pub mod build;
pub mod dev;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;

use launchpad_bundler::{ContextResolver, ExternalBundler, ResolvedContext};

use crate::config::LoadedProject;
use crate::error::Result;

/// Resolve the build context for a loaded project.
pub(crate) fn resolve_context(project: LoadedProject, dev: bool) -> Result<ResolvedContext> {
    let mut config = project.config;
    config.host.dev = dev;

    let ctx = ContextResolver::new().resolve(&config.host, config.input)?;
    tracing::debug!(preset = %ctx.preset, out = %ctx.out_file().display(), "context ready");
    Ok(ctx)
}

pub(crate) fn bundler_for(ctx: &ResolvedContext, command: Option<Vec<String>>) -> ExternalBundler {
    let bundler = ExternalBundler::for_context(ctx);
    match command {
        Some(command) => bundler.with_command(command),
        None => bundler,
    }
}
