//! `launchpad build`

use std::sync::Arc;

use launchpad_bundler::Orchestrator;

use crate::cli::BuildArgs;
use crate::commands::{bundler_for, resolve_context};
use crate::config::LoadedProject;
use crate::error::Result;
use crate::ui;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let project = LoadedProject::load(&args.project)?;
    let command = project.overrides.bundler_command();
    let ctx = resolve_context(project, false)?;

    ui::info(&format!("Building for preset '{}'", ctx.preset));
    if command.is_none() {
        ui::warning("No bundler command set (--bundler); only the bundle config will be written");
    }

    let bundler = bundler_for(&ctx, command);
    let config_path = bundler.config_path().to_path_buf();
    let report = Orchestrator::new(Arc::new(bundler))
        .run_scoped(&ctx)
        .await?;

    ui::print_build_summary(&ctx.preset, &report.files, report.duration);
    ui::success(&format!(
        "Server output ready in {} (bundle config: {})",
        ctx.output.dir.display(),
        config_path.display()
    ));
    Ok(())
}
