//! `launchpad dev`

use std::sync::Arc;
use std::time::Duration;

use launchpad_bundler::{DevSession, Orchestrator};
use launchpad_config::{HookArgs, Hooks, events};

use crate::cli::DevArgs;
use crate::commands::{bundler_for, resolve_context};
use crate::config::LoadedProject;
use crate::dev::{FileWatcher, WatchFilter};
use crate::error::Result;
use crate::ui;

/// Preset used by `dev` when neither config, env nor flags name one.
pub const DEV_PRESET: &str = "dev";

pub async fn execute(args: DevArgs) -> Result<()> {
    let mut project = LoadedProject::load(&args.project)?;
    if project.config.input.preset.is_none() {
        project.config.input.preset = Some(DEV_PRESET.to_string());
    }
    let command = project.overrides.bundler_command();
    let root = project.root.clone();
    let announce = Hooks::new().with_fn(events::COMPILED, |args: &mut HookArgs<'_>| {
        ui::success(&format!("Compiled {}", args.context.out_file().display()));
        Ok(())
    });
    let ctx = Arc::new(resolve_context(project, true)?.with_hooks(&announce));

    let filter = WatchFilter::new(&root)
        .ignore_path(&ctx.output.dir)
        .ignore_path(ctx.host.build_dir.join("launchpad"))
        .ignore_path(ctx.host.build_dir.join("views/document.template.js"))
        .allow_path(&ctx.host.build_dir)
        .ignore_globs(&ctx.ignore)?;
    let (watcher, changes) = FileWatcher::new(filter)?;

    ui::info(&format!(
        "Watching {} (preset '{}'), press Ctrl+C to stop",
        watcher.root().display(),
        ctx.preset
    ));

    // Dropping the watcher closes the change channel, which ends the session.
    let shutdown = tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        drop(watcher);
    });

    let orchestrator = Orchestrator::new(Arc::new(bundler_for(&ctx, command)));
    let summary = DevSession::new(orchestrator, Arc::clone(&ctx))
        .with_debounce(Duration::from_millis(args.debounce))
        .run(changes)
        .await;
    shutdown.abort();
    let summary = summary?;

    ui::success(&format!(
        "Dev session ended after {} builds ({} failed)",
        summary.builds, summary.failures
    ));
    Ok(())
}
