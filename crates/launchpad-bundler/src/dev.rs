//! Dev-mode rebuild loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use launchpad_config::{HookArgs, ResolvedContext, events};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::build::{BuildPhase, Orchestrator};
use crate::Result;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Counts for a finished dev session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DevSummary {
    /// Build attempts, including the initial one.
    pub builds: usize,
    pub failures: usize,
}

/// Rebuilds a context whenever files change.
///
/// Change events are debounced: after the first event the session keeps
/// collecting until the channel has been quiet for the debounce window, then
/// runs one rebuild. Builds run inline, so at most one is in flight, and
/// events that arrive during a build are folded into the next one.
///
/// Recoverable errors (compilation, resolution, hook failures) are logged and
/// the session keeps watching. Configuration errors end it.
pub struct DevSession {
    orchestrator: Orchestrator,
    ctx: Arc<ResolvedContext>,
    debounce: Duration,
}

impl DevSession {
    pub fn new(orchestrator: Orchestrator, ctx: Arc<ResolvedContext>) -> Self {
        Self {
            orchestrator,
            ctx,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Build once, then rebuild on changes until `changes` closes. `close`
    /// hooks run on every exit path.
    pub async fn run(mut self, changes: mpsc::Receiver<PathBuf>) -> Result<DevSummary> {
        let result = self.watch(changes).await;
        let closed = self.orchestrator.close(&self.ctx).await;
        let summary = result?;
        closed?;
        Ok(summary)
    }

    async fn watch(&mut self, mut changes: mpsc::Receiver<PathBuf>) -> Result<DevSummary> {
        let mut summary = DevSummary::default();

        self.orchestrator.prepare(&self.ctx).await?;
        self.rebuild(&mut summary).await?;

        loop {
            self.orchestrator.set_phase(BuildPhase::Watching);
            let Some(first) = changes.recv().await else {
                break;
            };

            let mut changed = vec![first];
            let mut open = true;
            loop {
                match timeout(self.debounce, changes.recv()).await {
                    Ok(Some(path)) => changed.push(path),
                    Ok(None) => {
                        open = false;
                        break;
                    }
                    Err(_) => break,
                }
            }

            changed.sort();
            changed.dedup();
            tracing::info!(
                files = changed.len(),
                first = %changed[0].display(),
                "Change detected, rebuilding"
            );
            self.rebuild(&mut summary).await?;

            if !open {
                break;
            }
        }

        tracing::debug!(builds = summary.builds, failures = summary.failures, "dev session ended");
        Ok(summary)
    }

    async fn rebuild(&mut self, summary: &mut DevSummary) -> Result<()> {
        summary.builds += 1;
        match self.build_once().await {
            Ok(()) => Ok(()),
            Err(err) if err.is_recoverable() => {
                summary.failures += 1;
                tracing::error!(error = %err, "Rebuild failed; waiting for changes");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn build_once(&mut self) -> Result<()> {
        let report = self.orchestrator.build(&self.ctx).await?;
        self.ctx
            .host_hooks()
            .call(events::DEV_COMPILED, &mut HookArgs::new(&self.ctx))
            .await?;
        tracing::info!(
            out = %report.out_file.display(),
            elapsed_ms = report.duration.as_millis() as u64,
            "Dev server rebuilt"
        );
        Ok(())
    }
}
