//! Built-in deployment targets.

pub mod browser;
pub mod cloudflare;
pub mod lambda;
pub mod local;
pub mod netlify;
pub mod node;
pub mod static_site;
pub mod vercel;
pub mod worker;

pub use browser::BrowserTarget;
pub use cloudflare::CloudflareTarget;
pub use lambda::LambdaTarget;
pub use local::{DevTarget, LocalTarget};
pub use netlify::NetlifyTarget;
pub use node::{NodeTarget, ServerTarget};
pub use static_site::StaticTarget;
pub use vercel::VercelTarget;
pub use worker::WorkerTarget;

use std::path::PathBuf;

use async_trait::async_trait;
use launchpad_config::{HookArgs, HookHandler, ResolvedContext};

/// A built-in target: a stable name and the preset it registers.
///
/// Producing the preset has no side effects. Anything a target does to the
/// filesystem or the terminal happens inside its hook handlers.
pub trait DeploymentTarget: Send + Sync {
    fn name(&self) -> &'static str;

    fn preset(&self) -> crate::TargetPreset;
}

/// Every built-in target, in registration order.
pub fn builtin_targets() -> Vec<Box<dyn DeploymentTarget>> {
    vec![
        Box::new(NodeTarget),
        Box::new(ServerTarget),
        Box::new(LocalTarget),
        Box::new(DevTarget),
        Box::new(WorkerTarget),
        Box::new(CloudflareTarget),
        Box::new(BrowserTarget),
        Box::new(LambdaTarget),
        Box::new(NetlifyTarget),
        Box::new(VercelTarget),
        Box::new(StaticTarget),
    ]
}

/// Template for a runtime entry module.
pub(crate) fn runtime_entry(name: &str) -> String {
    format!("{{{{ _internal.runtimeDir }}}}/entries/{name}")
}

/// Hook handler writing a generated file.
///
/// The path is a template resolved against the context when the hook fires.
pub(crate) struct EmitFile {
    path: String,
    contents: fn(&ResolvedContext) -> String,
}

impl EmitFile {
    pub(crate) fn new(path: impl Into<String>, contents: fn(&ResolvedContext) -> String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }

    fn target(&self, ctx: &ResolvedContext) -> anyhow::Result<PathBuf> {
        Ok(ctx.resolve_path(&self.path)?)
    }
}

#[async_trait]
impl HookHandler for EmitFile {
    async fn call(&self, args: &mut HookArgs<'_>) -> anyhow::Result<()> {
        let path = self.target(args.context)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, (self.contents)(args.context)).await?;
        tracing::info!(path = %path.display(), "Generated");
        Ok(())
    }
}
