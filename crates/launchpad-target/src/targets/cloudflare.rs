//! Cloudflare Workers deployment target.

use launchpad_config::{ContextInput, HookArgs, Hooks, events};

use super::{DeploymentTarget, WorkerTarget, runtime_entry};
use crate::{TargetPreset, extend_preset};

/// Cloudflare Workers deployment target
///
/// Worker bundle plus the KV asset handler entry. `wrangler.toml` is managed
/// by the user and excluded from generated output.
pub struct CloudflareTarget;

impl DeploymentTarget for CloudflareTarget {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    fn preset(&self) -> TargetPreset {
        let cloudflare = ContextInput {
            entry: Some(runtime_entry("cloudflare")),
            ignore: vec!["wrangler.toml".to_string()],
            hooks: Hooks::new().with_fn(events::DONE, |_: &mut HookArgs<'_>| {
                tracing::info!("Run `wrangler publish` to deploy your worker!");
                Ok(())
            }),
            ..Default::default()
        };
        extend_preset(WorkerTarget.preset(), cloudflare.into())
    }
}
