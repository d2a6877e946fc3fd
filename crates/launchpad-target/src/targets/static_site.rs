//! Fully prerendered static output.

use launchpad_config::{ContextInput, HookArgs, Hooks, events};

use super::{DeploymentTarget, NodeTarget, runtime_entry};
use crate::{TargetPreset, extend_preset};

/// Static hosting target
///
/// Builds a node renderer that `generate` uses to prerender every route in
/// `staticRoutes` into the public directory. Only the public directory needs
/// deploying.
pub struct StaticTarget;

impl DeploymentTarget for StaticTarget {
    fn name(&self) -> &'static str {
        "static"
    }

    fn preset(&self) -> TargetPreset {
        let static_site = ContextInput {
            entry: Some(runtime_entry("static")),
            static_site: Some(true),
            static_routes: vec!["/".to_string()],
            hooks: Hooks::new().with_fn(events::DONE, |args: &mut HookArgs<'_>| {
                tracing::info!(
                    "Serve `{}` with any static file server",
                    args.context.output.public_dir.display()
                );
                Ok(())
            }),
            ..Default::default()
        };
        extend_preset(NodeTarget.preset(), static_site.into())
    }
}
