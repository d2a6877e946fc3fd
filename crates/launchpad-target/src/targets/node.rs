//! Node.js server targets.

use launchpad_config::{ContextInput, HookArgs, Hooks, events};

use super::{DeploymentTarget, runtime_entry};
use crate::{TargetPreset, extend_preset};

/// Plain node handler bundle with built-in modules left external.
pub struct NodeTarget;

impl DeploymentTarget for NodeTarget {
    fn name(&self) -> &'static str {
        "node"
    }

    fn preset(&self) -> TargetPreset {
        TargetPreset::Static(ContextInput {
            entry: Some(runtime_entry("node")),
            node: Some(true),
            externals: Some(true),
            ..Default::default()
        })
    }
}

/// Standalone node HTTP server serving the public directory.
pub struct ServerTarget;

impl DeploymentTarget for ServerTarget {
    fn name(&self) -> &'static str {
        "server"
    }

    fn preset(&self) -> TargetPreset {
        let server = ContextInput {
            entry: Some(runtime_entry("server")),
            hooks: Hooks::new().with_fn(events::DONE, |args: &mut HookArgs<'_>| {
                tracing::info!(
                    "You can now start the server with `node {}`",
                    args.context.out_file().display()
                );
                Ok(())
            }),
            ..Default::default()
        };
        extend_preset(NodeTarget.preset(), server.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_extends_node() {
        let input = ServerTarget.preset().apply(&ContextInput::default());
        assert_eq!(input.entry.as_deref(), Some("{{ _internal.runtimeDir }}/entries/server"));
        assert_eq!(input.node, Some(true));
        assert_eq!(input.externals, Some(true));
        assert_eq!(input.hooks.count(events::DONE), 1);
    }
}
