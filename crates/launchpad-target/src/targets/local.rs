//! Unminified node builds used for local preview and development.

use launchpad_config::{ContextInput, OutputInput};

use super::{DeploymentTarget, NodeTarget, runtime_entry};
use crate::{TargetPreset, extend_preset};

pub struct LocalTarget;

impl DeploymentTarget for LocalTarget {
    fn name(&self) -> &'static str {
        "local"
    }

    fn preset(&self) -> TargetPreset {
        let local = ContextInput {
            entry: Some(runtime_entry("local")),
            minify: Some(false),
            inline_chunks: Some(true),
            log_startup: Some(false),
            ..Default::default()
        };
        extend_preset(NodeTarget.preset(), local.into())
    }
}

/// Build used by `launchpad dev`: output lives under the host build directory.
pub struct DevTarget;

impl DeploymentTarget for DevTarget {
    fn name(&self) -> &'static str {
        "dev"
    }

    fn preset(&self) -> TargetPreset {
        let dev = ContextInput {
            entry: Some(runtime_entry("dev")),
            timing: Some(false),
            output: OutputInput {
                dir: Some("{{ _host.buildDir }}/launchpad".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        extend_preset(LocalTarget.preset(), dev.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_keeps_local_flags() {
        let input = DevTarget.preset().apply(&ContextInput::default());
        assert_eq!(input.minify, Some(false));
        assert_eq!(input.log_startup, Some(false));
        assert_eq!(input.externals, Some(true));
        assert_eq!(input.output.dir.as_deref(), Some("{{ _host.buildDir }}/launchpad"));
        assert_eq!(input.entry.as_deref(), Some("{{ _internal.runtimeDir }}/entries/dev"));
    }
}
