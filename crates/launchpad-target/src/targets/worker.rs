//! Generic edge worker target.

use launchpad_config::{ContextInput, HookArgs, Hooks, OutputFormat, events};

use super::{DeploymentTarget, runtime_entry};
use crate::TargetPreset;

/// Globals a worker runtime lacks, prepended to the bundle.
pub const WORKER_POLYFILL: &str = r#"
const exports = {};
const module = { exports };
const process = { env: {} };
const global = { process };
const window = global;
const o=Date.now(),t=()=>Date.now()-o;process.hrtime=o=>{const e=Math.floor(.001*(Date.now()-t())),n=.001*t();let a=Math.floor(n)+e,r=Math.floor(n%1*1e9);return o&&(a-=o[0],r-=o[1],r<0&&(a--,r+=1e9)),[a,r]};
"#;

/// Node-API-free runtime: built-ins are mocked and the bundle is a
/// self-executing script.
pub struct WorkerTarget;

impl DeploymentTarget for WorkerTarget {
    fn name(&self) -> &'static str {
        "worker"
    }

    fn preset(&self) -> TargetPreset {
        TargetPreset::Static(ContextInput {
            entry: Some(runtime_entry("worker")),
            node: Some(false),
            hooks: Hooks::new().with_fn(events::ROLLUP_BEFORE, as_iife),
            ..Default::default()
        })
    }
}

fn as_iife(args: &mut HookArgs<'_>) -> anyhow::Result<()> {
    if let Some(bundle) = args.bundle.as_deref_mut() {
        bundle.output.intro = format!("{WORKER_POLYFILL}{}", bundle.output.intro);
        bundle.output.format = OutputFormat::Iife;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_is_node_free() {
        let input = WorkerTarget.preset().apply(&ContextInput::default());
        assert_eq!(input.node, Some(false));
        assert_eq!(input.hooks.count(events::ROLLUP_BEFORE), 1);
    }
}
