//! Netlify functions target.

use std::sync::Arc;

use launchpad_config::{ContextInput, Hooks, OutputInput, ResolvedContext, events};

use super::{DeploymentTarget, EmitFile, LambdaTarget};
use crate::{TargetPreset, extend_preset};

/// Netlify functions deployment target
///
/// A lambda handler emitted into Netlify's functions directory, with static
/// assets in `dist/` and a catch-all `_redirects` rule routing to the function.
pub struct NetlifyTarget;

impl DeploymentTarget for NetlifyTarget {
    fn name(&self) -> &'static str {
        "netlify"
    }

    fn preset(&self) -> TargetPreset {
        let mut hooks = Hooks::new();
        hooks.hook(
            events::DONE,
            Arc::new(EmitFile::new("{{ output.publicDir }}/_redirects", redirects)),
        );

        let netlify = ContextInput {
            output: OutputInput {
                dir: Some("{{ _host.rootDir }}/.netlify/functions-internal".to_string()),
                server_dir: Some("{{ output.dir }}".to_string()),
                public_dir: Some("{{ _host.rootDir }}/dist".to_string()),
            },
            ignore: vec!["netlify.toml".to_string(), "_redirects".to_string()],
            hooks,
            ..Default::default()
        };
        extend_preset(LambdaTarget.preset(), netlify.into())
    }
}

fn redirects(ctx: &ResolvedContext) -> String {
    let function = ctx
        .out_name
        .strip_suffix(".js")
        .unwrap_or(&ctx.out_name)
        .to_string();
    format!("/*    /.netlify/functions/{function} 200\n")
}
