//! Vercel deployment target.

use std::sync::Arc;

use launchpad_config::{ContextInput, HookArgs, Hooks, OutputInput, ResolvedContext, events};
use serde_json::json;

use super::{DeploymentTarget, EmitFile, runtime_entry};
use crate::TargetPreset;

/// Vercel deployment target
///
/// Emits the build output API layout:
/// - `functions/node/server/index.js` for the server function
/// - `static/` for public assets
/// - `config/routes.json` routing everything that is not a file to the function
pub struct VercelTarget;

impl DeploymentTarget for VercelTarget {
    fn name(&self) -> &'static str {
        "vercel"
    }

    fn preset(&self) -> TargetPreset {
        let mut hooks = Hooks::new();
        hooks
            .hook(
                events::DONE,
                Arc::new(EmitFile::new("{{ output.dir }}/config/routes.json", routes)),
            )
            .hook_fn(events::DONE, |_: &mut HookArgs<'_>| {
                tracing::info!("Run `vercel deploy --prebuilt` to deploy!");
                Ok(())
            });

        TargetPreset::Static(ContextInput {
            entry: Some(runtime_entry("vercel")),
            inline_chunks: Some(true),
            out_name: Some("index.js".to_string()),
            output: OutputInput {
                dir: Some("{{ _host.rootDir }}/.vercel_build_output".to_string()),
                server_dir: Some("{{ output.dir }}/functions/node/server".to_string()),
                public_dir: Some("{{ output.dir }}/static".to_string()),
            },
            ignore: vec!["vercel.json".to_string()],
            hooks,
            ..Default::default()
        })
    }
}

fn routes(_ctx: &ResolvedContext) -> String {
    let routes = json!([
        { "handle": "filesystem" },
        { "src": "(.*)", "dest": "/.vercel/functions/server/index" }
    ]);
    format!("{routes:#}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_config::HostOptions;
    use std::path::PathBuf;

    #[test]
    fn uses_build_output_layout() {
        let host = HostOptions::new("/app").with_runtime_dir("/runtime");
        let input = VercelTarget
            .preset()
            .apply(&ContextInput::default())
            .merge(&ContextInput::defaults());
        let ctx = ResolvedContext::from_input("vercel", &input, &host).unwrap();

        assert_eq!(
            ctx.out_file(),
            PathBuf::from("/app/.vercel_build_output/functions/node/server/index.js")
        );
        assert_eq!(ctx.output.public_dir, PathBuf::from("/app/.vercel_build_output/static"));
        assert_eq!(ctx.hooks().count(events::DONE), 2);
    }

    #[test]
    fn routes_fall_through_to_function() {
        let host = HostOptions::new("/app").with_runtime_dir("/runtime");
        let input = VercelTarget
            .preset()
            .apply(&ContextInput::default())
            .merge(&ContextInput::defaults());
        let ctx = ResolvedContext::from_input("vercel", &input, &host).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&routes(&ctx)).unwrap();
        assert_eq!(parsed[0]["handle"], "filesystem");
        assert_eq!(parsed[1]["dest"], "/.vercel/functions/server/index");
    }
}
