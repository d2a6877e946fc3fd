//! Browser service worker deployment target.

use std::sync::Arc;

use launchpad_config::{ContextInput, Hooks, OutputInput, ResolvedContext, events};

use super::{DeploymentTarget, EmitFile, WorkerTarget, runtime_entry};
use crate::{TargetPreset, extend_preset};

/// Browser deployment target
///
/// Runs the server bundle inside a service worker. The bundle is emitted under
/// the public directory, next to a registration page and worker script.
pub struct BrowserTarget;

impl DeploymentTarget for BrowserTarget {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn preset(&self) -> TargetPreset {
        let mut hooks = Hooks::new();
        hooks
            .hook(
                events::DONE,
                Arc::new(EmitFile::new("{{ output.publicDir }}/sw.js", service_worker)),
            )
            .hook(
                events::DONE,
                Arc::new(EmitFile::new("{{ output.publicDir }}/index.html", loader_page)),
            );

        let browser = ContextInput {
            entry: Some(runtime_entry("service-worker")),
            output: OutputInput {
                server_dir: Some("{{ output.dir }}/public/_server".to_string()),
                ..Default::default()
            },
            hooks,
            ..Default::default()
        };
        extend_preset(WorkerTarget.preset(), browser.into())
    }
}

fn script_url(ctx: &ResolvedContext) -> String {
    let base = ctx.host.router_base.trim_end_matches('/');
    format!("{base}/_server/{}", ctx.out_name)
}

fn service_worker(ctx: &ResolvedContext) -> String {
    format!("importScripts('{}');\n", script_url(ctx))
}

fn loader_page(ctx: &ResolvedContext) -> String {
    let base = ctx.host.router_base.trim_end_matches('/');
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Loading...</title></head>
<body>
<script>
if ('serviceWorker' in navigator) {{
  navigator.serviceWorker.register('{base}/sw.js').then(() => window.location.reload())
}} else {{
  document.body.textContent = 'Service workers are not supported in this browser.'
}}
</script>
</body>
</html>
"#
    )
}
