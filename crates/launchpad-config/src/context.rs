//! The resolved, immutable build context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::hooks::Hooks;
use crate::input::ContextInput;
use crate::middleware::MiddlewareDescriptor;
use crate::template;

/// Options owned by the host application invoking the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostOptions {
    pub dev: bool,
    pub root_dir: PathBuf,
    /// Host build directory; relative values are taken from `root_dir`.
    pub build_dir: PathBuf,
    pub static_dir: PathBuf,
    pub router_base: String,
    pub public_path: String,
    pub full_static: bool,
    pub static_assets: StaticAssets,
    /// Overrides the directory holding runtime entries, mocks and renderers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_dir: Option<PathBuf>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            dev: false,
            root_dir: PathBuf::from("."),
            build_dir: PathBuf::from(".nuxt"),
            static_dir: PathBuf::from("static"),
            router_base: "/".to_string(),
            public_path: "/_nuxt/".to_string(),
            full_static: false,
            static_assets: StaticAssets::default(),
            runtime_dir: None,
        }
    }
}

impl HostOptions {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    pub fn with_runtime_dir(mut self, runtime_dir: impl Into<PathBuf>) -> Self {
        self.runtime_dir = Some(runtime_dir.into());
        self
    }

    /// Copy with every directory made absolute and normalized.
    pub fn normalized(&self) -> Result<Self> {
        let root_dir = std::path::absolute(&self.root_dir)?.clean();
        let under_root = |path: &Path| root_dir.join(path).clean();

        Ok(Self {
            build_dir: under_root(&self.build_dir),
            static_dir: under_root(&self.static_dir),
            runtime_dir: self.runtime_dir.as_deref().map(under_root),
            root_dir: root_dir.clone(),
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticAssets {
    pub base: String,
    pub version_base: String,
    pub dir: String,
    pub version: String,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            base: "/_nuxt/static".to_string(),
            version_base: "/_nuxt/static".to_string(),
            dir: "static".to_string(),
            version: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub server_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalContext {
    pub runtime_dir: PathBuf,
    #[serde(skip)]
    pub hooks: Arc<Hooks>,
    #[serde(skip)]
    pub host_hooks: Arc<Hooks>,
}

/// Fully merged configuration driving one build.
///
/// Produced once by the resolver and never patched in place afterwards;
/// share it as `Arc<ResolvedContext>`. Every path field is absolute.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContext {
    pub preset: String,
    pub timing: bool,
    pub inline_chunks: bool,
    pub minify: bool,
    pub externals: bool,
    pub analyze: bool,
    pub log_startup: bool,
    pub entry: PathBuf,
    pub node: bool,
    #[serde(rename = "static")]
    pub static_site: bool,
    pub renderer: String,
    pub out_name: String,
    pub middleware: Vec<MiddlewareDescriptor>,
    pub ignore: Vec<String>,
    pub static_routes: Vec<String>,
    pub replace: IndexMap<String, String>,
    pub output: OutputPaths,
    #[serde(rename = "_host")]
    pub host: HostOptions,
    #[serde(rename = "_internal")]
    pub internal: InternalContext,
}

impl ResolvedContext {
    /// Freeze a fully merged input into a context.
    ///
    /// Path templates are resolved in a fixed order, each against the context
    /// as populated so far: `output.dir`, `output.publicDir`,
    /// `output.serverDir`, then `entry`.
    pub fn from_input(preset: &str, input: &ContextInput, host: &HostOptions) -> Result<Self> {
        let host = host.normalized()?;
        let runtime_dir = host
            .runtime_dir
            .clone()
            .ok_or_else(|| ConfigError::MissingValue("_host.runtimeDir".to_string()))?;

        let required = |value: &Option<String>, field: &str| {
            value
                .clone()
                .ok_or_else(|| ConfigError::MissingValue(field.to_string()))
        };
        let dir = required(&input.output.dir, "output.dir")?;
        let public_dir = required(&input.output.public_dir, "output.publicDir")?;
        let server_dir = required(&input.output.server_dir, "output.serverDir")?;
        let entry = required(&input.entry, "entry")?;

        for (field, value) in [
            ("output.dir", &dir),
            ("output.publicDir", &public_dir),
            ("output.serverDir", &server_dir),
            ("entry", &entry),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "path must not be empty"));
            }
        }

        let mut ctx = Self {
            preset: preset.to_string(),
            timing: input.timing.unwrap_or(true),
            inline_chunks: input.inline_chunks.unwrap_or(true),
            minify: input.minify.unwrap_or(true),
            externals: input.externals.unwrap_or(false),
            analyze: input.analyze.unwrap_or(false),
            log_startup: input.log_startup.unwrap_or(false),
            entry: PathBuf::from(&entry),
            node: input.node.unwrap_or(true),
            static_site: input.static_site.unwrap_or(false),
            renderer: input.renderer.clone().unwrap_or_else(|| "vue2".to_string()),
            out_name: input.out_name.clone().unwrap_or_else(|| "server.js".to_string()),
            middleware: input.middleware.clone(),
            ignore: input.ignore.clone(),
            static_routes: input.static_routes.clone(),
            replace: input.replace.clone(),
            output: OutputPaths {
                dir: PathBuf::from(&dir),
                server_dir: PathBuf::from(&server_dir),
                public_dir: PathBuf::from(&public_dir),
            },
            host,
            internal: InternalContext {
                runtime_dir,
                hooks: Arc::new(input.hooks.clone()),
                host_hooks: Arc::new(input.host_hooks.clone()),
            },
        };

        for descriptor in &ctx.middleware {
            descriptor.validate()?;
        }

        ctx.output.dir = ctx.resolve_path(&dir)?;
        ctx.output.public_dir = ctx.resolve_path(&public_dir)?;
        ctx.output.server_dir = ctx.resolve_path(&server_dir)?;
        ctx.entry = ctx.resolve_path(&entry)?;

        Ok(ctx)
    }

    /// The camelCase JSON view placeholders are looked up in.
    pub fn template_params(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::invalid("context", e))
    }

    /// Compile a path template against this context and make it absolute
    /// relative to the project root.
    pub fn resolve_path(&self, path: &str) -> Result<PathBuf> {
        let params = self.template_params()?;
        Ok(template::resolve_path(path, &params, &self.host.root_dir))
    }

    pub fn target(&self) -> &str {
        &self.preset
    }

    pub fn hooks(&self) -> &Hooks {
        &self.internal.hooks
    }

    pub fn host_hooks(&self) -> &Hooks {
        &self.internal.host_hooks
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.internal.runtime_dir
    }

    /// `<output.serverDir>/<outName>`
    pub fn out_file(&self) -> PathBuf {
        self.output.server_dir.join(&self.out_name)
    }

    /// New context with `middleware` appended. `self` is left untouched.
    pub fn with_middleware<I>(&self, middleware: I) -> Result<Self>
    where
        I: IntoIterator<Item = MiddlewareDescriptor>,
    {
        let mut next = self.clone();
        for descriptor in middleware {
            descriptor.validate()?;
            next.middleware.push(descriptor);
        }
        Ok(next)
    }

    /// Hook table from `hooks` appended after the existing handlers.
    pub fn with_hooks(&self, hooks: &Hooks) -> Self {
        let mut next = self.clone();
        next.internal.hooks = Arc::new(Hooks::merge(&self.internal.hooks, hooks));
        next
    }

    #[cfg(test)]
    pub(crate) fn for_tests(host: &HostOptions) -> Self {
        let host = host.clone().with_runtime_dir("/runtime");
        let input = ContextInput {
            entry: Some("{{ _internal.runtimeDir }}/entries/node".to_string()),
            ..ContextInput::defaults()
        };
        match Self::from_input("node", &input, &host) {
            Ok(ctx) => ctx,
            Err(err) => panic!("test context must resolve: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostOptions {
        HostOptions::new("/app").with_runtime_dir("/runtime")
    }

    #[test]
    fn resolves_default_output_layout() {
        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        assert_eq!(ctx.output.dir, PathBuf::from("/app/.output"));
        assert_eq!(ctx.output.server_dir, PathBuf::from("/app/.output/server"));
        assert_eq!(ctx.output.public_dir, PathBuf::from("/app/.output/public"));
        assert_eq!(ctx.entry, PathBuf::from("/runtime/entries/node"));
        assert_eq!(ctx.host.build_dir, PathBuf::from("/app/.nuxt"));
        assert_eq!(ctx.out_file(), PathBuf::from("/app/.output/server/server.js"));
    }

    #[test]
    fn server_dir_sees_resolved_public_dir() {
        // publicDir resolves before serverDir
        let input = ContextInput {
            entry: Some("/entry.js".into()),
            output: crate::input::OutputInput {
                server_dir: Some("{{ output.publicDir }}/../functions".into()),
                ..Default::default()
            },
            ..Default::default()
        }
        .merge(&ContextInput::defaults());

        let ctx = ResolvedContext::from_input("node", &input, &host()).unwrap();
        assert_eq!(ctx.output.server_dir, PathBuf::from("/app/.output/functions"));
    }

    #[test]
    fn unknown_placeholder_is_dropped_silently() {
        let input = ContextInput {
            entry: Some("/entry.js".into()),
            output: crate::input::OutputInput {
                dir: Some("{{ _host.nope }}/out".into()),
                ..Default::default()
            },
            ..Default::default()
        }
        .merge(&ContextInput::defaults());

        let ctx = ResolvedContext::from_input("node", &input, &host()).unwrap();
        assert_eq!(ctx.output.dir, PathBuf::from("/out"));
    }

    #[test]
    fn missing_entry_is_reported() {
        let err = ResolvedContext::from_input("node", &ContextInput::defaults(), &host()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(field) if field == "entry"));
    }

    #[test]
    fn resolving_twice_is_stable() {
        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        let again = ctx.resolve_path(ctx.output.dir.to_str().unwrap()).unwrap();
        assert_eq!(again, ctx.output.dir);
    }

    #[test]
    fn with_middleware_copies() {
        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        let next = ctx
            .with_middleware([MiddlewareDescriptor::new("/api", "/api.js")])
            .unwrap();
        assert!(ctx.middleware.is_empty());
        assert_eq!(next.middleware.len(), 1);

        assert!(ctx
            .with_middleware([MiddlewareDescriptor::new("", "/api.js")])
            .is_err());
    }

    #[test]
    fn serializes_host_and_internal_groups() {
        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        let params = ctx.template_params().unwrap();
        assert_eq!(params["_host"]["rootDir"], "/app");
        assert_eq!(params["_internal"]["runtimeDir"], "/runtime");
        assert_eq!(params["output"]["serverDir"], "/app/.output/server");
    }
}
