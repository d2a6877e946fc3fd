//! Partial configuration supplied by users and target presets.
//!
//! Every field is optional so that layers can be merged with [`ContextInput::merge`]:
//! user input over the (extended) preset over [`ContextInput::defaults`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::hooks::Hooks;
use crate::middleware::MiddlewareDescriptor;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Name of a base preset this one builds on. Only meaningful in presets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_chunks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_startup: Option<bool>,

    /// Entry module, usually a template such as `{{ _internal.runtimeDir }}/entries/node`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// `Some(false)` marks a runtime without node built-in modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<bool>,

    #[serde(rename = "static", alias = "staticSite", skip_serializing_if = "Option::is_none")]
    pub static_site: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<MiddlewareDescriptor>,

    /// Globs excluded from generated output.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Routes prerendered by static targets.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub static_routes: Vec<String>,

    /// Extra expressions inlined at bundle time.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub replace: IndexMap<String, String>,

    pub output: OutputInput,

    #[serde(skip)]
    pub hooks: Hooks,

    /// Hooks for the embedding host rather than the build orchestrator.
    #[serde(skip)]
    pub host_hooks: Hooks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<String>,
}

impl OutputInput {
    pub fn merge(&self, lower: &OutputInput) -> OutputInput {
        OutputInput {
            dir: self.dir.clone().or_else(|| lower.dir.clone()),
            server_dir: self.server_dir.clone().or_else(|| lower.server_dir.clone()),
            public_dir: self.public_dir.clone().or_else(|| lower.public_dir.clone()),
        }
    }
}

impl ContextInput {
    /// System defaults, the lowest priority layer.
    pub fn defaults() -> Self {
        Self {
            timing: Some(true),
            inline_chunks: Some(true),
            minify: Some(true),
            externals: Some(false),
            analyze: Some(false),
            log_startup: Some(true),
            node: Some(true),
            static_site: Some(false),
            renderer: Some("vue2".to_string()),
            out_name: Some("server.js".to_string()),
            output: OutputInput {
                dir: Some("{{ _host.rootDir }}/.output".to_string()),
                server_dir: Some("{{ output.dir }}/server".to_string()),
                public_dir: Some("{{ output.dir }}/public".to_string()),
            },
            ..Self::default()
        }
    }

    /// Input selecting a preset by name and nothing else.
    pub fn with_preset(name: impl Into<String>) -> Self {
        Self {
            preset: Some(name.into()),
            ..Self::default()
        }
    }

    /// Merge `self` over `lower`.
    ///
    /// Scalars: `self` wins when set. Lists: `self` entries first, then `lower`
    /// entries. Maps: `self` keys override. Hooks: `lower` handlers run first.
    pub fn merge(&self, lower: &ContextInput) -> ContextInput {
        let mut replace = lower.replace.clone();
        replace.extend(self.replace.iter().map(|(k, v)| (k.clone(), v.clone())));

        ContextInput {
            preset: pick(&self.preset, &lower.preset),
            extends: pick(&self.extends, &lower.extends),
            timing: self.timing.or(lower.timing),
            inline_chunks: self.inline_chunks.or(lower.inline_chunks),
            minify: self.minify.or(lower.minify),
            externals: self.externals.or(lower.externals),
            analyze: self.analyze.or(lower.analyze),
            log_startup: self.log_startup.or(lower.log_startup),
            entry: pick(&self.entry, &lower.entry),
            node: self.node.or(lower.node),
            static_site: self.static_site.or(lower.static_site),
            renderer: pick(&self.renderer, &lower.renderer),
            out_name: pick(&self.out_name, &lower.out_name),
            middleware: concat(&self.middleware, &lower.middleware),
            ignore: concat(&self.ignore, &lower.ignore),
            static_routes: concat(&self.static_routes, &lower.static_routes),
            replace,
            output: self.output.merge(&lower.output),
            hooks: Hooks::merge(&lower.hooks, &self.hooks),
            host_hooks: Hooks::merge(&lower.host_hooks, &self.host_hooks),
        }
    }
}

fn pick(high: &Option<String>, low: &Option<String>) -> Option<String> {
    high.clone().or_else(|| low.clone())
}

fn concat<T: Clone>(high: &[T], low: &[T]) -> Vec<T> {
    high.iter().chain(low).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_layer_wins_for_scalars() {
        let user = ContextInput {
            minify: Some(false),
            renderer: Some("vue3".into()),
            ..Default::default()
        };
        let merged = user.merge(&ContextInput::defaults());

        assert_eq!(merged.minify, Some(false));
        assert_eq!(merged.renderer.as_deref(), Some("vue3"));
        // untouched fields fall through
        assert_eq!(merged.inline_chunks, Some(true));
        assert_eq!(merged.out_name.as_deref(), Some("server.js"));
    }

    #[test]
    fn lists_concatenate_high_first() {
        let high = ContextInput {
            ignore: vec!["a".into()],
            middleware: vec![MiddlewareDescriptor::new("/a", "/a.js")],
            ..Default::default()
        };
        let low = ContextInput {
            ignore: vec!["b".into()],
            middleware: vec![MiddlewareDescriptor::new("/b", "/b.js")],
            ..Default::default()
        };

        let merged = high.merge(&low);
        assert_eq!(merged.ignore, vec!["a", "b"]);
        assert_eq!(merged.middleware[0].route, "/a");
        assert_eq!(merged.middleware[1].route, "/b");
    }

    #[test]
    fn output_merges_per_field() {
        let high = ContextInput {
            output: OutputInput {
                dir: Some("/dist".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = high.merge(&ContextInput::defaults());
        assert_eq!(merged.output.dir.as_deref(), Some("/dist"));
        assert_eq!(
            merged.output.server_dir.as_deref(),
            Some("{{ output.dir }}/server")
        );
    }

    #[test]
    fn replace_keys_override() {
        let mut high = ContextInput::default();
        high.replace.insert("__A__".into(), "1".into());
        let mut low = ContextInput::default();
        low.replace.insert("__A__".into(), "0".into());
        low.replace.insert("__B__".into(), "2".into());

        let merged = high.merge(&low);
        assert_eq!(merged.replace["__A__"], "1");
        assert_eq!(merged.replace["__B__"], "2");
    }

    #[test]
    fn deserializes_camel_case_and_static_alias() {
        let input: ContextInput = serde_json::from_str(
            r#"{ "preset": "static", "inlineChunks": false, "static": true, "output": { "publicDir": "dist" } }"#,
        )
        .unwrap();
        assert_eq!(input.preset.as_deref(), Some("static"));
        assert_eq!(input.inline_chunks, Some(false));
        assert_eq!(input.static_site, Some(true));
        assert_eq!(input.output.public_dir.as_deref(), Some("dist"));
    }
}
