//! Bundle configuration builder.
//!
//! [`build_bundle_config`] turns a resolved context into the configuration
//! handed to the bundler. It only reads the filesystem: renderer existence,
//! the dynamic chunk directory and the project `package.json`.

mod dynamic_require;
mod middleware;
mod mocks;

pub use mocks::NODE_BUILTINS;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use launchpad_config::{BundleConfig, OutputOptions, PipelineStage, ResolveOptions, ResolvedContext};
use serde_json::Value;

use crate::{Error, Result};
use dynamic_require::{DYNAMIC_REQUIRE_MODULE, DynamicRequireOptions, chunks_dir_name};
use middleware::{MIDDLEWARE_MODULE, middleware_module};

/// Extensions tried when resolving modules.
pub const EXTENSIONS: &[&str] = &[".ts", ".mjs", ".js", ".json", ".node"];

const LOG_STARTUP_INTRO: &str = "global._startTime = global.process.hrtime();";
const LOG_STARTUP_OUTRO: &str = "global._endTime = global.process.hrtime(global._startTime); global._coldstart = ((global._endTime[0] * 1e9) + global._endTime[1]) / 1e6; console.log(`λ Cold start took: ${global._coldstart}ms`);";

pub fn build_bundle_config(ctx: &ResolvedContext) -> Result<BundleConfig> {
    let runtime_dir = ctx.runtime_dir();
    let input = ctx.resolve_path(&ctx.entry.to_string_lossy())?;
    let out_file = ctx.out_file();

    let mut output = OutputOptions::new(&out_file);
    if ctx.log_startup {
        output.intro.push_str(LOG_STARTUP_INTRO);
        output.outro.push_str(LOG_STARTUP_OUTRO);
    }

    let mut external = Vec::new();
    let mut inject = IndexMap::new();
    let mut node_aliases = mocks::generic_aliases();
    if ctx.node {
        external.extend(mocks::node_externals());
        if ctx.externals {
            external.extend(project_dependencies(&ctx.host.root_dir)?);
        }
    } else {
        node_aliases.extend(mocks::node_free_aliases());
        inject.extend(mocks::node_free_injects());
    }

    let renderer = resolve_module(&runtime_dir.join("ssr").join(&ctx.renderer)).ok_or_else(|| {
        Error::Resolution {
            specifier: "~renderer".to_string(),
            searched: runtime_dir.join("ssr").join(&ctx.renderer).display().to_string(),
        }
    })?;
    let generic_mock = resolve_module(&runtime_dir.join("mocks/generic")).ok_or_else(|| {
        Error::Resolution {
            specifier: "~mock".to_string(),
            searched: runtime_dir.join("mocks/generic").display().to_string(),
        }
    })?;

    let mut alias = IndexMap::new();
    alias.insert("~runtime".to_string(), path_string(runtime_dir));
    alias.insert("~mocks".to_string(), path_string(&runtime_dir.join("mocks")));
    alias.insert("~renderer".to_string(), path_string(&renderer));
    alias.insert("~build".to_string(), path_string(&ctx.host.build_dir));
    alias.insert("~mock".to_string(), path_string(&generic_mock));
    alias.extend(node_aliases);

    let dynamic_require = dynamic_require::dynamic_require(DynamicRequireOptions {
        dir: ctx.host.build_dir.join("dist/server"),
        out_dir: if !ctx.node || ctx.inline_chunks {
            None
        } else {
            out_file.parent().map(Path::to_path_buf)
        },
        chunks_dir: chunks_dir_name(&ctx.out_name),
        ignore: vec!["server.js".to_string()],
    })?;

    let mut virtual_modules = IndexMap::new();
    virtual_modules.insert(MIDDLEWARE_MODULE.to_string(), middleware_module(&ctx.middleware));
    virtual_modules.insert(DYNAMIC_REQUIRE_MODULE.to_string(), dynamic_require.module.clone());

    let mut pipeline = vec![
        PipelineStage::Replace,
        PipelineStage::DynamicRequire,
        PipelineStage::Virtual,
        PipelineStage::Alias,
        PipelineStage::NodeResolve,
        PipelineStage::Commonjs,
        PipelineStage::Json,
        PipelineStage::Inject,
    ];
    if ctx.analyze {
        pipeline.push(PipelineStage::Analyze);
    }
    if ctx.minify {
        pipeline.push(PipelineStage::Minify);
    }

    let config = BundleConfig {
        input,
        output,
        external,
        alias,
        inject,
        replace: replacements(ctx),
        virtual_modules,
        dynamic_require,
        resolve: ResolveOptions {
            extensions: EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            prefer_builtins: true,
            root_dir: ctx.host.root_dir.clone(),
            main_fields: vec!["main".to_string()],
        },
        commonjs_extensions: EXTENSIONS
            .iter()
            .filter(|ext| **ext != ".json")
            .map(|ext| ext.to_string())
            .collect(),
        pipeline,
    };

    tracing::debug!(
        input = %config.input.display(),
        output = %config.output.file.display(),
        aliases = config.alias.len(),
        externals = config.external.len(),
        chunks = config.dynamic_require.chunks.len(),
        "bundle config assembled"
    );
    Ok(config)
}

/// Expressions inlined at bundle time. User entries override built-in ones.
fn replacements(ctx: &ResolvedContext) -> IndexMap<String, String> {
    let json = |value: &str| Value::String(value.to_string()).to_string();
    let node_env = if ctx.host.dev { "development" } else { "production" };

    let mut values = IndexMap::new();
    values.insert("process.env.NODE_ENV".to_string(), json(node_env));
    values.insert("typeof window".to_string(), json("undefined"));
    values.insert("process.env.ROUTER_BASE".to_string(), json(&ctx.host.router_base));
    values.insert("process.env.PUBLIC_PATH".to_string(), json(&ctx.host.public_path));
    values.insert(
        "process.env.LAUNCHPAD_STATIC_BASE".to_string(),
        json(&ctx.host.static_assets.base),
    );
    values.insert(
        "process.env.LAUNCHPAD_STATIC_VERSION".to_string(),
        json(&ctx.host.static_assets.version),
    );
    values.insert(
        "process.env.LAUNCHPAD_FULL_STATIC".to_string(),
        ctx.host.full_static.to_string(),
    );
    values.insert("process.env.LAUNCHPAD_PRESET".to_string(), json(&ctx.preset));
    values.extend(ctx.replace.iter().map(|(k, v)| (k.clone(), v.clone())));
    values
}

/// Resolve a module path the way node does: the exact file, then each known
/// extension, then an `index` file inside it.
pub(crate) fn resolve_module(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let index = path.join("index");
    with_extensions(path)
        .chain(with_extensions(&index))
        .find(|candidate| candidate.is_file())
}

fn with_extensions(base: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    EXTENSIONS.iter().map(move |ext| {
        let mut file = base.as_os_str().to_owned();
        file.push(ext);
        PathBuf::from(file)
    })
}

/// Names in `dependencies` of the project `package.json`.
fn project_dependencies(root: &Path) -> Result<Vec<String>> {
    let pkg_path = root.join("package.json");
    if !pkg_path.is_file() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&pkg_path)
        .map_err(|e| Error::io(format!("Failed to read {}", pkg_path.display()), e))?;
    let pkg: Value = serde_json::from_str(&content)?;
    Ok(pkg
        .get("dependencies")
        .and_then(Value::as_object)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default())
}

/// Single-quoted JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n");
    format!("'{escaped}'")
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_module_tries_extensions_and_index() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("ssr")).unwrap();
        fs::create_dir_all(dir.path().join("mocks/generic")).unwrap();
        fs::write(dir.path().join("ssr/vue2.js"), "").unwrap();
        fs::write(dir.path().join("mocks/generic/index.mjs"), "").unwrap();

        assert_eq!(
            resolve_module(&dir.path().join("ssr/vue2")),
            Some(dir.path().join("ssr/vue2.js"))
        );
        assert_eq!(
            resolve_module(&dir.path().join("mocks/generic")),
            Some(dir.path().join("mocks/generic/index.mjs"))
        );
        assert_eq!(resolve_module(&dir.path().join("ssr/react")), None);
    }

    #[test]
    fn reads_project_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "express": "^4", "vue": "^2" }, "devDependencies": { "jest": "1" } }"#,
        )
        .unwrap();
        assert_eq!(project_dependencies(dir.path()).unwrap(), vec!["express", "vue"]);
        assert!(project_dependencies(&dir.path().join("missing")).unwrap().is_empty());
    }
}
