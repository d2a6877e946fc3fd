//! Bundler-facing configuration.
//!
//! A [`BundleConfig`] is derived from a resolved context on every build and
//! handed to the bundler. It is plain data and serializes to JSON so that an
//! external bundler process can consume it.

mod output;

pub use output::{OutputFormat, OutputOptions};

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    /// Absolute path of the entry module.
    pub input: PathBuf,

    pub output: OutputOptions,

    /// Module ids left for the runtime to provide.
    #[serde(default)]
    pub external: Vec<String>,

    /// Module id → replacement id or absolute path.
    #[serde(default)]
    pub alias: IndexMap<String, String>,

    /// Global identifier → module providing it.
    #[serde(default)]
    pub inject: IndexMap<String, String>,

    /// Source expression → literal replacement, applied before parsing.
    #[serde(default)]
    pub replace: IndexMap<String, String>,

    /// In-memory modules keyed by id.
    #[serde(default)]
    pub virtual_modules: IndexMap<String, String>,

    pub dynamic_require: DynamicRequire,

    pub resolve: ResolveOptions,

    /// Extensions handled by the CommonJS transform.
    #[serde(default)]
    pub commonjs_extensions: Vec<String>,

    /// Plugin stages in the order the bundler must run them.
    pub pipeline: Vec<PipelineStage>,
}

impl BundleConfig {
    pub fn has_stage(&self, stage: PipelineStage) -> bool {
        self.pipeline.contains(&stage)
    }
}

/// Build-time enumeration of modules loaded through runtime-conditional
/// `require` calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRequire {
    /// Directory the candidates were enumerated from.
    pub dir: PathBuf,

    /// Where chunk files are emitted; `None` means candidates are inlined.
    pub out_dir: Option<PathBuf>,

    /// Chunk directory name, relative to `out_dir`.
    pub chunks_dir: String,

    /// Glob patterns excluded from enumeration.
    pub ignore: Vec<String>,

    pub chunks: Vec<DynamicChunk>,

    /// Generated loader module source.
    pub module: String,
}

impl DynamicRequire {
    pub fn is_inline(&self) -> bool {
        self.out_dir.is_none()
    }

    /// Absolute chunk directory when chunks are emitted separately.
    pub fn chunks_path(&self) -> Option<PathBuf> {
        self.out_dir.as_ref().map(|dir| dir.join(&self.chunks_dir))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicChunk {
    /// Forward-slash path relative to the enumeration directory.
    pub id: String,
    pub src: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    pub extensions: Vec<String>,
    pub prefer_builtins: bool,
    pub root_dir: PathBuf,
    pub main_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    Replace,
    DynamicRequire,
    Virtual,
    Alias,
    NodeResolve,
    Commonjs,
    Json,
    Inject,
    Analyze,
    Minify,
}

/// HTML document template compiled into a JS module during `build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub src: PathBuf,
    pub dst: PathBuf,
    pub contents: String,
    pub compiled: String,
}
