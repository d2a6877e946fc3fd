use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Module format of the emitted server bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CommonJS (`require` / `module.exports`)
    #[default]
    Cjs,
    /// ECMAScript modules
    Esm,
    /// Self-executing script, used by worker runtimes without a module loader
    Iife,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub file: PathBuf,
    pub format: OutputFormat,
    /// Code prepended to the bundle.
    #[serde(default)]
    pub intro: String,
    /// Code appended to the bundle.
    #[serde(default)]
    pub outro: String,
    #[serde(default)]
    pub prefer_const: bool,
}

impl OutputOptions {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            format: OutputFormat::Cjs,
            intro: String::new(),
            outro: String::new(),
            prefer_const: true,
        }
    }
}
