//! Project configuration for CLI runs.
//!
//! Layers, lowest first:
//!
//! 1. built-in defaults (applied later by the context resolver)
//! 2. the project config file (`launchpad.toml`, `launchpad.config.json` or
//!    the `launchpad` field of `package.json`)
//! 3. `LAUNCHPAD_*` environment variables
//! 4. command-line flags
//!
//! Layers 3 and 4 are merged with figment into [`Overrides`] and applied on
//! top of the loaded file. `LAUNCHPAD_PRESET` is the exception: a preset named
//! in the project config beats it, so it is left to the context resolver and
//! only `--preset` overrides the file.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
use launchpad_config::{ConfigDiscovery, ProjectConfig, collect_middleware};
use serde::{Deserialize, Serialize};

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

pub const ENV_PREFIX: &str = "LAUNCHPAD_";

/// Settings that may come from the environment or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze: Option<bool>,
    /// Bundler command line, split on whitespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<String>,
}

impl Overrides {
    fn from_args(args: &ProjectArgs) -> Self {
        Self {
            preset: args.preset.clone(),
            build_dir: args.build_dir.clone(),
            output_dir: args.output_dir.clone(),
            minify: args.no_minify.then_some(false),
            analyze: args.analyze.then_some(true),
            bundler: args.bundler.clone(),
            ..Self::default()
        }
    }

    /// Environment variables, then flags.
    pub fn load(args: &ProjectArgs) -> Result<Self> {
        let overrides = Figment::new()
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["preset"]))
            .merge(Serialized::defaults(Self::from_args(args)))
            .extract()?;
        Ok(overrides)
    }

    pub fn bundler_command(&self) -> Option<Vec<String>> {
        let command: Vec<String> = self
            .bundler
            .as_deref()?
            .split_whitespace()
            .map(str::to_string)
            .collect();
        (!command.is_empty()).then_some(command)
    }
}

/// The project config with overrides and middleware applied.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub overrides: Overrides,
    pub root: PathBuf,
}

impl LoadedProject {
    pub fn load(args: &ProjectArgs) -> Result<Self> {
        let root = std::path::absolute(&args.root)?;
        if !root.is_dir() {
            return Err(CliError::DirectoryNotFound(root));
        }

        let discovery = ConfigDiscovery::new(&root);
        let mut config = match &args.config {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(CliError::InvalidArgument(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                discovery.load_from(&path)?
            }
            None => discovery.load_or_default()?,
        };

        let overrides = Overrides::load(args)?;
        apply(&mut config, &overrides, &root);

        Ok(Self {
            config,
            overrides,
            root,
        })
    }
}

fn apply(config: &mut ProjectConfig, overrides: &Overrides, root: &Path) {
    let input = &mut config.input;
    if let Some(preset) = &overrides.preset {
        input.preset = Some(preset.clone());
    }
    if let Some(dir) = &overrides.output_dir {
        input.output.dir = Some(dir.clone());
    }
    if let Some(out_name) = &overrides.out_name {
        input.out_name = Some(out_name.clone());
    }
    if let Some(renderer) = &overrides.renderer {
        input.renderer = Some(renderer.clone());
    }
    if let Some(minify) = overrides.minify {
        input.minify = Some(minify);
    }
    if let Some(analyze) = overrides.analyze {
        input.analyze = Some(analyze);
    }

    config.host.root_dir = root.to_path_buf();
    if let Some(build_dir) = &overrides.build_dir {
        config.host.build_dir = build_dir.clone();
    }

    let collected = collect_middleware(&config.server_middleware, |handle| {
        resolve_handle(root, handle)
    });
    collected.warn_unsupported();
    input.middleware.extend(collected.supported);
}

/// Relative handler paths are taken from the project root; package
/// specifiers are left for the bundler to resolve.
fn resolve_handle(root: &Path, handle: &str) -> String {
    if let Some(relative) = handle.strip_prefix("./") {
        root.join(relative).to_string_lossy().into_owned()
    } else if handle.starts_with("../") {
        root.join(handle).to_string_lossy().into_owned()
    } else {
        handle.to_string()
    }
}
