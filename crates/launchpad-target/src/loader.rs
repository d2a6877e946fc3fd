//! Loading presets that are not compiled in.

use std::fs;
use std::path::{Path, PathBuf};

use launchpad_config::{ConfigError, ContextInput};
use serde_json::Value;

use crate::preset::TargetPreset;

/// Resolves a preset by name from somewhere outside the built-in table.
///
/// `Ok(None)` means this loader does not know the name.
pub trait PresetLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<TargetPreset>, ConfigError>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

/// Loads data presets from `<dir>/<name>.toml` or `<dir>/<name>.json`.
///
/// `name` may be a relative path such as `presets/edge`. A file whose only
/// top-level key is `default` is unwrapped.
#[derive(Debug, Clone)]
pub struct FilePresetLoader {
    dir: PathBuf,
}

const EXTENSIONS: [&str; 2] = ["toml", "json"];

impl FilePresetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let base = self.dir.join(name);
        let has_known_ext = base
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));

        if has_known_ext {
            vec![base]
        } else {
            EXTENSIONS
                .iter()
                .map(|ext| base.with_file_name(format!("{}.{ext}", file_name(&base))))
                .collect()
        }
    }

    fn parse(&self, name: &str, path: &Path) -> Result<ContextInput, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidPreset {
            name: name.to_string(),
            message,
        };

        let content = fs::read_to_string(path)?;
        let value: Value = if path.extension().is_some_and(|ext| ext == "toml") {
            let parsed: toml::Value = toml::from_str(&content)
                .map_err(|e| invalid(format!("{}: {e}", path.display())))?;
            serde_json::to_value(parsed).map_err(|e| invalid(e.to_string()))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| invalid(format!("{}: {e}", path.display())))?
        };

        let value = unwrap_default(value);
        serde_json::from_value(value).map_err(|e| invalid(format!("{}: {e}", path.display())))
    }
}

impl PresetLoader for FilePresetLoader {
    fn load(&self, name: &str) -> Result<Option<TargetPreset>, ConfigError> {
        let Some(path) = self.candidates(name).into_iter().find(|p| p.is_file()) else {
            return Ok(None);
        };

        tracing::debug!(preset = name, path = %path.display(), "loading preset file");
        self.parse(name, &path).map(|input| Some(TargetPreset::Static(input)))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn unwrap_default(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("default") => {
            map.remove("default").unwrap_or(Value::Null)
        }
        other => other,
    }
}
