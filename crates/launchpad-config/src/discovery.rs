//! File-based config discovery for CLI use
//!
//! Handles finding and loading launchpad configuration files from the project root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::HostOptions;
use crate::error::{ConfigError, Result};
use crate::input::ContextInput;

pub const TOML_CONFIG: &str = "launchpad.toml";
pub const JSON_CONFIG: &str = "launchpad.config.json";
pub const PACKAGE_FIELD: &str = "launchpad";

/// Everything a project config file may declare.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub input: ContextInput,

    /// Legacy middleware declarations, converted with
    /// [`collect_middleware`](crate::middleware::collect_middleware).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub server_middleware: Vec<Value>,

    pub host: HostOptions,
}

impl ProjectConfig {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::invalid("config", e))
    }
}

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use launchpad_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `launchpad.toml`
    /// 2. `launchpad.config.json`
    /// 3. `package.json` with a `launchpad` field
    pub fn find(&self) -> Option<PathBuf> {
        for name in [TOML_CONFIG, JSON_CONFIG] {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_FIELD) {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load config from the discovered file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ProjectConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Like [`load`](Self::load), but a missing file yields the default config.
    pub fn load_or_default(&self) -> Result<ProjectConfig> {
        match self.load() {
            Err(ConfigError::NotFound) => Ok(ProjectConfig::default()),
            other => other,
        }
    }

    /// Load config from a specific file path.
    pub fn load_from(&self, path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(path)?;
        let value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let toml_val: toml::Value = toml::from_str(&content)
                    .map_err(|e| ConfigError::invalid("toml", format!("Invalid TOML syntax: {e}")))?;
                serde_json::to_value(toml_val).map_err(|e| ConfigError::invalid("toml", e))?
            }
            _ => {
                let parsed: Value = serde_json::from_str(&content)
                    .map_err(|e| ConfigError::invalid("json", format!("Invalid JSON: {e}")))?;
                if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
                    match parsed.get(PACKAGE_FIELD) {
                        Some(field) if !field.is_null() => field.clone(),
                        _ => {
                            return Err(ConfigError::invalid(
                                PACKAGE_FIELD,
                                "Add a 'launchpad' field to your package.json",
                            ));
                        }
                    }
                } else {
                    parsed
                }
            }
        };

        tracing::debug!(path = %path.display(), "loaded project config");
        ProjectConfig::from_value(value)
    }
}
