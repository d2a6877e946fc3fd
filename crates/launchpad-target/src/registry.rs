//! Name → preset lookup.

use std::path::Path;

use indexmap::IndexMap;
use launchpad_config::ConfigError;

use crate::loader::{FilePresetLoader, PresetLoader};
use crate::preset::{TargetPreset, extend_preset};
use crate::targets::builtin_targets;

/// Maximum depth of an `extends` chain between data presets.
pub const MAX_EXTENDS_DEPTH: usize = 8;

/// Registry of presets.
///
/// Lookup checks the built-in table by exact name first, then each loader
/// in the order added.
pub struct PresetRegistry {
    builtins: IndexMap<String, TargetPreset>,
    loaders: Vec<Box<dyn PresetLoader>>,
}

impl PresetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            builtins: IndexMap::new(),
            loaders: Vec::new(),
        }
    }

    /// Registry holding every built-in target.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for target in builtin_targets() {
            registry.register(target.name(), target.preset());
        }
        registry
    }

    /// Built-ins, then `<library_dir>/presets`, then the project root.
    pub fn standard(library_dir: &Path, root_dir: &Path) -> Self {
        Self::with_builtins()
            .with_loader(FilePresetLoader::new(library_dir.join("presets")))
            .with_loader(FilePresetLoader::new(root_dir))
    }

    pub fn register(&mut self, name: impl Into<String>, preset: TargetPreset) -> &mut Self {
        self.builtins.insert(name.into(), preset);
        self
    }

    pub fn with_loader(mut self, loader: impl PresetLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Names of the built-in presets.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builtins.keys().map(String::as_str)
    }

    /// Find a preset by name.
    ///
    /// Loader failures are logged and treated as "not found" by this loader,
    /// so a broken file never shadows a later location.
    pub fn lookup(&self, name: &str) -> Option<TargetPreset> {
        if let Some(preset) = self.builtins.get(name) {
            return Some(preset.clone());
        }

        self.loaders.iter().find_map(|loader| match loader.load(name) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(preset = name, location = %loader.describe(), "{err}");
                None
            }
        })
    }

    /// Find a preset and fold in the base presets its `extends` chain names.
    pub fn resolve(&self, name: &str) -> Result<TargetPreset, ConfigError> {
        self.resolve_depth(name, 0)
    }

    fn resolve_depth(&self, name: &str, depth: usize) -> Result<TargetPreset, ConfigError> {
        if depth > MAX_EXTENDS_DEPTH {
            return Err(ConfigError::PresetCycle(name.to_string()));
        }

        let preset = self
            .lookup(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;

        match preset.extends() {
            Some(base) if base == name => Err(ConfigError::PresetCycle(name.to_string())),
            Some(base) => {
                let base = self.resolve_depth(base, depth + 1)?;
                Ok(extend_preset(base, preset))
            }
            None => Ok(preset),
        }
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
