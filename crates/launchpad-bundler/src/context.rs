//! Context resolution: user input + target preset + defaults → [`ResolvedContext`].

use std::path::PathBuf;

use launchpad_config::{ConfigError, ContextInput, HostOptions, ResolvedContext};
use launchpad_target::{EnvProbe, Environment, PRESET_ENV, PresetRegistry, ProcessEnv};

/// Preset used when neither input, environment nor probe name one.
pub const DEFAULT_PRESET: &str = "server";

/// Runtime files shipped with this crate: entries, mocks and renderers.
pub fn default_runtime_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/runtime"))
}

/// Resolves build contexts.
///
/// Presets come from the injected registry; when none is injected, the
/// standard registry (built-ins, then `<runtimeDir>/presets`, then the
/// project root) is used. Environment access goes through the injected
/// [`Environment`] so resolution depends only on explicit inputs.
pub struct ContextResolver {
    registry: Option<PresetRegistry>,
    env: Box<dyn Environment>,
    probe: EnvProbe,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextResolver {
    pub fn new() -> Self {
        Self {
            registry: None,
            env: Box::new(ProcessEnv),
            probe: EnvProbe::standard(),
        }
    }

    pub fn with_registry(mut self, registry: PresetRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_probe(mut self, probe: EnvProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Select the preset name: explicit input, then `LAUNCHPAD_PRESET`, then
    /// the environment probe, then [`DEFAULT_PRESET`].
    pub fn preset_name(&self, input: &ContextInput) -> String {
        input
            .preset
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.env.var(PRESET_ENV).filter(|name| !name.is_empty()))
            .or_else(|| self.probe.detect(self.env.as_ref()))
            .unwrap_or_else(|| DEFAULT_PRESET.to_string())
    }

    /// Merge `input` over the selected preset over the system defaults.
    ///
    /// Fails with [`ConfigError::UnknownPreset`] when no registry location
    /// knows the preset. Nothing is written to disk.
    pub fn resolve(
        &self,
        host: &HostOptions,
        input: ContextInput,
    ) -> Result<ResolvedContext, ConfigError> {
        let mut host = host.normalized()?;
        if host.runtime_dir.is_none() {
            host.runtime_dir = Some(default_runtime_dir());
        }

        let name = self.preset_name(&input);
        tracing::debug!(preset = %name, root = %host.root_dir.display(), "resolving context");

        let standard;
        let registry = match &self.registry {
            Some(registry) => registry,
            None => {
                let runtime_dir = host.runtime_dir.clone().unwrap_or_else(default_runtime_dir);
                standard = PresetRegistry::standard(&runtime_dir, &host.root_dir);
                &standard
            }
        };

        let preset = registry.resolve(&name)?;
        let defaults = ContextInput::defaults();

        let preset_input = input.merge(&defaults);
        let mut preset_values = preset.apply(&preset_input);
        preset_values.extends = None;

        let mut merged = input.merge(&preset_values.merge(&defaults));
        merged.preset = Some(name.clone());

        let ctx = ResolvedContext::from_input(&name, &merged, &host)?;
        tracing::debug!(
            preset = %ctx.preset,
            output = %ctx.output.dir.display(),
            "context resolved"
        );
        Ok(ctx)
    }
}
