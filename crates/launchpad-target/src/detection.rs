//! Auto-detection of the hosting provider from environment markers.

use std::collections::HashMap;

/// Environment variable overriding preset selection.
pub const PRESET_ENV: &str = "LAUNCHPAD_PRESET";

/// Read access to environment variables.
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Whether `key` is set to a non-empty value.
    fn is_set(&self, key: &str) -> bool {
        self.var(key).is_some_and(|value| !value.is_empty())
    }
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed set of variables, for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

type Predicate = Box<dyn Fn(&dyn Environment) -> bool + Send + Sync>;

/// Maps provider preset names to predicates over the environment.
///
/// Providers are checked in registration order; the first match wins. When
/// none match, the fallback (if any) is returned.
pub struct EnvProbe {
    providers: Vec<(String, Predicate)>,
    fallback: Option<String>,
}

impl EnvProbe {
    /// A probe that never detects anything.
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
            fallback: None,
        }
    }

    /// Netlify and Vercel build markers, falling back to `node`.
    pub fn standard() -> Self {
        Self::empty()
            .provider("netlify", |env| env.is_set("NETLIFY"))
            .provider("vercel", |env| env.is_set("NOW_BUILDER") || env.is_set("VERCEL"))
            .with_fallback(Some("node"))
    }

    pub fn provider<F>(mut self, preset: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&dyn Environment) -> bool + Send + Sync + 'static,
    {
        self.providers.push((preset.into(), Box::new(predicate)));
        self
    }

    pub fn with_fallback(mut self, fallback: Option<&str>) -> Self {
        self.fallback = fallback.map(str::to_string);
        self
    }

    pub fn detect(&self, env: &dyn Environment) -> Option<String> {
        let detected = self
            .providers
            .iter()
            .find(|(_, predicate)| predicate(env))
            .map(|(preset, _)| preset.clone());

        if let Some(preset) = &detected {
            tracing::debug!(preset = %preset, "detected hosting provider");
        }
        detected.or_else(|| self.fallback.clone())
    }
}

impl Default for EnvProbe {
    fn default() -> Self {
        Self::standard()
    }
}
