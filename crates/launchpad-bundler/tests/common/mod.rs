#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use launchpad_bundler::{BundleOutput, Bundler, ContextResolver, Error, Result};
use launchpad_config::{BundleConfig, ContextInput, HookArgs, Hooks, HostOptions, ResolvedContext};
use launchpad_target::{MapEnv, PresetRegistry};
use tempfile::TempDir;

/// Resolver isolated from the process environment and project files.
pub fn resolver() -> ContextResolver {
    ContextResolver::new()
        .with_registry(PresetRegistry::with_builtins())
        .with_env(MapEnv::new())
}

pub fn host(root: &Path) -> HostOptions {
    HostOptions::new(root).with_build_dir(".nuxt")
}

pub fn resolve(root: &Path, input: ContextInput) -> ResolvedContext {
    resolver().resolve(&host(root), input).expect("context resolves")
}

pub fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, contents).expect("write");
}

/// Shared event log for hooks and bundlers.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().expect("log lock").push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("log lock").clone()
    }

    /// Hook table recording every event in `events` under `tag`.
    pub fn hooks(&self, tag: &str, events: &[&str]) -> Hooks {
        let mut hooks = Hooks::new();
        for event in events {
            let log = self.clone();
            let entry = format!("{tag}:{event}");
            hooks.hook_fn(*event, move |_args: &mut HookArgs<'_>| {
                log.push(entry.clone());
                Ok(())
            });
        }
        hooks
    }
}

/// Writes a stub output file and records each call.
#[derive(Clone, Default)]
pub struct RecordingBundler {
    pub log: Log,
    pub configs: Arc<Mutex<Vec<BundleConfig>>>,
}

impl RecordingBundler {
    pub fn with_log(log: Log) -> Self {
        Self {
            log,
            configs: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.configs.lock().expect("configs lock").len()
    }

    pub fn last_config(&self) -> BundleConfig {
        self.configs
            .lock()
            .expect("configs lock")
            .last()
            .cloned()
            .expect("bundler was called")
    }
}

#[async_trait]
impl Bundler for RecordingBundler {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutput> {
        self.log.push("bundle");
        self.configs.lock().expect("configs lock").push(config.clone());
        let file = config.output.file.clone();
        tokio::fs::create_dir_all(file.parent().expect("out dir")).await?;
        tokio::fs::write(&file, "module.exports = {}\n").await?;
        Ok(BundleOutput { files: vec![file] })
    }
}

/// Fails the first `failures` calls with a compilation error.
pub struct FlakyBundler {
    pub inner: RecordingBundler,
    failures: Mutex<usize>,
}

impl FlakyBundler {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: RecordingBundler::default(),
            failures: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl Bundler for FlakyBundler {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutput> {
        {
            let mut left = self.failures.lock().expect("failures lock");
            if *left > 0 {
                *left -= 1;
                return Err(Error::Compilation("Unexpected token (1:4)".to_string()));
            }
        }
        self.inner.bundle(config).await
    }
}

pub fn project() -> TempDir {
    TempDir::new().expect("tempdir")
}

pub fn out_file(root: &Path) -> PathBuf {
    root.join(".output/server/server.js")
}
