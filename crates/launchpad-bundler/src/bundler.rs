//! The bundler seam.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use launchpad_config::{BundleConfig, ResolvedContext};
use tokio::process::Command;

use crate::{Error, Result};

/// Files a bundler run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutput {
    pub files: Vec<PathBuf>,
}

/// Compiles a [`BundleConfig`] into output files.
///
/// Syntax or type errors in application code are reported as
/// [`Error::Compilation`]; unresolvable imports as [`Error::Resolution`].
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutput>;
}

/// Hands the configuration to an external bundler process.
///
/// The config is written as JSON to `config_path`. When a command is set it
/// is run with the config path as its last argument (and in
/// `LAUNCHPAD_BUNDLE_CONFIG`); a non-zero exit is a compilation failure.
#[derive(Debug, Clone)]
pub struct ExternalBundler {
    config_path: PathBuf,
    command: Option<Vec<String>>,
    cwd: Option<PathBuf>,
}

pub const BUNDLE_CONFIG_ENV: &str = "LAUNCHPAD_BUNDLE_CONFIG";

impl ExternalBundler {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            command: None,
            cwd: None,
        }
    }

    /// Config written to `<buildDir>/launchpad/bundle.json`, commands run from
    /// the project root.
    pub fn for_context(ctx: &ResolvedContext) -> Self {
        Self::new(ctx.host.build_dir.join("launchpad/bundle.json")).with_cwd(&ctx.host.root_dir)
    }

    /// Program and leading arguments, e.g. `["node", "scripts/bundle.js"]`.
    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = command.into_iter().map(Into::into).collect();
        self.command = (!command.is_empty()).then_some(command);
        self
    }

    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    async fn write_config(&self, config: &BundleConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
        }
        let json = serde_json::to_vec_pretty(config)?;
        tokio::fs::write(&self.config_path, json)
            .await
            .map_err(|e| Error::io(format!("Failed to write {}", self.config_path.display()), e))
    }

    async fn run_command(&self, command: &[String]) -> Result<()> {
        let Some((program, args)) = command.split_first() else {
            return Ok(());
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(&self.config_path)
            .env(BUNDLE_CONFIG_ENV, &self.config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!(program = %program, "running bundler command");
        let output = cmd
            .output()
            .await
            .map_err(|e| Error::io(format!("Failed to run bundler command '{program}'"), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            tracing::info!(target: "launchpad::bundler", "{line}");
        }

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("'{program}' exited with {}", output.status)
        } else {
            stderr
        };
        Err(Error::Compilation(message))
    }
}

#[async_trait]
impl Bundler for ExternalBundler {
    async fn bundle(&self, config: &BundleConfig) -> Result<BundleOutput> {
        self.write_config(config).await?;

        match &self.command {
            Some(command) => self.run_command(command).await?,
            None => tracing::warn!(
                config = %self.config_path.display(),
                "No bundler command configured; only the bundle config was written"
            ),
        }

        let files = [config.output.file.clone()]
            .into_iter()
            .filter(|file| file.is_file())
            .collect();
        Ok(BundleOutput { files })
    }
}
