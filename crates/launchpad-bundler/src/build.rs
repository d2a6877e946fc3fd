//! Build orchestration.
//!
//! An [`Orchestrator`] walks a resolved context through the build phases:
//!
//! ```text
//! idle -> preparing -> generating -> building -> done
//! ```
//!
//! `generate` fills the public directory on every production build; only its
//! prerender pass is limited to static targets.
//!
//! Each phase is wrapped in lifecycle hooks from the context's hook table.
//! Errors from a phase or a hook abort the remaining steps and propagate
//! unchanged. [`Orchestrator::close`] fires `close` and ends the session.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use launchpad_config::{DocumentTemplate, HookArgs, ResolvedContext, events, template};

use crate::builder::build_bundle_config;
use crate::bundler::Bundler;
use crate::fs;
use crate::{Error, Result};

/// Renders a route to HTML for static targets.
#[async_trait]
pub trait Prerenderer: Send + Sync {
    async fn render(&self, ctx: &ResolvedContext, route: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    Preparing,
    Generating,
    Building,
    /// Dev sessions wait here for file changes between builds.
    Watching,
    Done,
    Closed,
}

/// What a completed `build` phase produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub out_file: PathBuf,
    /// Files under the server dir with their sizes, relative to it.
    pub files: Vec<(PathBuf, u64)>,
    pub duration: Duration,
}

pub struct Orchestrator {
    bundler: Arc<dyn Bundler>,
    prerenderer: Option<Arc<dyn Prerenderer>>,
    phase: BuildPhase,
}

const DOCUMENT_TEMPLATES: &[&str] = &["app.template.html", "document.template.html"];

impl Orchestrator {
    pub fn new(bundler: Arc<dyn Bundler>) -> Self {
        Self {
            bundler,
            prerenderer: None,
            phase: BuildPhase::Idle,
        }
    }

    pub fn with_prerenderer(mut self, prerenderer: Arc<dyn Prerenderer>) -> Self {
        self.prerenderer = Some(prerenderer);
        self
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: BuildPhase) {
        self.phase = phase;
    }

    /// Clean and recreate the output directories.
    ///
    /// The public and server dirs are cleaned separately only when they live
    /// outside `output.dir`. The project root and its ancestors are never
    /// removed.
    pub async fn prepare(&mut self, ctx: &ResolvedContext) -> Result<()> {
        self.phase = BuildPhase::Preparing;
        ctx.hooks()
            .call(events::PREPARE_BEFORE, &mut HookArgs::new(ctx))
            .await?;

        let output = &ctx.output;
        let mut dirs = vec![output.dir.as_path()];
        for dir in [&output.public_dir, &output.server_dir] {
            if !fs::is_within(dir, &output.dir) {
                dirs.push(dir);
            }
        }
        for dir in &dirs {
            if fs::is_within(&ctx.host.root_dir, dir) {
                tracing::warn!(dir = %dir.display(), "Refusing to clean a directory containing the project root");
                continue;
            }
            fs::clean_dir(dir).await?;
        }
        for dir in [&output.dir, &output.public_dir, &output.server_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::io(format!("Failed to create {}", dir.display()), e))?;
        }

        ctx.hooks()
            .call(events::PREPARE_DONE, &mut HookArgs::new(ctx))
            .await?;
        Ok(())
    }

    /// Populate the public directory: client assets, the host static dir and
    /// prerendered routes for static targets. Files matching the context's
    /// `ignore` globs are not copied.
    pub async fn generate(&mut self, ctx: &ResolvedContext) -> Result<()> {
        self.phase = BuildPhase::Generating;
        ctx.hooks()
            .call(events::GENERATE_BEFORE, &mut HookArgs::new(ctx))
            .await?;

        let public_dir = &ctx.output.public_dir;
        let client_dir = ctx.host.build_dir.join("dist/client");
        let assets_dir = public_dir.join(public_path_dir(&ctx.host.public_path));
        let client = fs::copy_dir(&client_dir, &assets_dir, &ctx.ignore).await?;
        let statics = fs::copy_dir(&ctx.host.static_dir, public_dir, &ctx.ignore).await?;
        tracing::debug!(client, statics, "public assets copied");

        if ctx.static_site {
            self.prerender(ctx).await?;
        }

        ctx.hooks()
            .call(events::GENERATE_DONE, &mut HookArgs::new(ctx))
            .await?;
        Ok(())
    }

    async fn prerender(&self, ctx: &ResolvedContext) -> Result<()> {
        let Some(prerenderer) = &self.prerenderer else {
            tracing::warn!(
                routes = ctx.static_routes.len(),
                "No prerenderer configured; static routes were not rendered"
            );
            return Ok(());
        };

        for route in &ctx.static_routes {
            let html = prerenderer
                .render(ctx, route)
                .await
                .map_err(|source| Error::Prerender {
                    route: route.clone(),
                    source,
                })?;
            let file = route_file(&ctx.output.public_dir, route);
            fs::write_file(&file, html).await?;
            tracing::info!(route = %route, "Prerendered");
        }
        Ok(())
    }

    /// Compile the document template, assemble the bundle config and run the
    /// bundler.
    pub async fn build(&mut self, ctx: &ResolvedContext) -> Result<BuildReport> {
        self.phase = BuildPhase::Building;
        let started = Instant::now();

        if let Some(mut document) = read_document_template(ctx).await? {
            ctx.hooks()
                .call(
                    events::TEMPLATE_DOCUMENT,
                    &mut HookArgs::new(ctx).with_document(&mut document),
                )
                .await?;
            fs::write_file(&document.dst, &document.compiled).await?;
        }

        let mut config = build_bundle_config(ctx)?;
        ctx.hooks()
            .call(
                events::ROLLUP_BEFORE,
                &mut HookArgs::new(ctx).with_bundle(&mut config),
            )
            .await?;

        tracing::info!(preset = %ctx.preset, "Building server bundle");
        let output = self.bundler.bundle(&config).await?;

        if let Some(chunks_dir) = config.dynamic_require.chunks_path() {
            for chunk in &config.dynamic_require.chunks {
                fs::copy_file(&chunk.src, &chunks_dir.join(&chunk.id)).await?;
            }
        }

        ctx.hooks()
            .call(
                events::ROLLUP_DONE,
                &mut HookArgs::new(ctx).with_bundle(&mut config),
            )
            .await?;

        let files = fs::output_tree(&ctx.output.server_dir)?;
        for (file, size) in &files {
            tracing::info!(target: "launchpad::output", "  {} ({size} B)", file.display());
        }
        tracing::debug!(emitted = output.files.len(), "bundler finished");

        ctx.hooks()
            .call(events::COMPILED, &mut HookArgs::new(ctx))
            .await?;
        ctx.hooks().call(events::DONE, &mut HookArgs::new(ctx)).await?;

        self.phase = BuildPhase::Done;
        let duration = started.elapsed();
        if ctx.timing {
            tracing::info!(elapsed_ms = duration.as_millis() as u64, "Server built");
        }

        Ok(BuildReport {
            out_file: config.output.file,
            files,
            duration,
        })
    }

    /// Every phase in order. Dev contexts skip `generate`; the dev server
    /// serves client assets from the build dir.
    pub async fn run(&mut self, ctx: &ResolvedContext) -> Result<BuildReport> {
        self.prepare(ctx).await?;
        if !ctx.host.dev {
            self.generate(ctx).await?;
        }
        self.build(ctx).await
    }

    pub async fn close(&mut self, ctx: &ResolvedContext) -> Result<()> {
        if self.phase == BuildPhase::Closed {
            return Ok(());
        }
        self.phase = BuildPhase::Closed;
        ctx.hooks()
            .call(events::CLOSE, &mut HookArgs::new(ctx))
            .await?;
        Ok(())
    }

    /// [`Orchestrator::run`] followed by [`Orchestrator::close`], which also
    /// runs when the build fails. The build error wins over a close error.
    pub async fn run_scoped(&mut self, ctx: &ResolvedContext) -> Result<BuildReport> {
        let result = self.run(ctx).await;
        let closed = self.close(ctx).await;
        let report = result?;
        closed?;
        Ok(report)
    }
}

/// Directory the client bundle is served from, relative to the public dir.
/// URL public paths (CDN) fall back to `_nuxt`.
fn public_path_dir(public_path: &str) -> PathBuf {
    if public_path.contains("://") {
        return PathBuf::from("_nuxt");
    }
    PathBuf::from(public_path.trim_matches('/'))
}

fn route_file(public_dir: &Path, route: &str) -> PathBuf {
    let route = route.trim_matches('/');
    if route.is_empty() {
        public_dir.join("index.html")
    } else {
        public_dir.join(route).join("index.html")
    }
}

async fn read_document_template(ctx: &ResolvedContext) -> Result<Option<DocumentTemplate>> {
    let views = ctx.host.build_dir.join("views");
    let Some(src) = DOCUMENT_TEMPLATES
        .iter()
        .map(|name| views.join(name))
        .find(|path| path.is_file())
    else {
        tracing::debug!(dir = %views.display(), "no document template");
        return Ok(None);
    };

    let contents = tokio::fs::read_to_string(&src)
        .await
        .map_err(|e| Error::io(format!("Failed to read {}", src.display()), e))?;
    let compiled = format!(
        "module.exports = {}",
        template::serialize_template(&contents)
    );
    Ok(Some(DocumentTemplate {
        dst: views.join("document.template.js"),
        src,
        contents,
        compiled,
    }))
}
