//! Project file watcher feeding the dev rebuild loop.
//!
//! Debouncing happens in the dev session; the watcher only filters paths and
//! forwards them.

use std::path::{Path, PathBuf};

use ignore::gitignore::Gitignore;
use launchpad_bundler::fs::ignore_matcher;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

/// Decides which changed paths trigger a rebuild.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    /// Paths (and everything below them) that never trigger a rebuild.
    ignored_paths: Vec<PathBuf>,
    /// Hidden directories watched anyway, e.g. the host build dir.
    allowed_paths: Vec<PathBuf>,
    /// Gitignore-style globs relative to the root.
    globs: Gitignore,
}

impl WatchFilter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            ignored_paths: vec![root.join("node_modules")],
            allowed_paths: Vec::new(),
            globs: Gitignore::empty(),
            root,
        }
    }

    /// Ignore paths matching gitignore-style `patterns`, such as a context's
    /// `ignore` list.
    pub fn ignore_globs(mut self, patterns: &[String]) -> Result<Self> {
        self.globs = ignore_matcher(&self.root, patterns)?;
        Ok(self)
    }

    pub fn ignore_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ignored_paths.push(dir.into());
        self
    }

    pub fn allow_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.allowed_paths.push(dir.into());
        self
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };
        if self.ignored_paths.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }
        if self.globs.matched_path_or_any_parents(path, false).is_ignore() {
            return true;
        }
        if self.allowed_paths.iter().any(|dir| path.starts_with(dir)) {
            return false;
        }

        relative.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }
}

/// Recursive watcher over the project root. Dropping it closes the channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(filter: WatchFilter) -> Result<(Self, mpsc::Receiver<PathBuf>)> {
        let root = filter.root.clone();
        if !root.is_dir() {
            return Err(CliError::DirectoryNotFound(root));
        }

        let (tx, rx) = mpsc::channel(256);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "file watcher error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            for path in event.paths {
                if filter.should_ignore(&path) {
                    continue;
                }
                tracing::trace!(path = %path.display(), "change");
                // Receiver gone means the session is shutting down.
                if tx.blocking_send(path).is_err() {
                    return;
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching for changes");

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
