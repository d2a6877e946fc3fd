//! Filesystem helpers for the build phases.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use launchpad_config::ConfigError;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Remove `dir` and everything below it. Missing directories are fine.
pub async fn clean_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "cleaned");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(format!("Failed to clean {}", dir.display()), e)),
    }
}

/// Recursively copy `src` into `dst`, skipping files matched by the
/// gitignore-style `ignore` globs. Returns the number of files copied. A
/// missing `src` copies nothing.
pub async fn copy_dir(src: &Path, dst: &Path, ignore: &[String]) -> Result<usize> {
    if !src.is_dir() {
        return Ok(0);
    }

    let matcher = ignore_matcher(src, ignore)?;
    let mut copied = 0;
    for (from, relative) in files_under(src)? {
        if matcher.matched_path_or_any_parents(&from, false).is_ignore() {
            tracing::trace!(file = %from.display(), "ignored");
            continue;
        }
        copy_file(&from, &dst.join(relative)).await?;
        copied += 1;
    }
    tracing::debug!(from = %src.display(), to = %dst.display(), files = copied, "copied directory");
    Ok(copied)
}

pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
    }
    tokio::fs::copy(from, to)
        .await
        .map_err(|e| Error::io(format!("Failed to copy {}", from.display()), e))?;
    Ok(())
}

pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
}

/// Files below `dir` with their sizes, sorted by path relative to `dir`.
pub fn output_tree(dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    files_under(dir)?
        .into_iter()
        .map(|(path, relative)| {
            let size = std::fs::metadata(&path)
                .map_err(|e| Error::io(format!("Failed to stat {}", path.display()), e))?
                .len();
            Ok((relative, size))
        })
        .collect()
}

/// Gitignore-style matcher for `patterns`, rooted at `root`. Only paths
/// under `root` may be matched against it. A malformed pattern is a
/// [`ConfigError::InvalidValue`] for `ignore`.
pub fn ignore_matcher(root: &Path, patterns: &[String]) -> Result<Gitignore> {
    let invalid = |message: String| {
        Error::Config(ConfigError::InvalidValue {
            field: "ignore".to_string(),
            message,
        })
    };

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| invalid(format!("invalid pattern '{pattern}': {e}")))?;
    }
    builder.build().map_err(|e| invalid(e.to_string()))
}

/// Whether `path` is `ancestor` or inside it.
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    path.starts_with(ancestor)
}

fn files_under(dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::io(
                format!("Failed to read {}", dir.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push((entry.path().to_path_buf(), relative.to_path_buf()));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn copies_nested_files() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("a/b")).unwrap();
        fs::write(src.path().join("a/b/c.txt"), "c").unwrap();
        fs::write(src.path().join("top.txt"), "top").unwrap();

        let copied = copy_dir(src.path(), &dst.path().join("out"), &[]).await.unwrap();
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.path().join("out/a/b/c.txt")).unwrap(), "c");

        let tree = output_tree(&dst.path().join("out")).unwrap();
        assert_eq!(
            tree,
            vec![(PathBuf::from("a/b/c.txt"), 1), (PathBuf::from("top.txt"), 3)]
        );
    }

    #[tokio::test]
    async fn missing_dirs_are_noops() {
        let dir = TempDir::new().unwrap();
        assert_eq!(copy_dir(&dir.path().join("nope"), dir.path(), &[]).await.unwrap(), 0);
        clean_dir(&dir.path().join("nope")).await.unwrap();
        assert!(output_tree(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn copy_skips_ignored_files() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("drafts")).unwrap();
        fs::write(src.path().join("netlify.toml"), "").unwrap();
        fs::write(src.path().join("robots.txt"), "").unwrap();
        fs::write(src.path().join("drafts/post.html"), "").unwrap();

        let ignore = vec!["netlify.toml".to_string(), "drafts/".to_string()];
        let copied = copy_dir(src.path(), dst.path(), &ignore).await.unwrap();

        assert_eq!(copied, 1);
        assert!(dst.path().join("robots.txt").is_file());
        assert!(!dst.path().join("netlify.toml").exists());
        assert!(!dst.path().join("drafts/post.html").exists());
    }

    #[test]
    fn malformed_ignore_glob_is_a_config_error() {
        let err = ignore_matcher(Path::new("/project"), &["a[".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "ignore"
        ));
        assert!(!err.is_recoverable());
    }
}
