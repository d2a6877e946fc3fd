//! Build-time enumeration of dynamically required server chunks.

use std::path::{Path, PathBuf};

use launchpad_config::{DynamicChunk, DynamicRequire};
use walkdir::WalkDir;

use super::js_string;
use crate::fs::ignore_matcher;
use crate::{Error, Result};

pub(crate) const DYNAMIC_REQUIRE_MODULE: &str = "~dynamicRequire";

pub(crate) struct DynamicRequireOptions {
    pub dir: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub chunks_dir: String,
    pub ignore: Vec<String>,
}

/// `_` + the output file name without its extension.
pub(crate) fn chunks_dir_name(out_name: &str) -> String {
    let stem = Path::new(out_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| out_name.to_string());
    format!("_{stem}")
}

pub(crate) fn dynamic_require(options: DynamicRequireOptions) -> Result<DynamicRequire> {
    let chunks = enumerate(&options.dir, &options.ignore)?;
    let module = match &options.out_dir {
        None => inline_module(&chunks),
        Some(_) => chunked_module(&options.chunks_dir, &chunks),
    };

    Ok(DynamicRequire {
        dir: options.dir,
        out_dir: options.out_dir,
        chunks_dir: options.chunks_dir,
        ignore: options.ignore,
        chunks,
        module,
    })
}

/// `.js` files under `dir`, sorted, minus the ignore globs. A missing
/// directory has no chunks.
fn enumerate(dir: &Path, ignore: &[String]) -> Result<Vec<DynamicChunk>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let matcher = ignore_matcher(dir, ignore)?;
    let mut chunks = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::io(
                format!("Failed to read {}", dir.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "js") {
            continue;
        }
        if matcher.matched_path_or_any_parents(path, false).is_ignore() {
            continue;
        }

        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let id = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        chunks.push(DynamicChunk {
            id,
            src: path.to_path_buf(),
        });
    }

    Ok(chunks)
}

fn inline_module(chunks: &[DynamicChunk]) -> String {
    let imports = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("import * as _{i} from {};", js_string(&js_path(&chunk.src))))
        .collect::<Vec<_>>()
        .join("\n");
    let entries = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("  {}: () => _{i}", js_string(&chunk.id)))
        .collect::<Vec<_>>()
        .join(",\n");

    loader_module(&imports, &entries)
}

fn chunked_module(chunks_dir: &str, chunks: &[DynamicChunk]) -> String {
    let entries = chunks
        .iter()
        .map(|chunk| {
            format!(
                "  {}: () => require({})",
                js_string(&chunk.id),
                js_string(&format!("./{chunks_dir}/{}", chunk.id))
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    loader_module("", &entries)
}

fn loader_module(imports: &str, entries: &str) -> String {
    format!(
        "{imports}\n\nconst dynamicChunks = {{\n{entries}\n}};\n\n\
export default function dynamicRequire(id) {{\n  \
const load = dynamicChunks[id];\n  \
if (!load) {{\n    throw new Error('Unknown dynamic chunk: ' + id);\n  }}\n  \
return Promise.resolve(load());\n}}\n"
    )
}

fn js_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn server_dist() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("server.js"), "").unwrap();
        fs::write(dir.path().join("pages/index.js"), "").unwrap();
        fs::write(dir.path().join("pages/about.js"), "").unwrap();
        fs::write(dir.path().join("pages/about.js.map"), "").unwrap();
        dir
    }

    fn options(dir: &Path, out_dir: Option<PathBuf>) -> DynamicRequireOptions {
        DynamicRequireOptions {
            dir: dir.to_path_buf(),
            out_dir,
            chunks_dir: chunks_dir_name("server.js"),
            ignore: vec!["server.js".to_string()],
        }
    }

    #[test]
    fn chunk_dir_derives_from_out_name() {
        assert_eq!(chunks_dir_name("server.js"), "_server");
        assert_eq!(chunks_dir_name("index.mjs"), "_index");
    }

    #[test]
    fn enumerates_js_files_except_ignored() {
        let dir = server_dist();
        let result = dynamic_require(options(dir.path(), None)).unwrap();
        let ids: Vec<_> = result.chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["pages/about.js", "pages/index.js"]);
        assert!(result.is_inline());
        assert!(result.module.contains("import * as _0 from"));
        assert!(result.module.contains("'pages/about.js': () => _0"));
    }

    #[test]
    fn chunked_loader_requires_from_chunk_dir() {
        let dir = server_dist();
        let result =
            dynamic_require(options(dir.path(), Some(PathBuf::from("/out/server")))).unwrap();
        assert_eq!(result.chunks_path(), Some(PathBuf::from("/out/server/_server")));
        assert!(result
            .module
            .contains("'pages/index.js': () => require('./_server/pages/index.js')"));
        assert!(!result.module.contains("import * as"));
    }

    #[test]
    fn quotes_in_chunk_names_are_escaped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("it's.js"), "").unwrap();

        let inline = dynamic_require(options(dir.path(), None)).unwrap();
        assert_eq!(inline.chunks[0].id, "it's.js");
        assert!(inline.module.contains(r"'it\'s.js': () => _0"));
        assert!(inline.module.contains(r"it\'s.js';"));

        let chunked =
            dynamic_require(options(dir.path(), Some(PathBuf::from("/out/server")))).unwrap();
        assert!(chunked
            .module
            .contains(r"'it\'s.js': () => require('./_server/it\'s.js')"));
    }

    #[test]
    fn bad_ignore_glob_is_not_recoverable() {
        let dir = server_dist();
        let err = dynamic_require(DynamicRequireOptions {
            ignore: vec!["[".to_string()],
            ..options(dir.path(), None)
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn missing_dir_has_no_chunks() {
        let result = dynamic_require(options(Path::new("/does/not/exist"), None)).unwrap();
        assert!(result.chunks.is_empty());
        assert!(result.module.contains("dynamicChunks"));
    }
}
