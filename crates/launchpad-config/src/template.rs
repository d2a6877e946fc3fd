//! Placeholder templates for path-valued configuration fields.
//!
//! Path fields may reference other context fields with `{{ field.path }}`
//! placeholders, e.g. `{{ output.dir }}/server`. Lookups run against the
//! camelCase serialized form of the context.
//!
//! A placeholder naming a field that does not exist (or holds `null`/`false`)
//! is replaced with the empty string. Nothing reports this, so a typo in a
//! template silently yields a shorter path.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use path_clean::PathClean;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{ ?([\w.]+) ?\}\}").expect("placeholder pattern is valid"));

/// Look up a dotted field path (`output.dir`) in a JSON object tree.
pub fn lookup<'a>(params: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(params, |value, segment| value.as_object()?.get(segment))
}

/// Substitute every `{{ field.path }}` placeholder in `contents`.
pub fn compile_template(contents: &str, params: &Value) -> String {
    PLACEHOLDER
        .replace_all(contents, |caps: &Captures<'_>| {
            lookup(params, &caps[1]).map(render_value).unwrap_or_default()
        })
        .into_owned()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Turn an HTML template into a CommonJS-friendly JS arrow function source.
///
/// `{{ name }}` placeholders become `${params.name}` interpolations.
pub fn serialize_template(contents: &str) -> String {
    let escaped = contents.replace('\\', "\\\\").replace('`', "\\`");
    let body = PLACEHOLDER.replace_all(&escaped, "$${params.$1}");
    format!("(params) => `{}`", body)
}

/// Compile a path template and make it absolute against `base`.
///
/// Already-absolute paths without placeholders come back unchanged (modulo
/// normalization), so resolving twice is a no-op.
pub fn resolve_path(path: &str, params: &Value, base: &Path) -> PathBuf {
    let compiled = compile_template(path, params);
    let compiled = Path::new(&compiled);
    if compiled.is_absolute() {
        compiled.clean()
    } else {
        base.join(compiled).clean()
    }
}
