//! The `~serverMiddleware` virtual module.

use indexmap::IndexMap;
use launchpad_config::MiddlewareDescriptor;
use sha2::{Digest, Sha512};

use super::js_string;

pub(crate) const MIDDLEWARE_MODULE: &str = "~serverMiddleware";

/// Stable import identifier for a handler path: `_` + 6 hex chars of its
/// SHA-512.
pub(crate) fn import_id(handle: &str) -> String {
    let digest = format!("{:x}", Sha512::digest(handle.as_bytes()));
    format!("_{}", &digest[..6])
}

/// Source of a module default-exporting `[{ route, handle }]` in input order,
/// with one import per distinct handler path.
pub(crate) fn middleware_module(middleware: &[MiddlewareDescriptor]) -> String {
    let mut imports: IndexMap<&str, String> = IndexMap::new();
    for descriptor in middleware {
        imports
            .entry(descriptor.handle.as_str())
            .or_insert_with(|| import_id(&descriptor.handle));
    }

    let import_lines = imports
        .iter()
        .map(|(handle, id)| format!("import {id} from {};", js_string(handle)))
        .collect::<Vec<_>>()
        .join("\n");

    let entries = middleware
        .iter()
        .map(|m| {
            let lazy = m
                .lazy
                .map(|lazy| format!(", lazy: {lazy}"))
                .unwrap_or_default();
            format!(
                "  {{ route: {}, handle: {}{lazy} }}",
                js_string(&m.route),
                imports[m.handle.as_str()]
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!("{import_lines}\n\nexport default [\n{entries}\n];\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_id_is_stable_and_short() {
        let id = import_id("/mw.js");
        assert_eq!(id.len(), 7);
        assert!(id.starts_with('_'));
        assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, import_id("/mw.js"));
        assert_ne!(id, import_id("/other.js"));
    }

    #[test]
    fn shared_handle_is_imported_once() {
        let module = middleware_module(&[
            MiddlewareDescriptor::new("/a", "/mw.js"),
            MiddlewareDescriptor::new("/b", "/mw.js"),
        ]);
        let id = import_id("/mw.js");

        let imports: Vec<_> = module.lines().filter(|l| l.starts_with("import ")).collect();
        assert_eq!(imports, vec![format!("import {id} from '/mw.js';")]);
        assert!(module.contains(&format!("{{ route: '/a', handle: {id} }}")));
        assert!(module.contains(&format!("{{ route: '/b', handle: {id} }}")));
        assert!(module.find("'/a'").unwrap() < module.find("'/b'").unwrap());
    }

    #[test]
    fn empty_middleware_exports_empty_list() {
        assert_eq!(middleware_module(&[]), "\n\nexport default [\n\n];\n");
    }

    #[test]
    fn lazy_flag_is_forwarded() {
        let module =
            middleware_module(&[MiddlewareDescriptor::new("/api", "/api.js").lazy(true)]);
        assert!(module.contains("lazy: true"));
    }

    #[test]
    fn quotes_are_escaped() {
        let module = middleware_module(&[MiddlewareDescriptor::new("/it's", "/a.js")]);
        assert!(module.contains(r"route: '/it\'s'"));
    }
}
