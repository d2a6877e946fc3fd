//! Server middleware descriptors and collection of legacy declarations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// A route-mounted server middleware handler bundled into the server output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareDescriptor {
    pub route: String,
    /// Path to the module default-exporting the handler.
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
}

impl MiddlewareDescriptor {
    pub fn new(route: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            handle: handle.into(),
            lazy: None,
        }
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.route.is_empty() {
            return Err(ConfigError::InvalidMiddleware {
                route: self.route.clone(),
                message: "route must not be empty".to_string(),
            });
        }
        if self.handle.is_empty() {
            return Err(ConfigError::InvalidMiddleware {
                route: self.route.clone(),
                message: "handle must point to a module".to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of [`collect_middleware`].
#[derive(Debug, Clone, Default)]
pub struct MiddlewareCollection {
    pub supported: Vec<MiddlewareDescriptor>,
    /// Declarations that did not match the supported shape, verbatim.
    pub unsupported: Vec<Value>,
}

impl MiddlewareCollection {
    /// Log unsupported declarations. They are excluded from the bundle.
    pub fn warn_unsupported(&self) {
        if self.unsupported.is_empty() {
            return;
        }

        let listed = self
            .unsupported
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(
            count = self.unsupported.len(),
            "Unsupported server middleware ignored: {}",
            listed
        );
        tracing::info!(
            "Supported format is `{{ path: string, handler: string }}` and the handler module should default-export `(req, res) => {{}}`"
        );
    }
}

/// Convert legacy middleware declarations into descriptors.
///
/// A declaration is either a bare handler path or an object with `path` (or
/// `route`, default `/`) and `handler` (or `handle`). Handler paths are passed
/// through `resolve_handle` so the caller can make them absolute.
pub fn collect_middleware<F>(declarations: &[Value], resolve_handle: F) -> MiddlewareCollection
where
    F: Fn(&str) -> String,
{
    let mut collection = MiddlewareCollection::default();

    for declaration in declarations {
        match normalize(declaration) {
            Some((route, handle, lazy)) => {
                let mut descriptor = MiddlewareDescriptor::new(route, resolve_handle(&handle));
                descriptor.lazy = lazy;
                collection.supported.push(descriptor);
            }
            None => collection.unsupported.push(declaration.clone()),
        }
    }

    collection
}

fn normalize(declaration: &Value) -> Option<(String, String, Option<bool>)> {
    match declaration {
        Value::String(handle) if !handle.is_empty() => Some(("/".to_string(), handle.clone(), None)),
        Value::Object(map) => {
            let route = match map.get("path").or_else(|| map.get("route")) {
                None | Some(Value::Null) => "/".to_string(),
                Some(Value::String(route)) if !route.is_empty() => route.clone(),
                Some(_) => return None,
            };
            let handle = match map.get("handler").or_else(|| map.get("handle")) {
                Some(Value::String(handle)) if !handle.is_empty() => handle.clone(),
                _ => return None,
            };
            let lazy = map.get("lazy").and_then(Value::as_bool);
            Some((route, handle, lazy))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_strings_and_objects() {
        let declarations = vec![
            json!("~/api/health.js"),
            json!({ "path": "/api", "handler": "~/api/index.js" }),
            json!({ "route": "/lazy", "handle": "~/lazy.js", "lazy": true }),
        ];

        let collection = collect_middleware(&declarations, |h| h.replace("~", "/app"));
        assert!(collection.unsupported.is_empty());
        assert_eq!(
            collection.supported,
            vec![
                MiddlewareDescriptor::new("/", "/app/api/health.js"),
                MiddlewareDescriptor::new("/api", "/app/api/index.js"),
                MiddlewareDescriptor::new("/lazy", "/app/lazy.js").lazy(true),
            ]
        );
    }

    #[test]
    fn separates_unsupported_shapes() {
        let declarations = vec![
            json!({ "path": "/fn", "handler": 42 }),
            json!({ "path": 7, "handler": "~/x.js" }),
            json!(["not", "a", "middleware"]),
            json!({ "path": "/ok", "handler": "/ok.js" }),
        ];

        let collection = collect_middleware(&declarations, str::to_string);
        assert_eq!(collection.supported.len(), 1);
        assert_eq!(collection.supported[0].route, "/ok");
        assert_eq!(collection.unsupported.len(), 3);
        collection.warn_unsupported();
    }

    #[test]
    fn validate_rejects_empty_fields() {
        assert!(MiddlewareDescriptor::new("", "/mw.js").validate().is_err());
        assert!(MiddlewareDescriptor::new("/a", "").validate().is_err());
        assert!(MiddlewareDescriptor::new("/a", "/mw.js").validate().is_ok());
    }
}
