//! Build lifecycle hook tables.
//!
//! A [`Hooks`] table maps an event name to an ordered list of handlers.
//! Handlers for one event run in registration order and each is awaited
//! before the next starts. A failing handler stops dispatch for that event
//! and the error is returned to the caller untouched.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::bundle::{BundleConfig, DocumentTemplate};
use crate::context::ResolvedContext;

/// Well-known event names fired by the build orchestrator.
pub mod events {
    pub const PREPARE_BEFORE: &str = "prepare:before";
    pub const PREPARE_DONE: &str = "prepare:done";
    pub const GENERATE_BEFORE: &str = "generate:before";
    pub const GENERATE_DONE: &str = "generate:done";
    pub const TEMPLATE_DOCUMENT: &str = "template:document";
    pub const ROLLUP_BEFORE: &str = "rollup:before";
    pub const ROLLUP_DONE: &str = "rollup:done";
    pub const COMPILED: &str = "compiled";
    pub const DONE: &str = "done";
    pub const CLOSE: &str = "close";

    /// Fired on the host hook table after a successful dev rebuild.
    pub const DEV_COMPILED: &str = "dev:compiled";
}

/// Arguments passed to every hook handler.
///
/// `bundle` is only present for the `rollup:*` events and `document` only for
/// `template:document`.
pub struct HookArgs<'a> {
    pub context: &'a ResolvedContext,
    pub bundle: Option<&'a mut BundleConfig>,
    pub document: Option<&'a mut DocumentTemplate>,
}

impl<'a> HookArgs<'a> {
    pub fn new(context: &'a ResolvedContext) -> Self {
        Self {
            context,
            bundle: None,
            document: None,
        }
    }

    pub fn with_bundle(mut self, bundle: &'a mut BundleConfig) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn with_document(mut self, document: &'a mut DocumentTemplate) -> Self {
        self.document = Some(document);
        self
    }
}

/// A single lifecycle callback.
#[async_trait]
pub trait HookHandler: Send + Sync {
    async fn call(&self, args: &mut HookArgs<'_>) -> anyhow::Result<()>;
}

struct FnHook<F>(F);

#[async_trait]
impl<F> HookHandler for FnHook<F>
where
    F: Fn(&mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn call(&self, args: &mut HookArgs<'_>) -> anyhow::Result<()> {
        (self.0)(args)
    }
}

/// Error raised by a hook handler, tagged with the event it was handling.
#[derive(Debug, thiserror::Error)]
#[error("hook '{event}' failed: {source}")]
pub struct HookError {
    pub event: String,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Clone, Default)]
pub struct Hooks {
    handlers: IndexMap<String, Vec<Arc<dyn HookHandler>>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `event`, after any existing ones.
    pub fn hook(&mut self, event: impl Into<String>, handler: Arc<dyn HookHandler>) -> &mut Self {
        self.handlers.entry(event.into()).or_default().push(handler);
        self
    }

    /// Register a synchronous closure for `event`.
    pub fn hook_fn<F>(&mut self, event: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook(event, Arc::new(FnHook(f)))
    }

    /// Builder form of [`Hooks::hook_fn`].
    pub fn with_fn<F>(mut self, event: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook_fn(event, f);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }

    /// Number of handlers registered for `event`.
    pub fn count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }

    /// Concatenate two tables per event: `base` handlers first, then
    /// `overlay` handlers. Neither input is modified.
    pub fn merge(base: &Hooks, overlay: &Hooks) -> Hooks {
        let mut merged = base.clone();
        for (event, handlers) in &overlay.handlers {
            merged
                .handlers
                .entry(event.clone())
                .or_default()
                .extend(handlers.iter().cloned());
        }
        merged
    }

    /// Run every handler for `event` in order, stopping at the first error.
    pub async fn call(&self, event: &str, args: &mut HookArgs<'_>) -> Result<(), HookError> {
        let Some(handlers) = self.handlers.get(event) else {
            return Ok(());
        };

        tracing::trace!(event, handlers = handlers.len(), "calling hook");
        for handler in handlers {
            handler.call(args).await.map_err(|source| HookError {
                event: event.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{HostOptions, ResolvedContext};
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> impl Fn(&mut HookArgs<'_>) -> anyhow::Result<()> + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |_args: &mut HookArgs<'_>| {
            log.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn merge_concatenates_base_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let base = Hooks::new().with_fn("done", recorder(&log, "a"));
        let overlay = Hooks::new()
            .with_fn("done", recorder(&log, "b"))
            .with_fn("close", recorder(&log, "c"));

        let merged = Hooks::merge(&base, &overlay);
        assert_eq!(merged.count("done"), 2);
        assert_eq!(merged.count("close"), 1);
        // inputs are untouched
        assert_eq!(base.count("done"), 1);

        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        merged.call("done", &mut HookArgs::new(&ctx)).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failing_handler_stops_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = Hooks::new()
            .with_fn("done", |_args: &mut HookArgs<'_>| anyhow::bail!("boom"))
            .with_fn("done", recorder(&log, "after"));

        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        let err = hooks.call("done", &mut HookArgs::new(&ctx)).await.unwrap_err();
        assert_eq!(err.event, "done");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_event_is_a_noop() {
        let hooks = Hooks::new();
        let ctx = ResolvedContext::for_tests(&HostOptions::new("/app"));
        hooks.call("nothing", &mut HookArgs::new(&ctx)).await.unwrap();
        assert!(hooks.is_empty());
    }
}
