//! # launchpad-config
//!
//! Typed configuration model shared by every launchpad crate:
//!
//! - [`ContextInput`]: partial configuration supplied by users and presets
//! - [`ResolvedContext`]: the frozen, fully merged context driving one build
//! - [`Hooks`]: per-event handler tables with concatenating merge semantics
//! - [`BundleConfig`]: the bundler-facing configuration derived from a context
//! - [`template`]: `{{ field.path }}` placeholder resolution for path fields

pub mod bundle;
pub mod context;
pub mod discovery;
pub mod error;
pub mod hooks;
pub mod input;
pub mod middleware;
pub mod template;

// Re-export main types
pub use bundle::*;
pub use context::*;
pub use error::*;
pub use hooks::{HookArgs, HookError, HookHandler, Hooks, events};
pub use input::*;
pub use middleware::*;

pub use discovery::{ConfigDiscovery, ProjectConfig};
