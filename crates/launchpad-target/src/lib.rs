//! # launchpad-target
//!
//! Target presets for launchpad builds.
//!
//! A preset is a named partial configuration (or a function producing one)
//! describing how to package the server bundle for one hosting target: node
//! server, serverless providers, edge workers or static hosting. This crate
//! provides the built-in presets, the [`PresetRegistry`] that looks presets up
//! by name, and the environment probe used to auto-detect a provider.

pub mod detection;
pub mod loader;
pub mod preset;
pub mod registry;
pub mod targets;

pub use detection::{EnvProbe, Environment, MapEnv, PRESET_ENV, ProcessEnv};
pub use loader::{FilePresetLoader, PresetLoader};
pub use preset::{TargetPreset, extend_preset};
pub use registry::PresetRegistry;
pub use targets::DeploymentTarget;
