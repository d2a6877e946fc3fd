//! Preset values and preset extension.

use std::fmt;
use std::sync::Arc;

use launchpad_config::ContextInput;

type PresetFn = dyn Fn(&ContextInput) -> ContextInput + Send + Sync;

/// A named bundling profile.
///
/// Either plain data or a function of the in-progress input. Presets are
/// never mutated once registered; [`extend_preset`] builds a new one.
#[derive(Clone)]
pub enum TargetPreset {
    Static(ContextInput),
    Dynamic(Arc<PresetFn>),
}

impl TargetPreset {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&ContextInput) -> ContextInput + Send + Sync + 'static,
    {
        TargetPreset::Dynamic(Arc::new(f))
    }

    /// Produce the preset's partial configuration for `input`.
    pub fn apply(&self, input: &ContextInput) -> ContextInput {
        match self {
            TargetPreset::Static(preset) => preset.clone(),
            TargetPreset::Dynamic(f) => f(input),
        }
    }

    /// Base preset name when this is a data preset declaring `extends`.
    pub fn extends(&self) -> Option<&str> {
        match self {
            TargetPreset::Static(preset) => preset.extends.as_deref(),
            TargetPreset::Dynamic(_) => None,
        }
    }
}

impl From<ContextInput> for TargetPreset {
    fn from(input: ContextInput) -> Self {
        TargetPreset::Static(input)
    }
}

impl fmt::Debug for TargetPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPreset::Static(input) => f.debug_tuple("Static").field(input).finish(),
            TargetPreset::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Derive a preset from `base`.
///
/// The result is lazy: both presets are applied to the same input when the
/// result is applied. `hooks` and `host_hooks` concatenate per event with
/// `base` handlers first. Every other field is taken from `overlay` when set,
/// recursing into `output`.
pub fn extend_preset(base: TargetPreset, overlay: TargetPreset) -> TargetPreset {
    TargetPreset::from_fn(move |input| {
        let base = base.apply(input);
        let overlay = overlay.apply(input);
        let mut merged = overlay.merge(&base);
        merged.extends = None;
        merged
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_config::{HookArgs, Hooks, OutputInput};

    fn noop(_: &mut HookArgs<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn overlay_fields_win_and_output_recurses() {
        let base = TargetPreset::Static(ContextInput {
            entry: Some("base-entry".into()),
            node: Some(false),
            output: OutputInput {
                dir: Some("base-dir".into()),
                public_dir: Some("base-public".into()),
                ..Default::default()
            },
            ..Default::default()
        });
        let overlay = TargetPreset::Static(ContextInput {
            entry: Some("overlay-entry".into()),
            output: OutputInput {
                dir: Some("overlay-dir".into()),
                ..Default::default()
            },
            ..Default::default()
        });

        let merged = extend_preset(base, overlay).apply(&ContextInput::default());
        assert_eq!(merged.entry.as_deref(), Some("overlay-entry"));
        assert_eq!(merged.node, Some(false));
        assert_eq!(merged.output.dir.as_deref(), Some("overlay-dir"));
        assert_eq!(merged.output.public_dir.as_deref(), Some("base-public"));
    }

    #[test]
    fn hooks_are_concatenated() {
        let base = TargetPreset::Static(ContextInput {
            hooks: Hooks::new().with_fn("done", noop),
            host_hooks: Hooks::new().with_fn("ready", noop),
            ..Default::default()
        });
        let overlay = TargetPreset::Static(ContextInput {
            hooks: Hooks::new().with_fn("done", noop).with_fn("close", noop),
            host_hooks: Hooks::new().with_fn("ready", noop),
            ..Default::default()
        });

        let merged = extend_preset(base, overlay).apply(&ContextInput::default());
        assert_eq!(merged.hooks.count("done"), 2);
        assert_eq!(merged.hooks.count("close"), 1);
        assert_eq!(merged.host_hooks.count("ready"), 2);
    }

    #[test]
    fn dynamic_presets_see_the_input() {
        let base = TargetPreset::from_fn(|input| ContextInput {
            renderer: input.renderer.clone().map(|r| format!("{r}-base")),
            ..Default::default()
        });
        let overlay = TargetPreset::Static(ContextInput {
            minify: Some(false),
            extends: Some("base".into()),
            ..Default::default()
        });

        let input = ContextInput {
            renderer: Some("vue3".into()),
            ..Default::default()
        };
        let merged = extend_preset(base, overlay).apply(&input);
        assert_eq!(merged.renderer.as_deref(), Some("vue3-base"));
        assert_eq!(merged.minify, Some(false));
        assert!(merged.extends.is_none());
    }
}
