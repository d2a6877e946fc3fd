//! AWS Lambda handler target.

use launchpad_config::ContextInput;

use super::{DeploymentTarget, runtime_entry};
use crate::TargetPreset;

pub struct LambdaTarget;

impl DeploymentTarget for LambdaTarget {
    fn name(&self) -> &'static str {
        "lambda"
    }

    fn preset(&self) -> TargetPreset {
        TargetPreset::Static(ContextInput {
            entry: Some(runtime_entry("lambda")),
            externals: Some(true),
            ..Default::default()
        })
    }
}
