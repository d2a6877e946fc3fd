//! Error types for configuration loading and context resolution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Preset resolution errors
    #[error("cannot resolve preset: {0}")]
    UnknownPreset(String),

    #[error("preset '{0}' has a circular or too deeply nested `extends` chain")]
    PresetCycle(String),

    #[error("invalid preset '{name}': {message}")]
    InvalidPreset { name: String, message: String },

    // Value errors
    #[error("invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("missing required config value: {0}")]
    MissingValue(String),

    #[error("invalid middleware for route '{route}': {message}")]
    InvalidMiddleware { route: String, message: String },

    // Config file discovery
    #[error("config not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}
