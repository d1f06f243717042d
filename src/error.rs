//! Error types for the chatterbox library
//!
//! This module provides centralized error handling using `thiserror` across all components

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used when printing the path of a validation issue
pub const ISSUE_PATH_SEPARATOR: &str = " → ";

/// A structural problem found while validating a configuration value.
///
/// Only whole-object problems become issues; a bad individual field is
/// silently dropped by the validator instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ValidationIssue {
    pub message: String,
    /// Keys leading from the configuration root to the offending value
    pub path: Vec<String>,
}

impl ValidationIssue {
    /// Create an issue at the given path
    pub fn new(message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            path,
        }
    }

    /// Create an issue concerning the configuration value itself
    pub fn at_root(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new())
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}",
            self.message,
            self.path.join(ISSUE_PATH_SEPARATOR)
        )
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration text could not be deserialized as YAML
    #[error("{origin} is not valid YAML.")]
    InvalidYaml { origin: String, reason: String },

    /// The configuration value is not shaped like a record
    #[error("{}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

impl ConfigError {
    /// Create an invalid YAML error for the named configuration source
    pub fn invalid_yaml(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidYaml {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Human-readable messages, one per problem, in detection order
    #[must_use]
    pub fn error_list(&self) -> Vec<String> {
        match self {
            Self::InvalidYaml { origin, .. } => vec![format!("{origin} is not valid YAML.")],
            Self::Invalid(issues) => issues.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parse-related errors
///
/// The entry grammar never fails; only a broken header aborts a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The leading `---` header could not be turned into a configuration
    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] ConfigError),
}

impl ParseError {
    /// Messages to show to the user for this failure
    #[must_use]
    pub fn error_list(&self) -> Vec<String> {
        match self {
            Self::Frontmatter(err) => err.error_list(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Render-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The external rich-text capability reported a failure
    #[error("Rich text rendering failed: {0}")]
    RichText(String),
}

impl RenderError {
    /// Create a rich text failure
    pub fn rich_text(reason: impl Into<String>) -> Self {
        Self::RichText(reason.into())
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Settings-related errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Persisted settings could not be decoded
    #[error("Settings are not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Settings could not be encoded for persistence
    #[error("Settings could not be serialized: {0}")]
    SerializationFailed(String),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Main unified error type that can represent any chatterbox error
#[derive(Debug, Error)]
pub enum ChatterboxError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Parsing error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl ChatterboxError {
    /// Messages to show to the user for this failure
    #[must_use]
    pub fn error_list(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.error_list(),
            Self::Parse(err) => err.error_list(),
            Self::Render(err) => vec![err.to_string()],
            Self::Settings(err) => vec![err.to_string()],
        }
    }
}

/// Result type for chatterbox operations
pub type ChatterboxResult<T> = Result<T, ChatterboxError>;
