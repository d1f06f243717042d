//! `UniFFI` bindings for the Chatterbox parser and renderer
//!
//! This module exposes parsing, configuration validation and HTML rendering
//! to host applications (mobile, desktop plugin shells, Python, etc.)

use std::fmt;

use log::warn;

use crate::config::Config;
use crate::error::ChatterboxError;
use crate::models::Chatterbox;
use crate::parser::frontmatter::DEFAULTS_ORIGIN;
use crate::parser::{parse_chatterbox, parse_yaml_config};
use crate::render::CommonMarkRenderer;
use crate::settings::{Settings, render_chatterbox};

/// Error type for Chatterbox bindings
#[derive(Debug, uniffi::Error)]
pub enum FfiError {
    /// The frontmatter or configuration text was rejected
    InvalidConfig { messages: Vec<String> },
    /// Rendering failed
    Render { message: String },
    /// Settings could not be read or written
    Settings { message: String },
}

impl fmt::Display for FfiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { messages } => {
                write!(f, "Invalid configuration: {}", messages.join("; "))
            }
            Self::Render { message } => write!(f, "Rendering failed: {message}"),
            Self::Settings { message } => write!(f, "Invalid settings: {message}"),
        }
    }
}

impl std::error::Error for FfiError {}

impl From<ChatterboxError> for FfiError {
    fn from(err: ChatterboxError) -> Self {
        match &err {
            ChatterboxError::Config(_) | ChatterboxError::Parse(_) => Self::InvalidConfig {
                messages: err.error_list(),
            },
            ChatterboxError::Render(inner) => Self::Render {
                message: inner.to_string(),
            },
            ChatterboxError::Settings(inner) => Self::Settings {
                message: inner.to_string(),
            },
        }
    }
}

/// Parse a Chatterbox block into its configuration and entries
///
/// # Errors
///
/// Returns [`FfiError::InvalidConfig`] with the messages to display when the
/// frontmatter header is invalid
#[uniffi::export]
pub fn parse_chatterbox_source(source: &str) -> Result<Chatterbox, FfiError> {
    parse_chatterbox(source).map_err(|err| ChatterboxError::from(err).into())
}

/// Validate configuration YAML as used for the plugin-wide defaults
///
/// # Errors
///
/// Returns [`FfiError::InvalidConfig`] if the text is not YAML or not a record
#[uniffi::export]
pub fn validate_config_yaml(text: &str) -> Result<Config, FfiError> {
    parse_yaml_config(text, DEFAULTS_ORIGIN).map_err(|err| ChatterboxError::from(err).into())
}

/// Render a Chatterbox block to HTML using settings saved as JSON.
///
/// Unreadable settings fall back to the defaults; a broken header renders
/// the error box.
#[uniffi::export]
#[must_use]
pub fn render_chatterbox_html(source: &str, settings_json: &str) -> String {
    let settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        Settings::from_json(settings_json).unwrap_or_else(|err| {
            warn!("{err}; using default settings");
            Settings::default()
        })
    };

    render_chatterbox(source, &settings, &CommonMarkRenderer::new())
}

/// Default settings encoded as JSON, for hosts persisting them
///
/// # Errors
///
/// Returns [`FfiError::Settings`] if the settings cannot be encoded
#[uniffi::export]
pub fn default_settings_json() -> Result<String, FfiError> {
    Settings::default()
        .to_json()
        .map_err(|err| ChatterboxError::from(err).into())
}
