//! Plugin-wide settings and the source-to-HTML pipeline

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};
use crate::parser::frontmatter::DEFAULTS_ORIGIN;
use crate::parser::{parse_chatterbox, parse_yaml_config};
use crate::render::{Element, RenderOptions, RichTextRenderer, render, render_errors};

/// Persisted plugin settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Mark the first and last blocks of rich message content
    pub apply_markdown_fixes: bool,
    /// YAML configuration applied under every block's own header
    pub default_config: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            apply_markdown_fixes: true,
            default_config: String::new(),
        }
    }
}

impl Settings {
    /// Load settings saved as JSON; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidJson`] if `json` is not a settings object.
    pub fn from_json(json: &str) -> SettingsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::SerializationFailed`] if encoding fails.
    pub fn to_json(&self) -> SettingsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| SettingsError::SerializationFailed(err.to_string()))
    }

    /// Validated default configuration.
    ///
    /// Invalid default text is reported once per call and treated as empty,
    /// so blocks still render with their own configuration.
    #[must_use]
    pub fn default_config(&self) -> Config {
        parse_yaml_config(&self.default_config, DEFAULTS_ORIGIN).unwrap_or_else(|err| {
            warn!("ignoring default configuration: {}", err.error_list().join("; "));
            Config::default()
        })
    }

    #[must_use]
    pub const fn render_options(&self) -> RenderOptions {
        RenderOptions {
            apply_markdown_fixes: self.apply_markdown_fixes,
        }
    }
}

/// Parse `source`, merge its header over the default configuration and
/// render it. A broken header renders the error box instead.
#[must_use]
pub fn render_source(source: &str, settings: &Settings, rich: &dyn RichTextRenderer) -> Element {
    let parsed = match parse_chatterbox(source) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("rendering error box: {err}");
            return render_errors(&err.error_list());
        }
    };

    let config = parsed.config.merge_over(settings.default_config());
    render(&parsed.entries, &config, rich, settings.render_options())
}

/// [`render_source`] serialized to HTML
#[must_use]
pub fn render_chatterbox(source: &str, settings: &Settings, rich: &dyn RichTextRenderer) -> String {
    render_source(source, settings, rich).to_html()
}
