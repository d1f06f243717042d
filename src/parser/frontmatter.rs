//! Frontmatter detection and YAML configuration loading

use log::debug;
use serde_yaml::Value;

use crate::config::{self, Config};
use crate::error::{ConfigError, ConfigResult};

/// Line opening and closing a frontmatter header
pub const FRONTMATTER_FENCE: &str = "---";

/// Name used in error messages for an in-block header
pub const FRONTMATTER_ORIGIN: &str = "Frontmatter";

/// Name used in error messages for the plugin-wide default configuration
pub const DEFAULTS_ORIGIN: &str = "Configuration";

/// A detected header: its raw text and the first body line after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub text: String,
    /// Index of the line following the closing fence
    pub body_start: usize,
}

/// Find a header delimited by `---` lines, starting on the first line.
///
/// Returns `None` when the first line is not a fence or no closing fence
/// follows it.
#[must_use]
pub fn split_frontmatter<S: AsRef<str>>(lines: &[S]) -> Option<Frontmatter> {
    let (first, rest) = lines.split_first()?;
    if first.as_ref() != FRONTMATTER_FENCE {
        return None;
    }

    let close = rest
        .iter()
        .position(|line| line.as_ref() == FRONTMATTER_FENCE)?;

    let text = rest[..close]
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<&str>>()
        .join("\n");

    Some(Frontmatter {
        text,
        body_start: close + 2,
    })
}

/// Deserialize `source` as YAML and validate it into a [`Config`].
///
/// Blank text is a valid, empty configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidYaml`] when `source` is not YAML, and
/// [`ConfigError::Invalid`] when the YAML is not shaped like a record.
pub fn parse_yaml_config(source: &str, origin: &str) -> ConfigResult<Config> {
    let value = if source.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str::<Value>(source).map_err(|err| {
            debug!("{origin} failed to deserialize: {err}");
            ConfigError::invalid_yaml(origin, err.to_string())
        })?
    };

    config::validate(&value).map_err(ConfigError::Invalid)
}
