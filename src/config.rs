//! Chatterbox configuration and its lenient validator
//!
//! Configuration arrives as untrusted YAML. Validation never fails on an
//! individual field: a value of the wrong type or shape is dropped and the
//! field reads as absent. Only a top-level value that is not a record at all
//! produces [`ValidationIssue`]s.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::css::{normalize_color, sanitize_length};
use crate::error::ValidationIssue;

/// Mode used when neither the block nor the plugin defaults pick one
pub const DEFAULT_MODE: Mode = Mode::Bubble;

/// Whether authors without an explicit color get one assigned automatically
pub const DEFAULT_AUTO_COLOR_AUTHORS: bool = true;

/// Rendering mode of a Chatterbox block
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Base,
    Bubble,
    Simple,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Base, Self::Bubble, Self::Simple];

    /// Name used in configuration files
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Bubble => "bubble",
            Self::Simple => "simple",
        }
    }

    /// Look up a mode by its exact configuration name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// Per-author display overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Name displayed instead of the short author key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext_color: Option<String>,
}

/// Validated configuration of a Chatterbox block.
///
/// Every field is optional; `None` means "not set" and lets defaults or the
/// renderer decide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capsule_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_comment_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_message_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_message_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatterbox_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_color_authors: Option<bool>,
    /// Extra classes for the root element; a single string is stored as a
    /// one-element list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<HashMap<String, AuthorInfo>>,
}

impl Config {
    /// Shallow merge: every field set on `self` wins over `defaults`
    #[must_use]
    pub fn merge_over(self, defaults: Self) -> Self {
        Self {
            mode: self.mode.or(defaults.mode),
            max_capsule_width: self.max_capsule_width.or(defaults.max_capsule_width),
            max_comment_width: self.max_comment_width.or(defaults.max_comment_width),
            min_message_width: self.min_message_width.or(defaults.min_message_width),
            max_message_width: self.max_message_width.or(defaults.max_message_width),
            chatterbox_id: self.chatterbox_id.or(defaults.chatterbox_id),
            auto_color_authors: self.auto_color_authors.or(defaults.auto_color_authors),
            classes: self.classes.or(defaults.classes),
            authors: self.authors.or(defaults.authors),
        }
    }

    /// Mode to render with, falling back to [`DEFAULT_MODE`]
    #[must_use]
    pub fn effective_mode(&self) -> Mode {
        self.mode.unwrap_or(DEFAULT_MODE)
    }

    #[must_use]
    pub fn auto_color_authors_enabled(&self) -> bool {
        self.auto_color_authors
            .unwrap_or(DEFAULT_AUTO_COLOR_AUTHORS)
    }

    /// Overrides configured for `author`, if any
    #[must_use]
    pub fn author(&self, author: &str) -> Option<&AuthorInfo> {
        self.authors.as_ref()?.get(author)
    }

    /// Display name for `author`: the configured full name or the key itself
    #[must_use]
    pub fn display_name<'a>(&'a self, author: &'a str) -> &'a str {
        self.author(author)
            .and_then(|info| info.full_name.as_deref())
            .unwrap_or(author)
    }
}

/// Validate an arbitrary deserialized YAML value into a [`Config`].
///
/// `null` yields an all-absent configuration.
///
/// # Errors
///
/// Returns the list of issues when `value` is neither `null` nor a mapping.
pub fn validate(value: &Value) -> Result<Config, Vec<ValidationIssue>> {
    match untag(value) {
        Value::Null => Ok(Config::default()),
        Value::Mapping(map) => Ok(validate_mapping(map)),
        other => Err(vec![ValidationIssue::at_root(format!(
            "Invalid input: expected object, received {}",
            value_kind(other)
        ))]),
    }
}

fn validate_mapping(map: &Mapping) -> Config {
    Config {
        mode: field(map, &["mode"], |v| as_str(v).and_then(Mode::from_name)),
        max_capsule_width: field(map, &["maxCapsuleWidth"], length),
        max_comment_width: field(map, &["maxCommentWidth"], length),
        min_message_width: field(map, &["minMessageWidth"], length),
        max_message_width: field(map, &["maxMessageWidth"], length),
        chatterbox_id: field(map, &["chatterboxId"], |v| as_str(v).map(str::to_string)),
        auto_color_authors: field(map, &["autoColorAuthors"], |v| untag(v).as_bool()),
        classes: field(map, &["classes"], classes),
        authors: field(map, &["authors"], authors),
    }
}

fn validate_author(value: &Value) -> AuthorInfo {
    let Value::Mapping(map) = untag(value) else {
        return AuthorInfo::default();
    };

    AuthorInfo {
        background_color: field(map, &["backgroundColor", "bgColor"], color),
        full_name: field(map, &["fullName", "authorFull"], |v| {
            as_str(v).map(str::to_string)
        }),
        author_color: field(map, &["authorColor"], color),
        text_color: field(map, &["textColor"], color),
        subtext_color: field(map, &["subtextColor"], color),
    }
}

/// Look up the first present key and run its validator; drops invalid values
fn field<T>(map: &Mapping, keys: &[&str], validator: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| map.get(*key).map(|value| (*key, value)))?;

    let validated = validator(value);
    if validated.is_none() && !untag(value).is_null() {
        debug!("dropping invalid configuration value for `{key}`");
    }
    validated
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn as_str(value: &Value) -> Option<&str> {
    untag(value).as_str()
}

fn color(value: &Value) -> Option<String> {
    as_str(value).and_then(normalize_color)
}

fn length(value: &Value) -> Option<String> {
    as_str(value).and_then(sanitize_length)
}

fn classes(value: &Value) -> Option<Vec<String>> {
    match untag(value) {
        Value::String(class) => Some(vec![class.clone()]),
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(|item| as_str(item).map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

fn authors(value: &Value) -> Option<HashMap<String, AuthorInfo>> {
    let Value::Mapping(map) = untag(value) else {
        return None;
    };

    let mut authors = HashMap::with_capacity(map.len());
    for (key, info) in map {
        let name = match untag(key) {
            Value::String(name) => name.clone(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => {
                debug!("dropping author entry with a non-scalar key");
                continue;
            }
        };
        authors.insert(name, validate_author(info));
    }

    Some(authors)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}
