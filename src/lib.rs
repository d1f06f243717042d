#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

uniffi::setup_scaffolding!();

pub mod config;
pub mod css;
pub mod error;
pub mod ffi;
pub mod managers;
pub mod models;
pub mod parser;
pub mod render;
pub mod settings;

pub use config::{AuthorInfo, Config, Mode};
pub use models::{Chatterbox, Entry, MessageDir, MessageEntry};
pub use parser::{ChatterboxParser, parse_chatterbox};
pub use render::{CommonMarkRenderer, Element, RenderOptions, RichTextRenderer};
pub use settings::{Settings, render_chatterbox};

// Re-export common error types for convenience
pub use error::{
    ChatterboxError, ChatterboxResult, ConfigError, ConfigResult, ParseError, ParseResult,
    RenderError, RenderResult, SettingsError, SettingsResult, ValidationIssue,
};
