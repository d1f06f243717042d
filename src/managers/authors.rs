use std::collections::HashMap;

use crate::config::Config;
use crate::models::Entry;

/// Number of `--auto-color-N` custom properties provided by the stylesheet
pub const AUTO_COLOR_COUNT: usize = 8;

/// First-appearance order of the authors of a transcript.
///
/// The anonymous author is always `0`; named authors are numbered from `1`
/// in the order they first speak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorOrder {
    order: HashMap<String, usize>,
}

impl Default for AuthorOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorOrder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: HashMap::from([(String::new(), 0)]),
        }
    }

    /// Index the authors of every message entry
    #[must_use]
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut order = Self::new();
        for message in entries.iter().filter_map(Entry::as_message) {
            order.register(&message.author);
        }
        order
    }

    /// Assign the next index to `author` unless it already has one
    pub fn register(&mut self, author: &str) {
        if self.order.contains_key(author) {
            return;
        }
        let next = self.order.len();
        self.order.insert(author.to_string(), next);
    }

    #[must_use]
    pub fn index_of(&self, author: &str) -> Option<usize> {
        self.order.get(author).copied()
    }

    /// Number of named authors seen
    #[must_use]
    pub fn author_count(&self) -> usize {
        self.order.len() - 1
    }
}

/// Automatic author name colors cycling through the stylesheet palette.
///
/// Authors with a configured `authorColor` and the anonymous author get no
/// automatic color and do not advance the cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoAuthorColors {
    colors: HashMap<String, String>,
}

impl AutoAuthorColors {
    #[must_use]
    pub fn from_entries(entries: &[Entry], config: &Config) -> Self {
        let mut colors = HashMap::new();

        for message in entries.iter().filter_map(Entry::as_message) {
            let author = message.author.as_str();
            if author.is_empty() || colors.contains_key(author) {
                continue;
            }

            let configured = config
                .author(author)
                .is_some_and(|info| info.author_color.is_some());
            if configured {
                continue;
            }

            let color = auto_color(colors.len());
            colors.insert(author.to_string(), color);
        }

        Self { colors }
    }

    #[must_use]
    pub fn color_for(&self, author: &str) -> Option<&str> {
        self.colors.get(author).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// CSS value of the `slot`-th automatic color, wrapping around the palette
#[must_use]
pub fn auto_color(slot: usize) -> String {
    format!("var(--auto-color-{})", slot % AUTO_COLOR_COUNT + 1)
}
