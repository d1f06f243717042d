use serde::{Deserialize, Serialize};

use crate::config::Config;

pub type Entries = Vec<Entry>;

/// Layout direction of a message
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, uniffi::Enum,
)]
#[serde(rename_all = "camelCase")]
pub enum MessageDir {
    #[default]
    Left,
    Right,
    Center,
}

impl MessageDir {
    /// Map a direction marker (`<`, `>`, `^`) to a direction.
    ///
    /// Unknown markers fall back to [`MessageDir::Left`].
    #[must_use]
    pub const fn from_marker(marker: char) -> Self {
        match marker {
            '>' => Self::Right,
            '^' => Self::Center,
            _ => Self::Left,
        }
    }
}

/// One utterance attributed to an author
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntry {
    /// Empty for anonymous messages
    pub author: String,
    pub content: String,
    pub direction: MessageDir,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_author: Option<bool>,
    /// Render `content` through the rich-text capability instead of as text
    pub render_rich: bool,
}

impl MessageEntry {
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.author.is_empty()
    }

    /// Whether the author name should be displayed; defaults to shown
    #[must_use]
    pub fn shows_author(&self) -> bool {
        self.show_author.unwrap_or(true)
    }
}

/// A single parsed unit of transcript content
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, uniffi::Enum)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Entry {
    Capsule { content: String },
    Comment { content: String },
    Delimiter,
    RichBlock { content: String },
    Message { message: MessageEntry },
}

impl Entry {
    pub fn capsule(content: impl Into<String>) -> Self {
        Self::Capsule {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment {
            content: content.into(),
        }
    }

    pub fn rich_block(content: impl Into<String>) -> Self {
        Self::RichBlock {
            content: content.into(),
        }
    }

    #[must_use]
    pub const fn message(message: MessageEntry) -> Self {
        Self::Message { message }
    }

    /// Textual payload of the entry, if it has one
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Capsule { content } | Self::Comment { content } | Self::RichBlock { content } => {
                Some(content.as_str())
            }
            Self::Message { message } => Some(message.content.as_str()),
            Self::Delimiter => None,
        }
    }

    /// Short lowercase name of the entry kind
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Capsule { .. } => "capsule",
            Self::Comment { .. } => "comment",
            Self::Delimiter => "delimiter",
            Self::RichBlock { .. } => "richBlock",
            Self::Message { .. } => "message",
        }
    }
}

macro_rules! impl_entry_helpers {
    ($($variant:ident $( { $field:ident : $ty:ty } )?),*) => {
        $(
            impl Entry {
                paste::paste! {
                    #[must_use]
                    pub fn [<is_ $variant:snake>](&self) -> bool {
                        matches!(self, Self::$variant { .. })
                    }

                    $(
                        #[must_use]
                        pub fn [<as_ $variant:snake>](&self) -> Option<&$ty> {
                            if let Self::$variant { $field } = self {
                                Some($field)
                            } else {
                                None
                            }
                        }
                    )?
                }
            }
        )*
    };
}

impl_entry_helpers!(
    Capsule { content: String },
    Comment { content: String },
    Delimiter,
    RichBlock { content: String },
    Message { message: MessageEntry }
);

/// Everything parsed out of one Chatterbox block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, uniffi::Record)]
pub struct Chatterbox {
    pub config: Config,
    pub entries: Entries,
}

impl Chatterbox {
    /// All message entries in file order
    pub fn messages(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().filter_map(Entry::as_message)
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
