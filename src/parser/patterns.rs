//! Line patterns of the Chatterbox grammar
//!
//! Each pattern matches a whole line and is assembled from the shared
//! fragments below. Optional markers are optional capture groups, so an
//! absent marker is `None` rather than an empty match.

use std::sync::LazyLock;

use regex::{Captures, Regex};

const START: &str = "^";
const END: &str = "$";

const WS: &str = r"\s";
const WS_SEQ_OPTIONAL: &str = r"\s*";

/// Single-line content: at least one character after the separator
const CONTENT: &str = r"(?P<content>.+)";
/// Trailing content of a block start: a separator then anything, or blanks only
const BLOCK_CONTENT: &str = r"(?P<content>(?:\s.*)|(?:\s*))";

const COMMENT_SINGLE: &str = "#";
const COMMENT_FENCE: &str = r"(?P<fence>###+)";
const CAPSULE_MARKER: &str = r"(?P<capsule>\(\))?";

const MESSAGE_PARAMS: &str = r"(?P<params>.*?)";
const MESSAGE_LEAD_MODIFIERS: &str = r"(?P<lead>[!@]+)?";
const MESSAGE_DIR_SINGLE: &str = r"(?P<dir>[<>^])";
const MESSAGE_DIR_FENCE: &str = r"(?P<fence><<<+|>>>+|\^\^\^+)";
const MESSAGE_MODIFIERS: &str = r"(?P<modifiers>[!@]+)?";

const RICH_FENCE: &str = r"(?P<fence>@@@+)";

const DELIMITER_MARKER: &str = r"\.\.\.";

/// Modifier hiding the author name
pub const HIDE_AUTHOR_MARKER: char = '!';
/// Modifier enabling rich-text rendering of the content
pub const RENDER_RICH_MARKER: char = '@';

fn compile(fragments: &[&str]) -> Regex {
    let pattern = fragments.concat();
    Regex::new(&pattern).unwrap_or_else(|err| panic!("invalid line pattern {pattern}: {err}"))
}

/// `# content` or `#() content`
pub static COMMENT_OR_CAPSULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&[START, COMMENT_SINGLE, CAPSULE_MARKER, WS, CONTENT, END])
});

/// `###`, `###()` with optional trailing content
pub static COMMENT_OR_CAPSULE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&[START, COMMENT_FENCE, CAPSULE_MARKER, BLOCK_CONTENT, END])
});

/// `...` alone on a line
pub static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&[START, WS_SEQ_OPTIONAL, DELIMITER_MARKER, WS_SEQ_OPTIONAL, END])
});

/// `@@@` with optional trailing content
pub static RICH_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&[START, RICH_FENCE, BLOCK_CONTENT, END]));

/// `author|subtext > content`
pub static MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&[
        START,
        MESSAGE_PARAMS,
        MESSAGE_LEAD_MODIFIERS,
        WS_SEQ_OPTIONAL,
        MESSAGE_DIR_SINGLE,
        MESSAGE_MODIFIERS,
        WS,
        CONTENT,
        END,
    ])
});

/// `author|subtext >>>` with optional trailing content
pub static MESSAGE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&[
        START,
        MESSAGE_PARAMS,
        MESSAGE_LEAD_MODIFIERS,
        WS_SEQ_OPTIONAL,
        MESSAGE_DIR_FENCE,
        MESSAGE_MODIFIERS,
        BLOCK_CONTENT,
        END,
    ])
});

/// Text of a named capture, or `None` when the group did not participate
#[must_use]
pub fn group<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name).map(|m| m.as_str())
}

/// Display and rendering flags carried by a message's modifier runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub hide_author: bool,
    pub render_rich: bool,
}

impl Modifiers {
    /// Collect the modifiers of a message match; order and repeats are irrelevant
    #[must_use]
    pub fn from_captures(caps: &Captures<'_>) -> Self {
        let runs = [group(caps, "lead"), group(caps, "modifiers")];
        let symbols = || runs.iter().flatten().flat_map(|run| run.chars());

        Self {
            hide_author: symbols().any(|c| c == HIDE_AUTHOR_MARKER),
            render_rich: symbols().any(|c| c == RENDER_RICH_MARKER),
        }
    }
}
