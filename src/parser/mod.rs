//! Chatterbox parser
//!
//! Turns the text of one Chatterbox block into its configuration and an
//! ordered list of entries in a single pass over the lines.
//!
//! Key design points:
//! - The scanner is an explicit two-state machine ([`ScanState`]) driven by
//!   the pure [`step`] function; [`finish`] closes a block left open at the
//!   end of the input
//! - Lines are classified with the patterns of [`patterns`] in a fixed
//!   priority order; the first match wins
//! - Lines matching nothing are dropped without a diagnostic
//! - Only a broken frontmatter header fails a parse

pub mod frontmatter;
pub mod patterns;

pub use frontmatter::{Frontmatter, parse_yaml_config, split_frontmatter};

use log::{debug, trace};
use regex::Captures;

use crate::config::Config;
use crate::error::ParseResult;
use crate::models::{Chatterbox, Entry, MessageDir, MessageEntry};

use self::frontmatter::FRONTMATTER_ORIGIN;
use self::patterns::{
    COMMENT_OR_CAPSULE_BLOCK_RE, COMMENT_OR_CAPSULE_RE, DELIMITER_RE, MESSAGE_BLOCK_RE,
    MESSAGE_RE, Modifiers, RICH_BLOCK_RE, group,
};

/// Author and optional subtext taken from the text before a direction marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageParams {
    pub author: String,
    pub subtext: Option<String>,
}

/// Split `author|subtext` on the first `|`.
///
/// Both parts are trimmed and HTML-entity decoded; an empty subtext is
/// treated as absent.
#[must_use]
pub fn parse_message_params(params: &str) -> MessageParams {
    let (author, subtext) = params
        .split_once('|')
        .map_or((params, None), |(author, subtext)| (author, Some(subtext)));

    let subtext = subtext
        .map(str::trim)
        .filter(|subtext| !subtext.is_empty())
        .map(decode_entities);

    MessageParams {
        author: decode_entities(author.trim()),
        subtext,
    }
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Message parameters cached while a message block is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub params: MessageParams,
    pub direction: MessageDir,
    pub modifiers: Modifiers,
}

/// Entry kind an open block produces when it closes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Capsule,
    Comment,
    RichBlock,
    Message(PendingMessage),
}

/// A multi-line block waiting for its closing fence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    /// Exact line that closes the block
    pub fence: String,
    pub kind: BlockKind,
    pub lines: Vec<String>,
}

impl OpenBlock {
    /// Open a block, seeding it with the trailing content of the opening line
    fn new(fence: &str, kind: BlockKind, trailing: Option<&str>) -> Self {
        let mut lines = Vec::new();

        let trailing = trailing.unwrap_or_default().trim_start();
        if !trailing.is_empty() {
            lines.push(trailing.to_string());
        }

        Self {
            fence: fence.to_string(),
            kind,
            lines,
        }
    }

    /// Close the block and build its entry
    #[must_use]
    pub fn into_entry(self) -> Entry {
        let content = self.lines.join("\n");

        match self.kind {
            BlockKind::Capsule => Entry::Capsule { content },
            BlockKind::Comment => Entry::Comment { content },
            BlockKind::RichBlock => Entry::RichBlock { content },
            BlockKind::Message(pending) => Entry::message(MessageEntry {
                author: pending.params.author,
                content,
                direction: pending.direction,
                subtext: pending.params.subtext,
                show_author: Some(!pending.modifiers.hide_author),
                render_rich: pending.modifiers.render_rich,
            }),
        }
    }
}

/// Scanner state between two lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Classifying lines one at a time
    #[default]
    Single,
    /// Collecting the lines of an open block
    Block(OpenBlock),
}

/// Outcome of classifying one line in single-line mode
enum LineMatch {
    Entry(Entry),
    BlockStart(OpenBlock),
    Unmatched,
}

/// Feed one line to the scanner.
///
/// Returns the next state and the entry completed by this line, if any.
#[must_use]
pub fn step(state: ScanState, line: &str) -> (ScanState, Option<Entry>) {
    match state {
        ScanState::Block(block) if line == block.fence => {
            (ScanState::Single, Some(block.into_entry()))
        }
        ScanState::Block(mut block) => {
            block.lines.push(line.to_string());
            (ScanState::Block(block), None)
        }
        ScanState::Single => match classify_line(line) {
            LineMatch::Entry(entry) => (ScanState::Single, Some(entry)),
            LineMatch::BlockStart(block) => (ScanState::Block(block), None),
            LineMatch::Unmatched => {
                trace!("dropping unrecognized line {line:?}");
                (ScanState::Single, None)
            }
        },
    }
}

/// Flush the scanner at the end of the input; an open block is closed implicitly
#[must_use]
pub fn finish(state: ScanState) -> Option<Entry> {
    match state {
        ScanState::Single => None,
        ScanState::Block(block) => {
            debug!("closing unterminated block opened with {:?}", block.fence);
            Some(block.into_entry())
        }
    }
}

fn classify_line(line: &str) -> LineMatch {
    let classifiers: [fn(&str) -> Option<LineMatch>; 6] = [
        try_message_block,
        try_comment_or_capsule_block,
        try_rich_block,
        try_delimiter,
        try_comment_or_capsule,
        try_message,
    ];

    classifiers
        .iter()
        .find_map(|classify| classify(line))
        .unwrap_or(LineMatch::Unmatched)
}

fn try_message_block(line: &str) -> Option<LineMatch> {
    let caps = MESSAGE_BLOCK_RE.captures(line)?;
    let fence = group(&caps, "fence")?;

    let pending = PendingMessage {
        params: parse_message_params(group(&caps, "params").unwrap_or_default()),
        direction: fence
            .chars()
            .next()
            .map_or(MessageDir::Left, MessageDir::from_marker),
        modifiers: Modifiers::from_captures(&caps),
    };

    Some(LineMatch::BlockStart(OpenBlock::new(
        fence,
        BlockKind::Message(pending),
        group(&caps, "content"),
    )))
}

fn try_comment_or_capsule_block(line: &str) -> Option<LineMatch> {
    let caps = COMMENT_OR_CAPSULE_BLOCK_RE.captures(line)?;
    let fence = group(&caps, "fence")?;

    let kind = if is_capsule(&caps) {
        BlockKind::Capsule
    } else {
        BlockKind::Comment
    };

    Some(LineMatch::BlockStart(OpenBlock::new(
        fence,
        kind,
        group(&caps, "content"),
    )))
}

fn try_rich_block(line: &str) -> Option<LineMatch> {
    let caps = RICH_BLOCK_RE.captures(line)?;
    let fence = group(&caps, "fence")?;

    Some(LineMatch::BlockStart(OpenBlock::new(
        fence,
        BlockKind::RichBlock,
        group(&caps, "content"),
    )))
}

fn try_delimiter(line: &str) -> Option<LineMatch> {
    DELIMITER_RE
        .is_match(line)
        .then_some(LineMatch::Entry(Entry::Delimiter))
}

fn try_comment_or_capsule(line: &str) -> Option<LineMatch> {
    let caps = COMMENT_OR_CAPSULE_RE.captures(line)?;
    let content = group(&caps, "content").unwrap_or_default();

    let entry = if is_capsule(&caps) {
        Entry::capsule(content)
    } else {
        Entry::comment(content)
    };

    Some(LineMatch::Entry(entry))
}

fn try_message(line: &str) -> Option<LineMatch> {
    let caps = MESSAGE_RE.captures(line)?;
    let params = parse_message_params(group(&caps, "params").unwrap_or_default());
    let modifiers = Modifiers::from_captures(&caps);

    let direction = group(&caps, "dir")
        .and_then(|dir| dir.chars().next())
        .map_or(MessageDir::Left, MessageDir::from_marker);

    Some(LineMatch::Entry(Entry::message(MessageEntry {
        author: params.author,
        content: group(&caps, "content").unwrap_or_default().to_string(),
        direction,
        subtext: params.subtext,
        show_author: Some(!modifiers.hide_author),
        render_rich: modifiers.render_rich,
    })))
}

fn is_capsule(caps: &Captures<'_>) -> bool {
    group(caps, "capsule").is_some()
}

/// Split source text into lines on `\n`, dropping a `\r` before each break
#[must_use]
pub fn split_lines(source: &str) -> Vec<&str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Parser for one Chatterbox source string.
///
/// `parse` consumes the parser, so an instance is used exactly once.
#[derive(Debug)]
pub struct ChatterboxParser<'a> {
    lines: Vec<&'a str>,
}

impl<'a> ChatterboxParser<'a> {
    /// Prepare a parser over `source`
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: split_lines(source),
        }
    }

    /// Parse the header and every body line.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParseError::Frontmatter`] when a `---` header is
    /// present but is not valid YAML or not a record. No entries are
    /// produced in that case.
    pub fn parse(self) -> ParseResult<Chatterbox> {
        let (config, body_start) = match split_frontmatter(&self.lines) {
            Some(frontmatter) => (
                parse_yaml_config(&frontmatter.text, FRONTMATTER_ORIGIN)?,
                frontmatter.body_start,
            ),
            None => (Config::default(), 0),
        };

        let mut entries = Vec::new();
        let mut state = ScanState::Single;

        for line in &self.lines[body_start..] {
            let (next, entry) = step(state, line);
            state = next;
            entries.extend(entry);
        }
        entries.extend(finish(state));

        debug!(
            "parsed {} entries from {} lines",
            entries.len(),
            self.lines.len()
        );

        Ok(Chatterbox { config, entries })
    }
}

/// Parse a Chatterbox source string.
///
/// # Errors
///
/// Fails only when the frontmatter header is invalid; see
/// [`ChatterboxParser::parse`].
pub fn parse_chatterbox(source: &str) -> ParseResult<Chatterbox> {
    ChatterboxParser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use crate::error::ParseError;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn entries(source: &str) -> Vec<Entry> {
        parse_chatterbox(source).unwrap().entries
    }

    fn message(
        author: &str,
        content: &str,
        direction: MessageDir,
        show_author: bool,
        render_rich: bool,
    ) -> Entry {
        Entry::message(MessageEntry {
            author: author.to_string(),
            content: content.to_string(),
            direction,
            subtext: None,
            show_author: Some(show_author),
            render_rich,
        })
    }

    #[test]
    fn no_header_means_default_config() {
        let parsed = parse_chatterbox("john > hi\n---\nmode: base\n---").unwrap();
        assert_eq!(parsed.config, Config::default());
    }

    #[test]
    fn header_only_on_first_line() {
        let parsed = parse_chatterbox("\n---\nmode: base\n---\n# after").unwrap();
        assert_eq!(parsed.config, Config::default());
        assert_eq!(parsed.entries, vec![Entry::comment("after")]);
    }

    #[test]
    fn capsule_and_comment_lines() {
        assert_eq!(
            entries("random prose\n#() text\nmore prose"),
            vec![Entry::capsule("text")]
        );
        assert_eq!(entries("# text"), vec![Entry::comment("text")]);
    }

    #[test]
    fn delimiter_line() {
        assert_eq!(entries("  ...  "), vec![Entry::Delimiter]);
        assert_eq!(entries("..."), vec![Entry::Delimiter]);
    }

    #[test]
    fn fence_must_match_exactly() {
        let source = "<<<< a\nb\n<<<\n<<<<<\n<<<<\n# after";
        assert_eq!(
            entries(source),
            vec![
                message("", "a\nb\n<<<\n<<<<<", MessageDir::Left, true, false),
                Entry::comment("after"),
            ]
        );

        assert_eq!(
            entries("<<<< a\nb\n<<<<"),
            vec![message("", "a\nb", MessageDir::Left, true, false)]
        );
    }

    #[test]
    fn fence_direction_follows_first_character() {
        assert_eq!(
            entries(">>> right\n>>>\n^^^^ center\n^^^^"),
            vec![
                message("", "right", MessageDir::Right, true, false),
                message("", "center", MessageDir::Center, true, false),
            ]
        );
    }

    #[test]
    fn modifier_order_does_not_matter() {
        let forward = entries("name!@ >>> message");
        let backward = entries("name@! >>> message");
        assert_eq!(forward, backward);
        assert_eq!(
            forward,
            vec![message("name", "message", MessageDir::Right, false, true)]
        );

        assert_eq!(
            entries("name >!@ message"),
            entries("name >@!@ message")
        );
    }

    #[test]
    fn double_marker_is_not_a_fence() {
        // The second `>` is the direction marker, so `!@ >` stays in the author.
        assert_eq!(
            entries("name!@ >> message"),
            vec![message("name!@ >", "message", MessageDir::Right, true, false)]
        );
    }

    #[test]
    fn trailing_bang_in_author_hides_it() {
        assert_eq!(
            entries("Hey! > hi"),
            vec![message("Hey", "hi", MessageDir::Right, false, false)]
        );
        assert_eq!(
            entries("Hey&#33; > hi"),
            vec![message("Hey!", "hi", MessageDir::Right, true, false)]
        );
    }

    #[test]
    fn single_line_directions() {
        assert_eq!(
            entries("a < one\nb > two\nc ^ three"),
            vec![
                message("a", "one", MessageDir::Left, true, false),
                message("b", "two", MessageDir::Right, true, false),
                message("c", "three", MessageDir::Center, true, false),
            ]
        );
    }

    #[test]
    fn anonymous_author_is_empty_string() {
        assert_eq!(
            entries("> hello"),
            vec![message("", "hello", MessageDir::Right, true, false)]
        );
    }

    #[test]
    fn params_with_subtext_and_entities() {
        let parsed = entries("Tom &amp; Jerry | at 10:30 &quot;sharp&quot; > hi");
        let msg = parsed[0].as_message().unwrap();
        assert_eq!(msg.author, "Tom & Jerry");
        assert_eq!(msg.subtext.as_deref(), Some("at 10:30 \"sharp\""));
    }

    #[test]
    fn params_split_on_first_pipe_only() {
        let params = parse_message_params(" a | b | c ");
        assert_eq!(params.author, "a");
        assert_eq!(params.subtext.as_deref(), Some("b | c"));

        let params = parse_message_params("john|   ");
        assert_eq!(params.subtext, None);

        assert_eq!(parse_message_params(""), MessageParams::default());
    }

    #[test]
    fn unrecognized_line_leaves_state_untouched() {
        init_logger();
        assert_eq!(step(ScanState::Single, "just prose"), (ScanState::Single, None));

        let (state, entry) = step(ScanState::Single, "### start");
        assert!(entry.is_none());
        let (state, entry) = step(state, "just prose");
        assert!(entry.is_none());
        let ScanState::Block(block) = &state else {
            panic!("expected an open block");
        };
        assert_eq!(block.lines, vec!["start", "just prose"]);
        assert_eq!(entries("just prose\n\n   "), Vec::<Entry>::new());
    }

    #[test]
    fn comment_and_capsule_blocks() {
        assert_eq!(
            entries("### first\nsecond\n###\n###()\ninside\n###"),
            vec![
                Entry::comment("first\nsecond"),
                Entry::capsule("inside"),
            ]
        );
    }

    #[test]
    fn rich_block() {
        assert_eq!(
            entries("@@@\n**bold**\n\n- item\n@@@"),
            vec![Entry::rich_block("**bold**\n\n- item")]
        );
    }

    #[test]
    fn block_lines_are_kept_verbatim() {
        assert_eq!(
            entries("###\n  # not a comment\n> not a message\n###"),
            vec![Entry::comment("  # not a comment\n> not a message")]
        );
    }

    #[test]
    fn unterminated_block_is_closed_at_end() {
        assert_eq!(
            entries("bob >>>@ **one**\ntwo"),
            vec![message("bob", "**one**\ntwo", MessageDir::Right, true, true)]
        );
        assert_eq!(finish(ScanState::Single), None);
    }

    #[test]
    fn block_start_wins_over_single_line_message() {
        assert_eq!(
            entries("a > b <<< c\n<<<"),
            vec![message("a > b", "c", MessageDir::Left, true, false)]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            entries("---\r\nmode: base\r\n---\r\n# one\r\n...\r\n"),
            vec![Entry::comment("one"), Entry::Delimiter]
        );
    }

    #[test]
    fn invalid_header_is_fatal() {
        let err = parse_chatterbox("---\nmode: [oops\n---\n# lost").unwrap_err();
        assert_eq!(err.error_list(), vec!["Frontmatter is not valid YAML."]);

        let err = parse_chatterbox("---\n- a\n---\n# lost").unwrap_err();
        assert!(matches!(err, ParseError::Frontmatter(_)));
    }

    #[test]
    fn end_to_end_scenario() {
        init_logger();
        let source = "---\nmode: simple\n---\njohn> Hello there\n...\njane!@ <<< *Hi!*\n<<<";
        let parsed = parse_chatterbox(source).unwrap();

        assert_eq!(
            parsed.config,
            Config {
                mode: Some(Mode::Simple),
                ..Config::default()
            }
        );
        assert_eq!(
            parsed.entries,
            vec![
                message("john", "Hello there", MessageDir::Right, true, false),
                Entry::Delimiter,
                message("jane", "*Hi!*", MessageDir::Left, false, true),
            ]
        );
    }
}
