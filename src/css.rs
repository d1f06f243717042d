//! CSS value sanitation and the class / custom property names used by the renderer

use std::sync::LazyLock;

use regex::Regex;

/// Units accepted after a numeric CSS length.
///
/// Sorted by length first, then alphabetically, with `%` last, so the
/// alternation never stops at a shorter prefix of a longer unit.
pub const CSS_LENGTH_UNITS: &[&str] = &[
    "rcap", "cap", "rch", "rem", "rex", "ric", "rlh", "ch", "cm", "em", "ex", "ic", "in", "lh",
    "mm", "pc", "pt", "px", "Q", "%",
];

static CSS_LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^(?:\d*\.?\d+(?:{})|0)$", CSS_LENGTH_UNITS.join("|"));
    Regex::new(&pattern).expect("CSS length pattern is valid")
});

/// Check a trimmed string against the CSS length grammar.
///
/// Viewport and container query units are not accepted.
#[must_use]
pub fn is_css_length(value: &str) -> bool {
    CSS_LENGTH_RE.is_match(value)
}

/// Trim and validate a CSS length, returning the trimmed form
#[must_use]
pub fn sanitize_length(value: &str) -> Option<String> {
    let trimmed = value.trim();
    is_css_length(trimmed).then(|| trimmed.to_string())
}

/// Normalize any CSS color to `#rrggbbaa`, or `None` if it does not parse
#[must_use]
pub fn normalize_color(value: &str) -> Option<String> {
    let color = csscolorparser::parse(value.trim()).ok()?;
    let [r, g, b, a] = color.to_rgba8();
    Some(format!("#{r:02x}{g:02x}{b:02x}{a:02x}"))
}

/// CSS classes emitted by the renderer
pub mod classes {
    pub const ROOT: &str = "chatterbox";
    pub const CONTENT: &str = "chatterbox-content";

    pub const MODE_BASE: &str = "mode-base";
    pub const MODE_BUBBLE: &str = "mode-bubble";
    pub const MODE_SIMPLE: &str = "mode-simple";

    pub const ENTRY_CONTAINER: &str = "entry-container";

    pub const CAPSULE_CONTAINER: &str = "capsule-container";
    pub const CAPSULE: &str = "capsule";

    pub const COMMENT_CONTAINER: &str = "comment-container";
    pub const COMMENT: &str = "comment";

    pub const DELIMITER_CONTAINER: &str = "delimiter-container";
    pub const DELIMITER: &str = "delimiter";
    pub const DELIMITER_DOT: &str = "dot";

    pub const RICH_BLOCK_CONTAINER: &str = "markdown-container";
    pub const RICH_BLOCK: &str = "markdown";

    pub const MESSAGE_CONTAINER: &str = "message-container";
    pub const MESSAGE: &str = "message";
    pub const MESSAGE_LEFT: &str = "message-left";
    pub const MESSAGE_RIGHT: &str = "message-right";
    pub const MESSAGE_CENTER: &str = "message-center";
    pub const MESSAGE_HEADER: &str = "message-header";
    pub const MESSAGE_BODY: &str = "message-body";
    pub const MESSAGE_FOOTER: &str = "message-footer";
    pub const MESSAGE_AUTHOR: &str = "message-author";
    pub const MESSAGE_CONTENT: &str = "message-content";
    pub const MESSAGE_SUBTEXT: &str = "message-subtext";

    pub const ERROR_CONTAINER: &str = "error-container";
    pub const ERROR_TITLE: &str = "error-title";
    pub const ERROR_ITEMS: &str = "error-items";

    pub const FIX_EMBED: &str = "fix-embed";
    pub const FIX_FIRST: &str = "cbx-md-fix-first";
    pub const FIX_LAST: &str = "cbx-md-fix-last";
}

/// CSS custom properties set by the renderer
pub mod props {
    pub const CAPSULE_MAX_WIDTH: &str = "--capsule-max-width";
    pub const COMMENT_MAX_WIDTH: &str = "--comment-max-width";
    pub const MESSAGE_MIN_WIDTH: &str = "--message-min-width";
    pub const MESSAGE_MAX_WIDTH: &str = "--message-max-width";
    pub const MESSAGE_BACKGROUND_COLOR: &str = "--message-background-color";
    pub const MESSAGE_AUTHOR_COLOR: &str = "--message-author-color";
    pub const MESSAGE_CONTENT_COLOR: &str = "--message-content-color";
    pub const MESSAGE_SUBTEXT_COLOR: &str = "--message-subtext-color";
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("60%")]
    #[case("0")]
    #[case("12px")]
    #[case("1.5rem")]
    #[case(".5em")]
    #[case("3Q")]
    #[case("2rcap")]
    #[case("10ch")]
    fn accepts_css_lengths(#[case] value: &str) {
        assert!(is_css_length(value), "{value} should be a CSS length");
    }

    #[rstest]
    #[case("12abc")]
    #[case("12")]
    #[case("px")]
    #[case("10vw")]
    #[case("-5px")]
    #[case("5 px")]
    #[case("00")]
    #[case("")]
    fn rejects_non_lengths(#[case] value: &str) {
        assert!(!is_css_length(value), "{value} should not be a CSS length");
    }

    #[test]
    fn sanitize_length_trims() {
        assert_eq!(sanitize_length("  60% "), Some("60%".to_string()));
        assert_eq!(sanitize_length("wide"), None);
    }

    #[test]
    fn normalize_named_and_hex_colors() {
        assert_eq!(normalize_color("red"), Some("#ff0000ff".to_string()));
        assert_eq!(normalize_color("#0f0"), Some("#00ff00ff".to_string()));
        assert_eq!(normalize_color("#11223344"), Some("#11223344".to_string()));
    }

    #[test]
    fn normalize_functional_color() {
        assert_eq!(
            normalize_color("rgba(255, 0, 0, 0)"),
            Some("#ff000000".to_string())
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert_eq!(normalize_color("not-a-color"), None);
        assert_eq!(normalize_color("var(--accent)"), None);
    }

    #[test]
    fn normalized_color_is_stable() {
        let once = normalize_color("cornflowerblue").unwrap();
        assert_eq!(normalize_color(&once), Some(once));
    }
}
