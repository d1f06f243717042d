//! Rich-text (Markdown) rendering seam
//!
//! The renderer never formats Markdown itself. It hands content to a
//! [`RichTextRenderer`], which returns the HTML of each top-level block so
//! the first and last blocks can be marked for spacing fixes.
//!
//! Transcript content is untrusted: raw HTML is rendered as escaped text and
//! script-capable link targets are dropped.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use crate::css::classes;
use crate::error::{RenderError, RenderResult};

/// External rich-text capability
pub trait RichTextRenderer {
    /// Render `content` into HTML fragments, one per top-level block
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::RichText`] when the content cannot be rendered.
    fn render(&self, content: &str) -> RenderResult<Vec<String>>;
}

/// CommonMark renderer backed by `pulldown-cmark`
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkRenderer {
    options: Options,
}

impl Default for CommonMarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonMarkRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl RichTextRenderer for CommonMarkRenderer {
    fn render(&self, content: &str) -> RenderResult<Vec<String>> {
        let mut blocks = Vec::new();
        let mut pending: Vec<Event<'_>> = Vec::new();
        let mut depth = 0usize;

        for event in Parser::new_ext(content, self.options).map(sanitize_event) {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        RenderError::rich_text("unbalanced Markdown event stream")
                    })?;
                }
                _ => {}
            }

            pending.push(event);
            if depth == 0 {
                let mut fragment = String::new();
                html::push_html(&mut fragment, pending.drain(..));
                blocks.push(fragment);
            }
        }

        Ok(blocks)
    }
}

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

fn is_unsafe_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    UNSAFE_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_unsafe_url(&url) {
        CowStr::Borrowed("")
    } else {
        url
    }
}

/// Turn raw HTML into text and blank script-capable link and image targets
fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

/// Mark the first and last top-level fragments with the spacing fix classes
pub fn apply_markdown_fixes(blocks: &mut [String]) {
    if let Some(first) = blocks.first_mut() {
        *first = add_class_to_root(first, classes::FIX_FIRST);
    }
    if let Some(last) = blocks.last_mut() {
        *last = add_class_to_root(last, classes::FIX_LAST);
    }
}

/// Add `class` to the opening tag a fragment starts with.
///
/// Fragments not starting with an element are returned unchanged.
#[must_use]
pub fn add_class_to_root(fragment: &str, class: &str) -> String {
    let Some(rest) = fragment.strip_prefix('<') else {
        return fragment.to_string();
    };

    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if name_len == 0 {
        return fragment.to_string();
    }

    let open_end = rest.find('>').unwrap_or(rest.len());
    let tag = &rest[..open_end];

    if let Some(pos) = tag.find("class=\"") {
        let insert_at = 1 + pos + "class=\"".len();
        let mut out = fragment.to_string();
        out.insert_str(insert_at, &format!("{class} "));
        return out;
    }

    let insert_at = 1 + name_len;
    let mut out = fragment.to_string();
    out.insert_str(insert_at, &format!(" class=\"{class}\""));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_top_level_blocks() {
        let blocks = CommonMarkRenderer::new()
            .render("# Title\n\nSome *text*\n\n- one\n- two")
            .unwrap();

        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].starts_with("<h1>"));
        assert_eq!(blocks[1].trim(), "<p>Some <em>text</em></p>");
        assert!(blocks[2].starts_with("<ul>"));
    }

    #[test]
    fn empty_content_has_no_blocks() {
        assert!(CommonMarkRenderer::new().render("").unwrap().is_empty());
    }

    #[test]
    fn inline_html_is_escaped() {
        let blocks = CommonMarkRenderer::new()
            .render("hi <img src=x onerror=alert(1)>")
            .unwrap();

        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].contains("<img"));
        assert!(blocks[0].contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn block_html_is_escaped() {
        let blocks = CommonMarkRenderer::new()
            .render("<script>alert(1)</script>\n\nafter")
            .unwrap();

        let html = blocks.concat();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn script_link_targets_are_blanked() {
        let blocks = CommonMarkRenderer::new()
            .render("[a](javascript:alert(1)) [b]( JavaScript:x ) ![c](data:text/html,x) [d](https://example.com)")
            .unwrap();

        let html = blocks.concat();
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(!html.contains("data:"));
        assert!(html.contains("<a href=\"\">a</a>"));
        assert!(html.contains("<img src=\"\" alt=\"c\" />"));
        assert!(html.contains("<a href=\"https://example.com\">d</a>"));
    }

    #[test]
    fn marks_first_and_last() {
        let mut blocks = vec![
            "<p>a</p>".to_string(),
            "<p>b</p>".to_string(),
            "<hr />".to_string(),
        ];
        apply_markdown_fixes(&mut blocks);

        assert_eq!(blocks[0], "<p class=\"cbx-md-fix-first\">a</p>");
        assert_eq!(blocks[1], "<p>b</p>");
        assert_eq!(blocks[2], "<hr class=\"cbx-md-fix-last\" />");
    }

    #[test]
    fn single_block_gets_both_marks() {
        let mut blocks = vec!["<p>only</p>".to_string()];
        apply_markdown_fixes(&mut blocks);
        assert_eq!(
            blocks[0],
            "<p class=\"cbx-md-fix-last cbx-md-fix-first\">only</p>"
        );
    }

    #[test]
    fn merges_into_existing_class_attribute() {
        assert_eq!(
            add_class_to_root("<div class=\"note\">x</div>", "extra"),
            "<div class=\"extra note\">x</div>"
        );
        assert_eq!(add_class_to_root("plain text", "extra"), "plain text");
        assert_eq!(add_class_to_root("<!-- c -->", "extra"), "<!-- c -->");
    }
}
