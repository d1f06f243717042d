//! HTML rendering of parsed transcripts
//!
//! One renderer serves every mode; mode differences live in the
//! [`ModeStrategy`] record selected from the configuration.

pub mod element;
pub mod error;
pub mod modes;
pub mod rich_text;

pub use element::{Element, Node};
pub use error::{ERROR_TITLE, render_errors};
pub use modes::{MessageLayout, MessageParts, ModeStrategy};
pub use rich_text::{CommonMarkRenderer, RichTextRenderer, apply_markdown_fixes};

use log::{debug, warn};

use crate::config::{AuthorInfo, Config};
use crate::css::{classes, props};
use crate::managers::{AuthorOrder, AutoAuthorColors};
use crate::models::{Chatterbox, Entry, MessageDir, MessageEntry};

/// Switches that do not belong to a transcript's configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Mark the first and last blocks of rich message content
    pub apply_markdown_fixes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            apply_markdown_fixes: true,
        }
    }
}

/// Render a parsed transcript with its own configuration
#[must_use]
pub fn render_transcript(
    chatterbox: &Chatterbox,
    rich: &dyn RichTextRenderer,
    options: RenderOptions,
) -> Element {
    render(&chatterbox.entries, &chatterbox.config, rich, options)
}

/// Render `entries` into a root element
#[must_use]
pub fn render(
    entries: &[Entry],
    config: &Config,
    rich: &dyn RichTextRenderer,
    options: RenderOptions,
) -> Element {
    let strategy = ModeStrategy::for_mode(config.effective_mode());
    debug!(
        "rendering {} entries in {} mode",
        entries.len(),
        strategy.mode.name()
    );

    let colors = if config.auto_color_authors_enabled() {
        AutoAuthorColors::from_entries(entries, config)
    } else {
        AutoAuthorColors::default()
    };

    let renderer = EntryRenderer {
        config,
        strategy,
        order: AuthorOrder::from_entries(entries),
        colors,
        rich,
        options,
    };

    renderer.render_root(entries)
}

struct EntryRenderer<'a> {
    config: &'a Config,
    strategy: ModeStrategy,
    order: AuthorOrder,
    colors: AutoAuthorColors,
    rich: &'a dyn RichTextRenderer,
    options: RenderOptions,
}

impl EntryRenderer<'_> {
    fn render_root(&self, entries: &[Entry]) -> Element {
        let mut root = Element::div(classes::ROOT);

        for class in self.strategy.root_classes {
            root.add_class(class);
        }
        for class in self.config.classes.iter().flatten() {
            root.add_class(class);
        }
        if self.options.apply_markdown_fixes {
            root.add_class(classes::FIX_EMBED);
        }

        if let Some(id) = &self.config.chatterbox_id {
            root.set_data("chatterbox-id", id.as_str());
        }

        let widths = [
            (props::CAPSULE_MAX_WIDTH, &self.config.max_capsule_width),
            (props::COMMENT_MAX_WIDTH, &self.config.max_comment_width),
            (props::MESSAGE_MIN_WIDTH, &self.config.min_message_width),
            (props::MESSAGE_MAX_WIDTH, &self.config.max_message_width),
        ];
        for (prop, value) in widths {
            if let Some(value) = value {
                root.set_property(prop, value.as_str());
            }
        }

        let mut content = Element::div(classes::CONTENT);
        for entry in entries {
            content.push(self.render_entry(entry));
        }
        root.push(content);

        root
    }

    fn render_entry(&self, entry: &Entry) -> Element {
        let mut container = Element::div(classes::ENTRY_CONTAINER);

        match entry {
            Entry::Capsule { content } => {
                container.add_class(classes::CAPSULE_CONTAINER);
                container.push(plain_block(classes::CAPSULE, content));
            }
            Entry::Comment { content } => {
                container.add_class(classes::COMMENT_CONTAINER);
                container.push(plain_block(classes::COMMENT, content));
            }
            Entry::Delimiter => {
                container.add_class(classes::DELIMITER_CONTAINER);
                let mut delimiter = Element::div(classes::DELIMITER);
                for _ in 0..3 {
                    delimiter.push(Element::div(classes::DELIMITER_DOT));
                }
                container.push(delimiter);
            }
            Entry::RichBlock { content } => {
                container.add_class(classes::RICH_BLOCK_CONTAINER);
                let mut block = Element::div(classes::RICH_BLOCK);
                self.push_rich(&mut block, content, false);
                container.push(block);
            }
            Entry::Message { message } => {
                container.add_class(classes::MESSAGE_CONTAINER);
                self.render_message(message, &mut container);
            }
        }

        container
    }

    fn render_message(&self, message: &MessageEntry, container: &mut Element) {
        let author = message.author.as_str();
        let info = self.config.author(author);
        let display_name = self.config.display_name(author);

        container.add_class(match message.direction {
            MessageDir::Left => classes::MESSAGE_LEFT,
            MessageDir::Right => classes::MESSAGE_RIGHT,
            MessageDir::Center => classes::MESSAGE_CENTER,
        });
        if let Some(index) = self.order.index_of(author) {
            container.set_data("cbx-author-order", index.to_string());
        }
        container.set_data("cbx-author", author);
        container.set_data("cbx-author-full", display_name);

        let mut bubble = Element::div(classes::MESSAGE);
        set_color(&mut bubble, props::MESSAGE_BACKGROUND_COLOR, info, |i| {
            &i.background_color
        });

        let header = if message.shows_author() && !display_name.trim().is_empty() {
            let color = info
                .and_then(|i| i.author_color.as_deref())
                .or_else(|| self.colors.color_for(author));
            if let Some(color) = color {
                bubble.set_property(props::MESSAGE_AUTHOR_COLOR, color);
            }

            let mut header = Element::div(classes::MESSAGE_HEADER);
            header.push(Element::div(classes::MESSAGE_AUTHOR).with_text(display_name));
            Some(header)
        } else {
            None
        };

        let mut content = Element::div(classes::MESSAGE_CONTENT);
        if message.render_rich {
            self.push_rich(&mut content, &message.content, self.options.apply_markdown_fixes);
        } else {
            push_plain_text(&mut content, &message.content);
        }
        set_color(&mut bubble, props::MESSAGE_CONTENT_COLOR, info, |i| &i.text_color);

        let footer = message
            .subtext
            .as_deref()
            .filter(|subtext| !subtext.trim().is_empty())
            .map(|subtext| {
                set_color(&mut bubble, props::MESSAGE_SUBTEXT_COLOR, info, |i| {
                    &i.subtext_color
                });

                let mut footer = Element::div(classes::MESSAGE_FOOTER);
                footer.push(Element::div(classes::MESSAGE_SUBTEXT).with_text(subtext));
                footer
            });

        let parts = MessageParts {
            header,
            content,
            footer,
        };
        for child in self.strategy.build_message(parts) {
            bubble.push(child);
        }
        container.push(bubble);
    }

    /// Render `content` as rich text into `target`, falling back to plain text
    fn push_rich(&self, target: &mut Element, content: &str, fixes: bool) {
        match self.rich.render(content) {
            Ok(mut blocks) => {
                if fixes {
                    apply_markdown_fixes(&mut blocks);
                }
                for block in blocks {
                    target.push_raw(block);
                }
            }
            Err(err) => {
                warn!("{err}; showing the content as plain text");
                push_plain_text(target, content);
            }
        }
    }
}

fn set_color(
    target: &mut Element,
    prop: &str,
    info: Option<&AuthorInfo>,
    pick: impl Fn(&AuthorInfo) -> &Option<String>,
) {
    if let Some(color) = info.and_then(|i| pick(i).as_deref()) {
        target.set_property(prop, color);
    }
}

fn plain_block(class: &str, content: &str) -> Element {
    let mut block = Element::div(class);
    push_plain_text(&mut block, content);
    block
}

/// Push entity-decoded text, turning line breaks into `<br>`
fn push_plain_text(target: &mut Element, content: &str) {
    let decoded = html_escape::decode_html_entities(content);
    for (index, line) in decoded.split('\n').enumerate() {
        if index > 0 {
            target.push(Element::new("br"));
        }
        if !line.is_empty() {
            target.push_text(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::Mode;
    use crate::error::{RenderError, RenderResult};
    use crate::parser::parse_chatterbox;

    struct Offline;

    impl RichTextRenderer for Offline {
        fn render(&self, _content: &str) -> RenderResult<Vec<String>> {
            Err(RenderError::rich_text("engine offline"))
        }
    }

    fn rendered(source: &str) -> Element {
        let parsed = parse_chatterbox(source).unwrap();
        render_transcript(&parsed, &CommonMarkRenderer::new(), RenderOptions::default())
    }

    fn entry_containers(root: &Element) -> Vec<&Element> {
        root.find_by_class(classes::CONTENT)
            .unwrap()
            .child_elements()
            .collect()
    }

    #[test]
    fn root_carries_mode_classes_and_widths() {
        let root = rendered(
            "---\nmode: simple\nclasses: [wide, dark]\nchatterboxId: chat-1\nmaxMessageWidth: 60%\n---",
        );

        assert_eq!(
            root.classes(),
            ["chatterbox", "mode-simple", "wide", "dark", "fix-embed"]
        );
        assert_eq!(root.data("chatterbox-id"), Some("chat-1"));
        assert_eq!(root.property(props::MESSAGE_MAX_WIDTH), Some("60%"));
        assert_eq!(root.property(props::CAPSULE_MAX_WIDTH), None);
    }

    #[test]
    fn default_mode_is_bubble() {
        let root = rendered("> hi");
        assert!(root.has_class(classes::MODE_BUBBLE));
    }

    #[test]
    fn without_fixes_no_embed_class() {
        let parsed = parse_chatterbox("# hi").unwrap();
        let options = RenderOptions {
            apply_markdown_fixes: false,
        };
        let root = render_transcript(&parsed, &CommonMarkRenderer::new(), options);
        assert!(!root.has_class(classes::FIX_EMBED));
    }

    #[test]
    fn capsule_comment_and_delimiter() {
        let root = rendered("#() Tom &amp; Jerry\n# <b>aside</b>\n...");
        let containers = entry_containers(&root);
        assert_eq!(containers.len(), 3);

        assert!(containers[0].has_class(classes::CAPSULE_CONTAINER));
        assert_eq!(containers[0].text_content(), "Tom & Jerry");
        assert!(root.to_html().contains("&lt;b&gt;aside&lt;/b&gt;"));

        let delimiter = containers[2].find_by_class(classes::DELIMITER).unwrap();
        assert_eq!(delimiter.child_elements().count(), 3);
    }

    #[test]
    fn multiline_plain_text_keeps_breaks() {
        let root = rendered("###\none\ntwo\n###");
        assert!(root.to_html().contains("one<br>two"));
    }

    #[test]
    fn message_attributes_and_author_colors() {
        let root = rendered(
            "---\nauthors:\n  john:\n    fullName: John Smith\n    bgColor: red\n---\njohn > hi\njane < yo\n^ anon",
        );
        let containers = entry_containers(&root);

        let john = containers[0];
        assert!(john.has_class(classes::MESSAGE_RIGHT));
        assert_eq!(john.data("cbx-author-order"), Some("1"));
        assert_eq!(john.data("cbx-author"), Some("john"));
        assert_eq!(john.data("cbx-author-full"), Some("John Smith"));
        let bubble = john.find_by_class(classes::MESSAGE).unwrap();
        assert_eq!(bubble.property(props::MESSAGE_BACKGROUND_COLOR), Some("#ff0000ff"));
        assert_eq!(
            bubble.property(props::MESSAGE_AUTHOR_COLOR),
            Some("var(--auto-color-1)")
        );
        assert_eq!(
            john.find_by_class(classes::MESSAGE_AUTHOR).map(Element::text_content),
            Some("John Smith".to_string())
        );

        let jane = containers[1];
        assert!(jane.has_class(classes::MESSAGE_LEFT));
        assert_eq!(
            jane.find_by_class(classes::MESSAGE)
                .and_then(|m| m.property(props::MESSAGE_AUTHOR_COLOR)),
            Some("var(--auto-color-2)")
        );

        let anon = containers[2];
        assert!(anon.has_class(classes::MESSAGE_CENTER));
        assert_eq!(anon.data("cbx-author-order"), Some("0"));
        assert!(anon.find_by_class(classes::MESSAGE_HEADER).is_none());
    }

    #[test]
    fn auto_colors_can_be_disabled() {
        let root = rendered("---\nautoColorAuthors: false\n---\njohn > hi");
        let bubble = root.find_by_class(classes::MESSAGE).unwrap();
        assert_eq!(bubble.property(props::MESSAGE_AUTHOR_COLOR), None);
    }

    #[test]
    fn hidden_author_and_subtext() {
        let root = rendered("john|10:30 >! hi\njane|   < yo");
        let containers = entry_containers(&root);

        assert!(containers[0].find_by_class(classes::MESSAGE_HEADER).is_none());
        assert_eq!(
            containers[0]
                .find_by_class(classes::MESSAGE_SUBTEXT)
                .map(Element::text_content),
            Some("10:30".to_string())
        );
        assert!(containers[1].find_by_class(classes::MESSAGE_FOOTER).is_none());
    }

    #[test]
    fn rich_message_gets_fix_classes() {
        let root = rendered("jane!@ <<< *Hi!*\n<<<");
        let html = root.to_html();
        assert!(html.contains("<p class=\"cbx-md-fix-last cbx-md-fix-first\"><em>Hi!</em></p>"));
    }

    #[test]
    fn rich_block_is_not_fixed() {
        let root = rendered("@@@\n**bold**\n@@@");
        let block = root.find_by_class(classes::RICH_BLOCK).unwrap();
        assert!(block.to_html().contains("<p><strong>bold</strong></p>"));
    }

    #[test]
    fn rich_failure_falls_back_to_plain_text() {
        let parsed = parse_chatterbox("bob >@ *raw*\n@@@ **also raw**").unwrap();
        let root = render_transcript(&parsed, &Offline, RenderOptions::default());

        let containers = entry_containers(&root);
        assert_eq!(containers[0].text_content(), "bob*raw*");
        assert_eq!(containers[1].text_content(), "**also raw**");
    }

    #[test]
    fn configured_author_color_wins() {
        let config = Config {
            mode: Some(Mode::Base),
            authors: Some(HashMap::from([(
                "john".to_string(),
                AuthorInfo {
                    author_color: Some("#00ff00ff".to_string()),
                    text_color: Some("#000000ff".to_string()),
                    ..AuthorInfo::default()
                },
            )])),
            ..Config::default()
        };
        let entries = parse_chatterbox("john > hi").unwrap().entries;
        let root = render(&entries, &config, &Offline, RenderOptions::default());

        let bubble = root.find_by_class(classes::MESSAGE).unwrap();
        assert_eq!(bubble.property(props::MESSAGE_AUTHOR_COLOR), Some("#00ff00ff"));
        assert_eq!(bubble.property(props::MESSAGE_CONTENT_COLOR), Some("#000000ff"));
    }
}
