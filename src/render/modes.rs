//! Per-mode rendering strategies

use crate::config::Mode;
use crate::css::classes;

use super::element::Element;

/// Arrangement of a message's header, body and footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLayout {
    /// Header, body and footer stacked inside the message box
    Stacked,
    /// Author name placed inside the body, ahead of the content
    Inline,
}

/// Parts of a message handed to a layout
#[derive(Debug)]
pub struct MessageParts {
    pub header: Option<Element>,
    pub content: Element,
    pub footer: Option<Element>,
}

/// Renderer capabilities selected by [`Mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeStrategy {
    pub mode: Mode,
    /// Classes added to the root element
    pub root_classes: &'static [&'static str],
    pub layout: MessageLayout,
}

const BASE: ModeStrategy = ModeStrategy {
    mode: Mode::Base,
    root_classes: &[classes::MODE_BASE],
    layout: MessageLayout::Stacked,
};

const BUBBLE: ModeStrategy = ModeStrategy {
    mode: Mode::Bubble,
    root_classes: &[classes::MODE_BUBBLE],
    layout: MessageLayout::Stacked,
};

const SIMPLE: ModeStrategy = ModeStrategy {
    mode: Mode::Simple,
    root_classes: &[classes::MODE_SIMPLE],
    layout: MessageLayout::Inline,
};

impl ModeStrategy {
    #[must_use]
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Base => BASE,
            Mode::Bubble => BUBBLE,
            Mode::Simple => SIMPLE,
        }
    }

    /// Assemble the children of the `message` element
    #[must_use]
    pub fn build_message(&self, parts: MessageParts) -> Vec<Element> {
        let MessageParts {
            header,
            content,
            footer,
        } = parts;

        let mut body = Element::div(classes::MESSAGE_BODY);
        let mut children = Vec::with_capacity(3);

        match self.layout {
            MessageLayout::Stacked => children.extend(header),
            MessageLayout::Inline => {
                if let Some(header) = header {
                    body.push(header);
                }
            }
        }

        body.push(content);
        children.push(body);
        children.extend(footer);
        children
    }
}
