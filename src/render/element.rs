//! Minimal HTML element tree produced by the renderer

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Elements serialized without children or a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr"];

/// A child of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text, escaped on output
    Text(String),
    /// Pre-rendered HTML, emitted as is
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    properties: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A `div` carrying one class
    #[must_use]
    pub fn div(class: &str) -> Self {
        Self::new("div").with_class(class)
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Add a class; duplicates and blank names are ignored
    pub fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Set a `data-*` attribute
    pub fn set_data(&mut self, name: &str, value: impl Into<String>) {
        let key = format!("data-{name}");
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Set a CSS custom property in the inline style
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }

    pub fn push(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    pub fn push_raw(&mut self, html: impl Into<String>) {
        self.children.push(Node::Raw(html.into()));
    }

    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn data(&self, name: &str) -> Option<&str> {
        let key = format!("data-{name}");
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements, skipping text and raw nodes
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Raw(_) => None,
        })
    }

    /// First descendant (depth first, self included) carrying `class`
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&Self> {
        if self.has_class(class) {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find_by_class(class))
    }

    /// Concatenated text of every descendant text node
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Element(element) => text.push_str(&element.text_content()),
                Node::Text(t) => text.push_str(t),
                Node::Raw(_) => {}
            }
        }
        text
    }

    /// Serialize the tree to an HTML string
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);

        if !self.classes.is_empty() {
            let _ = write!(
                out,
                " class=\"{}\"",
                encode_double_quoted_attribute(&self.classes.join(" "))
            );
        }

        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}=\"{}\"", encode_double_quoted_attribute(value));
        }

        if !self.properties.is_empty() {
            let style = self
                .properties
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, " style=\"{}\"", encode_double_quoted_attribute(&style));
        }

        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }

        for node in &self.children {
            match node {
                Node::Element(element) => element.write_html(out),
                Node::Text(text) => out.push_str(&encode_text(text)),
                Node::Raw(html) => out.push_str(html),
            }
        }

        let _ = write!(out, "</{}>", self.tag);
    }
}
