//! Body and style content: raw strings, renderable objects and groups.

use std::fmt;

use crate::attributes::Attributes;
use crate::format::Formatting;

/// An object that can be placed in the page body or in a style block.
///
/// Both conversions are optional. The body prefers [`to_html`](Self::to_html)
/// and falls back to [`to_text`](Self::to_text); style blocks require
/// `to_text`. `fmt` carries the page's indent unit and line ending, with the
/// offset the content starts at.
pub trait Renderable {
    /// Markup form of the object.
    fn to_html(&self, _fmt: &Formatting) -> Option<String> {
        None
    }

    /// Plain string form of the object.
    fn to_text(&self, _fmt: &Formatting) -> Option<String> {
        None
    }
}

/// One entry inside a [`BodyNode::Group`].
pub enum BodyItem {
    Text(String),
    Object(Box<dyn Renderable>),
}

/// A top-level entry of the page body.
pub enum BodyNode {
    /// Emitted on its own line, indented by one unit.
    Text(String),
    Object(Box<dyn Renderable>),
    /// A sequence of items rendered in order; groups do not nest further.
    Group(Vec<BodyItem>),
}

impl BodyNode {
    pub fn object<R: Renderable + 'static>(object: R) -> Self {
        BodyNode::Object(Box::new(object))
    }
}

impl BodyItem {
    pub fn object<R: Renderable + 'static>(object: R) -> Self {
        BodyItem::Object(Box::new(object))
    }
}

impl From<&str> for BodyNode {
    fn from(s: &str) -> Self {
        BodyNode::Text(s.to_string())
    }
}

impl From<String> for BodyNode {
    fn from(s: String) -> Self {
        BodyNode::Text(s)
    }
}

impl From<Box<dyn Renderable>> for BodyNode {
    fn from(object: Box<dyn Renderable>) -> Self {
        BodyNode::Object(object)
    }
}

impl From<Vec<BodyItem>> for BodyNode {
    fn from(items: Vec<BodyItem>) -> Self {
        BodyNode::Group(items)
    }
}

impl From<&str> for BodyItem {
    fn from(s: &str) -> Self {
        BodyItem::Text(s.to_string())
    }
}

impl From<String> for BodyItem {
    fn from(s: String) -> Self {
        BodyItem::Text(s)
    }
}

impl From<Box<dyn Renderable>> for BodyItem {
    fn from(object: Box<dyn Renderable>) -> Self {
        BodyItem::Object(object)
    }
}

impl fmt::Debug for BodyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyItem::Text(s) => f.debug_tuple("Text").field(s).finish(),
            BodyItem::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl fmt::Debug for BodyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyNode::Text(s) => f.debug_tuple("Text").field(s).finish(),
            BodyNode::Object(_) => f.write_str("Object(..)"),
            BodyNode::Group(items) => f.debug_tuple("Group").field(items).finish(),
        }
    }
}

/// Content of an inline `<style>` block.
pub enum StyleContent {
    Text(String),
    Object(Box<dyn Renderable>),
}

impl StyleContent {
    pub fn object<R: Renderable + 'static>(object: R) -> Self {
        StyleContent::Object(Box::new(object))
    }
}

impl From<&str> for StyleContent {
    fn from(s: &str) -> Self {
        StyleContent::Text(s.to_string())
    }
}

impl From<String> for StyleContent {
    fn from(s: String) -> Self {
        StyleContent::Text(s)
    }
}

impl fmt::Debug for StyleContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleContent::Text(s) => f.debug_tuple("Text").field(s).finish(),
            StyleContent::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// A generic element with attributes and line-oriented children.
///
/// Renders as an indented block that follows the formatting it is handed:
///
/// ```text
/// <offset><div class="x">
/// <offset+1>child line
/// <offset></div>
/// ```
///
/// Childless elements render on a single line as `<tag></tag>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn child(mut self, line: impl Into<String>) -> Self {
        self.children.push(line.into());
        self
    }

    fn open_tag(&self) -> String {
        if self.attributes.is_empty() {
            format!("<{}>", self.tag)
        } else {
            format!("<{} {}>", self.tag, self.attributes.to_attr_string())
        }
    }
}

impl Renderable for Element {
    fn to_html(&self, fmt: &Formatting) -> Option<String> {
        let indent = fmt.indent();
        if self.children.is_empty() {
            return Some(format!("{}{}</{}>", indent, self.open_tag(), self.tag));
        }
        let inner = fmt.nested(1).indent();
        let mut lines = Vec::with_capacity(self.children.len() + 2);
        lines.push(format!("{}{}", indent, self.open_tag()));
        for child in &self.children {
            lines.push(format!("{}{}", inner, child));
        }
        lines.push(format!("{}</{}>", indent, self.tag));
        Some(lines.join(fmt.lnend()))
    }

    fn to_text(&self, fmt: &Formatting) -> Option<String> {
        self.to_html(fmt)
    }
}
