use std::collections::BTreeMap;

use super::Content;
use crate::types::Style;

/// Tag used for slot elements. Shadow hosts project their light children here.
pub const SLOT_TAG: &str = "slot";
/// Tag used for toggle-style buttons, rendered as `[ label ]`.
pub const BUTTON_TAG: &str = "button";

/// Declarative element description.
///
/// `Element` is a value tree used for templates and light DOM content. It is
/// turned into live nodes by [`Document::instantiate`](crate::Document::instantiate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub tag: String,
    pub id: Option<String>,

    // Content
    pub content: Content,
    pub attributes: BTreeMap<String, String>,

    // Visual
    pub style: Style,
    /// Extra columns applied to children when laid out.
    pub indent: u16,

    // Interaction
    pub focusable: bool,
    pub clickable: bool,

    // State
    pub hidden: bool,
    pub disabled: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            id: None,
            content: Content::None,
            attributes: BTreeMap::new(),
            style: Style::default(),
            indent: 0,
            focusable: false,
            clickable: false,
            hidden: false,
            disabled: false,
        }
    }
}

impl Element {
    pub fn box_() -> Self {
        Self::default()
    }

    /// Container that stacks its children vertically.
    pub fn col() -> Self {
        Self::default()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: "span".to_string(),
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    /// A focusable, clickable button.
    pub fn button(label: impl Into<String>) -> Self {
        Self {
            tag: BUTTON_TAG.to_string(),
            content: Content::Text(label.into()),
            focusable: true,
            clickable: true,
            ..Default::default()
        }
    }

    /// Projection point for the shadow host's light children.
    pub fn slot() -> Self {
        Self {
            tag: SLOT_TAG.to_string(),
            ..Default::default()
        }
    }

    /// An element with an arbitrary tag, typically a custom element name.
    pub fn custom(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    // Attributes
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    // Visual
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn indent(mut self, indent: u16) -> Self {
        self.indent = indent;
        self
    }

    // Interaction
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    // State
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }
}
