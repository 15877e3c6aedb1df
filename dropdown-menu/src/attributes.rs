//! Reflected attributes.
//!
//! Each configuration property is a typed value with a serialize/deserialize
//! pair against its host attribute. The attribute string is the external
//! contract; the typed value is only ever derived from it.

use tuidom::{Document, DomError, NodeId};

pub const BUTTON_TEXT: &str = "button-text";
pub const DISABLED: &str = "disabled";
pub const ARIA_EXPANDED: &str = "aria-expanded";
pub const ARIA_PRESSED: &str = "aria-pressed";

/// Attributes whose changes re-render the widget.
pub const OBSERVED_ATTRIBUTES: [&str; 2] = [BUTTON_TEXT, DISABLED];

pub const DEFAULT_BUTTON_TEXT: &str = "Menu";

/// A typed view of one attribute.
pub trait Reflected: Sized {
    const NAME: &'static str;

    /// Build the value from the attribute, `None` when absent.
    fn from_attribute(value: Option<&str>) -> Self;

    /// Attribute value to store, `None` to remove the attribute.
    fn to_attribute(&self) -> Option<String>;
}

/// Label of the toggle control. Absent or empty means [`DEFAULT_BUTTON_TEXT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonText(pub String);

impl Reflected for ButtonText {
    const NAME: &'static str = BUTTON_TEXT;

    fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(text) if !text.is_empty() => Self(text.to_string()),
            _ => Self(DEFAULT_BUTTON_TEXT.to_string()),
        }
    }

    fn to_attribute(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Presence attribute: any value, including the empty string, means true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disabled(pub bool);

impl Reflected for Disabled {
    const NAME: &'static str = DISABLED;

    fn from_attribute(value: Option<&str>) -> Self {
        Self(value.is_some())
    }

    fn to_attribute(&self) -> Option<String> {
        self.0.then(String::new)
    }
}

pub fn read<A: Reflected>(doc: &Document, node: NodeId) -> A {
    A::from_attribute(doc.get_attribute(node, A::NAME))
}

pub fn write<A: Reflected>(doc: &mut Document, node: NodeId, value: &A) -> Result<(), DomError> {
    match value.to_attribute() {
        Some(serialized) => doc.set_attribute(node, A::NAME, serialized),
        None => doc.remove_attribute(node, A::NAME),
    }
}

/// Serialized form of ARIA boolean states.
pub fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_text_defaults() {
        assert_eq!(ButtonText::from_attribute(None).0, "Menu");
        assert_eq!(ButtonText::from_attribute(Some("")).0, "Menu");
        assert_eq!(ButtonText::from_attribute(Some("File")).0, "File");
    }

    #[test]
    fn disabled_is_presence_only() {
        assert!(Disabled::from_attribute(Some("")).0);
        assert!(Disabled::from_attribute(Some("false")).0);
        assert!(!Disabled::from_attribute(None).0);
        assert_eq!(Disabled(true).to_attribute(), Some(String::new()));
        assert_eq!(Disabled(false).to_attribute(), None);
    }
}
