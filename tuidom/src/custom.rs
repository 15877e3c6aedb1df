//! Custom element definitions.

use std::any::Any;
use std::collections::HashMap;

use crate::document::{Document, NodeId};
use crate::error::DomError;
use crate::event::DomEvent;

/// Behavior attached to an element with a defined tag.
///
/// Every callback runs synchronously with exclusive access to the document.
/// Mutations made inside a callback may queue further reactions; the page
/// delivers them before returning to its caller.
pub trait CustomElement: Any {
    /// The element was inserted into a connected tree.
    fn connected(&mut self, _doc: &mut Document) -> Result<(), DomError> {
        Ok(())
    }

    /// The element was removed from a connected tree.
    fn disconnected(&mut self, _doc: &mut Document) -> Result<(), DomError> {
        Ok(())
    }

    /// One of the observed attributes was added, changed or removed.
    fn attribute_changed(
        &mut self,
        _doc: &mut Document,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), DomError> {
        Ok(())
    }

    /// A listener owned by this element matched an event. `handler` is the
    /// name the listener was registered with.
    fn handle_event(
        &mut self,
        _doc: &mut Document,
        _handler: &str,
        _event: &DomEvent,
    ) -> Result<(), DomError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Builds an instance for a freshly created host node.
pub type Constructor =
    Box<dyn Fn(&mut Document, NodeId) -> Result<Box<dyn CustomElement>, DomError>>;

pub struct Definition {
    pub name: String,
    pub observed_attributes: Vec<String>,
    constructor: Constructor,
}

impl Definition {
    pub fn observes(&self, attribute: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attribute)
    }

    pub fn construct(
        &self,
        doc: &mut Document,
        host: NodeId,
    ) -> Result<Box<dyn CustomElement>, DomError> {
        (self.constructor)(doc, host)
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("observed_attributes", &self.observed_attributes)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, Definition>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag. Names must be lowercase and contain a hyphen, and can
    /// only be defined once.
    pub fn define(
        &mut self,
        name: &str,
        observed_attributes: &[&str],
        constructor: Constructor,
    ) -> Result<(), DomError> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidName(name.to_string()));
        }
        if self.definitions.contains_key(name) {
            return Err(DomError::AlreadyDefined(name.to_string()));
        }
        log::debug!(
            "[custom] define <{}> observed={:?}",
            name,
            observed_attributes
        );
        self.definitions.insert(
            name.to_string(),
            Definition {
                name: name.to_string(),
                observed_attributes: observed_attributes.iter().map(|a| a.to_string()).collect(),
                constructor,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }
}

/// Valid custom element name: starts with a lowercase ASCII letter, contains
/// a hyphen, and uses only lowercase letters, digits, `-`, `.` and `_`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && name.contains('-')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'))
}
