//! The page runtime.
//!
//! [`Page`] owns a [`Document`], the custom element registry and the live
//! element instances. Every public mutation runs to completion: reactions
//! queued by the mutation (and by the callbacks it triggers) are delivered
//! before the call returns.

use std::collections::HashMap;

use crate::buffer::Buffer;
use crate::custom::{Constructor, CustomElement, CustomElementRegistry};
use crate::document::{Document, NodeId, Reaction};
use crate::element::Element;
use crate::error::DomError;
use crate::event::{DomEvent, Event, Key, Modifiers, MouseButton};
use crate::focus::FocusState;
use crate::hit::hit_test;
use crate::layout::{layout, LayoutResult, Rect};
use crate::render::render_to_buffer;

#[derive(Default)]
pub struct Page {
    document: Document,
    registry: CustomElementRegistry,
    instances: HashMap<NodeId, Box<dyn CustomElement>>,
    focus: FocusState,
    last_layout: LayoutResult,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("document", &self.document)
            .field("registry", &self.registry)
            .field("instance_count", &self.instances.len())
            .field("focus", &self.focus)
            .finish()
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn body(&self) -> NodeId {
        self.document.body()
    }

    pub fn registry(&self) -> &CustomElementRegistry {
        &self.registry
    }

    /// Define a custom element tag for this page.
    pub fn define(
        &mut self,
        name: &str,
        observed_attributes: &[&str],
        constructor: Constructor,
    ) -> Result<(), DomError> {
        self.registry.define(name, observed_attributes, constructor)
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Create a detached element, constructing its custom element instance
    /// when the tag is defined.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let node = self.document.create_element(tag);
        self.upgrade(node)?;
        self.flush_reactions()?;
        Ok(node)
    }

    /// Clone a builder tree under `parent`, upgrading any defined custom
    /// elements it contains.
    pub fn instantiate(&mut self, element: &Element, parent: NodeId) -> Result<NodeId, DomError> {
        let root = self.document.instantiate(element, parent)?;
        for node in self.document.shadow_including_descendants(root) {
            self.upgrade(node)?;
        }
        self.flush_reactions()?;
        Ok(root)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.document.append_child(parent, child)?;
        self.flush_reactions()
    }

    /// Detach `child` from `parent`. The subtree stays in the document arena
    /// and its custom element instances stay alive, along with listeners they
    /// did not release in `disconnected`, so the node can be appended again.
    /// Nothing is ever freed for the lifetime of the page.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.document.remove_child(parent, child)?;
        if let Some(focused) = self.focus.focused() {
            if self.document.contains(child, focused) {
                self.focus.blur();
            }
        }
        self.flush_reactions()
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.document.set_attribute(node, name, value)?;
        self.flush_reactions()
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        self.document.remove_attribute(node, name)?;
        self.flush_reactions()
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.document.set_text(node, text)
    }

    // ------------------------------------------------------------------
    // Custom element instances
    // ------------------------------------------------------------------

    /// Borrow the instance behind `node` as `T`.
    pub fn element<T: CustomElement>(&self, node: NodeId) -> Option<&T> {
        self.instances.get(&node)?.as_any().downcast_ref::<T>()
    }

    /// Run `f` with the instance behind `node` and the document, then deliver
    /// any reactions it caused.
    pub fn with_element<T: CustomElement, R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut T, &mut Document) -> R,
    ) -> Result<R, DomError> {
        let instance = self
            .instances
            .get_mut(&node)
            .and_then(|i| i.as_any_mut().downcast_mut::<T>())
            .ok_or(DomError::WrongElementType {
                node,
                expected: std::any::type_name::<T>(),
            })?;
        let result = f(instance, &mut self.document);
        self.flush_reactions()?;
        Ok(result)
    }

    fn upgrade(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.instances.contains_key(&node) {
            return Ok(());
        }
        let Some(tag) = self.document.node(node).map(|n| n.tag.clone()) else {
            return Err(DomError::UnknownNode(node));
        };
        let Some(definition) = self.registry.get(&tag) else {
            return Ok(());
        };

        log::debug!("[page] upgrade {} as <{}>", node, tag);
        let instance = definition.construct(&mut self.document, node)?;

        // Attributes present before the upgrade are reported as changes
        let initial: Vec<(String, String)> = self
            .document
            .node(node)
            .map(|n| {
                n.attributes()
                    .filter(|(name, _)| definition.observes(name))
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        self.document.mark_custom(node)?;
        self.instances.insert(node, instance);

        for (name, value) in initial {
            self.document.queue_reaction(Reaction::AttributeChanged {
                node,
                name,
                old: None,
                new: Some(value),
            });
        }
        if self.document.node(node).is_some_and(|n| n.is_connected()) {
            self.document.queue_reaction(Reaction::Connected(node));
        }
        Ok(())
    }

    /// Deliver queued lifecycle reactions until the queue is empty.
    pub fn flush_reactions(&mut self) -> Result<(), DomError> {
        while let Some(reaction) = self.document.next_reaction() {
            let node = match &reaction {
                Reaction::Connected(node) | Reaction::Disconnected(node) => *node,
                Reaction::AttributeChanged { node, .. } => *node,
            };
            let Some(instance) = self.instances.get_mut(&node) else {
                log::warn!("[page] dropping {:?}: no instance", reaction);
                continue;
            };

            match &reaction {
                Reaction::Connected(_) => {
                    log::debug!("[page] connected {}", node);
                    instance.connected(&mut self.document)?;
                }
                Reaction::Disconnected(_) => {
                    log::debug!("[page] disconnected {}", node);
                    instance.disconnected(&mut self.document)?;
                }
                Reaction::AttributeChanged { name, old, new, .. } => {
                    let observed = self
                        .document
                        .node(node)
                        .and_then(|n| self.registry.get(&n.tag))
                        .is_some_and(|d| d.observes(name));
                    if !observed {
                        continue;
                    }
                    log::debug!(
                        "[page] attribute_changed {} {}: {:?} -> {:?}",
                        node,
                        name,
                        old,
                        new
                    );
                    instance.attribute_changed(
                        &mut self.document,
                        name,
                        old.as_deref(),
                        new.as_deref(),
                    )?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Run an event through the listeners on its path, then through the
    /// document listeners. A listener removed by an earlier handler in the
    /// same dispatch is skipped.
    pub fn dispatch(&mut self, event: DomEvent) -> Result<(), DomError> {
        let path = self.document.event_path(event.target);
        let listeners = self.document.listeners().matching(&path, event.kind);
        log::debug!(
            "[page] dispatch {:?} target={} listeners={}",
            event.kind,
            event.target,
            listeners.len()
        );

        for listener in listeners {
            if !self.document.listeners().is_live(listener.id) {
                continue;
            }
            let Some(instance) = self.instances.get_mut(&listener.owner) else {
                log::warn!(
                    "[page] {} has no owner instance {}",
                    listener.id,
                    listener.owner
                );
                continue;
            };
            instance.handle_event(&mut self.document, listener.handler, &event)?;
            self.flush_reactions()?;
        }
        Ok(())
    }

    /// Activate a node as if it had been clicked. Disabled nodes swallow the
    /// activation. Focusable nodes receive focus first.
    pub fn click(&mut self, target: NodeId) -> Result<(), DomError> {
        let node = self
            .document
            .node(target)
            .ok_or(DomError::UnknownNode(target))?;
        if node.disabled {
            log::debug!("[page] click on disabled {} ignored", target);
            return Ok(());
        }
        if node.focusable {
            self.focus.focus(target);
        }
        self.dispatch(DomEvent::click(target))
    }

    /// Deliver a key press. Tab and Shift+Tab move focus; Enter and Space
    /// activate a focused button; everything else is dispatched to the
    /// focused node, or to the body when nothing is focused.
    pub fn key(&mut self, key: Key, modifiers: Modifiers) -> Result<(), DomError> {
        match key {
            Key::Tab => {
                self.focus_next();
                return Ok(());
            }
            Key::BackTab => {
                self.focus_prev();
                return Ok(());
            }
            _ => {}
        }

        let target = self
            .focus
            .focused()
            .filter(|id| self.document.is_rendered(*id))
            .unwrap_or_else(|| self.document.body());

        self.dispatch(DomEvent::key_down(target, key, modifiers))?;

        let activates = matches!(key, Key::Enter | Key::Char(' ')) && modifiers.none();
        let clickable = self.document.node(target).is_some_and(|n| n.clickable);
        if activates && clickable && target != self.document.body() {
            self.click(target)?;
        }
        Ok(())
    }

    /// Route a raw terminal event. Left clicks are hit tested against the
    /// last rendered layout; a click on nothing clickable activates the body.
    pub fn handle_input(&mut self, event: &Event) -> Result<(), DomError> {
        match event {
            Event::Key { key, modifiers } => self.key(*key, *modifiers),
            Event::Click {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let body = self.document.body();
                let target = hit_test(&self.last_layout, &self.document, body, *x, *y)
                    .unwrap_or(body);
                self.click(target)
            }
            Event::Click { .. } | Event::Resize { .. } => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    pub fn focus(&mut self, node: NodeId) -> bool {
        self.focus.focus(node)
    }

    pub fn blur(&mut self) -> bool {
        self.focus.blur()
    }

    pub fn focus_next(&mut self) -> Option<NodeId> {
        self.focus.focus_next(&self.document)
    }

    pub fn focus_prev(&mut self) -> Option<NodeId> {
        self.focus.focus_prev(&self.document)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Lay out and paint the page into a fresh buffer.
    pub fn render(&mut self, width: u16, height: u16) -> Buffer {
        let body = self.document.body();
        self.last_layout = layout(&self.document, body, Rect::from_size(width, height));
        let mut buf = Buffer::new(width, height);
        render_to_buffer(
            &self.document,
            body,
            &self.last_layout,
            self.focus.focused(),
            &mut buf,
        );
        buf
    }

    /// Layout from the last render.
    pub fn layout(&self) -> &LayoutResult {
        &self.last_layout
    }
}
