use std::any::Any;

use tuidom::{
    CustomElement, Document, DomError, DomEvent, Element, EventKind, Key, ListenerId,
    ListenerTarget, NodeId,
};

use crate::attributes::{
    self, ARIA_EXPANDED, ARIA_PRESSED, BUTTON_TEXT, ButtonText, DISABLED, Disabled, aria_bool,
};
use crate::state::{Disclosure, OpenListeners};
use crate::subscription::Subscription;
use crate::template::{self, Parts};

/// Listener handler names.
const ON_TOGGLE: &str = "toggle";
const ON_KEYDOWN: &str = "keydown";
const ON_OUTSIDE_CLICK: &str = "outside-click";

/// The `<dropdown-menu>` element.
///
/// Configuration lives in the host attributes (`button-text`, `disabled`);
/// the accessors below read and write those attributes and never cache them.
/// The open/closed state is [`Disclosure`], which owns the keyboard and
/// outside-click listeners while open.
#[derive(Debug)]
pub struct DropdownMenu {
    host: NodeId,
    parts: Parts,
    /// Activation listener on the toggle control, held for the instance's lifetime.
    toggle: Subscription,
    state: Disclosure,
}

impl DropdownMenu {
    /// Build the shadow tree for `host` from `template` and wire the toggle
    /// control. Fails if the template lacks a `#button` or `#menu` part.
    pub fn construct(
        doc: &mut Document,
        host: NodeId,
        template: &Element,
    ) -> Result<Self, DomError> {
        let parts = template::stamp(doc, host, template)?;

        let toggle = Subscription::acquire(
            doc,
            ListenerTarget::Node(parts.button),
            EventKind::Click,
            host,
            ON_TOGGLE,
        );

        if !doc.has_attribute(host, ARIA_EXPANDED) {
            doc.set_attribute(host, ARIA_EXPANDED, aria_bool(false))?;
        }

        log::debug!(
            "[dropdown-menu] constructed host={} button={} menu={}",
            host,
            parts.button,
            parts.menu
        );

        Ok(Self {
            host,
            parts,
            toggle,
            state: Disclosure::Closed,
        })
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn toggle_control(&self) -> NodeId {
        self.parts.button
    }

    pub fn panel(&self) -> NodeId {
        self.parts.menu
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn state(&self) -> &Disclosure {
        &self.state
    }

    /// Id of the toggle control's activation listener.
    pub fn toggle_listener(&self) -> ListenerId {
        self.toggle.id()
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn button_text(&self, doc: &Document) -> String {
        attributes::read::<ButtonText>(doc, self.host).0
    }

    /// Write `button-text` and re-render before returning.
    pub fn set_button_text(
        &mut self,
        doc: &mut Document,
        text: impl Into<String>,
    ) -> Result<(), DomError> {
        attributes::write(doc, self.host, &ButtonText(text.into()))?;
        self.render(doc)
    }

    pub fn disabled(&self, doc: &Document) -> bool {
        attributes::read::<Disabled>(doc, self.host).0
    }

    /// Write `disabled`, closing the panel first when disabling. The queued
    /// attribute reaction repeats the same work and changes nothing.
    pub fn set_disabled(&mut self, doc: &mut Document, disabled: bool) -> Result<(), DomError> {
        attributes::write(doc, self.host, &Disabled(disabled))?;
        self.apply_disabled(doc)
    }

    fn apply_disabled(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.disabled(doc) {
            self.close(doc)?;
        }
        self.render(doc)
    }

    // ------------------------------------------------------------------
    // Render
    // ------------------------------------------------------------------

    /// Copy the current configuration onto the toggle control.
    pub fn render(&self, doc: &mut Document) -> Result<(), DomError> {
        let text = self.button_text(doc);
        let disabled = self.disabled(doc);
        doc.set_text(self.parts.button, text)?;
        doc.set_disabled(self.parts.button, disabled)
    }

    // ------------------------------------------------------------------
    // Disclosure
    // ------------------------------------------------------------------

    pub fn toggle(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.is_open() {
            self.close(doc)
        } else {
            self.open(doc)
        }
    }

    /// Reveal the panel and start listening for Escape and outside clicks.
    /// Does nothing while disabled or already open.
    pub fn open(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.is_open() {
            return Ok(());
        }
        if self.disabled(doc) {
            log::debug!("[dropdown-menu] {} open refused: disabled", self.host);
            return Ok(());
        }

        doc.set_attribute(self.host, ARIA_EXPANDED, aria_bool(true))?;
        doc.set_attribute(self.parts.button, ARIA_PRESSED, aria_bool(true))?;
        doc.set_hidden(self.parts.menu, false)?;

        let keyboard = Subscription::acquire(
            doc,
            ListenerTarget::Node(self.host),
            EventKind::KeyDown,
            self.host,
            ON_KEYDOWN,
        );
        let outside_click = Subscription::acquire(
            doc,
            ListenerTarget::Document,
            EventKind::Click,
            self.host,
            ON_OUTSIDE_CLICK,
        );
        self.state = Disclosure::Open(OpenListeners {
            keyboard,
            outside_click,
        });

        log::debug!("[dropdown-menu] {} opened", self.host);
        Ok(())
    }

    /// Hide the panel and release the listeners taken by [`open`](Self::open).
    /// Also runs when already closed, so the ARIA state is always written.
    pub fn close(&mut self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_attribute(self.host, ARIA_EXPANDED, aria_bool(false))?;
        doc.set_attribute(self.parts.button, ARIA_PRESSED, aria_bool(false))?;
        doc.set_hidden(self.parts.menu, true)?;

        if let Disclosure::Open(listeners) = std::mem::take(&mut self.state) {
            for (name, subscription) in [
                (ON_KEYDOWN, listeners.keyboard),
                (ON_OUTSIDE_CLICK, listeners.outside_click),
            ] {
                let id = subscription.id();
                if !subscription.release(doc) {
                    log::warn!(
                        "[dropdown-menu] {} {} listener {} was already removed",
                        self.host,
                        name,
                        id
                    );
                }
            }
            log::debug!("[dropdown-menu] {} closed", self.host);
        }
        Ok(())
    }

    fn on_keydown(&mut self, doc: &mut Document, event: &DomEvent) -> Result<(), DomError> {
        match event.key {
            Some(Key::Escape) => self.close(doc),
            _ => Ok(()),
        }
    }

    fn on_outside_click(&mut self, doc: &mut Document, event: &DomEvent) -> Result<(), DomError> {
        if doc.contains(self.host, event.target) {
            return Ok(());
        }
        self.close(doc)
    }
}

impl CustomElement for DropdownMenu {
    fn connected(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.render(doc)
    }

    fn disconnected(&mut self, doc: &mut Document) -> Result<(), DomError> {
        if self.is_open() {
            self.close(doc)?;
        }
        Ok(())
    }

    fn attribute_changed(
        &mut self,
        doc: &mut Document,
        name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) -> Result<(), DomError> {
        match name {
            BUTTON_TEXT => self.render(doc),
            DISABLED => self.apply_disabled(doc),
            _ => Ok(()),
        }
    }

    fn handle_event(
        &mut self,
        doc: &mut Document,
        handler: &str,
        event: &DomEvent,
    ) -> Result<(), DomError> {
        match handler {
            ON_TOGGLE => self.toggle(doc),
            ON_KEYDOWN => self.on_keydown(doc, event),
            ON_OUTSIDE_CLICK => self.on_outside_click(doc, event),
            other => {
                log::warn!("[dropdown-menu] unknown handler {}", other);
                Ok(())
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
