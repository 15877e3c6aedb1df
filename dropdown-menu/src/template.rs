//! Shadow tree markup for the widget.

use thiserror::Error;
use tuidom::element::count_elements;
use tuidom::{Document, DomError, Element, NodeId, Rgb, Style};

use crate::TAG_NAME;
use crate::attributes::{ARIA_PRESSED, DEFAULT_BUTTON_TEXT};

/// Id of the toggle control inside the template.
pub const BUTTON_ID: &str = "button";
/// Id of the panel inside the template.
pub const MENU_ID: &str = "menu";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template has no #{0} element")]
    MissingPart(&'static str),
    #[error("template has more than one #{0} element")]
    DuplicatePart(&'static str),
}

/// Default markup: a toggle button above a hidden, indented panel that
/// projects the host's children.
pub fn template() -> Element {
    Element::col()
        .child(
            Element::button(DEFAULT_BUTTON_TEXT)
                .id(BUTTON_ID)
                .attr(ARIA_PRESSED, "false"),
        )
        .child(
            Element::col()
                .id(MENU_ID)
                .hidden(true)
                .indent(2)
                .style(Style::new().foreground(Rgb::new(200, 200, 220)))
                .child(Element::slot()),
        )
}

/// Check that a template has exactly one toggle control and one panel.
pub fn validate(template: &Element) -> Result<(), TemplateError> {
    for part in [BUTTON_ID, MENU_ID] {
        match count_elements(template, part) {
            0 => return Err(TemplateError::MissingPart(part)),
            1 => {}
            _ => return Err(TemplateError::DuplicatePart(part)),
        }
    }
    Ok(())
}

/// Nodes the widget keeps for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parts {
    pub button: NodeId,
    pub menu: NodeId,
}

/// Attach a shadow root to `host`, clone `template` into it and locate the
/// parts. The template is validated first so a bad one leaves `host`
/// untouched.
pub fn stamp(doc: &mut Document, host: NodeId, template: &Element) -> Result<Parts, DomError> {
    validate(template).map_err(construction_error)?;

    let shadow = doc.attach_shadow(host)?;
    doc.instantiate(template, shadow)?;

    let find = |part: &'static str| {
        doc.get_element_by_id(shadow, part)
            .ok_or_else(|| construction_error(TemplateError::MissingPart(part)))
    };
    Ok(Parts {
        button: find(BUTTON_ID)?,
        menu: find(MENU_ID)?,
    })
}

fn construction_error(err: TemplateError) -> DomError {
    DomError::Construction {
        tag: TAG_NAME.to_string(),
        source: Box::new(err),
    }
}
