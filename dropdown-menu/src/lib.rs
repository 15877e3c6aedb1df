//! `<dropdown-menu>`: a disclosure menu custom element for [`tuidom`] pages.
//!
//! The element renders a toggle button and a panel. Light DOM children of the
//! element are shown inside the panel while it is open. Activating the button
//! opens and closes the panel; Escape inside the element and clicks anywhere
//! outside it close the panel.
//!
//! ```ignore
//! let mut page = Page::new();
//! dropdown_menu::define(&mut page)?;
//!
//! let menu = page.instantiate(
//!     &Element::custom(dropdown_menu::TAG_NAME)
//!         .attr("button-text", "File")
//!         .child(Element::button("Open"))
//!         .child(Element::button("Save")),
//!     page.body(),
//! )?;
//!
//! page.with_element::<DropdownMenu, _>(menu, |m, doc| m.set_disabled(doc, true))??;
//! ```

pub mod attributes;
mod menu;
pub mod state;
pub mod subscription;
pub mod template;

pub use menu::DropdownMenu;
pub use state::{Disclosure, OpenListeners};
pub use subscription::Subscription;
pub use template::{Parts, TemplateError};

use thiserror::Error;
use tuidom::{CustomElement, Document, DomError, Element, NodeId, Page};

use attributes::OBSERVED_ATTRIBUTES;

/// Tag name the element is registered under.
pub const TAG_NAME: &str = "dropdown-menu";

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Register `<dropdown-menu>` on `page` with the default template.
pub fn define(page: &mut Page) -> Result<(), Error> {
    define_with_template(page, template::template())
}

/// Register `<dropdown-menu>` with custom markup. The template must contain
/// exactly one `#button` and one `#menu` element.
pub fn define_with_template(page: &mut Page, template: Element) -> Result<(), Error> {
    template::validate(&template)?;
    page.define(
        TAG_NAME,
        &OBSERVED_ATTRIBUTES,
        Box::new(move |doc: &mut Document, host: NodeId| {
            let menu = DropdownMenu::construct(doc, host, &template)?;
            Ok(Box::new(menu) as Box<dyn CustomElement>)
        }),
    )?;
    Ok(())
}
