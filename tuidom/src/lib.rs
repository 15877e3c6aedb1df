//! A small DOM for terminal user interfaces.
//!
//! Elements live in a [`Document`], custom elements attach behavior to tags
//! through [`CustomElement`], and a [`Page`] ties the tree, event dispatch,
//! focus and rendering together. [`Terminal`] paints a page with crossterm.

pub mod buffer;
pub mod custom;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub mod hit;
pub mod layout;
pub mod listener;
pub mod page;
pub mod render;
pub mod terminal;
pub mod text;
pub mod types;

pub use buffer::{Buffer, Cell};
pub use custom::{Constructor, CustomElement, CustomElementRegistry};
pub use document::{Document, Node, NodeId, Reaction};
pub use element::{find_element, Content, Element};
pub use error::DomError;
pub use event::{DomEvent, Event, EventKind, Key, Modifiers, MouseButton};
pub use focus::{collect_focusable, FocusState};
pub use hit::{hit_test, hit_test_any};
pub use layout::{LayoutResult, Rect};
pub use listener::{Listener, ListenerId, ListenerRegistry, ListenerTarget};
pub use page::Page;
pub use terminal::Terminal;
pub use types::*;
