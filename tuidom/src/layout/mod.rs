//! Block layout over the flat tree.
//!
//! Every rendered node that carries text (or is a button) takes one row.
//! Children stack below their parent, shifted right by the parent's indent.
//! Hidden subtrees take no space.

mod rect;

pub use rect::Rect;

use std::collections::HashMap;

use crate::document::{Document, NodeId};
use crate::element::BUTTON_TAG;
use crate::text::display_width;

/// Width of the `[ ` and ` ]` decoration around button labels.
pub const BUTTON_DECORATION: u16 = 4;

#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    rects: HashMap<NodeId, Rect>,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Rect> {
        self.rects.get(&id)
    }

    pub fn insert(&mut self, id: NodeId, rect: Rect) {
        self.rects.insert(id, rect);
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Lay out the flat tree under `root` inside `area`.
pub fn layout(doc: &Document, root: NodeId, area: Rect) -> LayoutResult {
    let mut result = LayoutResult::new();
    let mut cursor_y = area.y;
    layout_node(doc, root, area.x, &mut cursor_y, area, &mut result);
    result
}

/// Width of a node's own row, before clipping.
pub fn row_width(doc: &Document, id: NodeId) -> u16 {
    let Some(node) = doc.node(id) else { return 0 };
    let text_width = display_width(&node.text).min(u16::MAX as usize) as u16;
    if node.tag == BUTTON_TAG {
        text_width.saturating_add(BUTTON_DECORATION)
    } else {
        text_width
    }
}

fn has_row(doc: &Document, id: NodeId) -> bool {
    doc.node(id)
        .map(|n| n.tag == BUTTON_TAG || !n.text.is_empty())
        .unwrap_or(false)
}

/// Returns the right edge used by this node's subtree.
fn layout_node(
    doc: &Document,
    id: NodeId,
    x: u16,
    cursor_y: &mut u16,
    area: Rect,
    result: &mut LayoutResult,
) -> u16 {
    let Some(node) = doc.node(id) else { return x };
    if node.hidden {
        return x;
    }

    let start_y = *cursor_y;
    let mut right = x;

    if has_row(doc, id) {
        right = right.max(x.saturating_add(row_width(doc, id)));
        *cursor_y = cursor_y.saturating_add(1);
    }

    let child_x = x.saturating_add(node.indent);
    for child in doc.flat_children(id) {
        right = right.max(layout_node(doc, child, child_x, cursor_y, area, result));
    }

    let right = right.min(area.right());
    let rect = Rect::new(
        x,
        start_y,
        right.saturating_sub(x),
        cursor_y.saturating_sub(start_y),
    );
    log::trace!("[layout] {} -> {:?}", id, rect);
    result.insert(id, rect);
    right
}
