use crate::document::{Document, NodeId};
use crate::layout::LayoutResult;

/// Find the deepest clickable node at the given coordinates.
/// Returns None if no clickable node contains the point.
pub fn hit_test(layout: &LayoutResult, doc: &Document, root: NodeId, x: u16, y: u16) -> Option<NodeId> {
    hit_test_node(layout, doc, root, x, y, &|doc, id| {
        doc.node(id).map(|n| n.clickable).unwrap_or(false)
    })
}

/// Find the deepest node (clickable or not) at the given coordinates.
pub fn hit_test_any(
    layout: &LayoutResult,
    doc: &Document,
    root: NodeId,
    x: u16,
    y: u16,
) -> Option<NodeId> {
    hit_test_node(layout, doc, root, x, y, &|_, _| true)
}

fn hit_test_node(
    layout: &LayoutResult,
    doc: &Document,
    id: NodeId,
    x: u16,
    y: u16,
    accept: &dyn Fn(&Document, NodeId) -> bool,
) -> Option<NodeId> {
    let rect = layout.get(id)?;

    if !rect.contains(x, y) {
        return None;
    }

    // Later children are painted last, check them first
    for child in doc.flat_children(id).into_iter().rev() {
        if let Some(found) = hit_test_node(layout, doc, child, x, y, accept) {
            return Some(found);
        }
    }

    accept(doc, id).then_some(id)
}
