use crate::document::{Document, NodeId};

/// Tracks which node is currently focused.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<NodeId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Focus a node. Returns true if focus changed.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.focused == Some(id) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Focus the next focusable node (Tab navigation).
    /// Returns the newly focused node if focus changed.
    pub fn focus_next(&mut self, doc: &Document) -> Option<NodeId> {
        let focusable = collect_focusable(doc);
        let first = *focusable.first()?;

        let new_focus = match self.focused {
            None => first,
            Some(current) => match focusable.iter().position(|id| *id == current) {
                Some(i) => focusable[(i + 1) % focusable.len()],
                None => first,
            },
        };

        self.focus(new_focus).then_some(new_focus)
    }

    /// Focus the previous focusable node (Shift+Tab navigation).
    /// Returns the newly focused node if focus changed.
    pub fn focus_prev(&mut self, doc: &Document) -> Option<NodeId> {
        let focusable = collect_focusable(doc);
        let last = *focusable.last()?;

        let new_focus = match self.focused {
            None => last,
            Some(current) => match focusable.iter().position(|id| *id == current) {
                Some(0) | None => last,
                Some(i) => focusable[i - 1],
            },
        };

        self.focus(new_focus).then_some(new_focus)
    }
}

/// Focusable, enabled, rendered nodes in flat tree order.
pub fn collect_focusable(doc: &Document) -> Vec<NodeId> {
    let mut result = Vec::new();
    collect_focusable_recursive(doc, doc.body(), &mut result);
    result
}

fn collect_focusable_recursive(doc: &Document, id: NodeId, result: &mut Vec<NodeId>) {
    let Some(node) = doc.node(id) else { return };
    if node.hidden {
        return;
    }
    if node.focusable && !node.disabled {
        result.push(id);
    }
    for child in doc.flat_children(id) {
        collect_focusable_recursive(doc, child, result);
    }
}
