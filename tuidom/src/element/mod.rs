mod content;
mod node;

pub use content::Content;
pub use node::{Element, BUTTON_TAG, SLOT_TAG};

/// Find an element by ID in a builder tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id.as_deref() == Some(id) {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Count elements with the given ID in a builder tree.
pub fn count_elements(root: &Element, id: &str) -> usize {
    let own = usize::from(root.id.as_deref() == Some(id));
    match &root.content {
        Content::Children(children) => {
            own + children.iter().map(|c| count_elements(c, id)).sum::<usize>()
        }
        _ => own,
    }
}
