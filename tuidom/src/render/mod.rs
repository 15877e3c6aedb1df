use crate::buffer::{Buffer, Cell};
use crate::document::{Document, NodeId};
use crate::element::BUTTON_TAG;
use crate::layout::{LayoutResult, Rect};
use crate::text::{char_width, truncate_to_width};
use crate::types::{Rgb, TextStyle};

/// Paint the flat tree under `root` into `buf`. `focused` is drawn reversed.
pub fn render_to_buffer(
    doc: &Document,
    root: NodeId,
    layout: &LayoutResult,
    focused: Option<NodeId>,
    buf: &mut Buffer,
) {
    render_node(doc, root, layout, focused, buf);
}

fn render_node(
    doc: &Document,
    id: NodeId,
    layout: &LayoutResult,
    focused: Option<NodeId>,
    buf: &mut Buffer,
) {
    let Some(node) = doc.node(id) else { return };
    if node.hidden {
        return;
    }
    let Some(rect) = layout.get(id) else { return };

    if node.tag == BUTTON_TAG || !node.text.is_empty() {
        let label = if node.tag == BUTTON_TAG {
            format!("[ {} ]", node.text)
        } else {
            node.text.clone()
        };

        let mut style = node.style.text_style;
        if node.disabled {
            style = style.dim();
        }
        if focused == Some(id) {
            style = style.reverse();
        }

        let fg = node.style.foreground.unwrap_or(Rgb::WHITE);
        let bg = node.style.background.unwrap_or(Rgb::BLACK);
        render_text(&label, *rect, fg, bg, style, buf);
    }

    for child in doc.flat_children(id) {
        render_node(doc, child, layout, focused, buf);
    }
}

fn render_text(text: &str, rect: Rect, fg: Rgb, bg: Rgb, style: TextStyle, buf: &mut Buffer) {
    let text = truncate_to_width(text, rect.width as usize);
    let mut x = rect.x;
    let y = rect.y;

    for ch in text.chars() {
        let width = char_width(ch) as u16;
        if x.saturating_add(width) > rect.right() {
            break;
        }
        buf.set(x, y, Cell::new(ch).with_fg(fg).with_bg(bg).with_style(style));
        for offset in 1..width {
            let mut continuation = Cell::new(' ').with_fg(fg).with_bg(bg).with_style(style);
            continuation.wide_continuation = true;
            buf.set(x + offset, y, continuation);
        }
        x += width.max(1);
    }
}
