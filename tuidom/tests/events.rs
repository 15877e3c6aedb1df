use tuidom::{
    collect_focusable, hit_test, hit_test_any, Document, Element, FocusState, LayoutResult,
    NodeId, Rect,
};

fn create_layout(elements: &[(NodeId, Rect)]) -> LayoutResult {
    let mut layout = LayoutResult::new();
    for (id, rect) in elements {
        layout.insert(*id, *rect);
    }
    layout
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(doc.body(), id).unwrap()
}

// ============================================================================
// Hit Testing
// ============================================================================

#[test]
fn test_hit_test_point_inside() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.instantiate(
        &Element::box_()
            .id("root")
            .clickable(true)
            .child(Element::button("Click me").id("btn")),
        body,
    )
    .unwrap();
    let root = by_id(&doc, "root");
    let btn = by_id(&doc, "btn");

    let layout = create_layout(&[
        (body, Rect::new(0, 0, 100, 50)),
        (root, Rect::new(0, 0, 100, 50)),
        (btn, Rect::new(10, 10, 30, 3)),
    ]);

    // Click inside btn
    assert_eq!(hit_test(&layout, &doc, body, 15, 11), Some(btn));

    // Click inside root but outside btn
    assert_eq!(hit_test(&layout, &doc, body, 5, 5), Some(root));

    // Click outside everything
    assert_eq!(hit_test(&layout, &doc, body, 150, 150), None);
}

#[test]
fn test_hit_test_only_clickable() {
    let mut doc = Document::new();
    let body = doc.body();
    let text = doc
        .instantiate(&Element::text("Not clickable").id("text"), body)
        .unwrap();

    let layout = create_layout(&[
        (body, Rect::new(0, 0, 100, 50)),
        (text, Rect::new(10, 10, 30, 1)),
    ]);

    assert_eq!(hit_test(&layout, &doc, body, 15, 10), None);
    assert_eq!(hit_test_any(&layout, &doc, body, 15, 10), Some(text));
}

#[test]
fn test_hit_test_sees_slotted_children() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc.instantiate(&Element::custom("x-host"), body).unwrap();
    let shadow = doc.attach_shadow(host).unwrap();
    let slot = doc.instantiate(&Element::slot(), shadow).unwrap();
    let item = doc
        .instantiate(&Element::button("Item").id("item"), host)
        .unwrap();

    let layout = create_layout(&[
        (body, Rect::new(0, 0, 40, 10)),
        (host, Rect::new(0, 0, 40, 10)),
        (slot, Rect::new(0, 0, 40, 10)),
        (item, Rect::new(0, 2, 8, 1)),
    ]);

    // The slot is not part of the flat tree, the item is reached through the host
    assert_eq!(hit_test(&layout, &doc, body, 3, 2), Some(item));
}

// ============================================================================
// Focus State
// ============================================================================

#[test]
fn test_focus_next_cycles() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.instantiate(
        &Element::col()
            .child(Element::button("A").id("a"))
            .child(Element::button("B").id("b"))
            .child(Element::button("C").id("c")),
        body,
    )
    .unwrap();
    let (a, b, c) = (by_id(&doc, "a"), by_id(&doc, "b"), by_id(&doc, "c"));

    let mut focus = FocusState::new();
    assert_eq!(focus.focus_next(&doc), Some(a));
    assert_eq!(focus.focus_next(&doc), Some(b));
    assert_eq!(focus.focus_next(&doc), Some(c));
    assert_eq!(focus.focus_next(&doc), Some(a));
    assert_eq!(focus.focus_prev(&doc), Some(c));
}

#[test]
fn test_focus_skips_hidden_and_disabled() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.instantiate(
        &Element::col()
            .child(Element::button("A").id("a"))
            .child(Element::button("B").id("b").disabled(true))
            .child(
                Element::box_()
                    .hidden(true)
                    .child(Element::button("C").id("c")),
            )
            .child(Element::button("D").id("d")),
        body,
    )
    .unwrap();

    assert_eq!(
        collect_focusable(&doc),
        vec![by_id(&doc, "a"), by_id(&doc, "d")]
    );
}

#[test]
fn test_focus_same_node_is_no_change() {
    let mut doc = Document::new();
    let body = doc.body();
    let btn = doc.instantiate(&Element::button("A"), body).unwrap();

    let mut focus = FocusState::new();
    assert!(focus.focus(btn));
    assert!(!focus.focus(btn));
    assert!(focus.blur());
    assert!(!focus.blur());
    assert_eq!(focus.focused(), None);
}

#[test]
fn test_focus_empty_document() {
    let doc = Document::new();
    let mut focus = FocusState::new();
    assert_eq!(focus.focus_next(&doc), None);
    assert_eq!(focus.focus_prev(&doc), None);
}
