use dropdown_menu::attributes::{ARIA_EXPANDED, ARIA_PRESSED, BUTTON_TEXT, DISABLED};
use dropdown_menu::{Disclosure, DropdownMenu, TAG_NAME};
use tuidom::{
    DomError, Element, Event, EventKind, Key, ListenerTarget, Modifiers, MouseButton, NodeId,
    Page,
};

struct Fixture {
    page: Page,
    host: NodeId,
    /// Light DOM item shown inside the panel.
    item: NodeId,
    /// Button outside the widget.
    elsewhere: NodeId,
}

fn fixture_with(menu: Element) -> Fixture {
    let mut page = Page::new();
    dropdown_menu::define(&mut page).unwrap();
    let body = page.body();

    let host = page
        .instantiate(
            &menu
                .child(Element::button("Open").id("open"))
                .child(Element::button("Save").id("save")),
            body,
        )
        .unwrap();
    let elsewhere = page
        .instantiate(&Element::button("Elsewhere").id("elsewhere"), body)
        .unwrap();
    let item = page.document().get_element_by_id(host, "open").unwrap();

    Fixture {
        page,
        host,
        item,
        elsewhere,
    }
}

fn fixture() -> Fixture {
    fixture_with(Element::custom(TAG_NAME))
}

impl Fixture {
    fn menu(&self) -> &DropdownMenu {
        self.page.element::<DropdownMenu>(self.host).unwrap()
    }

    fn toggle_control(&self) -> NodeId {
        self.menu().toggle_control()
    }

    fn panel_hidden(&self) -> bool {
        let panel = self.menu().panel();
        self.page.document().node(panel).unwrap().hidden
    }

    fn button_disabled(&self) -> bool {
        let button = self.toggle_control();
        self.page.document().node(button).unwrap().disabled
    }

    fn button_label(&self) -> String {
        let button = self.toggle_control();
        self.page.document().node(button).unwrap().text.clone()
    }

    fn host_attr(&self, name: &str) -> Option<&str> {
        self.page.document().get_attribute(self.host, name)
    }

    fn button_attr(&self, name: &str) -> Option<&str> {
        self.page
            .document()
            .get_attribute(self.toggle_control(), name)
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.page
            .with_element::<DropdownMenu, _>(self.host, |m, doc| m.set_disabled(doc, disabled))
            .unwrap()
            .unwrap();
    }

    fn set_button_text(&mut self, text: &str) {
        self.page
            .with_element::<DropdownMenu, _>(self.host, |m, doc| m.set_button_text(doc, text))
            .unwrap()
            .unwrap();
    }

    fn click_toggle(&mut self) {
        let button = self.toggle_control();
        self.page.click(button).unwrap();
    }

    fn escape(&mut self) {
        self.page.key(Key::Escape, Modifiers::new()).unwrap();
    }

    fn outside_click_listeners(&self) -> usize {
        self.page
            .document()
            .listeners()
            .count(ListenerTarget::Document, EventKind::Click)
    }

    fn keyboard_listeners(&self) -> usize {
        self.page
            .document()
            .listeners()
            .count(ListenerTarget::Node(self.host), EventKind::KeyDown)
    }

    fn assert_open(&self) {
        assert!(self.menu().is_open());
        assert!(!self.panel_hidden());
        assert_eq!(self.host_attr(ARIA_EXPANDED), Some("true"));
        assert_eq!(self.button_attr(ARIA_PRESSED), Some("true"));
    }

    fn assert_closed(&self) {
        assert!(!self.menu().is_open());
        assert!(self.panel_hidden());
        assert_eq!(self.host_attr(ARIA_EXPANDED), Some("false"));
        assert_eq!(self.outside_click_listeners(), 0);
        assert_eq!(self.keyboard_listeners(), 0);
    }
}

// ============================================================================
// Attribute / Property Surface
// ============================================================================

#[test]
fn test_button_text_defaults_to_menu() {
    let f = fixture();

    assert_eq!(f.menu().button_text(f.page.document()), "Menu");
    assert_eq!(f.host_attr(BUTTON_TEXT), None);
}

#[test]
fn test_button_text_round_trips() {
    let mut f = fixture();

    for text in ["File", "Edit menu", "  padded  ", "日本語", "Menu", "x"] {
        f.set_button_text(text);
        assert_eq!(f.menu().button_text(f.page.document()), text);
        assert_eq!(f.host_attr(BUTTON_TEXT), Some(text));
        assert_eq!(f.button_label(), text);
    }
}

#[test]
fn test_empty_button_text_falls_back_to_default() {
    let mut f = fixture();

    f.set_button_text("");

    assert_eq!(f.host_attr(BUTTON_TEXT), Some(""));
    assert_eq!(f.menu().button_text(f.page.document()), "Menu");
    assert_eq!(f.button_label(), "Menu");
}

#[test]
fn test_disabled_is_a_presence_attribute() {
    let mut f = fixture();

    f.set_disabled(true);
    assert_eq!(f.host_attr(DISABLED), Some(""));
    assert!(f.menu().disabled(f.page.document()));

    f.set_disabled(false);
    assert_eq!(f.host_attr(DISABLED), None);
    assert!(!f.menu().disabled(f.page.document()));

    // Value content is irrelevant
    let host = f.host;
    f.page.set_attribute(host, DISABLED, "false").unwrap();
    assert!(f.menu().disabled(f.page.document()));
    assert!(f.button_disabled());
}

#[test]
fn test_external_attribute_writes_are_observed() {
    let mut f = fixture();
    let host = f.host;

    f.page.set_attribute(host, BUTTON_TEXT, "Tools").unwrap();
    assert_eq!(f.button_label(), "Tools");

    f.page.remove_attribute(host, BUTTON_TEXT).unwrap();
    assert_eq!(f.button_label(), "Menu");
}

#[test]
fn test_initial_attributes_apply_on_upgrade() {
    let f = fixture_with(
        Element::custom(TAG_NAME)
            .attr(BUTTON_TEXT, "Help")
            .attr(DISABLED, ""),
    );

    assert_eq!(f.button_label(), "Help");
    assert!(f.button_disabled());
}

// ============================================================================
// Render Step
// ============================================================================

#[test]
fn test_enabled_state_tracks_disabled_sequence() {
    let mut f = fixture();

    for disabled in [true, false, false, true, true, false, true] {
        f.set_disabled(disabled);
        assert_eq!(f.button_disabled(), disabled);
    }
}

#[test]
fn test_render_is_idempotent() {
    let mut f = fixture();
    f.set_button_text("Edit");
    let host = f.host;

    let before = f.page.render(30, 6);
    f.page
        .with_element::<DropdownMenu, _>(host, |m, doc| {
            m.render(doc)?;
            m.render(doc)
        })
        .unwrap()
        .unwrap();
    let after = f.page.render(30, 6);

    assert_eq!(f.button_label(), "Edit");
    assert_eq!(after.diff(&before).count(), 0);
}

#[test]
fn test_aria_expanded_initialised_on_construction() {
    let f = fixture();

    assert_eq!(f.host_attr(ARIA_EXPANDED), Some("false"));
    assert_eq!(f.button_attr(ARIA_PRESSED), Some("false"));
}

// ============================================================================
// Interaction State Machine
// ============================================================================

#[test]
fn test_toggle_opens_and_closes() {
    let mut f = fixture();
    f.assert_closed();

    f.click_toggle();
    f.assert_open();

    f.click_toggle();
    f.assert_closed();
    assert_eq!(f.button_attr(ARIA_PRESSED), Some("false"));
}

#[test]
fn test_disabled_toggle_does_not_open() {
    let mut f = fixture();
    f.set_disabled(true);

    f.click_toggle();
    f.assert_closed();

    // Going around the platform's disabled check hits the guard too
    let host = f.host;
    f.page
        .with_element::<DropdownMenu, _>(host, |m, doc| m.toggle(doc))
        .unwrap()
        .unwrap();
    f.assert_closed();
}

#[test]
fn test_disabling_while_open_forces_close() {
    let mut f = fixture();
    f.click_toggle();
    f.assert_open();

    f.set_disabled(true);

    f.assert_closed();
    assert!(f.button_disabled());
}

#[test]
fn test_setters_apply_before_returning() {
    let mut f = fixture();
    f.click_toggle();
    let host = f.host;

    let (open, expanded, disabled, label) = f
        .page
        .with_element::<DropdownMenu, _>(host, |m, doc| {
            m.set_disabled(doc, true).unwrap();
            m.set_button_text(doc, "File").unwrap();
            let button = doc.node(m.toggle_control()).unwrap();
            (
                m.is_open(),
                doc.get_attribute(host, ARIA_EXPANDED).map(String::from),
                button.disabled,
                button.text.clone(),
            )
        })
        .unwrap();

    assert!(!open);
    assert_eq!(expanded.as_deref(), Some("false"));
    assert!(disabled);
    assert_eq!(label, "File");

    // The queued reactions that follow leave the same state
    f.assert_closed();
    assert!(f.button_disabled());
    assert_eq!(f.button_label(), "File");
}

#[test]
fn test_enabling_setter_updates_button_immediately() {
    let mut f = fixture();
    f.set_disabled(true);
    let host = f.host;

    let disabled = f
        .page
        .with_element::<DropdownMenu, _>(host, |m, doc| {
            m.set_disabled(doc, false).unwrap();
            doc.node(m.toggle_control()).unwrap().disabled
        })
        .unwrap();

    assert!(!disabled);
    f.assert_closed();
}

#[test]
fn test_reenabling_does_not_reopen() {
    let mut f = fixture();
    f.click_toggle();
    f.set_disabled(true);
    f.set_disabled(false);

    f.assert_closed();
    assert!(!f.button_disabled());
}

#[test]
fn test_escape_on_toggle_closes() {
    let mut f = fixture();
    f.click_toggle();
    assert_eq!(f.page.focused(), Some(f.toggle_control()));

    f.escape();

    f.assert_closed();
}

#[test]
fn test_escape_on_panel_item_closes() {
    let mut f = fixture();
    f.click_toggle();
    let item = f.item;
    f.page.focus(item);

    f.escape();

    f.assert_closed();
}

#[test]
fn test_escape_outside_widget_is_ignored() {
    let mut f = fixture();
    f.click_toggle();
    let elsewhere = f.elsewhere;
    f.page.focus(elsewhere);

    f.escape();

    f.assert_open();
}

#[test]
fn test_other_keys_do_not_close() {
    let mut f = fixture();
    f.click_toggle();

    for key in [Key::Down, Key::Up, Key::Char('q'), Key::Left] {
        f.page.key(key, Modifiers::new()).unwrap();
        f.assert_open();
    }
}

#[test]
fn test_click_outside_closes() {
    let mut f = fixture();
    f.click_toggle();

    let elsewhere = f.elsewhere;
    f.page.click(elsewhere).unwrap();

    f.assert_closed();
}

#[test]
fn test_click_on_body_closes() {
    let mut f = fixture();
    f.click_toggle();

    let body = f.page.body();
    f.page.click(body).unwrap();

    f.assert_closed();
}

#[test]
fn test_click_inside_does_not_close() {
    let mut f = fixture();
    f.click_toggle();

    let (host, item) = (f.host, f.item);
    f.page.click(item).unwrap();
    f.assert_open();

    f.page.click(host).unwrap();
    f.assert_open();
}

#[test]
fn test_toggle_click_is_not_an_outside_click() {
    let mut f = fixture();

    // Opening via the toggle must not be undone by the outside path
    f.click_toggle();
    f.assert_open();

    // Closing via the toggle happens exactly once
    f.click_toggle();
    f.assert_closed();

    f.click_toggle();
    f.assert_open();
}

// ============================================================================
// Listener Discipline
// ============================================================================

#[test]
fn test_listeners_exist_only_while_open() {
    let mut f = fixture();
    assert_eq!(f.page.document().listeners().count_owned_by(f.host), 1);

    f.click_toggle();
    assert_eq!(f.outside_click_listeners(), 1);
    assert_eq!(f.keyboard_listeners(), 1);
    assert_eq!(f.page.document().listeners().count_owned_by(f.host), 3);

    f.click_toggle();
    assert_eq!(f.page.document().listeners().count_owned_by(f.host), 1);
}

#[test]
fn test_repeated_toggling_leaves_one_subscription_pair() {
    let mut f = fixture();

    for _ in 0..5 {
        f.click_toggle();
        f.click_toggle();
    }
    f.click_toggle();

    assert_eq!(f.outside_click_listeners(), 1);
    assert_eq!(f.keyboard_listeners(), 1);
    assert_eq!(f.page.document().listeners().count_owned_by(f.host), 3);
}

#[test]
fn test_every_close_path_releases_listeners() {
    let mut f = fixture();
    let elsewhere = f.elsewhere;

    f.click_toggle();
    f.escape();
    f.assert_closed();

    f.click_toggle();
    f.page.click(elsewhere).unwrap();
    f.assert_closed();

    f.click_toggle();
    f.set_disabled(true);
    f.assert_closed();
}

#[test]
fn test_close_tolerates_listener_removed_elsewhere() {
    let mut f = fixture();
    f.click_toggle();
    let host = f.host;

    f.page
        .with_element::<DropdownMenu, _>(host, |m, doc| {
            let Disclosure::Open(listeners) = m.state() else {
                panic!("menu should be open");
            };
            let keyboard = listeners.keyboard.id();
            assert!(doc.remove_event_listener(keyboard));
            m.close(doc)
        })
        .unwrap()
        .unwrap();

    f.assert_closed();
    assert_eq!(f.page.document().listeners().count_owned_by(host), 1);
}

#[test]
fn test_toggle_listener_survives_open_close() {
    let mut f = fixture();
    let toggle = f.menu().toggle_listener();

    f.click_toggle();
    f.click_toggle();

    assert!(f.page.document().listeners().is_live(toggle));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_detach_while_open_releases_listeners() {
    let mut f = fixture();
    f.click_toggle();
    let body = f.page.body();
    let host = f.host;

    f.page.remove_child(body, host).unwrap();

    f.assert_closed();
    assert_eq!(f.page.focused(), None);

    // The detached element keeps its instance and toggle listener
    assert!(f.page.element::<DropdownMenu>(host).is_some());
    assert_eq!(f.page.document().listeners().count_owned_by(host), 1);
}

#[test]
fn test_reattach_renders_and_works() {
    let mut f = fixture();
    let body = f.page.body();
    let host = f.host;

    f.page.remove_child(body, host).unwrap();
    f.page.set_attribute(host, BUTTON_TEXT, "Later").unwrap();
    f.page.append_child(body, host).unwrap();

    assert_eq!(f.button_label(), "Later");
    f.click_toggle();
    f.assert_open();
}

#[test]
fn test_create_element_then_append() {
    let mut page = Page::new();
    dropdown_menu::define(&mut page).unwrap();
    let host = page.create_element(TAG_NAME).unwrap();
    page.set_attribute(host, BUTTON_TEXT, "View").unwrap();
    let body = page.body();
    page.append_child(body, host).unwrap();

    let menu = page.element::<DropdownMenu>(host).unwrap();
    let button = menu.toggle_control();
    assert_eq!(page.document().node(button).unwrap().text, "View");
}

// ============================================================================
// Definition and templates
// ============================================================================

#[test]
fn test_define_twice_fails() {
    let mut page = Page::new();
    dropdown_menu::define(&mut page).unwrap();

    let again = dropdown_menu::define(&mut page);
    assert!(matches!(
        again,
        Err(dropdown_menu::Error::Dom(DomError::AlreadyDefined(_)))
    ));
}

#[test]
fn test_define_rejects_incomplete_template() {
    let mut page = Page::new();
    let template = Element::col().child(Element::button("x").id("button"));

    let result = dropdown_menu::define_with_template(&mut page, template);

    assert!(matches!(
        result,
        Err(dropdown_menu::Error::Template(
            dropdown_menu::TemplateError::MissingPart("menu")
        ))
    ));
    assert!(!page.registry().is_defined(TAG_NAME));
}

#[test]
fn test_custom_template() {
    let mut page = Page::new();
    let template = Element::col()
        .child(Element::text("Choose:"))
        .child(Element::button("?").id("button"))
        .child(Element::col().id("menu").hidden(true).child(Element::slot()));
    dropdown_menu::define_with_template(&mut page, template).unwrap();
    let body = page.body();
    let host = page
        .instantiate(&Element::custom(TAG_NAME).child(Element::text("item")), body)
        .unwrap();

    let buf = page.render(20, 4);
    assert_eq!(buf.row_text(0), "Choose:");
    assert_eq!(buf.row_text(1), "[ Menu ]");
    assert_eq!(buf.row_text(2), "");

    let button = page.element::<DropdownMenu>(host).unwrap().toggle_control();
    page.click(button).unwrap();
    let buf = page.render(20, 4);
    assert_eq!(buf.row_text(2), "item");
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_rendered_output_follows_state() {
    let mut f = fixture();

    let buf = f.page.render(30, 6);
    assert_eq!(buf.row_text(0), "[ Menu ]");
    assert_eq!(buf.row_text(1), "[ Elsewhere ]");

    f.click_toggle();
    let buf = f.page.render(30, 6);
    assert_eq!(buf.row_text(0), "[ Menu ]");
    assert_eq!(buf.row_text(1), "  [ Open ]");
    assert_eq!(buf.row_text(2), "  [ Save ]");
    assert_eq!(buf.row_text(3), "[ Elsewhere ]");
}

#[test]
fn test_mouse_input_drives_the_widget() {
    let mut f = fixture();
    f.page.render(30, 6);

    // Click on the toggle label
    f.page
        .handle_input(&Event::Click {
            x: 3,
            y: 0,
            button: MouseButton::Left,
        })
        .unwrap();
    f.assert_open();

    // Click on empty space far right of everything
    f.page.render(30, 6);
    f.page
        .handle_input(&Event::Click {
            x: 25,
            y: 5,
            button: MouseButton::Left,
        })
        .unwrap();
    f.assert_closed();
}

#[test]
fn test_keyboard_only_flow() {
    let mut f = fixture();

    // Tab to the toggle, open with Enter, close with Escape
    f.page.key(Key::Tab, Modifiers::new()).unwrap();
    assert_eq!(f.page.focused(), Some(f.toggle_control()));
    f.page.key(Key::Enter, Modifiers::new()).unwrap();
    f.assert_open();

    // Items are reachable while open
    f.page.key(Key::Tab, Modifiers::new()).unwrap();
    assert_eq!(f.page.focused(), Some(f.item));

    f.escape();
    f.assert_closed();
}
