//! Behavioural contract of the popup: lifecycle, keyboard, focus, dismissal.

use std::cell::Cell;
use std::rc::Rc;

use popup_core::event::{KeyCode, KeyEvent, Modifiers};
use popup_runtime::{Element, Host, NodeId};
use popup_widgets::popup::class;
use popup_widgets::{Popup, PopupProps};

fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move || c.set(c.get() + 1))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

fn shift_tab() -> KeyEvent {
    KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT)
}

fn find_by_class(host: &Host, name: &str) -> Option<NodeId> {
    let doc = host.document();
    doc.descendants(doc.root())
        .into_iter()
        .find(|&n| doc.has_class(n, name))
}

#[test]
fn closed_popup_leaves_no_trace() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let mut popup = Popup::new(PopupProps::new(on_close).title("Hidden"));
    popup.set_open(&host, false);

    assert!(!popup.is_open());
    assert_eq!(popup.nodes(), None);
    assert_eq!(host.document().node_count(), 1);
    assert_eq!(host.keyboard().listener_count(), 0);
    assert_eq!(find_by_class(&host, class::OVERLAY), None);

    host.dispatch_key(key(KeyCode::Escape));
    assert_eq!(closes.get(), 0);
}

#[test]
fn opening_moves_focus_into_panel() {
    let host = Host::new();
    let outside = host
        .document()
        .append(host.document().root(), &Element::button("open"))
        .unwrap();
    host.document().focus(outside);

    let mut popup = Popup::new(PopupProps::new(|| {}));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let active = host.document().active_element().unwrap();
    assert!(host.document().is_inclusive_ancestor(nodes.panel, active));
    assert_eq!(active, nodes.panel);
}

#[test]
fn every_close_path_releases_the_listener_once() {
    let host = Host::new();
    let mut popup = Popup::new(PopupProps::new(|| {}));
    for _ in 0..5 {
        popup.set_open(&host, true);
        popup.set_open(&host, true);
        assert_eq!(host.keyboard().listener_count(), 1);
        popup.set_open(&host, false);
        popup.set_open(&host, false);
        assert_eq!(host.keyboard().listener_count(), 0);
    }
    assert_eq!(host.document().node_count(), 1);

    popup.set_open(&host, true);
    popup.unmount();
    assert_eq!(host.keyboard().listener_count(), 0);
    assert_eq!(host.document().node_count(), 1);
}

#[test]
fn escape_closes_and_stops_propagation() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let mut popup = Popup::new(PopupProps::new(on_close));
    popup.set_open(&host, true);

    let outcome = host.dispatch_key(key(KeyCode::Escape));
    assert_eq!(closes.get(), 1);
    assert!(outcome.propagation_stopped);
    assert!(!outcome.propagates());
}

#[test]
fn escape_is_ignored_when_disabled() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let mut popup = Popup::new(PopupProps::new(on_close).close_on_escape(false));
    popup.set_open(&host, true);

    let outcome = host.dispatch_key(key(KeyCode::Escape));
    assert_eq!(closes.get(), 0);
    assert!(outcome.propagates());
}

#[test]
fn escape_does_not_move_focus() {
    let host = Host::new();
    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![Element::button("a")]));
    popup.set_open(&host, true);
    let a = host.document().children(popup.nodes().unwrap().body)[0];
    host.document().focus(a);
    host.dispatch_key(key(KeyCode::Escape));
    assert_eq!(host.document().active_element(), Some(a));
}

#[test]
fn only_clicks_on_the_overlay_itself_close() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let mut popup = Popup::new(
        PopupProps::new(on_close).content(vec![Element::paragraph("text"), Element::button("inner")]),
    );
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let body_children = host.document().children(nodes.body);

    host.click(nodes.panel);
    host.click(nodes.body);
    host.click(body_children[0]);
    host.click(body_children[1]);
    assert_eq!(closes.get(), 0);

    host.click(nodes.overlay);
    assert_eq!(closes.get(), 1);
}

#[test]
fn overlay_click_ignored_when_disabled() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let mut popup = Popup::new(PopupProps::new(on_close).close_on_overlay_click(false));
    popup.set_open(&host, true);
    host.click(popup.nodes().unwrap().overlay);
    assert_eq!(closes.get(), 0);
}

#[test]
fn tab_wraps_only_at_the_ring_edges() {
    let host = Host::new();
    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![
        Element::button("A"),
        Element::button("B"),
        Element::button("C"),
    ]));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let doc = host.document();
    let body = doc.children(nodes.body);
    let (a, b, c) = (body[0], body[1], body[2]);
    // Ring: close control, A, B, C, cancel.
    assert_eq!(doc.tabbable_within(nodes.panel), [nodes.close, a, b, c, nodes.cancel]);

    doc.focus(nodes.cancel);
    let outcome = host.dispatch_key(key(KeyCode::Tab));
    assert!(outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(nodes.close));

    let outcome = host.dispatch_key(shift_tab());
    assert!(outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(nodes.cancel));

    doc.focus(a);
    let outcome = host.dispatch_key(key(KeyCode::Tab));
    assert!(!outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(b));

    let outcome = host.dispatch_key(key(KeyCode::Tab));
    assert!(!outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(c));

    let outcome = host.dispatch_key(key(KeyCode::BackTab));
    assert!(!outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(b));
}

#[test]
fn tab_ring_follows_content_edits() {
    let host = Host::new();
    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![Element::button("A")]));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let doc = host.document();

    let late = doc.append(nodes.footer, &Element::button("late")).unwrap();
    doc.focus(late);
    host.dispatch_key(key(KeyCode::Tab));
    assert_eq!(doc.active_element(), Some(nodes.close));

    doc.remove(late).unwrap();
    doc.focus(nodes.cancel);
    host.dispatch_key(key(KeyCode::Tab));
    assert_eq!(doc.active_element(), Some(nodes.close));
}

#[test]
fn first_shift_tab_after_opening_stays_inside() {
    let host = Host::new();
    let before = host
        .document()
        .append(host.document().root(), &Element::button("page"))
        .unwrap();
    host.document().focus(before);
    let mut popup = Popup::new(PopupProps::new(|| {}).on_confirm(|| {}));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();

    host.dispatch_key(shift_tab());
    assert_eq!(host.document().active_element(), nodes.confirm);

    host.document().focus(nodes.panel);
    host.dispatch_key(key(KeyCode::Tab));
    assert_eq!(host.document().active_element(), Some(nodes.close));
}

#[test]
fn focus_returns_to_the_opener() {
    let host = Host::new();
    let doc = host.document();
    let opener = doc.append(doc.root(), &Element::button("open")).unwrap();
    doc.focus(opener);

    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![Element::input("name")]));
    popup.set_open(&host, true);
    let input = doc.children(popup.nodes().unwrap().body)[0];
    doc.focus(input);
    popup.set_open(&host, false);
    assert_eq!(doc.active_element(), Some(opener));

    // A fresh cycle captures afresh.
    let other = doc.append(doc.root(), &Element::button("other")).unwrap();
    doc.focus(other);
    popup.set_open(&host, true);
    popup.set_open(&host, false);
    assert_eq!(doc.active_element(), Some(other));
}

#[test]
fn removed_opener_is_not_restored() {
    let host = Host::new();
    let doc = host.document();
    let opener = doc.append(doc.root(), &Element::button("open")).unwrap();
    doc.focus(opener);

    let mut popup = Popup::new(PopupProps::new(|| {}));
    popup.set_open(&host, true);
    doc.remove(opener).unwrap();
    popup.set_open(&host, false);
    assert_eq!(doc.active_element(), None);
}

#[test]
fn disabled_opener_is_not_restored() {
    let host = Host::new();
    let doc = host.document();
    let opener = doc.append(doc.root(), &Element::button("open")).unwrap();
    doc.focus(opener);

    let mut popup = Popup::new(PopupProps::new(|| {}));
    popup.set_open(&host, true);
    doc.set_disabled(opener, true).unwrap();
    popup.set_open(&host, false);
    assert_eq!(doc.active_element(), None);
}

#[test]
fn optional_nodes_exist_only_when_configured() {
    let host = Host::new();
    let mut bare = Popup::new(PopupProps::new(|| {}));
    bare.set_open(&host, true);
    let nodes = bare.nodes().unwrap();
    assert_eq!(nodes.title, None);
    assert_eq!(nodes.confirm, None);
    assert_eq!(find_by_class(&host, class::TITLE), None);
    assert_eq!(find_by_class(&host, class::CONFIRM), None);
    assert_eq!(host.document().children(nodes.header), [nodes.close]);
    assert_eq!(host.document().children(nodes.footer), [nodes.cancel]);
    bare.set_open(&host, false);

    let mut full = Popup::new(PopupProps::new(|| {}).title("Title").on_confirm(|| {}));
    full.set_open(&host, true);
    let nodes = full.nodes().unwrap();
    let title = nodes.title.unwrap();
    let confirm = nodes.confirm.unwrap();
    assert_eq!(host.document().text(title).as_deref(), Some("Title"));
    assert_eq!(host.document().text(confirm).as_deref(), Some("Confirmer"));
    assert_eq!(host.document().text(nodes.cancel).as_deref(), Some("Annuler"));
}

#[test]
fn buttons_route_to_callbacks() {
    let host = Host::new();
    let (closes, on_close) = counter();
    let (confirms, on_confirm) = counter();
    let mut popup = Popup::new(
        PopupProps::new(on_close)
            .on_confirm(on_confirm)
            .confirm_text("Yes")
            .cancel_text("No"),
    );
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    assert_eq!(host.document().text(nodes.cancel).as_deref(), Some("No"));

    host.click(nodes.close);
    host.click(nodes.cancel);
    assert_eq!(closes.get(), 2);
    assert_eq!(confirms.get(), 0);

    let confirm = nodes.confirm.unwrap();
    host.document().focus(confirm);
    host.dispatch_key(key(KeyCode::Enter));
    host.dispatch_key(key(KeyCode::Char(' ')));
    assert_eq!(confirms.get(), 2);
    assert_eq!(closes.get(), 2);
}

#[test]
fn close_callback_may_close_the_popup_synchronously() {
    let host = Host::new();
    let popup: Rc<std::cell::RefCell<Option<Popup>>> = Rc::new(std::cell::RefCell::new(None));
    let slot = Rc::clone(&popup);
    let host2 = host.clone();
    let props = PopupProps::new(move || {
        if let Some(p) = slot.borrow_mut().as_mut() {
            p.set_open(&host2, false);
        }
    });
    *popup.borrow_mut() = Some(Popup::new(props));
    popup.borrow_mut().as_mut().unwrap().set_open(&host, true);

    host.dispatch_key(key(KeyCode::Escape));
    assert!(!popup.borrow().as_ref().unwrap().is_open());
    assert_eq!(host.keyboard().listener_count(), 0);
    assert_eq!(host.document().node_count(), 1);
}

#[test]
fn caller_content_is_mounted_in_the_body() {
    let host = Host::new();
    let (clicks, on_click) = counter();
    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![
        Element::paragraph("Are you sure?"),
        Element::div().child(Element::button("nested").on_click(move |_| on_click())),
    ]));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let doc = host.document();
    let body = doc.children(nodes.body);
    assert_eq!(body.len(), 2);
    assert_eq!(doc.text(body[0]).as_deref(), Some("Are you sure?"));
    let nested = doc.children(body[1])[0];
    host.click(nested);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn positive_tab_index_inside_does_not_escape() {
    let host = Host::new();
    let doc = host.document();
    let background = doc.append(doc.root(), &Element::button("background")).unwrap();
    let mut popup = Popup::new(PopupProps::new(|| {}).content(vec![
        Element::button("A"),
        Element::button("P").tab_index(1),
        Element::button("C"),
    ]));
    popup.set_open(&host, true);
    let nodes = popup.nodes().unwrap();
    let body = doc.children(nodes.body);
    let (p, c) = (body[1], body[2]);

    doc.focus(p);
    let outcome = host.dispatch_key(key(KeyCode::Tab));
    assert!(outcome.default_prevented);
    assert_eq!(doc.active_element(), Some(c));

    for press in [key(KeyCode::Tab), shift_tab()] {
        doc.focus(p);
        for _ in 0..8 {
            host.dispatch_key(press);
            let active = doc.active_element().unwrap();
            assert_ne!(active, background);
            assert!(doc.is_inclusive_ancestor(nodes.panel, active));
        }
    }
}
