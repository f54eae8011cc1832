#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use popup_core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use popup_render::frame::Frame;
use popup_runtime::{Element, Host};
use popup_widgets::{Popup, PopupProps, Widget};

#[derive(Debug, Arbitrary)]
enum Op {
    SetOpen(bool),
    Key { code: u8, shift: bool },
    Click { x: u8, y: u8 },
    FocusNth(u8),
    RemoveNth(u8),
    Render { width: u8, height: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    title: bool,
    confirm: bool,
    buttons: u8,
    ops: Vec<Op>,
}

fn key_code(code: u8) -> KeyCode {
    match code % 6 {
        0 => KeyCode::Escape,
        1 => KeyCode::Tab,
        2 => KeyCode::BackTab,
        3 => KeyCode::Enter,
        4 => KeyCode::Char(' '),
        _ => KeyCode::Char('x'),
    }
}

fuzz_target!(|input: Input| {
    let host = Host::new();
    let doc = host.document().clone();
    let _ = doc.append(doc.root(), &Element::button("open"));

    let content = (0..input.buttons % 6)
        .map(|i| Element::button(format!("b{i}")))
        .collect();
    let mut props = PopupProps::new(|| {}).content(content);
    if input.title {
        props = props.title("fuzz");
    }
    if input.confirm {
        props = props.on_confirm(|| {});
    }
    let mut popup = Popup::new(props);
    let mut frame = Frame::with_hit_grid(40, 12);

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::SetOpen(open) => popup.set_open(&host, open),
            Op::Key { code, shift } => {
                let mut key = KeyEvent::new(key_code(code));
                if shift {
                    key = key.with_modifiers(Modifiers::SHIFT);
                }
                host.handle_event(&Event::Key(key), &frame);
            }
            Op::Click { x, y } => {
                let event = MouseEvent::new(
                    MouseEventKind::Down(MouseButton::Left),
                    u16::from(x),
                    u16::from(y),
                );
                host.handle_event(&Event::Mouse(event), &frame);
            }
            Op::FocusNth(n) => {
                let nodes = doc.descendants(doc.root());
                if !nodes.is_empty() {
                    doc.focus(nodes[n as usize % nodes.len()]);
                }
            }
            Op::RemoveNth(n) => {
                let nodes = doc.descendants(doc.root());
                if !nodes.is_empty() {
                    let _ = doc.remove(nodes[n as usize % nodes.len()]);
                }
            }
            Op::Render { width, height } => {
                frame = Frame::with_hit_grid(u16::from(width % 100), u16::from(height % 40));
                popup.view().render(frame.bounds(), &mut frame);
            }
        }

        let listeners = host.keyboard().listener_count();
        if popup.is_open() {
            assert_eq!(listeners, 1);
        } else {
            assert_eq!(listeners, 0);
        }
        if let Some(active) = doc.active_element() {
            assert!(doc.is_focusable(active));
        }
    }

    popup.unmount();
    assert_eq!(host.keyboard().listener_count(), 0);
});
