#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! Widgets consume these types rather than backend-specific ones. With the
//! `crossterm` feature, [`Event::from_crossterm`] converts Crossterm events.

use bitflags::bitflags;

/// An input event delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// The terminal gained (`true`) or lost (`false`) focus.
    Focus(bool),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a press (not a repeat or release).
    #[inline]
    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    /// Whether Shift is held.
    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether this is a backward Tab (`BackTab`, or `Tab` with Shift).
    pub fn is_back_tab(&self) -> bool {
        match self.code {
            KeyCode::BackTab => true,
            KeyCode::Tab => self.shift(),
            _ => false,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Shift+Tab as reported by most terminals.
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Key press / repeat / release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// A mouse event at a cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a mouse event with no modifiers.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        }
    }

    /// Whether this is a primary (left) button press.
    #[inline]
    pub fn is_primary_down(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }
}

/// Mouse action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
mod crossterm_compat {
    use super::*;
    use crossterm::event as ct;

    impl Event {
        /// Convert a Crossterm event. Returns `None` for events with no
        /// canonical counterpart (paste, unsupported keys).
        #[must_use]
        pub fn from_crossterm(event: ct::Event) -> Option<Self> {
            match event {
                ct::Event::Key(key) => convert_key(key).map(Event::Key),
                ct::Event::Mouse(mouse) => convert_mouse(mouse).map(Event::Mouse),
                ct::Event::Resize(width, height) => Some(Event::Resize { width, height }),
                ct::Event::FocusGained => Some(Event::Focus(true)),
                ct::Event::FocusLost => Some(Event::Focus(false)),
                _ => None,
            }
        }
    }

    fn convert_key(key: ct::KeyEvent) -> Option<KeyEvent> {
        let code = match key.code {
            ct::KeyCode::Char(c) => KeyCode::Char(c),
            ct::KeyCode::Enter => KeyCode::Enter,
            ct::KeyCode::Esc => KeyCode::Escape,
            ct::KeyCode::Tab => KeyCode::Tab,
            ct::KeyCode::BackTab => KeyCode::BackTab,
            ct::KeyCode::Backspace => KeyCode::Backspace,
            ct::KeyCode::Delete => KeyCode::Delete,
            ct::KeyCode::Left => KeyCode::Left,
            ct::KeyCode::Right => KeyCode::Right,
            ct::KeyCode::Up => KeyCode::Up,
            ct::KeyCode::Down => KeyCode::Down,
            ct::KeyCode::Home => KeyCode::Home,
            ct::KeyCode::End => KeyCode::End,
            ct::KeyCode::PageUp => KeyCode::PageUp,
            ct::KeyCode::PageDown => KeyCode::PageDown,
            ct::KeyCode::F(n) => KeyCode::F(n),
            _ => return None,
        };
        let kind = match key.kind {
            ct::KeyEventKind::Press => KeyEventKind::Press,
            ct::KeyEventKind::Repeat => KeyEventKind::Repeat,
            ct::KeyEventKind::Release => KeyEventKind::Release,
        };
        Some(KeyEvent {
            code,
            modifiers: convert_modifiers(key.modifiers),
            kind,
        })
    }

    fn convert_mouse(mouse: ct::MouseEvent) -> Option<MouseEvent> {
        let kind = match mouse.kind {
            ct::MouseEventKind::Down(b) => MouseEventKind::Down(convert_button(b)),
            ct::MouseEventKind::Up(b) => MouseEventKind::Up(convert_button(b)),
            ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(convert_button(b)),
            ct::MouseEventKind::Moved => MouseEventKind::Moved,
            ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
            ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
            _ => return None,
        };
        Some(MouseEvent {
            kind,
            x: mouse.column,
            y: mouse.row,
            modifiers: convert_modifiers(mouse.modifiers),
        })
    }

    fn convert_button(button: ct::MouseButton) -> MouseButton {
        match button {
            ct::MouseButton::Left => MouseButton::Left,
            ct::MouseButton::Right => MouseButton::Right,
            ct::MouseButton::Middle => MouseButton::Middle,
        }
    }

    fn convert_modifiers(modifiers: ct::KeyModifiers) -> Modifiers {
        let mut out = Modifiers::empty();
        if modifiers.contains(ct::KeyModifiers::SHIFT) {
            out |= Modifiers::SHIFT;
        }
        if modifiers.contains(ct::KeyModifiers::CONTROL) {
            out |= Modifiers::CTRL;
        }
        if modifiers.contains(ct::KeyModifiers::ALT) {
            out |= Modifiers::ALT;
        }
        if modifiers.contains(ct::KeyModifiers::SUPER) {
            out |= Modifiers::SUPER;
        }
        out
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn esc_maps_to_escape() {
            let ev = ct::Event::Key(ct::KeyEvent::new(ct::KeyCode::Esc, ct::KeyModifiers::NONE));
            assert_eq!(
                Event::from_crossterm(ev),
                Some(Event::Key(KeyEvent::new(KeyCode::Escape)))
            );
        }

        #[test]
        fn back_tab_keeps_shift() {
            let ev = ct::Event::Key(ct::KeyEvent::new(
                ct::KeyCode::BackTab,
                ct::KeyModifiers::SHIFT,
            ));
            let Some(Event::Key(key)) = Event::from_crossterm(ev) else {
                panic!("expected key event");
            };
            assert!(key.is_back_tab());
            assert!(key.shift());
        }

        #[test]
        fn left_click_position() {
            let ev = ct::Event::Mouse(ct::MouseEvent {
                kind: ct::MouseEventKind::Down(ct::MouseButton::Left),
                column: 7,
                row: 3,
                modifiers: ct::KeyModifiers::NONE,
            });
            let Some(Event::Mouse(mouse)) = Event::from_crossterm(ev) else {
                panic!("expected mouse event");
            };
            assert!(mouse.is_primary_down());
            assert_eq!((mouse.x, mouse.y), (7, 3));
        }
    }
}
