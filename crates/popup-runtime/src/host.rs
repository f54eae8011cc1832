#![forbid(unsafe_code)]

//! Host environment: document, keyboard stream, and event routing.
//!
//! [`Host`] bundles the [`Document`] and [`KeyboardHub`] a widget mounts into
//! and routes raw [`Event`]s to them:
//!
//! - key events go to the hub's listeners, then (unless a listener called
//!   `prevent_default`) to the default action: Tab / Shift+Tab move focus in
//!   document tab order, Enter activates a focused button or link, Space
//!   activates a focused button;
//! - a primary mouse press resolves the node under the pointer through the
//!   frame's hit grid and clicks it.
//!
//! Clicking focuses the nearest focusable inclusive ancestor of the target
//! (or clears focus when there is none), then runs click handlers from the
//! target up to the root. Handlers of nodes removed by an earlier handler in
//! the same click are skipped.

use popup_core::event::{Event, KeyCode, KeyEvent};
use popup_core::geometry::Rect;
use popup_render::frame::{Frame, HitId, HitRegion};

use crate::document::{ClickEvent, Document, NodeId, Tag};
use crate::keyboard::{KeyOutcome, KeyboardHub};

/// Hit id under which document nodes register their screen area.
pub const NODE_HIT_ID: HitId = HitId::new(0x0D0C);

/// Record that `node` occupies `area` in the frame.
pub fn register_node(frame: &mut Frame, area: Rect, node: NodeId, region: HitRegion) -> bool {
    frame.register_hit(area, NODE_HIT_ID, region, node.to_bits())
}

/// Topmost document node registered at a cell, if it is still live.
pub fn node_at(document: &Document, frame: &Frame, x: u16, y: u16) -> Option<NodeId> {
    let (id, _, data) = frame.hit_test(x, y)?;
    if id != NODE_HIT_ID {
        return None;
    }
    let node = NodeId::from_bits(data);
    document.contains(node).then_some(node)
}

/// What [`Host::handle_event`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOutcome {
    Key(KeyOutcome),
    Click(NodeId),
    Ignored,
}

/// Shared host environment.
#[derive(Debug, Clone, Default)]
pub struct Host {
    document: Document,
    keyboard: KeyboardHub,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host over an existing document and hub.
    pub fn with_parts(document: Document, keyboard: KeyboardHub) -> Self {
        Self { document, keyboard }
    }

    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    pub fn keyboard(&self) -> &KeyboardHub {
        &self.keyboard
    }

    /// Route a raw event. `frame` is the last rendered frame, used for
    /// pointer hit testing.
    pub fn handle_event(&self, event: &Event, frame: &Frame) -> HostOutcome {
        match event {
            Event::Key(key) => HostOutcome::Key(self.dispatch_key(*key)),
            Event::Mouse(mouse) if mouse.is_primary_down() => {
                match node_at(&self.document, frame, mouse.x, mouse.y) {
                    Some(node) => {
                        self.click(node);
                        HostOutcome::Click(node)
                    }
                    None => HostOutcome::Ignored,
                }
            }
            _ => HostOutcome::Ignored,
        }
    }

    /// Deliver a key event to listeners, then run the default action.
    pub fn dispatch_key(&self, key: KeyEvent) -> KeyOutcome {
        let outcome = self.keyboard.dispatch(key);
        if !outcome.default_prevented && key.is_press() {
            self.default_key_action(&key);
        }
        outcome
    }

    fn default_key_action(&self, key: &KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                let forward = !key.is_back_tab();
                if let Some(next) = self.document.next_in_tab_order(forward) {
                    self.document.focus(next);
                }
            }
            KeyCode::Enter => {
                if let Some(active) = self.document.active_element()
                    && matches!(self.document.tag(active), Some(Tag::Button | Tag::Anchor))
                {
                    self.click(active);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(active) = self.document.active_element()
                    && self.document.tag(active) == Some(Tag::Button)
                {
                    self.click(active);
                }
            }
            _ => {}
        }
    }

    /// Click `target`: move focus, then bubble handlers to the root.
    pub fn click(&self, target: NodeId) {
        if !self.document.contains(target) {
            tracing::debug!(node = target.to_bits(), "click on stale node ignored");
            return;
        }

        let mut path = vec![target];
        let mut cursor = target;
        while let Some(parent) = self.document.parent(cursor) {
            path.push(parent);
            cursor = parent;
        }

        match path
            .iter()
            .copied()
            .find(|&node| self.document.is_focusable(node))
        {
            Some(node) => {
                self.document.focus(node);
            }
            None => self.document.blur(),
        }

        for current_target in path {
            let Some(handler) = self.document.click_handler(current_target) else {
                continue;
            };
            handler(&ClickEvent {
                target,
                current_target,
            });
        }
    }
}
