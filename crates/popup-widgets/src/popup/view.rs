#![forbid(unsafe_code)]

//! Rendering of an open popup.
//!
//! The view draws over the whole frame (the popup is a portal, so the area
//! passed to `render` is ignored):
//!
//! ```text
//! ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
//! ░░╭ Title ────────────────────────[×]╮░░
//! ░░│ body line                        │░░
//! ░░│ [ button in body ]               │░░
//! ░░│                                  │░░
//! ░░│          [ Annuler ] [ Confirmer ] │░░
//! ░░╰──────────────────────────────────╯░░
//! ░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
//! ```
//!
//! Text is read from the document at every render, so content edited while
//! the popup is open shows up on the next frame. Every drawn node registers
//! its cells in the frame's hit grid under [`popup_runtime::NODE_HIT_ID`], in
//! paint order, so [`popup_runtime::node_at`] resolves the topmost node.

use popup_core::geometry::{Rect, Sides, Size};
use popup_render::cell::Cell;
use popup_render::frame::{Frame, HitRegion};
use popup_runtime::{Document, NodeId, Tag, register_node};
use popup_style::{Style, StyleSheet};
use unicode_width::UnicodeWidthStr;

use super::{Popup, PopupNodes};
use crate::panel::{Panel, ellipsize};
use crate::{Widget, draw_text_span, set_style_area};

/// Hit region of the overlay.
pub const POPUP_HIT_OVERLAY: HitRegion = HitRegion::Custom(1);
/// Hit region of the content panel.
pub const POPUP_HIT_PANEL: HitRegion = HitRegion::Custom(2);

/// Columns taken by the close control on the top border.
const CLOSE_WIDTH: u16 = 3;
/// Minimum field width of a rendered text input.
const INPUT_WIDTH: usize = 16;

/// One drawable node.
#[derive(Debug, Clone)]
struct Line {
    node: NodeId,
    text: String,
    region: HitRegion,
    style: Style,
    /// Cursor column (relative to the line start) when the node is a focused
    /// text field.
    cursor: Option<u16>,
}

impl Line {
    fn width(&self) -> u16 {
        UnicodeWidthStr::width(self.text.as_str()).min(u16::MAX as usize) as u16
    }

    fn draw(&self, frame: &mut Frame, x: u16, y: u16, max_x: u16) -> u16 {
        let end = draw_text_span(frame, x, y, &self.text, self.style, max_x);
        if end > x {
            register_node(frame, Rect::new(x, y, end - x, 1), self.node, self.region);
        }
        if let Some(col) = self.cursor {
            let cx = x.saturating_add(col);
            if cx < max_x {
                frame.cursor_position = Some((cx, y));
                frame.cursor_visible = true;
            }
        }
        end
    }
}

/// Styles and focus needed to turn nodes into lines.
struct Painter<'a> {
    document: &'a Document,
    sheet: Option<&'a StyleSheet>,
    focused: Option<NodeId>,
}

impl Painter<'_> {
    fn class_style(&self, node: NodeId) -> Style {
        match (self.sheet, self.document.class_attr(node)) {
            (Some(sheet), Some(classes)) => sheet.resolve_attr(&classes),
            _ => Style::new(),
        }
    }

    fn line(&self, node: NodeId) -> Option<Line> {
        let tag = self.document.tag(node)?;
        let label = self.document.text(node)?;
        let focused = self.focused == Some(node);
        let mut style = self.class_style(node);
        let mut cursor = None;

        let (text, region) = match tag {
            Tag::Button => (format!("[ {label} ]"), HitRegion::Button),
            Tag::Anchor => {
                style = style.underline();
                (label, HitRegion::Link)
            }
            Tag::Input | Tag::TextArea => {
                let width = UnicodeWidthStr::width(label.as_str());
                if focused {
                    cursor = Some(1 + width.min(u16::MAX as usize - 1) as u16);
                }
                let fill = "_".repeat(INPUT_WIDTH.saturating_sub(width));
                (format!("[{label}{fill}]"), HitRegion::Content)
            }
            Tag::Select => (format!("[{label} ▾]"), HitRegion::Content),
            Tag::Heading => {
                style = style.bold();
                (label, HitRegion::Content)
            }
            Tag::Root | Tag::Div | Tag::Paragraph => (label, HitRegion::Content),
        };
        if focused {
            style = style.reverse();
        }

        Some(Line {
            node,
            text,
            region,
            style,
            cursor,
        })
    }

    /// Lines for every text-bearing node below `container`, in document order.
    fn lines_within(&self, container: NodeId) -> Vec<Line> {
        self.document
            .descendants(container)
            .into_iter()
            .filter_map(|node| self.line(node))
            .collect()
    }
}

/// Panel interior: body rows, a blank separator, then the footer row.
struct Interior<'a> {
    nodes: PopupNodes,
    body: &'a [Line],
    footer: &'a [Line],
}

impl Interior<'_> {
    fn footer_width(&self) -> u16 {
        let buttons: u16 = self.footer.iter().map(Line::width).fold(0, u16::saturating_add);
        buttons.saturating_add(self.footer.len().saturating_sub(1) as u16)
    }
}

impl Widget for Interior<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }

        let footer_y = area.bottom() - 1;
        let body_bottom = area.bottom().saturating_sub(2).max(area.y);
        let body_area = Rect::new(area.x, area.y, area.width, body_bottom - area.y);
        if !body_area.is_empty() {
            register_node(frame, body_area, self.nodes.body, HitRegion::Content);
        }
        for (row, line) in self.body.iter().enumerate() {
            let Some(y) = area.y.checked_add(row as u16).filter(|&y| y < body_bottom) else {
                break;
            };
            line.draw(frame, area.x, y, area.right());
        }

        register_node(
            frame,
            Rect::new(area.x, footer_y, area.width, 1),
            self.nodes.footer,
            HitRegion::Content,
        );
        let mut x = area.right().saturating_sub(self.footer_width()).max(area.x);
        for line in self.footer {
            if x >= area.right() {
                break;
            }
            let end = line.draw(frame, x, footer_y, area.right());
            x = end.saturating_add(1);
        }
    }
}

/// Renderable view of a [`Popup`]. Renders nothing while the popup is closed.
#[derive(Debug, Clone, Copy)]
pub struct PopupView<'a> {
    popup: &'a Popup,
    stylesheet: Option<&'a StyleSheet>,
}

impl<'a> PopupView<'a> {
    pub(crate) fn new(popup: &'a Popup) -> Self {
        Self {
            popup,
            stylesheet: None,
        }
    }

    /// Style nodes by their class lists.
    #[must_use]
    pub fn stylesheet(mut self, sheet: &'a StyleSheet) -> Self {
        self.stylesheet = Some(sheet);
        self
    }

    /// Where the content panel lands in a frame of `bounds`.
    pub fn panel_rect(&self, bounds: Rect) -> Option<Rect> {
        let (document, nodes) = self.popup.session_parts()?;
        let painter = self.painter(document);
        let body = painter.lines_within(nodes.body);
        let footer = painter.lines_within(nodes.footer);
        let title = nodes.title.and_then(|t| document.text(t));
        let preferred = preferred_size(title.as_deref(), &body, &footer);
        let rect = self.popup.props().get_layout().panel_rect(bounds, preferred);
        (!rect.is_empty()).then_some(rect)
    }

    fn painter<'d>(&self, document: &'d Document) -> Painter<'d>
    where
        'a: 'd,
    {
        Painter {
            document,
            sheet: self.stylesheet,
            focused: document.active_element(),
        }
    }
}

fn preferred_size(title: Option<&str>, body: &[Line], footer: &[Line]) -> Size {
    let header = title
        .map(|t| UnicodeWidthStr::width(t).min(u16::MAX as usize) as u16)
        .unwrap_or(0)
        .saturating_add(2 + 2 + CLOSE_WIDTH + 1);
    let body_width = body.iter().map(Line::width).max().unwrap_or(0);
    let footer_width = footer
        .iter()
        .map(Line::width)
        .fold(0u16, |acc, w| acc.saturating_add(w).saturating_add(1));
    let width = header
        .max(body_width.saturating_add(4))
        .max(footer_width.saturating_add(3));
    let height = (body.len().max(1).min(u16::MAX as usize - 4) as u16) + 4;
    Size::new(width, height)
}

impl Widget for PopupView<'_> {
    fn render(&self, _area: Rect, frame: &mut Frame) {
        let Some((document, nodes)) = self.popup.session_parts() else {
            return;
        };
        let bounds = frame.bounds();
        if bounds.is_empty() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Popup",
            w = bounds.width,
            h = bounds.height
        )
        .entered();

        let layout = self.popup.props().get_layout();
        let painter = self.painter(document);

        // Overlay
        let mut overlay_style = painter.class_style(nodes.overlay);
        if let Some(tint) = layout.backdrop.tint() {
            overlay_style = overlay_style.merge(&Style::new().bg(tint));
        }
        set_style_area(&mut frame.buffer, bounds, overlay_style);
        register_node(frame, bounds, nodes.overlay, POPUP_HIT_OVERLAY);

        // Panel
        let body = painter.lines_within(nodes.body);
        let footer = painter.lines_within(nodes.footer);
        let title = nodes.title.and_then(|t| document.text(t));
        let rect = layout.panel_rect(bounds, preferred_size(title.as_deref(), &body, &footer));
        if rect.is_empty() {
            return;
        }
        frame.buffer.fill(rect, Cell::default());
        register_node(frame, rect, nodes.panel, POPUP_HIT_PANEL);

        let title_room = rect.width.saturating_sub(2 + 2 + CLOSE_WIDTH + 1) as usize;
        let title_text = title
            .as_deref()
            .map(|t| ellipsize(t, title_room))
            .filter(|t| !t.is_empty())
            .map(|t| format!(" {t} "));

        let interior = Interior {
            nodes,
            body: &body,
            footer: &footer,
        };
        let mut panel = Panel::new(interior)
            .border_type(layout.border_type)
            .style(painter.class_style(nodes.panel))
            .padding(Sides::horizontal(1));
        if let Some(text) = title_text.as_deref() {
            let mut title_style = painter.class_style(nodes.header).bold();
            if let Some(node) = nodes.title {
                title_style = painter.class_style(node).merge(&title_style);
            }
            panel = panel.title(text).title_style(title_style);
        }
        panel.render(rect, frame);

        // Header: top border row, title text, close control.
        register_node(
            frame,
            Rect::new(rect.x, rect.y, rect.width, 1),
            nodes.header,
            HitRegion::Border,
        );
        if let (Some(node), Some(area)) = (nodes.title, panel.title_area(rect))
            && area.width > 2
        {
            register_node(
                frame,
                Rect::new(area.x + 1, area.y, area.width - 2, 1),
                node,
                HitRegion::Content,
            );
        }
        if rect.width >= CLOSE_WIDTH + 4
            && let Some(close) = painter.line(nodes.close)
        {
            let label = document.text(nodes.close).unwrap_or_default();
            let control = Line {
                text: format!("[{label}]"),
                ..close
            };
            let x = rect.right() - 2 - CLOSE_WIDTH;
            control.draw(frame, x, rect.y, rect.right() - 1);
        }
    }
}
