#![forbid(unsafe_code)]

//! Panel widget: border + optional title + inner padding + child content.

use std::borrow::Cow;

use crate::borders::{BorderType, Borders};
use crate::{Widget, apply_style, draw_text_span, set_style_area};
use popup_core::geometry::{Rect, Sides};
use popup_render::cell::Cell;
use popup_render::frame::Frame;
use popup_style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Horizontal placement of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A bordered container that renders a child widget inside an inner padded area.
#[derive(Debug, Clone)]
pub struct Panel<'a, W> {
    child: W,
    borders: Borders,
    border_style: Style,
    border_type: BorderType,
    title: Option<&'a str>,
    title_alignment: Alignment,
    title_style: Style,
    style: Style,
    padding: Sides,
}

impl<'a, W> Panel<'a, W> {
    pub fn new(child: W) -> Self {
        Self {
            child,
            borders: Borders::ALL,
            border_style: Style::default(),
            border_type: BorderType::Square,
            title: None,
            title_alignment: Alignment::Left,
            title_style: Style::default(),
            style: Style::default(),
            padding: Sides::default(),
        }
    }

    /// Set which borders to draw.
    #[must_use]
    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    #[must_use]
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    #[must_use]
    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub fn title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    #[must_use]
    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: impl Into<Sides>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Compute the inner area inside the panel borders.
    pub fn inner(&self, area: Rect) -> Rect {
        let mut inner = area;

        if self.borders.contains(Borders::LEFT) {
            inner.x = inner.x.saturating_add(1);
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::TOP) {
            inner.y = inner.y.saturating_add(1);
            inner.height = inner.height.saturating_sub(1);
        }
        if self.borders.contains(Borders::RIGHT) {
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::BOTTOM) {
            inner.height = inner.height.saturating_sub(1);
        }

        inner
    }

    /// Area the child renders into: inside the borders and padding.
    pub fn content_area(&self, area: Rect) -> Rect {
        self.inner(area).inner(self.padding)
    }

    /// Where the title lands on the top border, if it is drawn.
    pub fn title_area(&self, area: Rect) -> Option<Rect> {
        let title = self.title?;
        if !self.borders.contains(Borders::TOP) || area.width < 2 || area.height == 0 {
            return None;
        }
        let available_width = area.width.saturating_sub(2) as usize;
        let display_width = UnicodeWidthStr::width(ellipsize(title, available_width).as_ref())
            .min(available_width) as u16;
        if display_width == 0 {
            return None;
        }
        let x = match self.title_alignment {
            Alignment::Left => area.x + 1,
            Alignment::Center => {
                area.x + 1 + (available_width as u16).saturating_sub(display_width) / 2
            }
            Alignment::Right => area.right().saturating_sub(1).saturating_sub(display_width),
        };
        Some(Rect::new(x, area.y, display_width, 1))
    }

    fn border_cell(&self, c: char) -> Cell {
        let mut cell = Cell::from_char(c);
        apply_style(&mut cell, self.style);
        apply_style(&mut cell, self.border_style);
        cell
    }

    fn render_borders(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let set = self.border_type.to_border_set();
        let buf = &mut frame.buffer;

        // Edges
        if self.borders.contains(Borders::LEFT) {
            for y in area.y..area.bottom() {
                buf.set(area.x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::RIGHT) {
            let x = area.right() - 1;
            for y in area.y..area.bottom() {
                buf.set(x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::TOP) {
            for x in area.x..area.right() {
                buf.set(x, area.y, self.border_cell(set.horizontal));
            }
        }
        if self.borders.contains(Borders::BOTTOM) {
            let y = area.bottom() - 1;
            for x in area.x..area.right() {
                buf.set(x, y, self.border_cell(set.horizontal));
            }
        }

        // Corners (drawn after edges)
        if self.borders.contains(Borders::LEFT | Borders::TOP) {
            buf.set(area.x, area.y, self.border_cell(set.top_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::TOP) {
            buf.set(area.right() - 1, area.y, self.border_cell(set.top_right));
        }
        if self.borders.contains(Borders::LEFT | Borders::BOTTOM) {
            buf.set(area.x, area.bottom() - 1, self.border_cell(set.bottom_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::BOTTOM) {
            buf.set(
                area.right() - 1,
                area.bottom() - 1,
                self.border_cell(set.bottom_right),
            );
        }
    }
}

/// Shorten `s` to `max_width` columns, ending in `…` when cut.
pub(crate) fn ellipsize(s: &str, max_width: usize) -> Cow<'_, str> {
    let total = UnicodeWidthStr::width(s);
    if total <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Use a single-cell ellipsis.
    if max_width == 1 {
        return Cow::Borrowed("…");
    }

    let mut out = String::new();
    let mut used = 0usize;
    let target = max_width - 1;

    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if w == 0 {
            continue;
        }
        if used + w > target {
            break;
        }
        out.push_str(g);
        used += w;
    }

    out.push('…');
    Cow::Owned(out)
}

impl<W: Widget> Widget for Panel<'_, W> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Panel",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        let area = area.intersection(&frame.bounds());
        if area.is_empty() {
            return;
        }

        set_style_area(&mut frame.buffer, area, self.style);
        self.render_borders(area, frame);

        if let (Some(title), Some(title_area)) = (self.title, self.title_area(area)) {
            let text = ellipsize(title, area.width.saturating_sub(2) as usize);
            let style = self.title_style.merge(&self.border_style).merge(&self.style);
            draw_text_span(
                frame,
                title_area.x,
                title_area.y,
                text.as_ref(),
                style,
                area.right().saturating_sub(1),
            );
        }

        let content_area = self.content_area(area);
        if content_area.is_empty() {
            return;
        }
        self.child.render(content_area, frame);
    }
}
