#![forbid(unsafe_code)]

//! Widgets for the popup workspace.
//!
//! - [`popup`]: the modal [`Popup`] and its [`PopupView`].
//! - [`panel`]: bordered container with a title.
//! - [`borders`]: border sides and glyph sets.
//! - [`focus_trap`]: wrap-around Tab resolution inside a container.

pub mod borders;
pub mod focus_trap;
pub mod panel;
pub mod popup;

pub use panel::{Alignment, Panel};
pub use popup::{
    BackdropConfig, Callback, ModalPosition, ModalSizeConstraints, Popup, PopupConfig,
    PopupLayout, PopupNodes, PopupProps, PopupView,
};

use popup_core::geometry::Rect;
use popup_render::buffer::Buffer;
use popup_render::cell::{Cell, CellContent};
use popup_render::frame::Frame;
use popup_style::Style;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Helper to apply style to a cell.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    if let Some(fg) = style.fg {
        cell.fg = fg;
    }
    if let Some(bg) = style.bg {
        cell.bg = bg;
    }
    if let Some(attrs) = style.attrs {
        cell.attrs |= attrs;
    }
}

/// Apply a style to all cells in a rectangular area.
///
/// This modifies existing cells, preserving their content.
pub(crate) fn set_style_area(buf: &mut Buffer, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                apply_style(cell, style);
            }
        }
    }
}

/// Draw a text span into a frame at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive). Cells hold one scalar, so a multi-scalar
/// grapheme keeps its base character.
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    use unicode_segmentation::UnicodeSegmentation;
    use unicode_width::UnicodeWidthStr;

    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x + w as u16 > max_x {
            break;
        }
        let Some(c) = grapheme.chars().next() else {
            continue;
        };

        let mut cell = Cell::new(CellContent::from_char(c));
        apply_style(&mut cell, style);
        frame.buffer.set(x, y, cell);

        x = x.saturating_add(w as u16);
    }
    x
}
