#![forbid(unsafe_code)]

//! Row-major cell buffer.
//!
//! # Invariants
//!
//! - `cells.len() == width * height`.
//! - Out-of-bounds reads return `None`; out-of-bounds writes are ignored.
//! - A wide char written at the last column is dropped rather than split.

use popup_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellContent};

/// A grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area.
    #[inline]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell. Wide chars also claim the following column.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = match cell.content {
            CellContent::Char(c) => c.width().unwrap_or(0).max(1),
            _ => 1,
        };
        if width > 1 && x.saturating_add(1) >= self.width {
            return;
        }
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.cells[i] = cell;
        if width > 1
            && let Some(next) = self.index(x + 1, y)
        {
            self.cells[next] = Cell {
                content: CellContent::Continuation,
                ..cell
            };
        }
    }

    /// Fill an area (clipped to the buffer) with a cell.
    pub fn fill(&mut self, area: Rect, cell: Cell) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = cell;
                }
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Text of one row; empty cells become spaces, continuations are skipped.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::with_capacity(self.width as usize);
        for x in 0..self.width {
            match self.get(x, y).map(|c| c.content) {
                Some(CellContent::Char(c)) => out.push(c),
                Some(CellContent::Continuation) => {}
                _ => out.push(' '),
            }
        }
        out
    }

    /// All rows joined by `\n`, with trailing spaces trimmed per row.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(5, 5, Cell::from_char('x'));
        assert!(buf.get(5, 5).is_none());
        assert_eq!(buf.to_text(), "\n");
    }

    #[test]
    fn wide_char_claims_two_columns() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('界'));
        assert_eq!(buf.get(0, 0).unwrap().content.as_char(), Some('界'));
        assert!(buf.get(1, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "界  ");
    }

    #[test]
    fn wide_char_at_last_column_dropped() {
        let mut buf = Buffer::new(2, 1);
        buf.set(1, 0, Cell::from_char('界'));
        assert!(buf.get(1, 0).unwrap().is_empty());
    }

    #[test]
    fn fill_is_clipped() {
        let mut buf = Buffer::new(3, 2);
        buf.fill(Rect::new(1, 1, 10, 10), Cell::from_char('#'));
        assert_eq!(buf.to_text(), "\n ##");
    }

    mod property {
        use popup_core::geometry::Rect;
        use proptest::prelude::*;

        use crate::buffer::Buffer;
        use crate::cell::Cell;

        proptest! {
            #[test]
            fn fill_touches_exactly_the_intersection(
                w in 0u16..20, h in 0u16..20,
                x in 0u16..30, y in 0u16..30, aw in 0u16..30, ah in 0u16..30,
            ) {
                let mut buf = Buffer::new(w, h);
                let area = Rect::new(x, y, aw, ah);
                buf.fill(area, Cell::from_char('#'));
                let clip = area.intersection(&buf.area());
                let filled = (0..h)
                    .flat_map(|yy| (0..w).map(move |xx| (xx, yy)))
                    .filter(|&(xx, yy)| !buf.get(xx, yy).is_some_and(Cell::is_empty))
                    .count();
                prop_assert_eq!(filled, clip.width as usize * clip.height as usize);
            }

            #[test]
            fn text_has_one_line_per_row(
                w in 1u16..12, h in 1u16..8,
                writes in proptest::collection::vec((0u16..16, 0u16..10, prop_oneof![Just('a'), Just('界')]), 0..32),
            ) {
                let mut buf = Buffer::new(w, h);
                for (x, y, c) in writes {
                    buf.set(x, y, Cell::from_char(c));
                }
                prop_assert_eq!(buf.to_text().split('\n').count(), h as usize);
                for y in 0..h {
                    prop_assert!(buf.row_text(y).chars().count() <= w as usize);
                }
            }
        }
    }
}
