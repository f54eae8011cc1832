#![forbid(unsafe_code)]

//! Frame: the render target handed to widgets.
//!
//! A frame owns the cell [`Buffer`] and, when created with
//! [`Frame::with_hit_grid`], a per-cell hit grid. Widgets register hit
//! regions while drawing; later registrations overwrite earlier ones, so the
//! topmost drawn element wins, matching paint order.

use popup_core::geometry::Rect;

use crate::buffer::Buffer;

/// Identifier of the widget (or widget family) owning a hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitId(u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Coarse classification of a hit region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitRegion {
    Content,
    Border,
    Button,
    Link,
    Custom(u8),
}

/// Widget-defined payload attached to a hit region.
pub type HitData = u64;

/// One hit grid entry.
pub type HitEntry = (HitId, HitRegion, HitData);

/// Per-cell hit map.
#[derive(Debug, Clone)]
struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<HitEntry>>,
}

impl HitGrid {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    fn register(&mut self, area: Rect, entry: HitEntry) {
        let area = area.intersection(&Rect::from_size(self.width, self.height));
        for y in area.y..area.bottom() {
            let row = y as usize * self.width as usize;
            for x in area.x..area.right() {
                self.cells[row + x as usize] = Some(entry);
            }
        }
    }

    fn get(&self, x: u16, y: u16) -> Option<HitEntry> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }
}

/// Render target: buffer + optional hit grid + cursor request.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    hit_grid: Option<HitGrid>,
    /// Requested cursor position, if a widget wants the cursor shown.
    pub cursor_position: Option<(u16, u16)>,
    pub cursor_visible: bool,
}

impl Frame {
    /// Create a frame without hit testing.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
            cursor_position: None,
            cursor_visible: false,
        }
    }

    /// Create a frame with a hit grid.
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            hit_grid: Some(HitGrid::new(width, height)),
            ..Self::new(width, height)
        }
    }

    /// The whole drawable area.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.area()
    }

    /// Whether hit regions are recorded.
    #[inline]
    pub fn has_hit_grid(&self) -> bool {
        self.hit_grid.is_some()
    }

    /// Register a hit region. Returns `false` when the frame has no hit grid.
    pub fn register_hit(&mut self, area: Rect, id: HitId, region: HitRegion, data: HitData) -> bool {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            hit_id = id.id(),
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height,
            "register_hit"
        );
        match self.hit_grid.as_mut() {
            Some(grid) => {
                grid.register(area, (id, region, data));
                true
            }
            None => false,
        }
    }

    /// Topmost hit region at a cell.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitEntry> {
        self.hit_grid.as_ref().and_then(|grid| grid.get(x, y))
    }

    /// Clear cells, hit regions, and cursor request for the next pass.
    pub fn clear(&mut self) {
        self.buffer.clear();
        if let Some(grid) = self.hit_grid.as_mut() {
            grid.cells.fill(None);
        }
        self.cursor_position = None;
        self.cursor_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_grid_means_no_hits() {
        let mut frame = Frame::new(4, 4);
        assert!(!frame.register_hit(Rect::new(0, 0, 4, 4), HitId::new(1), HitRegion::Content, 0));
        assert_eq!(frame.hit_test(1, 1), None);
    }

    #[test]
    fn later_registration_wins() {
        let mut frame = Frame::with_hit_grid(10, 5);
        frame.register_hit(Rect::new(0, 0, 10, 5), HitId::new(1), HitRegion::Content, 1);
        frame.register_hit(Rect::new(2, 1, 3, 2), HitId::new(1), HitRegion::Button, 2);

        assert_eq!(frame.hit_test(0, 0), Some((HitId::new(1), HitRegion::Content, 1)));
        assert_eq!(frame.hit_test(3, 2), Some((HitId::new(1), HitRegion::Button, 2)));
        assert_eq!(frame.hit_test(5, 2), Some((HitId::new(1), HitRegion::Content, 1)));
        assert_eq!(frame.hit_test(10, 0), None);
    }

    #[test]
    fn clear_resets_hits() {
        let mut frame = Frame::with_hit_grid(3, 3);
        frame.register_hit(Rect::new(0, 0, 3, 3), HitId::new(4), HitRegion::Content, 0);
        frame.clear();
        assert_eq!(frame.hit_test(1, 1), None);
        assert!(frame.has_hit_grid());
    }
}
