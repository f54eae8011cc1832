#![forbid(unsafe_code)]

//! Geometry primitives in terminal cell units.

/// A rectangle in cell coordinates.
///
/// `x`/`y` are the top-left corner; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether the rectangle covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Whether the cell `(x, y)` lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink the rectangle by the given sides, saturating at zero size.
    #[must_use]
    pub fn inner(&self, sides: Sides) -> Rect {
        let x = self.x.saturating_add(sides.left);
        let y = self.y.saturating_add(sides.top);
        let width = self
            .width
            .saturating_sub(sides.left.saturating_add(sides.right));
        let height = self
            .height
            .saturating_sub(sides.top.saturating_add(sides.bottom));
        Rect::new(x, y, width, height)
    }

    /// Intersection of two rectangles (empty if they do not overlap).
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(x, y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// The size of this rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Padding or margin on the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Same value on every side.
    pub const fn all(value: u16) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Horizontal padding only.
    pub const fn horizontal(value: u16) -> Self {
        Self {
            top: 0,
            right: value,
            bottom: 0,
            left: value,
        }
    }
}

impl From<u16> for Sides {
    fn from(value: u16) -> Self {
        Self::all(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edges_are_exclusive() {
        let r = Rect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 8);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 7));
        assert!(!r.contains(5, 8));
    }

    #[test]
    fn inner_saturates() {
        let r = Rect::new(0, 0, 3, 2);
        let inner = r.inner(Sides::all(2));
        assert!(inner.is_empty());
        assert_eq!(Rect::new(1, 1, 10, 6).inner(Sides::all(1)), Rect::new(2, 2, 8, 4));
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(
            Rect::new(0, 0, 4, 4).intersection(&Rect::new(2, 1, 4, 4)),
            Rect::new(2, 1, 2, 3)
        );
    }

    proptest! {
        #[test]
        fn intersection_stays_inside_both(
            ax in 0u16..50, ay in 0u16..50, aw in 0u16..50, ah in 0u16..50,
            bx in 0u16..50, by in 0u16..50, bw in 0u16..50, bh in 0u16..50,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let i = a.intersection(&b);
            if !i.is_empty() {
                prop_assert!(i.x >= a.x && i.right() <= a.right());
                prop_assert!(i.y >= b.y && i.bottom() <= b.bottom());
            }
        }
    }
}
