#![forbid(unsafe_code)]

//! Cell contents, colors, and attribute flags.

use bitflags::bitflags;

/// RGBA color packed into a `u32` (`0xRRGGBBAA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Color from RGBA components.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Scale the alpha channel by `opacity` (clamped to `[0.0, 1.0]`).
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (self.a() as f32 * opacity).round() as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }
}

bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// What a cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    /// Nothing drawn.
    #[default]
    Empty,
    /// A single scalar value (the leading char of the grapheme).
    Char(char),
    /// Trailing column of a wide character drawn in the previous cell.
    Continuation,
}

impl CellContent {
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::Char(c)
    }

    /// The displayed char, if any.
    #[inline]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub attrs: StyleFlags,
}

impl Cell {
    #[inline]
    pub const fn new(content: CellContent) -> Self {
        Self {
            content,
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }

    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(CellContent::Char(c))
    }

    /// Whether nothing is drawn in this cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    /// Whether this cell continues a wide character.
    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.content == CellContent::Continuation
    }
}
