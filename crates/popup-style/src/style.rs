#![forbid(unsafe_code)]

//! Cell style with optional fields.
//!
//! Unset fields mean "inherit". [`Style::merge`] layers a style over a parent:
//! fields set on `self` win, unset fields fall back to the parent, and
//! attribute flags are unioned.

use popup_render::cell::{PackedRgba, StyleFlags};

/// Foreground, background, and attribute flags, each optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    /// An empty style (inherits everything).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub fn attrs(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.attrs(StyleFlags::DIM)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.attrs(StyleFlags::UNDERLINE)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.attrs(StyleFlags::REVERSE)
    }

    /// Whether the style sets nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Whether the given flag is set.
    pub fn has(&self, flag: StyleFlags) -> bool {
        self.attrs.is_some_and(|a| a.contains(flag))
    }

    /// Layer `self` over `parent`.
    #[must_use]
    pub fn merge(&self, parent: &Style) -> Style {
        let attrs = match (self.attrs, parent.attrs) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => a.or(b),
        };
        Style {
            fg: self.fg.or(parent.fg),
            bg: self.bg.or(parent.bg),
            attrs,
        }
    }
}
