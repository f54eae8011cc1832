#![forbid(unsafe_code)]

//! Placement of the popup panel: backdrop tint, size constraints, position.

use popup_core::geometry::{Rect, Size};
use popup_render::cell::PackedRgba;

use crate::borders::BorderType;

/// Backdrop configuration (color + opacity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    /// Backdrop color (alpha will be scaled by `opacity`).
    pub color: PackedRgba,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f32,
}

impl BackdropConfig {
    pub fn new(color: PackedRgba, opacity: f32) -> Self {
        Self { color, opacity }
    }

    #[must_use]
    pub fn color(mut self, color: PackedRgba) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// The tint painted over the page, or `None` when fully transparent.
    pub fn tint(&self) -> Option<PackedRgba> {
        let opacity = self.opacity.clamp(0.0, 1.0);
        (opacity > 0.0).then(|| self.color.with_opacity(opacity))
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: PackedRgba::rgb(0, 0, 0),
            opacity: 0.6,
        }
    }
}

/// Panel size constraints (min/max width/height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalSizeConstraints {
    pub min_width: Option<u16>,
    pub max_width: Option<u16>,
    pub min_height: Option<u16>,
    pub max_height: Option<u16>,
}

impl ModalSizeConstraints {
    /// No constraints.
    pub const fn new() -> Self {
        Self {
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
        }
    }

    #[must_use]
    pub fn min_width(mut self, value: u16) -> Self {
        self.min_width = Some(value);
        self
    }

    #[must_use]
    pub fn max_width(mut self, value: u16) -> Self {
        self.max_width = Some(value);
        self
    }

    #[must_use]
    pub fn min_height(mut self, value: u16) -> Self {
        self.min_height = Some(value);
        self
    }

    #[must_use]
    pub fn max_height(mut self, value: u16) -> Self {
        self.max_height = Some(value);
        self
    }

    /// Fit a preferred size to these constraints, never exceeding `available`.
    pub fn resolve(self, preferred: Size, available: Size) -> Size {
        let fit = |value: u16, min: Option<u16>, max: Option<u16>, limit: u16| {
            let mut value = value;
            if let Some(max) = max {
                value = value.min(max);
            }
            if let Some(min) = min {
                value = value.max(min);
            }
            value.min(limit)
        };
        Size::new(
            fit(preferred.width, self.min_width, self.max_width, available.width),
            fit(preferred.height, self.min_height, self.max_height, available.height),
        )
    }
}

/// Panel positioning options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPosition {
    #[default]
    Center,
    CenterOffset {
        x: i16,
        y: i16,
    },
    TopCenter {
        margin: u16,
    },
    Custom {
        x: u16,
        y: u16,
    },
}

impl ModalPosition {
    /// Place a panel of `size` inside `area`, clamped to stay inside it.
    pub fn resolve(self, area: Rect, size: Size) -> Rect {
        let base_x = area.x as i32;
        let base_y = area.y as i32;
        let max_x = base_x + (area.width as i32 - size.width as i32).max(0);
        let max_y = base_y + (area.height as i32 - size.height as i32).max(0);

        let (mut x, mut y) = match self {
            Self::Center => (
                base_x + (area.width as i32 - size.width as i32) / 2,
                base_y + (area.height as i32 - size.height as i32) / 2,
            ),
            Self::CenterOffset { x, y } => (
                base_x + (area.width as i32 - size.width as i32) / 2 + x as i32,
                base_y + (area.height as i32 - size.height as i32) / 2 + y as i32,
            ),
            Self::TopCenter { margin } => (
                base_x + (area.width as i32 - size.width as i32) / 2,
                base_y + margin as i32,
            ),
            Self::Custom { x, y } => (x as i32, y as i32),
        };

        x = x.clamp(base_x, max_x);
        y = y.clamp(base_y, max_y);

        Rect::new(x as u16, y as u16, size.width, size.height).intersection(&area)
    }
}

/// Visual placement of the popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupLayout {
    pub position: ModalPosition,
    pub size: ModalSizeConstraints,
    pub backdrop: BackdropConfig,
    pub border_type: BorderType,
}

impl Default for PopupLayout {
    fn default() -> Self {
        Self {
            position: ModalPosition::Center,
            size: ModalSizeConstraints::new().min_width(30).max_width(60),
            backdrop: BackdropConfig::default(),
            border_type: BorderType::Rounded,
        }
    }
}

impl PopupLayout {
    #[must_use]
    pub fn position(mut self, position: ModalPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn size(mut self, size: ModalSizeConstraints) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.backdrop = backdrop;
        self
    }

    #[must_use]
    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    /// Panel rectangle for a preferred size inside `area`.
    pub fn panel_rect(&self, area: Rect, preferred: Size) -> Rect {
        let size = self.size.resolve(preferred, area.size());
        if size.width == 0 || size.height == 0 {
            return Rect::new(area.x, area.y, 0, 0);
        }
        self.position.resolve(area, size)
    }
}
