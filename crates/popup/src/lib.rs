#![forbid(unsafe_code)]

//! Modal popup widget for terminal UIs.
//!
//! This crate re-exports the workspace crates under one name and offers a
//! [`prelude`] with the types most callers need.
//!
//! ```
//! use popup::prelude::*;
//!
//! let host = Host::new();
//! let mut popup = Popup::new(
//!     PopupProps::new(|| {})
//!         .title("Quit?")
//!         .content(vec![Element::paragraph("Unsaved changes will be lost.")])
//!         .on_confirm(|| {}),
//! );
//! popup.set_open(&host, true);
//!
//! let mut frame = Frame::with_hit_grid(60, 12);
//! popup.view().render(frame.bounds(), &mut frame);
//! assert!(frame.buffer.to_text().contains("Quit?"));
//! ```

pub use popup_core::{event, geometry, logging};
pub use popup_render as render;
pub use popup_runtime as runtime;
pub use popup_style as style;
pub use popup_widgets as widgets;

pub use popup_core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseEvent};
pub use popup_core::geometry::{Rect, Size};
pub use popup_render::frame::Frame;
pub use popup_runtime::{Document, Element, Fragment, Host, HostOutcome, KeyboardHub, NodeId, Tag};
pub use popup_style::{Style, StyleSheet};
pub use popup_widgets::{Popup, PopupConfig, PopupLayout, PopupProps, PopupView, Widget};

pub mod prelude {
    pub use crate::event::{Event, KeyCode, KeyEvent, Modifiers};
    pub use crate::geometry::Rect;
    pub use crate::render::frame::Frame;
    pub use crate::runtime::{Document, Element, Fragment, Host, HostOutcome, NodeId, Tag};
    pub use crate::style::{Style, StyleSheet};
    pub use crate::widgets::popup::class;
    pub use crate::widgets::{
        BackdropConfig, ModalPosition, ModalSizeConstraints, Popup, PopupConfig, PopupLayout,
        PopupProps, Widget,
    };
}
