#![forbid(unsafe_code)]

//! Style types with CSS-like cascading semantics.
//!
//! This crate provides:
//! - [`Style`] for cell styling where unset fields inherit
//! - [`StyleSheet`] mapping class names to styles, resolved against a class list

pub mod sheet;
pub mod style;

pub use popup_render::cell::StyleFlags;
pub use sheet::StyleSheet;
pub use style::Style;
