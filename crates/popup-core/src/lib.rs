#![forbid(unsafe_code)]

//! Core primitives for the popup widget workspace.
//!
//! - [`geometry`]: rectangles, sizes, and padding sides in cell units.
//! - [`event`]: canonical input events (keys, mouse, resize, focus).
//! - [`logging`]: optional JSON `tracing` subscriber setup.

pub mod event;
pub mod geometry;
pub mod logging;
