#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, and frames.
//!
//! A [`frame::Frame`] is what widgets draw into: a cell [`buffer::Buffer`]
//! plus an optional hit grid used to resolve pointer positions back to the
//! element that was drawn there.

pub mod buffer;
pub mod cell;
pub mod frame;
