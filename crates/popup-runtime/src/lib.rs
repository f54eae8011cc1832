#![forbid(unsafe_code)]

//! Host environment for the popup widget.
//!
//! - [`document`]: element tree with generational node ids and input focus.
//! - [`keyboard`]: the document-wide key listener registry.
//! - [`host`]: event routing, default key actions, and pointer hit testing.

pub mod document;
pub mod host;
pub mod keyboard;

pub use document::{ClickEvent, ClickHandler, Document, DomError, Element, Fragment, NodeId, Tag, WeakDocument};
pub use host::{Host, HostOutcome, NODE_HIT_ID, node_at, register_node};
pub use keyboard::{KeyDispatch, KeyOutcome, KeySubscription, KeyboardHub};
