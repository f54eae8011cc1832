#![forbid(unsafe_code)]

//! Modal popup.
//!
//! A [`Popup`] is a controlled widget: the caller owns the visibility flag and
//! passes it in with [`Popup::set_open`]. While open, the popup
//!
//! 1. mounts an overlay subtree under the document root (a portal): overlay,
//!    content panel, header with optional title and a close control, body with
//!    the caller's content, footer with cancel and optional confirm buttons;
//! 2. moves focus to the content panel, remembering the element focused
//!    before;
//! 3. listens on the host keyboard stream: Escape requests close, Tab and
//!    Shift+Tab wrap around inside the panel.
//!
//! Closing (flag set to false, [`Popup::unmount`], or drop) releases the
//! listener, removes the subtree, and gives focus back to the remembered
//! element if it is still connected and focusable.
//!
//! # Invariants
//!
//! 1. Closed popups have no nodes in the document and no key listener.
//! 2. One listener registration per open cycle and exactly one release.
//! 3. `set_open` is edge-triggered; repeating the current state does nothing.
//! 4. No title means no title node; no confirm callback means no confirm node.
//!
//! # Example
//!
//! ```
//! use popup_runtime::{Element, Host};
//! use popup_widgets::{Popup, PopupProps};
//!
//! let host = Host::new();
//! let mut popup = Popup::new(
//!     PopupProps::new(|| println!("close requested"))
//!         .title("Delete file?")
//!         .content(vec![Element::paragraph("This cannot be undone.")])
//!         .on_confirm(|| println!("confirmed")),
//! );
//! popup.set_open(&host, true);
//! assert!(popup.is_open());
//! popup.set_open(&host, false);
//! assert_eq!(host.keyboard().listener_count(), 0);
//! ```

mod config;
mod layout;
mod view;

pub use config::PopupConfig;
pub use layout::{BackdropConfig, ModalPosition, ModalSizeConstraints, PopupLayout};
pub use view::{POPUP_HIT_OVERLAY, POPUP_HIT_PANEL, PopupView};

use std::fmt;
use std::rc::Rc;

use popup_core::event::KeyCode;
use popup_runtime::{Document, DomError, Element, Fragment, Host, KeySubscription, NodeId};

use crate::focus_trap::{FocusScope, TrapAction};

/// Class names given to the popup's nodes.
pub mod class {
    pub const OVERLAY: &str = "popup-overlay";
    pub const CONTENT: &str = "popup-content";
    pub const HEADER: &str = "popup-header";
    pub const TITLE: &str = "popup-title";
    pub const CLOSE: &str = "popup-close";
    pub const BODY: &str = "popup-body";
    pub const FOOTER: &str = "popup-footer";
    pub const CANCEL: &str = "popup-cancel";
    pub const CONFIRM: &str = "popup-confirm";
}

/// Caller callback.
pub type Callback = Rc<dyn Fn()>;

/// Everything a popup is created with.
#[derive(Clone)]
pub struct PopupProps {
    on_close: Callback,
    on_confirm: Option<Callback>,
    content: Fragment,
    config: PopupConfig,
    layout: PopupLayout,
}

impl fmt::Debug for PopupProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupProps")
            .field("on_confirm", &self.on_confirm.is_some())
            .field("content", &self.content)
            .field("config", &self.config)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl PopupProps {
    /// Props with the required close callback and default options.
    pub fn new(on_close: impl Fn() + 'static) -> Self {
        Self {
            on_close: Rc::new(on_close),
            on_confirm: None,
            content: Vec::new(),
            config: PopupConfig::default(),
            layout: PopupLayout::default(),
        }
    }

    #[must_use]
    pub fn on_confirm(mut self, on_confirm: impl Fn() + 'static) -> Self {
        self.on_confirm = Some(Rc::new(on_confirm));
        self
    }

    #[must_use]
    pub fn content(mut self, content: Fragment) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.content.push(child);
        self
    }

    #[must_use]
    pub fn config(mut self, config: PopupConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: PopupLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.config.close_on_overlay_click = close;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.config.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.config.class_name = class_name.into();
        self
    }

    #[must_use]
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.config.confirm_text = text.into();
        self
    }

    #[must_use]
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.config.cancel_text = text.into();
        self
    }

    pub fn get_config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn get_layout(&self) -> &PopupLayout {
        &self.layout
    }

    pub fn has_confirm(&self) -> bool {
        self.on_confirm.is_some()
    }
}

/// Document nodes of an open popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupNodes {
    pub overlay: NodeId,
    pub panel: NodeId,
    pub header: NodeId,
    pub title: Option<NodeId>,
    pub close: NodeId,
    pub body: NodeId,
    pub footer: NodeId,
    pub cancel: NodeId,
    pub confirm: Option<NodeId>,
}

/// State that exists exactly while the popup is open. Dropping it is the
/// close transition.
struct OpenSession {
    document: Document,
    previous_focus: Option<NodeId>,
    nodes: PopupNodes,
    keys: KeySubscription,
}

impl OpenSession {
    fn open(host: &Host, props: &PopupProps) -> Result<Self, DomError> {
        let document = host.document().clone();
        let previous_focus = document.active_element();
        let nodes = mount(&document, props)?;
        let keys = subscribe_keys(host, props, nodes.panel);
        document.focus(nodes.panel);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            overlay = nodes.overlay.to_bits(),
            previous_focus = previous_focus.map(NodeId::to_bits),
            "popup opened"
        );

        Ok(Self {
            document,
            previous_focus,
            nodes,
            keys,
        })
    }
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        self.keys.release();
        if let Err(_err) = self.document.remove(self.nodes.overlay) {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "popup overlay was already removed");
        }
        if let Some(previous) = self.previous_focus
            && self.document.is_focusable(previous)
        {
            self.document.focus(previous);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            restored = self
                .previous_focus
                .is_some_and(|p| self.document.active_element() == Some(p)),
            "popup closed"
        );
    }
}

fn mount(document: &Document, props: &PopupProps) -> Result<PopupNodes, DomError> {
    let config = &props.config;
    let overlay_close = Rc::clone(&props.on_close);
    let close_on_overlay_click = config.close_on_overlay_click;
    let overlay = document.append(
        document.root(),
        &Element::div().class(class::OVERLAY).on_click(move |event| {
            if close_on_overlay_click && event.target == event.current_target {
                overlay_close();
            }
        }),
    )?;

    match mount_panel(document, overlay, props) {
        Ok(nodes) => Ok(nodes),
        Err(err) => {
            // Undo the partial mount; the overlay is the only root-level node.
            if let Err(_undo) = document.remove(overlay) {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_undo, "partial popup mount already removed");
            }
            Err(err)
        }
    }
}

fn mount_panel(
    document: &Document,
    overlay: NodeId,
    props: &PopupProps,
) -> Result<PopupNodes, DomError> {
    let config = &props.config;

    let mut panel_el = Element::div()
        .class(class::CONTENT)
        .class(&config.class_name)
        .tab_index(-1)
        .attr("role", "dialog")
        .attr("aria-modal", "true");
    if let Some(title) = &config.title {
        panel_el = panel_el.attr("aria-label", title.as_str());
    }
    let panel = document.append(overlay, &panel_el)?;

    let header = document.append(panel, &Element::div().class(class::HEADER))?;
    let title = match &config.title {
        Some(title) => Some(document.append(
            header,
            &Element::heading(title.as_str()).class(class::TITLE),
        )?),
        None => None,
    };
    let close_cb = Rc::clone(&props.on_close);
    let close = document.append(
        header,
        &Element::button("×")
            .class(class::CLOSE)
            .attr("aria-label", config.close_label.as_str())
            .on_click(move |_| close_cb()),
    )?;

    let body = document.append(
        panel,
        &Element::div().class(class::BODY).children(props.content.iter().cloned()),
    )?;

    let footer = document.append(panel, &Element::div().class(class::FOOTER))?;
    let cancel_cb = Rc::clone(&props.on_close);
    let cancel = document.append(
        footer,
        &Element::button(config.cancel_text.as_str())
            .class(class::CANCEL)
            .on_click(move |_| cancel_cb()),
    )?;
    let confirm = match &props.on_confirm {
        Some(on_confirm) => {
            let confirm_cb = Rc::clone(on_confirm);
            Some(document.append(
                footer,
                &Element::button(config.confirm_text.as_str())
                    .class(class::CONFIRM)
                    .on_click(move |_| confirm_cb()),
            )?)
        }
        None => None,
    };

    Ok(PopupNodes {
        overlay,
        panel,
        header,
        title,
        close,
        body,
        footer,
        cancel,
        confirm,
    })
}

fn subscribe_keys(host: &Host, props: &PopupProps, panel: NodeId) -> KeySubscription {
    let document = host.document().downgrade();
    let on_close = Rc::clone(&props.on_close);
    let close_on_escape = props.config.close_on_escape;

    host.keyboard().subscribe(move |dispatch| {
        let key = *dispatch.event();
        if !key.is_press() {
            return;
        }
        match key.code {
            KeyCode::Escape if close_on_escape => {
                dispatch.stop_propagation();
                on_close();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let Some(document) = document.upgrade() else {
                    return;
                };
                if !document.is_connected(panel) {
                    return;
                }
                let scope = FocusScope::collect(&document, panel);
                let active = document.active_element();
                let backward = key.is_back_tab();
                let action = match scope.resolve(active, backward) {
                    TrapAction::PassThrough => {
                        scope.confine(active, document.next_in_tab_order(!backward), backward)
                    }
                    action => action,
                };
                if let TrapAction::MoveTo(target) = action {
                    dispatch.prevent_default();
                    document.focus(target);
                }
            }
            _ => {}
        }
    })
}

/// Modal popup widget.
pub struct Popup {
    props: PopupProps,
    session: Option<OpenSession>,
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("props", &self.props)
            .field("nodes", &self.nodes())
            .finish()
    }
}

impl Popup {
    /// A closed popup.
    pub fn new(props: PopupProps) -> Self {
        Self {
            props,
            session: None,
        }
    }

    pub fn props(&self) -> &PopupProps {
        &self.props
    }

    /// Apply the caller's visibility flag. Only a change of state has an
    /// effect.
    pub fn set_open(&mut self, host: &Host, open: bool) {
        match (open, self.session.is_some()) {
            (true, false) => match OpenSession::open(host, &self.props) {
                Ok(session) => self.session = Some(session),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_err, "popup failed to mount");
                }
            },
            (false, true) => self.session = None,
            _ => {}
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Node handles while open.
    pub fn nodes(&self) -> Option<PopupNodes> {
        self.session.as_ref().map(|s| s.nodes)
    }

    /// End the popup's lifecycle, closing it if open.
    pub fn unmount(self) {
        drop(self);
    }

    /// Renderable view of the popup.
    pub fn view(&self) -> PopupView<'_> {
        PopupView::new(self)
    }

    pub(crate) fn session_parts(&self) -> Option<(&Document, PopupNodes)> {
        self.session.as_ref().map(|s| (&s.document, s.nodes))
    }
}
