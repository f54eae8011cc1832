#![forbid(unsafe_code)]

//! Document-wide keyboard stream.
//!
//! [`KeyboardHub`] is the single place where key events enter the host.
//! Listeners register with [`KeyboardHub::subscribe`] and receive every key
//! event in registration order; each listener sees a [`KeyDispatch`] through
//! which it can stop propagation or suppress the host's default action.
//!
//! # Invariants
//!
//! 1. Listeners are called in registration order.
//! 2. Dropping (or releasing) a [`KeySubscription`] removes the listener
//!    before the next dispatch, and also skips it for the remainder of a
//!    dispatch already in progress.
//! 3. No `RefCell` borrow is held while a listener runs, so listeners may
//!    subscribe, release, or dispatch re-entrantly.
//! 4. `stop_propagation` marks the event as not propagating beyond the
//!    current target; peer listeners on the hub still run.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use popup_core::event::KeyEvent;

type Listener = Rc<dyn Fn(&mut KeyDispatch)>;

struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Shared handle to the keyboard listener registry.
#[derive(Clone)]
pub struct KeyboardHub {
    inner: Rc<RefCell<Registry>>,
}

impl Default for KeyboardHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays active until the returned guard is
    /// released or dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl Fn(&mut KeyDispatch) + 'static) -> KeySubscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));
        tracing::debug!(
            listener = id,
            active = registry.listeners.len(),
            "key listener registered"
        );
        KeySubscription {
            registry: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Deliver a key event to every listener.
    pub fn dispatch(&self, event: KeyEvent) -> KeyOutcome {
        let snapshot: Vec<(u64, Listener)> = self.inner.borrow().listeners.clone();
        let mut dispatch = KeyDispatch {
            event,
            propagation_stopped: false,
            default_prevented: false,
        };
        let mut called = 0;
        for (id, listener) in snapshot {
            let still_registered = self
                .inner
                .borrow()
                .listeners
                .iter()
                .any(|(other, _)| *other == id);
            if !still_registered {
                continue;
            }
            listener(&mut dispatch);
            called += 1;
        }
        KeyOutcome {
            propagation_stopped: dispatch.propagation_stopped,
            default_prevented: dispatch.default_prevented,
            listeners: called,
        }
    }
}

/// RAII guard for a keyboard listener.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct KeySubscription {
    registry: Weak<RefCell<Registry>>,
    id: Option<u64>,
}

impl KeySubscription {
    /// Unregister now. Later calls (and the eventual drop) do nothing.
    pub fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.borrow_mut();
            registry.listeners.retain(|(other, _)| *other != id);
            tracing::debug!(
                listener = id,
                active = registry.listeners.len(),
                "key listener released"
            );
        }
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        match (self.id, self.registry.upgrade()) {
            (Some(id), Some(registry)) => {
                registry.borrow().listeners.iter().any(|(other, _)| *other == id)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for KeySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySubscription")
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// A key event in flight, as seen by one listener.
#[derive(Debug)]
pub struct KeyDispatch {
    event: KeyEvent,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl KeyDispatch {
    #[inline]
    pub fn event(&self) -> &KeyEvent {
        &self.event
    }

    /// Keep the event from reaching handlers beyond the hub.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Suppress the host's default action for this key.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of [`KeyboardHub::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub propagation_stopped: bool,
    pub default_prevented: bool,
    /// How many listeners ran.
    pub listeners: usize,
}

impl KeyOutcome {
    /// Whether the event continues past the hub.
    #[inline]
    pub fn propagates(&self) -> bool {
        !self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popup_core::event::KeyCode;
    use std::cell::Cell;
    use tracing_test::traced_test;

    #[test]
    fn listeners_run_in_registration_order() {
        let hub = KeyboardHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        let _a = hub.subscribe(move |_| l1.borrow_mut().push("a"));
        let _b = hub.subscribe(move |_| l2.borrow_mut().push("b"));
        let outcome = hub.dispatch(KeyEvent::new(KeyCode::Enter));
        assert_eq!(*log.borrow(), ["a", "b"]);
        assert_eq!(outcome.listeners, 2);
        assert!(outcome.propagates());
    }

    #[test]
    fn drop_unsubscribes() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = hub.subscribe(move |_| h.set(h.get() + 1));
        assert!(sub.is_active());
        hub.dispatch(KeyEvent::new(KeyCode::Escape));
        drop(sub);
        hub.dispatch(KeyEvent::new(KeyCode::Escape));
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let hub = KeyboardHub::new();
        let mut sub = hub.subscribe(|_| {});
        let _other = hub.subscribe(|_| {});
        sub.release();
        sub.release();
        assert!(!sub.is_active());
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = KeyboardHub::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn flags_are_reported() {
        let hub = KeyboardHub::new();
        let _sub = hub.subscribe(|d| {
            if d.event().code == KeyCode::Escape {
                d.stop_propagation();
            } else {
                d.prevent_default();
            }
        });
        let esc = hub.dispatch(KeyEvent::new(KeyCode::Escape));
        assert!(esc.propagation_stopped && !esc.default_prevented);
        let tab = hub.dispatch(KeyEvent::new(KeyCode::Tab));
        assert!(!tab.propagation_stopped && tab.default_prevented);
    }

    #[test]
    fn stop_propagation_does_not_skip_peers() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _a = hub.subscribe(|d| d.stop_propagation());
        let _b = hub.subscribe(move |_| h.set(h.get() + 1));
        hub.dispatch(KeyEvent::new(KeyCode::Escape));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_released_mid_dispatch_is_skipped() {
        let hub = KeyboardHub::new();
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<KeySubscription>>> = Rc::new(RefCell::new(None));
        let s = Rc::clone(&slot);
        let _first = hub.subscribe(move |_| {
            s.borrow_mut().take();
        });
        let h = Rc::clone(&hits);
        *slot.borrow_mut() = Some(hub.subscribe(move |_| h.set(h.get() + 1)));
        let outcome = hub.dispatch(KeyEvent::new(KeyCode::Char('x')));
        assert_eq!(hits.get(), 0);
        assert_eq!(outcome.listeners, 1);
    }

    #[test]
    fn listener_may_subscribe_during_dispatch() {
        let hub = KeyboardHub::new();
        let held = Rc::new(RefCell::new(Vec::new()));
        let hub2 = hub.clone();
        let held2 = Rc::clone(&held);
        let _sub = hub.subscribe(move |_| {
            held2.borrow_mut().push(hub2.subscribe(|_| {}));
        });
        let outcome = hub.dispatch(KeyEvent::new(KeyCode::Enter));
        assert_eq!(outcome.listeners, 1);
        assert_eq!(hub.listener_count(), 2);
    }

    #[traced_test]
    #[test]
    fn registration_is_logged() {
        let hub = KeyboardHub::new();
        let sub = hub.subscribe(|_| {});
        drop(sub);
        assert!(logs_contain("key listener registered"));
        assert!(logs_contain("key listener released"));
    }
}
