#![forbid(unsafe_code)]

//! Window-level pointer listener registry.
//!
//! A drag starts on the draggable surface but its moves and release must be
//! observed anywhere on the page. [`PointerHub`] stands in for the host
//! window: widgets subscribe for a set of [`PointerListenerKinds`] and the
//! host forwards every window event through [`PointerHub::dispatch`].
//!
//! # Invariants
//!
//! 1. Every [`PointerHub::subscribe`] returns a [`ListenerGuard`]; the
//!    registration lives exactly as long as the guard (or until
//!    [`ListenerGuard::release`]).
//! 2. Releasing is idempotent: a second release, or a drop after an explicit
//!    release, is a no-op.
//! 3. Dispatch holds no borrow of the registry while a listener runs, so a
//!    listener may subscribe or release (itself included) during dispatch.
//! 4. A listener released during a dispatch is not invoked for the rest of
//!    that dispatch.
//! 5. Guards outliving the hub release as no-ops.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::{PointerEvent, PointerListenerKinds};

/// Identifier of a hub registration.
pub type ListenerId = u64;

type Callback = Rc<dyn Fn(&PointerEvent)>;

struct Registration {
    id: ListenerId,
    kinds: PointerListenerKinds,
    callback: Callback,
}

#[derive(Default)]
struct HubInner {
    next_id: ListenerId,
    listeners: Vec<Registration>,
}

impl HubInner {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registration| registration.id != id);
        self.listeners.len() != before
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|registration| registration.id == id)
    }
}

/// Single-threaded window-level pointer event source.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for the event kinds in `kinds`.
    ///
    /// The registration is removed when the returned guard is dropped.
    #[must_use = "dropping the guard immediately removes the listener"]
    pub fn subscribe(
        &self,
        kinds: PointerListenerKinds,
        callback: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        inner.next_id = inner.next_id.saturating_add(1);
        let id = inner.next_id;
        inner.listeners.push(Registration {
            id,
            kinds,
            callback: Rc::new(callback),
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(listener_id = id, kinds = ?kinds, "pointer listener subscribed");

        ListenerGuard {
            hub: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Deliver `event` to every listener subscribed to its kind.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let flag = event.kind.listener_kind();
        let targets: Vec<(ListenerId, Callback)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|registration| registration.kinds.intersects(flag))
            .map(|registration| (registration.id, Rc::clone(&registration.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            callback(event);
            delivered += 1;
        }
        delivered
    }

    /// Number of live registrations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Whether registration `id` is still live.
    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.inner.borrow().contains(id)
    }
}

/// RAII handle for one hub registration.
pub struct ListenerGuard {
    hub: Weak<RefCell<HubInner>>,
    id: Option<ListenerId>,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .finish()
    }
}

impl ListenerGuard {
    /// The registration id, or `None` once released.
    #[must_use]
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Remove the registration now.
    ///
    /// Returns `true` if this call removed a live registration.
    pub fn release(&mut self) -> bool {
        let Some(id) = self.id.take() else {
            return false;
        };
        let Some(hub) = self.hub.upgrade() else {
            return false;
        };
        let removed = hub.borrow_mut().remove(id);

        #[cfg(feature = "tracing")]
        tracing::trace!(listener_id = id, removed, "pointer listener released");

        removed
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::event::PointerEventKind;

    fn counter() -> (Rc<Cell<u32>>, impl Fn(&PointerEvent) + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move |_: &PointerEvent| inner.set(inner.get() + 1))
    }

    #[test]
    fn subscribe_and_drop_are_paired() {
        let hub = PointerHub::new();
        let (_, cb) = counter();
        let guard = hub.subscribe(PointerListenerKinds::DRAG_TRACKING, cb);
        assert_eq!(hub.listener_count(), 1);
        drop(guard);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let hub = PointerHub::new();
        let (_, cb) = counter();
        let mut guard = hub.subscribe(PointerListenerKinds::MOUSE_MOVE, cb);
        assert!(guard.is_active());
        assert!(guard.release());
        assert!(!guard.release());
        assert!(!guard.is_active());
        drop(guard);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn dispatch_filters_by_kind() {
        let hub = PointerHub::new();
        let (moves, cb) = counter();
        let _guard = hub.subscribe(PointerListenerKinds::MOUSE_MOVE, cb);

        assert_eq!(hub.dispatch(&PointerEvent::mouse_move(3.0)), 1);
        assert_eq!(hub.dispatch(&PointerEvent::touch_move(3.0)), 0);
        assert_eq!(hub.dispatch(&PointerEvent::mouse_up()), 0);
        assert_eq!(moves.get(), 1);
    }

    #[test]
    fn released_listener_not_invoked() {
        let hub = PointerHub::new();
        let (count, cb) = counter();
        let mut guard = hub.subscribe(PointerListenerKinds::all(), cb);
        guard.release();
        assert_eq!(hub.dispatch(&PointerEvent::mouse_move(0.0)), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listener_may_release_during_dispatch() {
        let hub = PointerHub::new();
        let slot: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));
        let slot_inner = Rc::clone(&slot);
        let guard = hub.subscribe(PointerListenerKinds::MOUSE_UP, move |_| {
            if let Some(mut guard) = slot_inner.borrow_mut().take() {
                guard.release();
            }
        });
        *slot.borrow_mut() = Some(guard);

        assert_eq!(hub.dispatch(&PointerEvent::mouse_up()), 1);
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(hub.dispatch(&PointerEvent::mouse_up()), 0);
    }

    #[test]
    fn guard_outliving_hub_is_noop() {
        let hub = PointerHub::new();
        let (_, cb) = counter();
        let mut guard = hub.subscribe(PointerListenerKinds::TOUCH_END, cb);
        drop(hub);
        assert!(!guard.release());
    }

    #[test]
    fn clones_share_registry() {
        let hub = PointerHub::new();
        let window = hub.clone();
        let (count, cb) = counter();
        let guard = hub.subscribe(PointerListenerKinds::TOUCH_MOVE, cb);
        assert!(window.is_registered(guard.id().unwrap()));
        window.dispatch(&PointerEvent::touch(PointerEventKind::TouchMove, Vec::new()));
        assert_eq!(count.get(), 1);
    }
}
