//! Reactive value container
//!
//! A `Writable<T>` holds one value and a list of subscribers. Every `set`
//! broadcasts the new value to all subscribers synchronously, in the order
//! they subscribed. Handles are cheap to clone and share the same value.
//!
//! Single-threaded by construction (`Rc` + `RefCell`), so the type is
//! neither `Send` nor `Sync`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
}

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
    next_id: Cell<u64>,
    /// Values set from inside a callback, applied once the current broadcast ends
    pending: RefCell<VecDeque<T>>,
    broadcasting: Cell<bool>,
}

impl<T> Inner<T> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }

    fn remove(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|s| s.id != id);
    }
}

/// Ends a batch: clears the broadcasting flag and drops values queued by a
/// callback that panicked
struct BroadcastGuard<'a, T>(&'a Inner<T>);

impl<T> Drop for BroadcastGuard<'_, T> {
    fn drop(&mut self) {
        self.0.broadcasting.set(false);
        if let Ok(mut pending) = self.0.pending.try_borrow_mut() {
            pending.clear();
        }
    }
}

/// Shared reactive value with synchronous change notification
pub struct Writable<T> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Writable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                broadcasting: Cell::new(false),
            }),
        }
    }

    /// Clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and notify every subscriber.
    ///
    /// Notification is unconditional, an equal value is still broadcast.
    /// Called from inside a subscriber, the value is queued and broadcast
    /// after the current round finishes.
    pub fn set(&self, value: T) {
        self.batch(|| self.inner.pending.borrow_mut().push_back(value));
    }

    /// Compute a new value from the current one, then `set` it. A `set`
    /// made inside `f` is queued ahead of the computed value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.batch(|| {
            let next = f(&self.inner.value.borrow());
            self.inner.pending.borrow_mut().push_back(next);
        });
    }

    /// Register a callback. It runs immediately with the current value and
    /// again after every `set`, until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    pub fn subscribe(&self, f: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let callback: Callback<T> = Rc::new(RefCell::new(f));
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::clone(&callback),
        });
        log::debug!("subscriber {} added ({} total)", id, self.subscriber_count());

        self.batch(|| (&mut *callback.borrow_mut())(&self.inner.value.borrow()));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
                log::debug!("subscriber {} removed", id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Run `f` with writes queued, then apply and broadcast the queue.
    /// Nested inside a running batch, `f` just runs and its writes join the
    /// outer queue.
    fn batch(&self, f: impl FnOnce()) {
        if self.inner.broadcasting.get() {
            f();
            return;
        }

        self.inner.broadcasting.set(true);
        let _guard = BroadcastGuard(&*self.inner);
        f();
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            *self.inner.value.borrow_mut() = next;
            self.broadcast();
        }
    }

    fn broadcast(&self) {
        // Snapshot so callbacks may subscribe or unsubscribe mid-broadcast
        let snapshot: Vec<(u64, Callback<T>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, Rc::clone(&s.callback)))
            .collect();

        for (id, callback) in snapshot {
            if !self.inner.is_subscribed(id) {
                continue;
            }
            let value = self.inner.value.borrow();
            (&mut *callback.borrow_mut())(&value);
        }
    }
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + 'static> Default for Writable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// Handle to an active subscription.
///
/// Dropping it unsubscribes. Use [`Subscription::detach`] to keep the
/// callback registered for the lifetime of the store.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }

    /// Keep the callback registered without holding the handle
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |v: &T| sink.borrow_mut().push(v.clone()))
    }

    #[test]
    fn test_subscribe_receives_current_value() {
        let store = Writable::new(7);
        let (seen, f) = recorder::<i32>();
        let _sub = store.subscribe(f);
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn test_set_notifies_all_subscribers_in_order() {
        let store = Writable::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _a = store.subscribe(move |v: &i32| o1.borrow_mut().push(("a", *v)));
        let o2 = Rc::clone(&order);
        let _b = store.subscribe(move |v: &i32| o2.borrow_mut().push(("b", *v)));

        order.borrow_mut().clear();
        store.set(5);
        assert_eq!(*order.borrow(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn test_equal_value_still_notifies() {
        let store = Writable::new(3);
        let (seen, f) = recorder::<i32>();
        let _sub = store.subscribe(f);
        store.set(3);
        assert_eq!(*seen.borrow(), vec![3, 3]);
    }

    #[test]
    fn test_update_uses_current_value() {
        let store = Writable::new(10);
        store.update(|v| v * 2);
        assert_eq!(store.get(), 20);
    }

    #[test]
    fn test_clones_share_value() {
        let a = Writable::new(String::from("x"));
        let b = a.clone();
        b.set("y".to_string());
        assert_eq!(a.get(), "y");
        assert_eq!(a.with(|s| s.len()), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        let sub = store.subscribe(f);
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
        store.set(1);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_detach_keeps_subscriber() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        store.subscribe(f).detach();
        store.set(1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped_is_noop() {
        let store = Writable::new(0);
        let sub = store.subscribe(|_| {});
        drop(store);
        sub.unsubscribe();
    }

    #[test]
    fn test_set_from_callback_is_queued() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        let _log = store.subscribe(f);

        let handle = store.clone();
        let _bump = store.subscribe(move |v: &i32| {
            if *v == 1 {
                handle.set(2);
            }
        });

        store.set(1);
        assert_eq!(store.get(), 2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_set_from_initial_subscribe_call_is_queued() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        let _log = store.subscribe(f);

        let handle = store.clone();
        let _init = store.subscribe(move |v: &i32| {
            if *v == 0 {
                handle.set(1);
            }
        });

        assert_eq!(store.get(), 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_update_closure_may_set() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        let _log = store.subscribe(f);

        let handle = store.clone();
        store.update(|v| {
            handle.set(5);
            v + 1
        });

        assert_eq!(store.get(), 1);
        assert_eq!(*seen.borrow(), vec![0, 5, 1]);
    }

    #[test]
    fn test_update_from_callback() {
        let store = Writable::new(0);
        let handle = store.clone();
        let _inc = store.subscribe(move |v: &i32| {
            if *v < 3 {
                handle.update(|v| v + 1);
            }
        });
        assert_eq!(store.get(), 3);
    }

    #[test]
    fn test_panicking_callback_drops_queued_values() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();
        let _log = store.subscribe(f);

        let handle = store.clone();
        let _boom = store.subscribe(move |v: &i32| {
            if *v == 1 {
                handle.set(2);
                panic!("subscriber failed");
            }
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.set(1)));
        assert!(result.is_err());

        store.set(3);
        assert_eq!(store.get(), 3);
        assert_eq!(*seen.borrow(), vec![0, 1, 3]);
    }

    #[test]
    fn test_unsubscribe_during_broadcast() {
        let store = Writable::new(0);
        let (seen, f) = recorder::<i32>();

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&victim);
        let _killer = store.subscribe(move |v: &i32| {
            if *v == 1 {
                drop(slot.borrow_mut().take());
            }
        });
        *victim.borrow_mut() = Some(store.subscribe(f));

        store.set(1);
        assert_eq!(*seen.borrow(), vec![0]);
        assert_eq!(store.subscriber_count(), 1);
    }
}
