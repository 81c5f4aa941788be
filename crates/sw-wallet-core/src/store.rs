//! Observable state cell shared between controllers and the renderer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_id: Cell<u64>,
}

/// Single-threaded value with change notification.
///
/// Subscribers receive a snapshot taken after the update, so they may read
/// or update the store again from inside the callback.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Mutate the value and notify every subscriber.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.inner.value.borrow_mut());
        self.notify();
        result
    }

    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    fn notify(&self) {
        let snapshot = self.get();
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_subscribers_with_updated_value() {
        let store = Store::new(1u32);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |value| sink.borrow_mut().push(*value));

        store.update(|value| *value += 1);
        store.unsubscribe(id);
        store.update(|value| *value += 1);

        assert_eq!(*seen.borrow(), vec![2]);
        assert_eq!(store.get(), 3);
    }

    #[test]
    fn subscriber_may_read_store() {
        let store = Store::new(String::from("a"));
        let reader = store.clone();
        let seen = Rc::new(RefCell::new(String::new()));

        let sink = Rc::clone(&seen);
        store.subscribe(move |_| *sink.borrow_mut() = reader.get());
        store.update(|value| value.push('b'));

        assert_eq!(*seen.borrow(), "ab");
    }
}
