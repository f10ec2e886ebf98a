//! Observable state cells.
//!
//! Coordinator fields and navigation paths live in an [`Observable`].
//! Every mutation goes through it and notifies subscribers, which is the
//! explicit invalidation hosts use to re-derive views.

use std::fmt;

use tokio::sync::watch;

/// A single value with change notification.
pub struct Observable<T> {
    tx: watch::Sender<T>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Replace the value, notifying subscribers only if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Mutate in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Mutate in place; `f` returns whether subscribers should be notified.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&*self.tx.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_marks_subscribers_changed() {
        let value = Observable::new(1);
        let mut rx = value.subscribe();
        assert!(!rx.has_changed().unwrap());

        value.update(|v| *v += 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[test]
    fn set_if_changed_skips_equal_values() {
        let value = Observable::new(String::from("a"));
        let mut rx = value.subscribe();

        assert!(!value.set_if_changed("a".to_string()));
        assert!(!rx.has_changed().unwrap());

        assert!(value.set_if_changed("b".to_string()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "b");
    }

    #[test]
    fn works_without_subscribers() {
        let value = Observable::new(0);
        value.set(5);
        value.update(|v| *v *= 2);
        assert_eq!(value.get(), 10);
        assert_eq!(value.with(|v| *v + 1), 11);
    }
}
