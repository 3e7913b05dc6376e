//! Synchronous change notification.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Nested notification rounds allowed before further rounds are dropped.
pub const MAX_NOTIFY_DEPTH: u32 = 8;

/// Receives a call after every register mutation. Read the new state through the
/// register or field the observer captured.
pub trait Observer {
    fn notify(&self);
}

impl<F: Fn()> Observer for F {
    fn notify(&self) {
        self()
    }
}

/// Handle returned by registration, used to unregister later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Observers in registration order.
///
/// All methods take `&self` so observers may register, unregister or trigger another
/// round while being notified. A round works on a copy of the list taken when it starts.
#[derive(Default)]
pub struct ObserverList {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ObserverId, Rc<dyn Observer>)>>,
    depth: Cell<u32>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `observer`. The same observer registered twice is notified twice.
    pub fn register(&self, observer: Rc<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, observer));
        id
    }

    /// Removes the observer registered under `id`. Returns false if it was not registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Calls every observer in registration order on the current thread.
    pub fn notify_all(&self) {
        let depth = self.depth.get();
        if depth >= MAX_NOTIFY_DEPTH {
            log::warn!(target: "regcalc", "observer recursion deeper than {MAX_NOTIFY_DEPTH} rounds, dropping notification");
            return;
        }

        let round: Vec<Rc<dyn Observer>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();

        log::trace!(target: "regcalc", "notifying {} observer(s) at depth {depth}", round.len());

        self.depth.set(depth + 1);
        for observer in round {
            observer.notify();
        }
        self.depth.set(depth);
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("len", &self.len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Rc<dyn Observer>) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        (count, Rc::new(move || seen.set(seen.get() + 1)))
    }

    #[test]
    fn test_notify_in_registration_order() {
        let list = ObserverList::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            list.register(Rc::new(move || log.borrow_mut().push(name)));
        }

        list.notify_all();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_deduplication() {
        let list = ObserverList::new();
        let (count, observer) = counter();

        let first = list.register(Rc::clone(&observer));
        list.register(observer);
        list.notify_all();
        assert_eq!(count.get(), 2);

        assert!(list.unregister(first));
        list.notify_all();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_unregister_unknown() {
        let list = ObserverList::new();
        let (_, observer) = counter();
        let id = list.register(observer);
        assert!(list.unregister(id));
        assert!(!list.unregister(id));
        assert!(list.is_empty());
    }

    #[test]
    fn test_recursion_is_bounded() {
        let list = Rc::new(ObserverList::new());
        let count = Rc::new(Cell::new(0u32));

        let inner = Rc::clone(&list);
        let seen = Rc::clone(&count);
        list.register(Rc::new(move || {
            seen.set(seen.get() + 1);
            inner.notify_all();
        }));

        list.notify_all();
        assert_eq!(count.get(), MAX_NOTIFY_DEPTH);
        assert_eq!(list.depth.get(), 0);
    }
}
