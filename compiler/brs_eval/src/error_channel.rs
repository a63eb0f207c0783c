//! Observable stream of raised runtime errors.
//!
//! Subscribers see every error at the moment it is raised, including the
//! ones a try block later catches.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use brs_values::RuntimeError;

type Handler = Rc<dyn Fn(&RuntimeError)>;

struct Entry {
    id: u64,
    once: bool,
    handler: Handler,
}

type Entries = Rc<RefCell<Vec<Entry>>>;

/// Error event broadcaster.
#[derive(Default)]
pub struct ErrorChannel {
    entries: Entries,
    next_id: Cell<u64>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        ErrorChannel::default()
    }

    fn add(&self, handler: Handler, once: bool) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.entries.borrow_mut().push(Entry { id, once, handler });
        id
    }

    /// Calls `handler` for every error until the subscription is dropped.
    pub fn subscribe(&self, handler: impl Fn(&RuntimeError) + 'static) -> ErrorSubscription {
        let id = self.add(Rc::new(handler), false);
        ErrorSubscription {
            entries: Rc::downgrade(&self.entries),
            id,
        }
    }

    /// Calls `handler` for the next error only.
    pub fn subscribe_once(&self, handler: impl Fn(&RuntimeError) + 'static) {
        self.add(Rc::new(handler), true);
    }

    /// Delivers `err` to every subscriber.
    ///
    /// Handlers run on a snapshot, so they may subscribe or unsubscribe.
    pub fn emit(&self, err: &RuntimeError) {
        let handlers: Vec<Handler> = {
            let mut entries = self.entries.borrow_mut();
            let snapshot = entries.iter().map(|entry| Rc::clone(&entry.handler)).collect();
            entries.retain(|entry| !entry.once);
            snapshot
        };
        for handler in handlers {
            handler(err);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Live subscription; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct ErrorSubscription {
    entries: Weak<RefCell<Vec<Entry>>>,
    id: u64,
}

impl ErrorSubscription {
    /// Unsubscribes now.
    pub fn dispose(self) {}
}

impl Drop for ErrorSubscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.borrow_mut().retain(|entry| entry.id != self.id);
        }
    }
}
