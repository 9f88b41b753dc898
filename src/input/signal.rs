//! Synchronous observer registry
//!
//! Listeners are called in registration order on the emitting thread. The
//! listener list is snapshotted before dispatch, so a listener may connect or
//! disconnect (itself included) while a notification is being delivered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Identifies one registration on a [`Signal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

pub struct Signal<T> {
    name: &'static str,
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn connect(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        debug!("Listener {:?} connected to '{}'", id, self.name);
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = listeners.len() != before;
        if removed {
            debug!("Listener {:?} disconnected from '{}'", id, self.name);
        }
        removed
    }

    /// Delivers `value` to every listener and returns how many were called
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(value);
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_registration_order() {
        let signal = Signal::<u32>::new("test");
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            signal.connect(move |value| log.borrow_mut().push(format!("{tag}:{value}")));
        }

        assert_eq!(signal.emit(&7), 3);
        assert_eq!(*log.borrow(), vec!["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn disconnected_listener_is_not_called() {
        let signal = Signal::<()>::new("test");
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let id = signal.connect(move |_| counter.set(counter.get() + 1));
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));

        assert_eq!(signal.emit(&()), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn listener_may_disconnect_during_dispatch() {
        let signal = Rc::new(Signal::<()>::new("test"));
        let own_id = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&signal);
        let id_slot = Rc::clone(&own_id);
        let counter = Rc::clone(&hits);
        let id = signal.connect(move |_| {
            counter.set(counter.get() + 1);
            if let (Some(signal), Some(id)) = (weak.upgrade(), id_slot.get()) {
                signal.disconnect(id);
            }
        });
        own_id.set(Some(id));

        signal.emit(&());
        signal.emit(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.listener_count(), 0);
    }
}
