#![forbid(unsafe_code)]

//! Connection-list primitive shared by every signal arity.
//!
//! # Design
//!
//! A [`SignalCore`] keeps an ordered list of listener entries plus a blocked
//! flag. Entries hold either a strong `Rc` (listener with no owner) or a
//! `Weak` (owner-retained listener whose strong reference lives in the
//! [`LifetimeRegistry`](crate::registry::LifetimeRegistry)). Dead weak
//! entries are culled lazily during emit.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in insertion order.
//! 2. `emit` snapshots the listener list before invoking anything, so a
//!    listener that mutates the list mid-emit cannot affect delivery to
//!    listeners already snapshotted. Listeners added mid-emit run on the
//!    next emit only.
//! 3. A blocked core invokes nobody; unblocking restores delivery without
//!    re-registration.
//! 4. Removing an absent listener and severing an already-severed
//!    [`Connection`] are no-ops.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::args::SignalArgs;

/// Identity key for a registered listener.
///
/// Two keys are equal when they refer to the same `Rc` allocation, which is
/// how listener removal finds its first match. The key of a unit-adapted
/// listener is the identity of the *original* zero-argument callable, so
/// removing the original removes exactly its adapter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ListenerKey(*const ());

impl ListenerKey {
    /// Key for the given listener allocation.
    #[must_use]
    pub fn of<T: ?Sized>(listener: &Rc<T>) -> Self {
        Self(Rc::as_ptr(listener).cast())
    }
}

enum Slot<A: SignalArgs> {
    /// The core holds the strong reference (listener without an owner).
    Strong(Rc<A::Callback>),
    /// Owner-retained; the core only observes the listener.
    Retained(Weak<A::Callback>),
}

impl<A: SignalArgs> Slot<A> {
    fn upgrade(&self) -> Option<Rc<A::Callback>> {
        match self {
            Slot::Strong(rc) => Some(Rc::clone(rc)),
            Slot::Retained(weak) => weak.upgrade(),
        }
    }

    fn is_live(&self) -> bool {
        match self {
            Slot::Strong(_) => true,
            Slot::Retained(weak) => weak.strong_count() > 0,
        }
    }
}

struct Entry<A: SignalArgs> {
    id: u64,
    key: ListenerKey,
    slot: Slot<A>,
}

struct CoreState<A: SignalArgs> {
    entries: Vec<Entry<A>>,
    blocked: bool,
    next_entry: u64,
}

/// Severing surface a [`Connection`] holds onto, erased over the argument
/// tuple so connections from signals of different arities can live in one
/// retained list.
trait ConnectionTarget {
    fn sever(&self, entry: u64);
    fn entry_live(&self, entry: u64) -> bool;
}

impl<A: SignalArgs> ConnectionTarget for RefCell<CoreState<A>> {
    fn sever(&self, entry: u64) {
        let mut state = self.borrow_mut();
        if let Some(pos) = state.entries.iter().position(|e| e.id == entry) {
            state.entries.remove(pos);
        }
    }

    fn entry_live(&self, entry: u64) -> bool {
        self.borrow()
            .entries
            .iter()
            .any(|e| e.id == entry && e.slot.is_live())
    }
}

/// Handle to one registration in one [`SignalCore`].
///
/// Cloning yields another handle to the same registration. Severing is
/// idempotent; a handle whose core has been dropped is inert.
#[derive(Clone)]
pub struct Connection {
    target: Weak<dyn ConnectionTarget>,
    entry: u64,
}

impl Connection {
    /// Remove the registration this handle refers to. No-op if already
    /// severed or if the core no longer exists.
    pub fn disconnect(&self) {
        if let Some(target) = self.target.upgrade() {
            target.sever(self.entry);
        }
    }

    /// Whether the registration is still present and its listener alive.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|target| target.entry_live(self.entry))
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("entry", &self.entry)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Ordered listener list with block state and snapshot-based fan-out.
pub struct SignalCore<A: SignalArgs> {
    state: Rc<RefCell<CoreState<A>>>,
}

impl<A: SignalArgs> Clone for SignalCore<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: SignalArgs> Default for SignalCore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SignalArgs> SignalCore<A> {
    /// Create an empty, unblocked core.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(CoreState {
                entries: Vec::new(),
                blocked: false,
                next_entry: 0,
            })),
        }
    }

    fn push(&self, key: ListenerKey, slot: Slot<A>) -> Connection {
        let mut state = self.state.borrow_mut();
        let id = state.next_entry;
        state.next_entry += 1;
        state.entries.push(Entry { id, key, slot });
        Connection {
            target: Rc::<RefCell<CoreState<A>>>::downgrade(&self.state),
            entry: id,
        }
    }

    /// Register a listener the core keeps alive itself. Duplicates are
    /// permitted and preserve insertion order.
    pub fn add(&self, listener: Rc<A::Callback>) -> Connection {
        self.add_keyed(ListenerKey::of(&listener), listener)
    }

    /// Register a listener under an explicit identity key (used by
    /// unit-listener adapters, whose key is the original callable).
    pub fn add_keyed(&self, key: ListenerKey, listener: Rc<A::Callback>) -> Connection {
        self.push(key, Slot::Strong(listener))
    }

    /// Register a listener whose strong reference is retained elsewhere
    /// (the owner's registry entry). The core holds only a weak reference;
    /// once the owner is disposed the entry is culled lazily.
    pub fn add_retained(&self, key: ListenerKey, listener: &Rc<A::Callback>) -> Connection {
        self.push(key, Slot::Retained(Rc::downgrade(listener)))
    }

    /// Remove the first entry registered under `key`. Returns whether an
    /// entry was removed; removing an absent listener is not an error.
    pub fn remove(&self, key: ListenerKey) -> bool {
        let mut state = self.state.borrow_mut();
        if let Some(pos) = state.entries.iter().position(|e| e.key == key) {
            state.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Invoke every live listener, in insertion order, with `args`.
    ///
    /// No-op when blocked. The listener list is snapshotted before any
    /// listener runs; re-entrant add/remove/disconnect affects later emits
    /// only.
    pub fn emit(&self, args: A) {
        let snapshot: Vec<Rc<A::Callback>> = {
            let mut state = self.state.borrow_mut();
            if state.blocked {
                return;
            }
            state.entries.retain(|e| e.slot.is_live());
            state.entries.iter().filter_map(|e| e.slot.upgrade()).collect()
        };
        for listener in snapshot {
            A::call(&listener, args.clone());
        }
    }

    /// Suppress (or restore) delivery. Registrations are untouched.
    pub fn set_blocked(&self, blocked: bool) {
        self.state.borrow_mut().blocked = blocked;
    }

    /// Whether emits are currently suppressed.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.state.borrow().blocked
    }

    /// Whether at least one live listener is registered.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.borrow().entries.iter().any(|e| e.slot.is_live())
    }

    /// Number of live listener entries.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.slot.is_live())
            .count()
    }
}

impl<A: SignalArgs> fmt::Debug for SignalCore<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SignalCore")
            .field("entries", &state.entries.len())
            .field("blocked", &state.blocked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn counting_listener(log: &Rc<RefCell<Vec<i32>>>, tag: i32) -> Rc<dyn Fn(i32)> {
        let log = Rc::clone(log);
        Rc::new(move |v| log.borrow_mut().push(tag * 1000 + v))
    }

    #[test]
    fn add_then_emit_invokes_once_with_args() {
        let core: SignalCore<(i32,)> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = counting_listener(&log, 1);
        core.add(listener);
        assert!(core.is_connected());
        core.emit((42,));
        assert_eq!(*log.borrow(), vec![1042]);
    }

    #[test]
    fn insertion_order_preserved() {
        let core: SignalCore<(i32,)> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        core.add(counting_listener(&log, 1));
        core.add(counting_listener(&log, 2));
        core.add(counting_listener(&log, 3));
        core.emit((7,));
        assert_eq!(*log.borrow(), vec![1007, 2007, 3007]);
    }

    #[test]
    fn remove_first_match_only() {
        let core: SignalCore<(i32,)> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let dup = counting_listener(&log, 1);
        core.add(Rc::clone(&dup));
        core.add(Rc::clone(&dup));
        assert_eq!(core.live_count(), 2);
        assert!(core.remove(ListenerKey::of(&dup)));
        assert_eq!(core.live_count(), 1);
        core.emit((5,));
        assert_eq!(*log.borrow(), vec![1005]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let core: SignalCore<(i32,)> = SignalCore::new();
        let stray: Rc<dyn Fn(i32)> = Rc::new(|_| {});
        assert!(!core.remove(ListenerKey::of(&stray)));
    }

    #[test]
    fn blocked_emits_nobody_and_unblock_restores() {
        let core: SignalCore<(i32,)> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        core.add(counting_listener(&log, 1));
        core.set_blocked(true);
        assert!(core.is_blocked());
        core.emit((1,));
        assert!(log.borrow().is_empty());
        core.set_blocked(false);
        core.emit((2,));
        assert_eq!(*log.borrow(), vec![1002]);
    }

    #[test]
    fn connection_disconnect_is_idempotent() {
        let core: SignalCore<()> = SignalCore::new();
        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let conn = core.add(Rc::new(move || *hits2.borrow_mut() += 1));
        assert!(conn.is_connected());
        conn.disconnect();
        assert!(!conn.is_connected());
        conn.disconnect();
        core.emit(());
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn connection_outliving_core_is_inert() {
        let conn = {
            let core: SignalCore<()> = SignalCore::new();
            core.add(Rc::new(|| {}))
        };
        assert!(!conn.is_connected());
        conn.disconnect();
    }

    #[test]
    fn listener_removing_itself_mid_emit_does_not_corrupt_delivery() {
        let core: SignalCore<()> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        let self_conn: Rc<RefCell<Option<Connection>>> = Rc::new(RefCell::new(None));
        let self_conn2 = Rc::clone(&self_conn);
        let first = core.add(Rc::new(move || {
            log1.borrow_mut().push("first");
            if let Some(conn) = self_conn2.borrow().as_ref() {
                conn.disconnect();
            }
        }));
        *self_conn.borrow_mut() = Some(first);

        let log2 = Rc::clone(&log);
        core.add(Rc::new(move || log2.borrow_mut().push("second")));

        core.emit(());
        // Both ran: "second" was already snapshotted when "first" removed itself.
        assert_eq!(*log.borrow(), vec!["first", "second"]);

        core.emit(());
        assert_eq!(*log.borrow(), vec!["first", "second", "second"]);
    }

    #[test]
    fn listener_added_mid_emit_runs_next_time() {
        let core: SignalCore<()> = SignalCore::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let core2 = core.clone();
        let log1 = Rc::clone(&log);
        core.add(Rc::new(move || {
            log1.borrow_mut().push("outer");
            let log_inner = Rc::clone(&log1);
            core2.add(Rc::new(move || log_inner.borrow_mut().push("inner")));
        }));

        core.emit(());
        assert_eq!(*log.borrow(), vec!["outer"]);

        core.emit(());
        assert_eq!(*log.borrow(), vec!["outer", "outer", "inner"]);
    }

    #[test]
    fn retained_slot_dies_with_its_strong_ref() {
        let core: SignalCore<()> = SignalCore::new();
        let hits = Rc::new(RefCell::new(0));
        let hits2 = Rc::clone(&hits);
        let listener: Rc<dyn Fn()> = Rc::new(move || *hits2.borrow_mut() += 1);
        core.add_retained(ListenerKey::of(&listener), &listener);
        assert!(core.is_connected());
        core.emit(());
        assert_eq!(*hits.borrow(), 1);

        drop(listener);
        assert!(!core.is_connected());
        core.emit(());
        assert_eq!(*hits.borrow(), 1);
    }
}
