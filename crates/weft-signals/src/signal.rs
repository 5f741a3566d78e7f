#![forbid(unsafe_code)]

//! Typed signal facade over [`SignalCore`].
//!
//! A [`Signal`] remembers its concrete argument tuple and lazily allocates
//! its core, so an unused signal costs one empty `Option`. Listeners with an
//! owner are retained through the [`LifetimeRegistry`] and severed when the
//! owner is disposed; listeners without an owner are kept alive by the
//! signal itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::args::SignalArgs;
use crate::core::{Connection, ListenerKey, SignalCore};
use crate::registry::{LifetimeRegistry, ObjectId};

/// Typed publish point fanning out to registered listeners.
///
/// The argument tuple `A` fixes the arity: `Signal<()>` emits no arguments,
/// `Signal<(i32, String)>` emits two, up to six. Emitting on a signal with
/// no listeners is a no-op.
pub struct Signal<A: SignalArgs> {
    core: RefCell<Option<SignalCore<A>>>,
}

impl<A: SignalArgs> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SignalArgs> Signal<A> {
    /// Create a signal with no allocated core.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: RefCell::new(None),
        }
    }

    /// The core, allocating it on first use.
    fn bind(&self) -> SignalCore<A> {
        self.core
            .borrow_mut()
            .get_or_insert_with(SignalCore::new)
            .clone()
    }

    fn bound(&self) -> Option<SignalCore<A>> {
        self.core.borrow().clone()
    }

    /// Whether a core has been allocated (any listener was ever added or
    /// the signal was blocked).
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.core.borrow().is_some()
    }

    /// Register a listener held alive by the signal itself.
    ///
    /// Keep a clone of the `Rc` to remove the listener later via
    /// [`disconnect`](Self::disconnect); otherwise use the returned
    /// [`Connection`].
    pub fn connect(&self, listener: Rc<A::Callback>) -> Connection {
        #[cfg(feature = "tracing")]
        tracing::trace!(bound = self.is_bound(), "signal connect");
        self.bind().add(listener)
    }

    /// Register a listener whose lifetime is bounded by `owner`.
    ///
    /// The registry retains the strong reference; the signal observes it
    /// weakly. Disposing `owner` severs the registration.
    pub fn connect_to(
        &self,
        registry: &LifetimeRegistry,
        owner: ObjectId,
        listener: Rc<A::Callback>,
    ) -> Connection {
        let connection = self
            .bind()
            .add_retained(ListenerKey::of(&listener), &listener);
        registry.retain(owner, Box::new(listener), connection.clone());
        connection
    }

    /// Register a zero-argument listener behind an argument-discarding
    /// adapter. [`disconnect_unit`](Self::disconnect_unit) with the same
    /// callable removes exactly this adapter.
    pub fn connect_unit(&self, listener: Rc<dyn Fn()>) -> Connection {
        let key = ListenerKey::of(&listener);
        self.bind().add_keyed(key, A::adapt_unit(listener))
    }

    /// Owner-bounded variant of [`connect_unit`](Self::connect_unit).
    pub fn connect_unit_to(
        &self,
        registry: &LifetimeRegistry,
        owner: ObjectId,
        listener: Rc<dyn Fn()>,
    ) -> Connection {
        let key = ListenerKey::of(&listener);
        let adapter = A::adapt_unit(listener);
        let connection = self.bind().add_retained(key, &adapter);
        registry.retain(owner, Box::new(adapter), connection.clone());
        connection
    }

    /// Remove the first registration of `listener`. No-op when absent or
    /// when the signal is unbound.
    pub fn disconnect(&self, listener: &Rc<A::Callback>) {
        if let Some(core) = self.bound() {
            core.remove(ListenerKey::of(listener));
        }
    }

    /// Remove the first registration of a zero-argument `listener` (its
    /// adapter). No-op when absent.
    pub fn disconnect_unit(&self, listener: &Rc<dyn Fn()>) {
        if let Some(core) = self.bound() {
            core.remove(ListenerKey::of(listener));
        }
    }

    /// Invoke every live listener with `args`; no-op when unbound or
    /// blocked.
    pub fn emit(&self, args: A) {
        if let Some(core) = self.bound() {
            core.emit(args);
        }
    }

    /// Suppress (or restore) delivery. Allocates the core so the block
    /// state survives until listeners arrive.
    pub fn set_blocked(&self, blocked: bool) {
        self.bind().set_blocked(blocked);
    }

    /// Whether emits are currently suppressed.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.bound().is_some_and(|core| core.is_blocked())
    }

    /// Whether at least one live listener is registered.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.bound().is_some_and(|core| core.is_connected())
    }
}

impl<A: SignalArgs> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("bound", &self.is_bound())
            .field("connected", &self.is_connected())
            .finish()
    }
}
