#![forbid(unsafe_code)]

//! Object identity and listener lifetime management.
//!
//! # Design
//!
//! Identity is a monotonically increasing integer handed out by an explicit
//! [`IdSource`] (no hidden static counter); it is never reused unless the
//! source is explicitly reseeded during state restore. The counter is an
//! `AtomicU64` so the single-thread-per-session assumption can be relaxed
//! without touching this module.
//!
//! Lifetime management is an ownership table: registering a listener with
//! an owner appends (listener, connection) to that owner's retained list,
//! which holds the only strong reference to the listener. The signal side
//! observes it weakly, so the pair lives exactly as long as the owner does.
//! [`LifetimeRegistry::dispose`] severs everything an owner retained;
//! disposing twice, or disposing an unknown owner, is a no-op.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;

use crate::core::Connection;

/// Unique object identity within one session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ObjectId(u64);

impl ObjectId {
    /// The raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Name-prefixed form used in emitted markup addresses, e.g. `"o17"`.
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Explicit, seedable identity counter.
#[derive(Debug)]
pub struct IdSource {
    next: AtomicU64,
}

impl IdSource {
    /// Create a source that will hand out `seed` first.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Reset the counter (state restore). Identities handed out before the
    /// reseed may be reissued afterwards; callers own that trade-off.
    pub fn reseed(&self, seed: u64) {
        self.next.store(seed, Ordering::Relaxed);
    }

    /// Next identity; monotonic between reseeds.
    pub fn next_id(&self) -> ObjectId {
        ObjectId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The value the next allocation would return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::new(1)
    }
}

struct Retained {
    connection: Connection,
    /// Strong reference keeping the listener (or its unit adapter) alive.
    _listener: Box<dyn Any>,
}

/// Per-session identity allocator and owner-keyed listener arena.
pub struct LifetimeRegistry {
    ids: IdSource,
    owners: RefCell<AHashMap<ObjectId, Vec<Retained>>>,
}

impl Default for LifetimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LifetimeRegistry {
    /// Registry whose identities start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(1)
    }

    /// Registry whose identities start at `seed` (state restore).
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            ids: IdSource::new(seed),
            owners: RefCell::new(AHashMap::new()),
        }
    }

    /// Allocate the next object identity.
    pub fn allocate_id(&self) -> ObjectId {
        self.ids.next_id()
    }

    /// Reseed the identity counter (state restore).
    pub fn reseed(&self, seed: u64) {
        self.ids.reseed(seed);
    }

    /// The underlying identity source.
    #[must_use]
    pub fn id_source(&self) -> &IdSource {
        &self.ids
    }

    /// Append a (listener, connection) pair to `owner`'s retained list.
    ///
    /// The boxed listener is the pair's only strong reference; dropping it
    /// on [`dispose`](Self::dispose) lets the signal's weak slot lapse even
    /// if the connection was severed some other way first.
    pub fn retain(&self, owner: ObjectId, listener: Box<dyn Any>, connection: Connection) {
        self.owners.borrow_mut().entry(owner).or_default().push(Retained {
            connection,
            _listener: listener,
        });
    }

    /// Sever every pair retained for `owner`. Idempotent; unknown owners
    /// are a no-op.
    pub fn dispose(&self, owner: ObjectId) {
        let retained = self.owners.borrow_mut().remove(&owner);
        let Some(retained) = retained else {
            return;
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(owner = owner.raw(), pairs = retained.len(), "disposing owner");
        for pair in retained {
            pair.connection.disconnect();
        }
    }

    /// Number of pairs currently retained for `owner`.
    #[must_use]
    pub fn retained_count(&self, owner: ObjectId) -> usize {
        self.owners.borrow().get(&owner).map_or(0, Vec::len)
    }
}

impl fmt::Debug for LifetimeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeRegistry")
            .field("next_id", &self.ids.peek())
            .field("owners", &self.owners.borrow().len())
            .finish()
    }
}
