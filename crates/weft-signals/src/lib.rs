#![forbid(unsafe_code)]

//! Typed signals, connections, and listener lifetime management.
//!
//! This crate is the publish/subscribe backbone of Weft: a generic
//! connection-list core ([`SignalCore`]), arity-typed facades over it
//! ([`Signal`]), removal handles ([`Connection`]), and an owner-keyed
//! lifetime registry ([`LifetimeRegistry`]) that severs listeners when the
//! object whose lifetime bounds them is disposed.
//!
//! Everything here assumes a single logical thread of control per session
//! (`Rc`/`RefCell` sharing); the only cross-session state is the identity
//! counter inside [`IdSource`], which is atomic.

pub mod args;
pub mod core;
pub mod registry;
pub mod signal;

pub use args::SignalArgs;
pub use self::core::{Connection, ListenerKey, SignalCore};
pub use registry::{IdSource, LifetimeRegistry, ObjectId};
pub use signal::Signal;
