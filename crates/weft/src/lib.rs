#![forbid(unsafe_code)]

//! Weft public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use weft_event as event;
    pub use weft_signals as signals;

    pub use weft_event::{
        ClientSignal, DropView, KeyView, PointerView, RequestParams, ScrollView, WireEvent,
    };
    pub use weft_signals::{Connection, LifetimeRegistry, ObjectId, Signal};
}
