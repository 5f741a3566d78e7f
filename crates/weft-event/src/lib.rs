#![forbid(unsafe_code)]

//! Wire event decoding, typed views, and client-originated signals.
//!
//! The browser flattens each event into prefixed request parameters; this
//! crate turns that flat map into a canonical record ([`WireEvent`]),
//! projects it through read-only typed views ([`PointerView`], [`KeyView`],
//! [`ScrollView`], [`DropView`]), and routes client-marshalled arguments
//! into typed server-side signals ([`ClientSignal`]).
//!
//! All decoding treats client input as untrusted: malformed fields degrade
//! to documented fallbacks and are logged, never raised past this boundary.

pub mod client;
pub mod decode;
pub mod record;
pub mod views;

pub use client::{ArgError, ArgKind, ClientSignal, JsArg, LocalText, WireArg, WireArgs};
pub use decode::{DecodeError, RequestParams};
pub use record::{Modifiers, Point, Size, TouchPoint, WireEvent};
pub use views::{DropOrigin, DropView, Key, KeyView, PointerButton, PointerView, ScrollView};
