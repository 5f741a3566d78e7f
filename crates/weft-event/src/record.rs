#![forbid(unsafe_code)]

//! Canonical event record and its coordinate/modifier primitives.
//!
//! A [`WireEvent`] is the decoded in-memory form of one client-originated
//! event: every numeric field the browser side may report, already parsed,
//! with absent or malformed values substituted by zero. Decoding lives in
//! [`crate::decode`]; typed read-only projections live in [`crate::views`].

use std::fmt;

/// Integer pixel coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

bitflags::bitflags! {
    /// Keyboard modifier state reported alongside an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const ALT   = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

/// One finger's coordinates within a touch list.
///
/// Wire form is a flat nine-value tuple: identifier followed by the four
/// coordinate frames in (client, document, screen, widget) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPoint {
    /// Browser-assigned identifier, stable for the finger's lifetime.
    pub identifier: i64,
    pub client: Point,
    pub document: Point,
    pub screen: Point,
    pub widget: Point,
}

/// Decoded in-memory representation of one client-originated event.
///
/// Field semantics depend on `kind`: `drag_delta` is only populated for
/// `"up"` events, `wheel_delta` for `"wheel"`, `char_code` for
/// `"keypress"`. The typed views in [`crate::views`] enforce those gates;
/// the record itself stores whatever the wire carried.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireEvent {
    /// Event type discriminant as sent by the client, e.g. `"click"`.
    pub kind: String,
    pub client: Point,
    pub document: Point,
    pub screen: Point,
    pub widget: Point,
    /// Displacement since drag start; meaningful on `"up"` only.
    pub drag_delta: Point,
    /// Signed wheel rotation; meaningful on `"wheel"` only.
    pub wheel_delta: i32,
    pub modifiers: Modifiers,
    pub key_code: u32,
    /// Character code; meaningful on `"keypress"` only.
    pub char_code: u32,
    /// Raw button bit pattern (1 = left, 2 = middle, 4 = right).
    pub button: u32,
    pub scroll: Point,
    pub viewport: Size,
    pub touches: Vec<TouchPoint>,
    pub target_touches: Vec<TouchPoint>,
    pub changed_touches: Vec<TouchPoint>,
    /// Free-form response payload, e.g. a file-upload answer.
    pub response: String,
    /// Indexed `a0..aN` arguments marshalled by a client-side call.
    pub user_args: Vec<String>,
}
