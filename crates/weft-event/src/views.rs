#![forbid(unsafe_code)]

//! Typed read-only views over a canonical event record.
//!
//! Each view borrows one [`WireEvent`] and projects the fields that make
//! sense for its event family, enforcing the kind gates the record itself
//! does not (drag delta on `"up"`, wheel delta on `"wheel"`, character
//! data on `"keypress"`). Views never mutate the record and perform no
//! I/O.

use crate::record::{Modifiers, Point, Size, TouchPoint, WireEvent};

/// Pointer button reported by a mouse event.
///
/// The wire carries a bit pattern; the mapping picks the smallest set bit
/// so chorded presses resolve deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PointerButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
}

impl PointerButton {
    /// Map a raw button bit pattern (1 = left, 2 = middle, 4 = right).
    #[must_use]
    pub const fn from_wire(bits: u32) -> Self {
        if bits & 1 != 0 {
            Self::Left
        } else if bits & 2 != 0 {
            Self::Middle
        } else if bits & 4 != 0 {
            Self::Right
        } else {
            Self::None
        }
    }
}

/// Mouse and touch-pointer projection of an event record.
#[derive(Debug, Clone, Copy)]
pub struct PointerView<'a> {
    event: &'a WireEvent,
}

impl<'a> PointerView<'a> {
    #[must_use]
    pub const fn new(event: &'a WireEvent) -> Self {
        Self { event }
    }

    #[must_use]
    pub fn button(&self) -> PointerButton {
        PointerButton::from_wire(self.event.button)
    }

    /// Position relative to the browser viewport.
    #[must_use]
    pub fn client(&self) -> Point {
        self.event.client
    }

    /// Position relative to the document origin.
    #[must_use]
    pub fn document(&self) -> Point {
        self.event.document
    }

    /// Position relative to the physical screen.
    #[must_use]
    pub fn screen(&self) -> Point {
        self.event.screen
    }

    /// Position relative to the widget that observed the event.
    #[must_use]
    pub fn widget(&self) -> Point {
        self.event.widget
    }

    /// Displacement since drag start; zero unless this is an `"up"` event.
    #[must_use]
    pub fn drag_delta(&self) -> Point {
        if self.event.kind == "up" {
            self.event.drag_delta
        } else {
            Point::default()
        }
    }

    /// Signed wheel rotation; zero unless this is a `"wheel"` event.
    #[must_use]
    pub fn wheel_delta(&self) -> i32 {
        if self.event.kind == "wheel" {
            self.event.wheel_delta
        } else {
            0
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.event.modifiers
    }

    #[must_use]
    pub fn touches(&self) -> &'a [TouchPoint] {
        &self.event.touches
    }
}

/// Logical key derived from a wire key or character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Shift,
    Control,
    Alt,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// Letter or digit key, uppercase form.
    Char(char),
    /// Code with no named mapping; preserved verbatim.
    Unknown(u32),
}

impl Key {
    /// Interpret a browser key code.
    #[must_use]
    pub fn from_key_code(code: u32) -> Self {
        match code {
            8 => Self::Backspace,
            9 => Self::Tab,
            13 => Self::Enter,
            16 => Self::Shift,
            17 => Self::Control,
            18 => Self::Alt,
            27 => Self::Escape,
            32 => Self::Space,
            33 => Self::PageUp,
            34 => Self::PageDown,
            35 => Self::End,
            36 => Self::Home,
            37 => Self::Left,
            38 => Self::Up,
            39 => Self::Right,
            40 => Self::Down,
            45 => Self::Insert,
            46 => Self::Delete,
            112 => Self::F1,
            113 => Self::F2,
            114 => Self::F3,
            115 => Self::F4,
            116 => Self::F5,
            117 => Self::F6,
            118 => Self::F7,
            119 => Self::F8,
            120 => Self::F9,
            121 => Self::F10,
            122 => Self::F11,
            123 => Self::F12,
            48..=57 | 65..=90 => Self::Char(char::from_u32(code).unwrap_or('\0')),
            _ => Self::Unknown(code),
        }
    }

    /// Interpret a character code from a key-press event.
    #[must_use]
    pub fn from_char_code(code: u32) -> Self {
        if code == 0 {
            return Self::Unknown(0);
        }
        match char::from_u32(code) {
            Some(c) => Self::Char(c),
            None => Self::Unknown(code),
        }
    }
}

/// Keyboard projection of an event record.
#[derive(Debug, Clone, Copy)]
pub struct KeyView<'a> {
    event: &'a WireEvent,
}

impl<'a> KeyView<'a> {
    #[must_use]
    pub const fn new(event: &'a WireEvent) -> Self {
        Self { event }
    }

    /// Logical key: key code when present, otherwise character code.
    #[must_use]
    pub fn key(&self) -> Key {
        if self.event.key_code != 0 {
            Key::from_key_code(self.event.key_code)
        } else {
            Key::from_char_code(self.char_code())
        }
    }

    #[must_use]
    pub fn key_code(&self) -> u32 {
        self.event.key_code
    }

    /// Character code; zero unless this is a `"keypress"` event.
    #[must_use]
    pub fn char_code(&self) -> u32 {
        if self.event.kind == "keypress" {
            self.event.char_code
        } else {
            0
        }
    }

    /// Single-character text projection; empty unless this is a
    /// `"keypress"` event with a valid character code.
    #[must_use]
    pub fn text(&self) -> String {
        match char::from_u32(self.char_code()) {
            Some(c) if c != '\0' => c.to_string(),
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.event.modifiers
    }
}

/// Scroll projection of an event record: offsets and viewport only.
#[derive(Debug, Clone, Copy)]
pub struct ScrollView<'a> {
    event: &'a WireEvent,
}

impl<'a> ScrollView<'a> {
    #[must_use]
    pub const fn new(event: &'a WireEvent) -> Self {
        Self { event }
    }

    #[must_use]
    pub fn scroll(&self) -> Point {
        self.event.scroll
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.event.viewport
    }
}

/// Which original event a drop wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropOrigin {
    Pointer,
    Touch,
}

/// Drag-and-drop projection of an event record.
///
/// The client-side drop handler marshals the drag source address and the
/// negotiated mime type as the first two free-form arguments.
#[derive(Debug, Clone, Copy)]
pub struct DropView<'a> {
    event: &'a WireEvent,
}

impl<'a> DropView<'a> {
    #[must_use]
    pub const fn new(event: &'a WireEvent) -> Self {
        Self { event }
    }

    /// Address of the widget the drag originated from.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.event.user_args.first().map_or("", String::as_str)
    }

    /// Mime type the drag source and drop target agreed on.
    #[must_use]
    pub fn mime_type(&self) -> &'a str {
        self.event.user_args.get(1).map_or("", String::as_str)
    }

    /// Touch-originated drops carry a `touch`-prefixed kind.
    #[must_use]
    pub fn origin(&self) -> DropOrigin {
        if self.event.kind.starts_with("touch") {
            DropOrigin::Touch
        } else {
            DropOrigin::Pointer
        }
    }

    /// The wrapped pointer event.
    #[must_use]
    pub fn pointer(&self) -> PointerView<'a> {
        PointerView::new(self.event)
    }

    #[must_use]
    pub fn touches(&self) -> &'a [TouchPoint] {
        &self.event.touches
    }
}
