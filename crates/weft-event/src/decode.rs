#![forbid(unsafe_code)]

//! Wire event decoder.
//!
//! # Design
//!
//! The browser flattens every event into request parameters named by a
//! per-event-type prefix plus a fixed suffix (`clientX`, `keyCode`,
//! `touches`, ...). [`WireEvent::decode`] reassembles the canonical record
//! from that flat map.
//!
//! # Failure Modes
//!
//! Client input is untrusted and must never take down a session, so nothing
//! here raises past this boundary:
//!
//! - absent or malformed numeric parameters decode to `0` (logged at debug
//!   when a value was present but unparseable);
//! - a touch list whose value count is not a multiple of nine is a decode
//!   error for that field only: the list stays empty, a warning is logged;
//! - free-form arguments missing below the declared count default to the
//!   empty string.

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use thiserror::Error;

use crate::record::{Modifiers, Point, Size, TouchPoint, WireEvent};

/// Values per touch point on the wire: identifier plus four coordinate
/// pairs.
const TOUCH_FIELDS: usize = 9;

/// Decode failure for one field of the wire form.
///
/// Never escalated out of [`WireEvent::decode`]; surfaced only through
/// logging and the documented fallback value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("touch list {param:?} has {values} values, expected a multiple of nine")]
    TouchListShape { param: String, values: usize },
}

/// Flat string-to-string request parameter map.
///
/// The request/response layer owns the raw form; this is the read side the
/// decoder consumes. Repeated parameters keep the last value.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    map: AHashMap<String, String>,
}

impl RequestParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.map.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl WireEvent {
    /// Decode the parameters named `<prefix><suffix>` into a canonical
    /// record. Total: every decode failure degrades to a documented
    /// fallback inside the record.
    #[must_use]
    pub fn decode(params: &RequestParams, prefix: &str) -> Self {
        let field = Fields { params, prefix };

        let kind = field.text("type");
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::ALT, field.flag("altKey"));
        modifiers.set(Modifiers::CTRL, field.flag("ctrlKey"));
        modifiers.set(Modifiers::SHIFT, field.flag("shiftKey"));
        modifiers.set(Modifiers::META, field.flag("metaKey"));

        Self {
            kind,
            client: field.point("clientX", "clientY"),
            document: field.point("documentX", "documentY"),
            screen: field.point("screenX", "screenY"),
            widget: field.point("widgetX", "widgetY"),
            drag_delta: field.point("dragdX", "dragdY"),
            wheel_delta: field.number("wheel"),
            modifiers,
            key_code: field.number("keyCode"),
            char_code: field.number("charCode"),
            button: field.number("button"),
            scroll: field.point("scrollX", "scrollY"),
            viewport: Size::new(field.number("width"), field.number("height")),
            touches: field.touch_list("touches"),
            target_touches: field.touch_list("ttouches"),
            changed_touches: field.touch_list("ctouches"),
            response: field.text("response"),
            user_args: field.user_args(),
        }
    }
}

/// Prefix-resolving accessor over one request's parameters.
struct Fields<'a> {
    params: &'a RequestParams,
    prefix: &'a str,
}

impl Fields<'_> {
    fn raw(&self, suffix: &str) -> Option<&str> {
        self.params.get(&format!("{}{suffix}", self.prefix))
    }

    fn text(&self, suffix: &str) -> String {
        self.raw(suffix).unwrap_or_default().to_string()
    }

    /// Modifier parameters signal by presence alone.
    fn flag(&self, suffix: &str) -> bool {
        self.raw(suffix).is_some()
    }

    fn number<T>(&self, suffix: &str) -> T
    where
        T: FromStr + Default,
        T::Err: fmt::Display,
    {
        let Some(raw) = self.raw(suffix) else {
            return T::default();
        };
        match raw.parse() {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(
                    param = %format!("{}{suffix}", self.prefix),
                    value = raw,
                    %err,
                    "malformed numeric parameter, substituting zero"
                );
                T::default()
            }
        }
    }

    fn point(&self, x_suffix: &str, y_suffix: &str) -> Point {
        Point::new(self.number(x_suffix), self.number(y_suffix))
    }

    fn touch_list(&self, suffix: &str) -> Vec<TouchPoint> {
        let Some(raw) = self.raw(suffix) else {
            return Vec::new();
        };
        match parse_touch_list(raw) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(
                    param = %format!("{}{suffix}", self.prefix),
                    %err,
                    "dropping malformed touch list"
                );
                Vec::new()
            }
        }
    }

    /// `an` declares the argument count; `a0..a(n-1)` carry the values.
    /// Missing trailing arguments become empty strings.
    fn user_args(&self) -> Vec<String> {
        let count: usize = self.number("an");
        (0..count).map(|i| self.text(&format!("a{i}"))).collect()
    }
}

/// Segment a semicolon-delimited flat list into nine-value touch points.
///
/// Individual values that fail to parse fall back to zero like every other
/// numeric field; only a count that is not a multiple of nine rejects the
/// whole list.
fn parse_touch_list(raw: &str) -> Result<Vec<TouchPoint>, DecodeError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let values: Vec<&str> = raw.split(';').collect();
    if values.len() % TOUCH_FIELDS != 0 {
        return Err(DecodeError::TouchListShape {
            param: raw.to_string(),
            values: values.len(),
        });
    }

    Ok(values
        .chunks_exact(TOUCH_FIELDS)
        .map(|chunk| TouchPoint {
            identifier: lenient(chunk[0]),
            client: Point::new(lenient(chunk[1]), lenient(chunk[2])),
            document: Point::new(lenient(chunk[3]), lenient(chunk[4])),
            screen: Point::new(lenient(chunk[5]), lenient(chunk[6])),
            widget: Point::new(lenient(chunk[7]), lenient(chunk[8])),
        })
        .collect())
}

fn lenient<T: FromStr + Default>(raw: &str) -> T {
    raw.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(entries: &[(&str, &str)]) -> RequestParams {
        entries.iter().copied().collect()
    }

    #[test]
    fn numeric_fields_and_modifiers() {
        let params = params(&[
            ("clientX", "10"),
            ("clientY", "20"),
            ("altKey", ""),
            ("wheel", "-1"),
        ]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.client, Point::new(10, 20));
        assert_eq!(event.modifiers, Modifiers::ALT);
        assert_eq!(event.wheel_delta, -1);
        // Absent numerics are zero.
        assert_eq!(event.document, Point::new(0, 0));
        assert_eq!(event.key_code, 0);
    }

    #[test]
    fn malformed_numerics_substitute_zero() {
        let params = params(&[("clientX", "abc"), ("clientY", "12.5"), ("button", "-3")]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.client, Point::new(0, 0));
        assert_eq!(event.button, 0);
    }

    #[test]
    fn prefix_selects_the_event() {
        let params = params(&[("oclientX", "7"), ("clientX", "99")]);
        let event = WireEvent::decode(&params, "o");
        assert_eq!(event.client.x, 7);
    }

    #[test]
    fn all_four_modifiers() {
        let params = params(&[
            ("altKey", "1"),
            ("ctrlKey", "1"),
            ("shiftKey", "1"),
            ("metaKey", "1"),
        ]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.modifiers, Modifiers::all());
    }

    #[test]
    fn single_touch_point() {
        let params = params(&[("touches", "5;1;2;3;4;5;6;7;8")]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.touches.len(), 1);
        let touch = event.touches[0];
        assert_eq!(touch.identifier, 5);
        assert_eq!(touch.client, Point::new(1, 2));
        assert_eq!(touch.document, Point::new(3, 4));
        assert_eq!(touch.screen, Point::new(5, 6));
        assert_eq!(touch.widget, Point::new(7, 8));
    }

    #[test]
    fn two_touch_points() {
        let params = params(&[(
            "ctouches",
            "1;10;11;12;13;14;15;16;17;2;20;21;22;23;24;25;26;27",
        )]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.changed_touches.len(), 2);
        assert_eq!(event.changed_touches[0].identifier, 1);
        assert_eq!(event.changed_touches[1].identifier, 2);
        assert_eq!(event.changed_touches[1].widget, Point::new(26, 27));
    }

    #[test]
    fn bad_touch_shape_yields_empty_list() {
        let params = params(&[("touches", "5;1;2;3")]);
        let event = WireEvent::decode(&params, "");
        assert!(event.touches.is_empty());
    }

    #[test]
    fn empty_touch_parameter_is_empty_list() {
        let params = params(&[("touches", "")]);
        let event = WireEvent::decode(&params, "");
        assert!(event.touches.is_empty());
    }

    #[test]
    fn touch_shape_error_reports_count() {
        assert_eq!(
            parse_touch_list("1;2;3"),
            Err(DecodeError::TouchListShape {
                param: "1;2;3".to_string(),
                values: 3,
            })
        );
    }

    #[test]
    fn user_args_follow_declared_count() {
        let params = params(&[("an", "2"), ("a0", "x"), ("a1", "y")]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.user_args, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn missing_trailing_args_default_to_empty() {
        let params = params(&[("an", "2"), ("a0", "x")]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.user_args, vec!["x".to_string(), String::new()]);
    }

    #[test]
    fn malformed_count_means_no_args() {
        let params = params(&[("an", "lots"), ("a0", "x")]);
        let event = WireEvent::decode(&params, "");
        assert!(event.user_args.is_empty());
    }

    #[test]
    fn kind_and_response_pass_through() {
        let params = params(&[("type", "keypress"), ("response", "ok")]);
        let event = WireEvent::decode(&params, "");
        assert_eq!(event.kind, "keypress");
        assert_eq!(event.response, "ok");
    }
}
