#![forbid(unsafe_code)]

//! Client-originated signals.
//!
//! A [`ClientSignal`] is a typed signal the browser can trigger: it renders
//! a script-side call fragment ([`ClientSignal::create_call`]) whose
//! arguments travel as the decoder's indexed `a0..aN` parameters, and it
//! unmarshals those positional strings back into the signal's statically
//! declared argument tuple ([`ClientSignal::process`]).
//!
//! # Failure Modes
//!
//! Argument conversion works on untrusted input. A failure at any position
//! aborts only this signal's dispatch: the error is logged, no listener
//! runs, and the enclosing request turn continues.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use weft_signals::{Connection, LifetimeRegistry, ObjectId, Signal, SignalArgs};

use crate::record::WireEvent;

/// Wire-convertible argument categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Str,
    Int,
    Double,
    Localized,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Double => "double",
            Self::Localized => "localized text",
        })
    }
}

/// Argument unmarshal failure; aborts one signal's dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument {index}: cannot read {raw:?} as {kind}")]
    Conversion {
        index: usize,
        raw: String,
        kind: ArgKind,
    },
}

/// Text that is either a literal or a key into the localization table.
///
/// Client-marshalled values always arrive literal; localized instances are
/// produced server-side and resolved by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct LocalText {
    value: String,
    localized: bool,
}

impl LocalText {
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            localized: false,
        }
    }

    #[must_use]
    pub fn localized(key: impl Into<String>) -> Self {
        Self {
            value: key.into(),
            localized: true,
        }
    }

    /// The literal text, or the lookup key for localized instances.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn is_localized(&self) -> bool {
        self.localized
    }
}

impl fmt::Display for LocalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One argument type a client-originated signal can carry.
pub trait WireArg: Clone + 'static {
    const KIND: ArgKind;

    /// Convert from the positional wire string. `None` aborts the
    /// dispatch.
    fn from_wire(raw: &str) -> Option<Self>;
}

impl WireArg for String {
    const KIND: ArgKind = ArgKind::Str;

    fn from_wire(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl WireArg for i32 {
    const KIND: ArgKind = ArgKind::Int;

    fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl WireArg for i64 {
    const KIND: ArgKind = ArgKind::Int;

    fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl WireArg for f64 {
    const KIND: ArgKind = ArgKind::Double;

    fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl WireArg for LocalText {
    const KIND: ArgKind = ArgKind::Localized;

    fn from_wire(raw: &str) -> Option<Self> {
        Some(Self::literal(raw))
    }
}

/// Argument tuples convertible from the decoder's positional string list.
pub trait WireArgs: SignalArgs {
    /// Per-position conversion table, fixed by the concrete tuple type.
    const KINDS: &'static [ArgKind];

    /// Convert the leading positions of `args` into the tuple. Positions
    /// past the end of `args` read as empty strings.
    fn unmarshal(args: &[String]) -> Result<Self, ArgError>;
}

fn convert<T: WireArg>(args: &[String], index: usize) -> Result<T, ArgError> {
    let raw = args.get(index).map_or("", String::as_str);
    T::from_wire(raw).ok_or_else(|| ArgError::Conversion {
        index,
        raw: raw.to_string(),
        kind: T::KIND,
    })
}

macro_rules! impl_wire_args {
    ($($ty:ident . $idx:tt),*) => {
        impl<$($ty: WireArg),*> WireArgs for ($($ty,)*) {
            const KINDS: &'static [ArgKind] = &[$($ty::KIND),*];

            #[allow(unused_variables)]
            fn unmarshal(args: &[String]) -> Result<Self, ArgError> {
                Ok(($(convert::<$ty>(args, $idx)?,)*))
            }
        }
    };
}

impl_wire_args!();
impl_wire_args!(A1.0);
impl_wire_args!(A1.0, A2.1);
impl_wire_args!(A1.0, A2.1, A3.2);
impl_wire_args!(A1.0, A2.1, A3.2, A4.3);
impl_wire_args!(A1.0, A2.1, A3.2, A4.3, A5.4);
impl_wire_args!(A1.0, A2.1, A3.2, A4.3, A5.4, A6.5);

/// Script-level argument position in a rendered call fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsArg {
    /// String literal; quoted and escaped for the browser.
    Literal(String),
    /// Script expression; inserted verbatim.
    Expression(String),
}

impl JsArg {
    fn render(&self) -> String {
        match self {
            Self::Literal(value) => quote_js(value),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// JSON string quoting doubles as JavaScript string quoting here.
fn quote_js(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Typed signal the browser can trigger through the wire decoder.
///
/// Starts unbound like any [`Signal`]; the first listener registration
/// allocates the underlying core, and the transition is one-way.
pub struct ClientSignal<A: WireArgs> {
    address: String,
    name: String,
    inner: Signal<A>,
}

impl<A: WireArgs> ClientSignal<A> {
    /// A signal reachable at `address` (the owning element's markup
    /// address) under the event `name`.
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            inner: Signal::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The server-side signal listeners attach to.
    #[must_use]
    pub fn signal(&self) -> &Signal<A> {
        &self.inner
    }

    /// Whether the inner signal has allocated its core. One-way: binding
    /// happens on first listener registration and never reverts.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    /// Forwarded to [`Signal::connect`].
    pub fn connect(&self, listener: Rc<A::Callback>) -> Connection {
        self.inner.connect(listener)
    }

    /// Forwarded to [`Signal::connect_to`].
    pub fn connect_to(
        &self,
        registry: &LifetimeRegistry,
        owner: ObjectId,
        listener: Rc<A::Callback>,
    ) -> Connection {
        self.inner.connect_to(registry, owner, listener)
    }

    /// Render the browser-side call fragment for this signal.
    ///
    /// Literal arguments are quoted, expressions pass through verbatim;
    /// positions map one-to-one onto the decoder's `a0..aN` convention.
    #[must_use]
    pub fn create_call(&self, args: &[JsArg]) -> String {
        let mut call = format!(
            "Weft.emit({},{}",
            quote_js(&self.address),
            quote_js(&self.name)
        );
        for arg in args {
            call.push(',');
            call.push_str(&arg.render());
        }
        call.push_str(");");
        call
    }

    /// Unmarshal the record's free-form arguments and trigger listeners.
    ///
    /// A conversion failure at any position aborts this dispatch only: the
    /// error is logged and returned, no listener runs.
    pub fn process(&self, event: &WireEvent) -> Result<(), ArgError> {
        match A::unmarshal(&event.user_args) {
            Ok(args) => {
                self.inner.emit(args);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    signal = %self.name,
                    address = %self.address,
                    %err,
                    "argument conversion failed, dispatch aborted"
                );
                Err(err)
            }
        }
    }
}

impl<A: WireArgs> fmt::Debug for ClientSignal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSignal")
            .field("address", &self.address)
            .field("name", &self.name)
            .field("kinds", &A::KINDS)
            .finish()
    }
}
