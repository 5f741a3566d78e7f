#![forbid(unsafe_code)]

//! Argument tuples for typed signals.
//!
//! One generic [`SignalArgs`] implementation per tuple shape (zero through
//! six elements) replaces hand-duplicated per-arity signal classes. A
//! signal's arity is fixed by its argument tuple type and never changes at
//! runtime.

use std::rc::Rc;

/// Argument tuple carried by a [`Signal`](crate::signal::Signal) emit.
///
/// Implemented for `()` through six-element tuples. The associated
/// [`Callback`](SignalArgs::Callback) type is the listener shape for that
/// arity (`dyn Fn(A1, .., AN)`), so listeners receive positional arguments
/// rather than the tuple itself.
pub trait SignalArgs: Clone + 'static {
    /// Listener callable shape for this arity.
    type Callback: ?Sized + 'static;

    /// Invoke `listener` with the values in `args`.
    fn call(listener: &Self::Callback, args: Self);

    /// Wrap a zero-argument listener in an argument-discarding adapter.
    fn adapt_unit(listener: Rc<dyn Fn()>) -> Rc<Self::Callback>;
}

macro_rules! impl_signal_args {
    ($($ty:ident . $idx:tt),*) => {
        impl<$($ty: Clone + 'static),*> SignalArgs for ($($ty,)*) {
            type Callback = dyn Fn($($ty),*);

            #[allow(unused_variables)]
            fn call(listener: &Self::Callback, args: Self) {
                listener($(args.$idx),*);
            }

            fn adapt_unit(listener: Rc<dyn Fn()>) -> Rc<Self::Callback> {
                Rc::new(move |$(_: $ty),*| listener())
            }
        }
    };
}

impl_signal_args!();
impl_signal_args!(A1.0);
impl_signal_args!(A1.0, A2.1);
impl_signal_args!(A1.0, A2.1, A3.2);
impl_signal_args!(A1.0, A2.1, A3.2, A4.3);
impl_signal_args!(A1.0, A2.1, A3.2, A4.3, A5.4);
impl_signal_args!(A1.0, A2.1, A3.2, A4.3, A5.4, A6.5);
