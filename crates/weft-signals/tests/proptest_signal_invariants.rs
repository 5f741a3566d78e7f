//! Property-based invariant tests for the signal core.
//!
//! These tests verify structural invariants that must hold for **any**
//! sequence of add/remove/block/emit operations:
//!
//! 1. Delivery order equals insertion order of the surviving listeners.
//! 2. Removal always takes the first matching registration.
//! 3. A blocked core delivers nothing; unblocking restores delivery
//!    without re-registration.
//! 4. `is_connected()` agrees with the reference model's listener count.
//! 5. Disconnecting every connection empties the core.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use weft_signals::{Connection, ListenerKey, SignalCore};

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    RemoveFirst(u8),
    SetBlocked(bool),
    Emit,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            (0u8..5).prop_map(Op::Add),
            (0u8..5).prop_map(Op::RemoveFirst),
            any::<bool>().prop_map(Op::SetBlocked),
            Just(Op::Emit),
        ],
        0..60,
    )
}

proptest! {
    #[test]
    fn random_op_sequences_match_reference_model(ops in ops()) {
        let core: SignalCore<(u8,)> = SignalCore::new();
        let log: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));

        // Reference model: insertion-ordered tags + blocked flag.
        let mut model: Vec<(u8, Rc<dyn Fn(u8)>)> = Vec::new();
        let mut blocked = false;
        let mut expected: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                Op::Add(tag) => {
                    let log2 = Rc::clone(&log);
                    let listener: Rc<dyn Fn(u8)> =
                        Rc::new(move |_: u8| log2.borrow_mut().push(tag));
                    core.add(Rc::clone(&listener));
                    model.push((tag, listener));
                }
                Op::RemoveFirst(tag) => {
                    if let Some(pos) = model.iter().position(|(t, _)| *t == tag) {
                        let (_, listener) = model.remove(pos);
                        prop_assert!(core.remove(ListenerKey::of(&listener)));
                    } else {
                        // Permissive: removing a never-registered listener is a no-op.
                        let stray: Rc<dyn Fn(u8)> = Rc::new(|_| {});
                        prop_assert!(!core.remove(ListenerKey::of(&stray)));
                    }
                }
                Op::SetBlocked(b) => {
                    core.set_blocked(b);
                    blocked = b;
                }
                Op::Emit => {
                    if !blocked {
                        for (tag, _) in &model {
                            expected.push(*tag);
                        }
                    }
                    core.emit((0,));
                }
            }
            prop_assert_eq!(core.is_connected(), !model.is_empty());
            prop_assert_eq!(core.is_blocked(), blocked);
            prop_assert_eq!(core.live_count(), model.len());
        }

        prop_assert_eq!(&*log.borrow(), &expected);
    }

    #[test]
    fn delivery_order_is_insertion_order(tags in proptest::collection::vec(0u8..8, 0..20)) {
        let core: SignalCore<()> = SignalCore::new();
        let log: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));

        for tag in &tags {
            let tag = *tag;
            let log2 = Rc::clone(&log);
            core.add(Rc::new(move || log2.borrow_mut().push(tag)));
        }
        core.emit(());
        prop_assert_eq!(&*log.borrow(), &tags);
    }

    #[test]
    fn disconnecting_everything_empties_the_core(count in 0usize..16) {
        let core: SignalCore<()> = SignalCore::new();
        let connections: Vec<Connection> =
            (0..count).map(|_| core.add(Rc::new(|| {}))).collect();
        prop_assert_eq!(core.is_connected(), count > 0);

        for conn in &connections {
            conn.disconnect();
        }
        prop_assert!(!core.is_connected());
        prop_assert_eq!(core.live_count(), 0);

        // Idempotent severing.
        for conn in connections {
            conn.disconnect();
            prop_assert!(!conn.is_connected());
        }
    }
}
