//! Property tests: arbitrary connect/disconnect interleavings against a
//! simple reference model. The validator must agree with the model on every
//! outcome, and latest-wins resolution must never yield more than one
//! occupant per slot.

use std::collections::HashMap;

use proptest::prelude::*;

use rigchain_check::{ChainValidator, Rejection};
use rigchain_core::directory::InMemoryDirectory;
use rigchain_core::part::PartNumber;
use rigchain_storage::{EventLedger, MemoryLedger};

const ANTS: [&str; 3] = ["ANT00001P1", "ANT00002P1", "ANT00003P1"];
const LNAS: [&str; 3] = ["LNA00001P1", "LNA00002P1", "LNA00003P1"];

fn part(raw: &str) -> PartNumber {
    PartNumber::new(raw).unwrap()
}

fn directory() -> InMemoryDirectory {
    let mut dir = InMemoryDirectory::new();
    for raw in ANTS.iter().chain(LNAS.iter()) {
        assert!(dir.register(&part(raw)), "{raw}");
    }
    dir
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Connect(usize, usize),
    Disconnect(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (any::<bool>(), 0..ANTS.len(), 0..LNAS.len()).prop_map(|(connect, a, l)| {
        if connect {
            Op::Connect(a, l)
        } else {
            Op::Disconnect(a, l)
        }
    })
}

proptest! {
    #[test]
    fn validator_agrees_with_reference_model(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut v = ChainValidator::new(directory(), MemoryLedger::new());
        // Reference model: the live ANT -> LNA edges.
        let mut live: HashMap<usize, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Connect(a, l) => {
                    let source_free = !live.contains_key(&a);
                    let target_free = !live.values().any(|&taken| taken == l);
                    let outcome = v.connect(&part(ANTS[a]), &part(LNAS[l]));
                    if source_free && target_free {
                        prop_assert!(outcome.is_ok(), "{outcome:?}");
                        live.insert(a, l);
                    } else {
                        prop_assert!(
                            matches!(outcome, Err(Rejection::AlreadyConnected { .. })),
                            "{outcome:?}"
                        );
                    }
                }
                Op::Disconnect(a, l) => {
                    let outcome = v.disconnect(&part(ANTS[a]), &part(LNAS[l]));
                    if live.get(&a) == Some(&l) {
                        prop_assert!(outcome.is_ok(), "{outcome:?}");
                        live.remove(&a);
                    } else {
                        prop_assert!(
                            matches!(outcome, Err(Rejection::NotConnected { .. })),
                            "{outcome:?}"
                        );
                    }
                }
            }
        }

        // Final derived state matches the model exactly: at most one
        // occupant per slot, and precisely the modeled partner.
        for (a, ant) in ANTS.iter().enumerate() {
            let status = v.status_of(&part(ant)).unwrap();
            match live.get(&a) {
                Some(&l) => prop_assert_eq!(status.source.partner(), Some(&part(LNAS[l]))),
                None => prop_assert!(status.source.is_free()),
            }
        }
        for (l, lna) in LNAS.iter().enumerate() {
            let status = v.status_of(&part(lna)).unwrap();
            let expected = live.iter().find(|&(_, &taken)| taken == l).map(|(&a, _)| a);
            match expected {
                Some(a) => prop_assert_eq!(status.target.partner(), Some(&part(ANTS[a]))),
                None => prop_assert!(status.target.is_free()),
            }
        }

        // The ledger only ever grew.
        prop_assert!(v.ledger().len().unwrap() >= live.len());
    }
}
