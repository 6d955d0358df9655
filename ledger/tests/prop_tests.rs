use std::collections::HashMap;

use proptest::prelude::*;

use permit_ledger::{ApprovalLedger, LedgerError};
use permit_nullables::{EventRecorder, NullAuthority};
use permit_types::{Address, Amount, AssetId, RegistryId};

#[derive(Clone, Debug)]
enum Op {
    Approve(u8, u8, u8),
    Unapprove(u8, u8, u8),
    Transfer(u8, u8, u8),
}

/// Small domains so that operations collide on the same tuple often.
fn op() -> impl Strategy<Value = Op> {
    let tuple = (0u8..3, 0u8..3, 0u8..3);
    prop_oneof![
        tuple.clone().prop_map(|(f, t, a)| Op::Approve(f, t, a)),
        tuple.clone().prop_map(|(f, t, a)| Op::Unapprove(f, t, a)),
        tuple.prop_map(|(f, t, a)| Op::Transfer(f, t, a)),
    ]
}

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

fn registry() -> RegistryId {
    RegistryId::new(addr(0xAA))
}

fn ledger() -> ApprovalLedger<NullAuthority> {
    let authority = NullAuthority::new().with_registry(registry(), AssetId::new(addr(0xF0)));
    ApprovalLedger::new(authority)
}

fn count(ledger: &ApprovalLedger<NullAuthority>, f: u8, t: u8, a: u8) -> u64 {
    let key = ledger
        .transfer_key(&registry(), &addr(f), &addr(t), Amount::new(a as u128))
        .unwrap();
    ledger.approval_count(&registry(), &key)
}

proptest! {
    /// The ledger agrees with a plain counter model after any operation sequence.
    #[test]
    fn ledger_matches_counter_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut ledger = ledger();
        let recorder = EventRecorder::new();
        ledger.subscribe(recorder.listener());
        let mut model: HashMap<(u8, u8, u8), u64> = HashMap::new();
        let mut expected_events = 0usize;

        for op in &ops {
            match *op {
                Op::Approve(f, t, a) => {
                    ledger.approve(&registry(), &addr(f), &addr(t), Amount::new(a as u128)).unwrap();
                    *model.entry((f, t, a)).or_default() += 1;
                    expected_events += 1;
                }
                Op::Unapprove(f, t, a) => {
                    let result = ledger.unapprove(&registry(), &addr(f), &addr(t), Amount::new(a as u128));
                    let slot = model.entry((f, t, a)).or_default();
                    if *slot == 0 {
                        prop_assert!(matches!(result, Err(LedgerError::NotApproved)));
                    } else {
                        prop_assert!(result.is_ok());
                        *slot -= 1;
                        expected_events += 1;
                    }
                }
                Op::Transfer(f, t, a) => {
                    ledger.on_transfer(&registry(), &addr(f), &addr(t), Amount::new(a as u128)).unwrap();
                    let slot = model.entry((f, t, a)).or_default();
                    if *slot > 0 {
                        *slot -= 1;
                        expected_events += 1;
                    }
                }
            }
        }

        for (&(f, t, a), &expected) in &model {
            prop_assert_eq!(count(&ledger, f, t, a), expected);
            prop_assert_eq!(
                ledger.check_approved(&registry(), &addr(f), &addr(t), Amount::new(a as u128)),
                expected > 0
            );
        }
        prop_assert_eq!(recorder.len(), expected_events);
        prop_assert_eq!(ledger.stats().outstanding, model.values().map(|c| *c as u128).sum::<u128>());
    }

    /// A batch approve lands exactly like the same approvals issued one by one.
    #[test]
    fn batch_approve_equals_sequential(entries in prop::collection::vec((0u8..4, 0u8..4, 0u8..4), 0..32)) {
        let froms: Vec<Address> = entries.iter().map(|e| addr(e.0)).collect();
        let tos: Vec<Address> = entries.iter().map(|e| addr(e.1)).collect();
        let amounts: Vec<Amount> = entries.iter().map(|e| Amount::new(e.2 as u128)).collect();

        let mut batched = ledger();
        let batch_events = EventRecorder::new();
        batched.subscribe(batch_events.listener());
        batched.batch_approve(&registry(), &froms, &tos, &amounts).unwrap();

        let mut sequential = ledger();
        let seq_events = EventRecorder::new();
        sequential.subscribe(seq_events.listener());
        for i in 0..entries.len() {
            sequential.approve(&registry(), &froms[i], &tos[i], amounts[i]).unwrap();
        }

        prop_assert_eq!(batched.snapshot(), sequential.snapshot());
        prop_assert_eq!(batch_events.events(), seq_events.events());
    }

    /// A failed batch unapprove leaves the ledger exactly as it was.
    #[test]
    fn failed_batch_unapprove_changes_nothing(
        approved in prop::collection::vec((0u8..3, 0u8..3, 0u8..3), 1..16),
        missing in 3u8..6,
    ) {
        let mut ledger = ledger();
        for &(f, t, a) in &approved {
            ledger.approve(&registry(), &addr(f), &addr(t), Amount::new(a as u128)).unwrap();
        }
        let before = ledger.snapshot();

        // Every approved tuple once, then one that was never approved.
        let mut froms: Vec<Address> = approved.iter().map(|e| addr(e.0)).collect();
        let mut tos: Vec<Address> = approved.iter().map(|e| addr(e.1)).collect();
        let mut amounts: Vec<Amount> = approved.iter().map(|e| Amount::new(e.2 as u128)).collect();
        froms.push(addr(missing));
        tos.push(addr(missing));
        amounts.push(Amount::new(missing as u128));

        let result = ledger.batch_unapprove(&registry(), &froms, &tos, &amounts);
        prop_assert!(matches!(result, Err(LedgerError::NotApproved)));
        prop_assert_eq!(ledger.snapshot(), before);
    }

    /// Counts never go negative, whatever mix of revocations and transfers.
    #[test]
    fn counts_never_underflow(approvals in 0u8..5, removals in 0u8..10) {
        let mut ledger = ledger();
        for _ in 0..approvals {
            ledger.approve(&registry(), &addr(1), &addr(2), Amount::new(1)).unwrap();
        }
        for i in 0..removals {
            if i % 2 == 0 {
                ledger.on_transfer(&registry(), &addr(1), &addr(2), Amount::new(1)).unwrap();
            } else {
                let _ = ledger.unapprove(&registry(), &addr(1), &addr(2), Amount::new(1));
            }
        }
        prop_assert_eq!(count(&ledger, 1, 2, 1), approvals.saturating_sub(removals) as u64);
    }
}
