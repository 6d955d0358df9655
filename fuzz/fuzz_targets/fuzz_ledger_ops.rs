#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use permit_ledger::{ApprovalLedger, LedgerError};
use permit_nullables::NullAuthority;
use permit_types::{Address, Amount, AssetId, RegistryId};

#[derive(Arbitrary, Debug)]
enum Op {
    Approve { from: u8, to: u8, amount: u8 },
    Unapprove { from: u8, to: u8, amount: u8 },
    Transfer { from: u8, to: u8, amount: u8 },
    BatchApprove(Vec<(u8, u8, u8)>),
    BatchUnapprove(Vec<(u8, u8, u8)>),
}

fn addr(byte: u8) -> Address {
    Address::new([byte % 4; 20])
}

fn amount(byte: u8) -> Amount {
    Amount::new(u128::from(byte % 4))
}

fn split(entries: &[(u8, u8, u8)]) -> (Vec<Address>, Vec<Address>, Vec<Amount>) {
    (
        entries.iter().map(|e| addr(e.0)).collect(),
        entries.iter().map(|e| addr(e.1)).collect(),
        entries.iter().map(|e| amount(e.2)).collect(),
    )
}

fuzz_target!(|ops: Vec<Op>| {
    let registry = RegistryId::new(Address::new([0xAA; 20]));
    let asset = AssetId::new(Address::new([0xF0; 20]));
    let mut ledger = ApprovalLedger::new(NullAuthority::new().with_registry(registry, asset));

    for op in ops {
        let before = ledger.snapshot();
        let result = match op {
            Op::Approve { from, to, amount: a } => {
                ledger.approve(&registry, &addr(from), &addr(to), amount(a))
            }
            Op::Unapprove { from, to, amount: a } => {
                ledger.unapprove(&registry, &addr(from), &addr(to), amount(a))
            }
            Op::Transfer { from, to, amount: a } => {
                ledger.on_transfer(&registry, &addr(from), &addr(to), amount(a))
            }
            Op::BatchApprove(entries) => {
                let (f, t, a) = split(&entries);
                ledger.batch_approve(&registry, &f, &t, &a)
            }
            Op::BatchUnapprove(entries) => {
                let (f, t, a) = split(&entries);
                ledger.batch_unapprove(&registry, &f, &t, &a)
            }
        };
        match result {
            Ok(()) => {}
            Err(LedgerError::NotApproved) => {
                assert_eq!(ledger.snapshot(), before, "failed operation changed the table");
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
});
