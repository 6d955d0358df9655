#![no_main]

use libfuzzer_sys::fuzz_target;
use permit_ledger::TableSnapshot;

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, and anything that decodes must verify and
    // survive a re-encode.
    if let Ok(snapshot) = TableSnapshot::from_bytes(data) {
        snapshot.verify().expect("decoded snapshot verifies");
        let bytes = snapshot.to_bytes().expect("re-encode");
        let again = TableSnapshot::from_bytes(&bytes).expect("decode re-encoded");
        assert_eq!(again, snapshot);
    }

    let _ = bincode::deserialize::<permit_types::TransferKey>(data);
});
