#![no_main]

use libfuzzer_sys::fuzz_target;
use permit_types::{Address, Amount, RegistryId};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must never panic; successful parses survive a render/parse cycle.
    if let Ok(addr) = s.parse::<Address>() {
        let again: Address = addr.to_string().parse().expect("rendered address parses");
        assert_eq!(again, addr);
    }
    let _ = s.parse::<RegistryId>();
    let _ = s.parse::<Amount>();
});
