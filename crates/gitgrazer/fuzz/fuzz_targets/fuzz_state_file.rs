#![no_main]

//! Fuzz target for state file parsing
//!
//! Arbitrary bytes must either parse into a set of SHAs or produce an
//! error, never panic.

use libfuzzer_sys::fuzz_target;

use gitgrazer::store::parse_state;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(shas) = parse_state(s)
    {
        // Re-serializing what we accepted must round-trip
        let mut sorted: Vec<&String> = shas.iter().collect();
        sorted.sort();
        let raw = serde_json::to_string(&sorted).expect("serialize");
        assert_eq!(parse_state(&raw).expect("reparse"), shas);
    }
});
