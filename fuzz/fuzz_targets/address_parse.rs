//! Fuzz target for address and handle parsing
//!
//! # Invariants
//!
//! - Parsing NEVER panics on arbitrary input
//! - Accepted addresses round-trip through both lowercase and checksummed
//!   textual forms
//! - Accepted handles round-trip through their hex form

#![no_main]

use arbitrary::Arbitrary;
use hushlink_crypto::{Address, Handle};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct ParseInput {
    text: String,
}

fuzz_target!(|input: ParseInput| {
    if let Ok(address) = input.text.parse::<Address>() {
        let lower: Address = address.to_lowercase_hex().parse().expect("lowercase form parses");
        let checksummed: Address =
            address.to_checksummed().parse().expect("checksummed form parses");
        assert_eq!(lower, address);
        assert_eq!(checksummed, address);
    }

    if let Ok(handle) = input.text.parse::<Handle>() {
        let reparsed: Handle = handle.to_hex().parse().expect("hex form parses");
        assert_eq!(reparsed, handle);
    }
});
