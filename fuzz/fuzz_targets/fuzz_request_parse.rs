//! Fuzz target: distribution request parsing + calculation
//!
//! Feeds arbitrary bytes to parse_request. Whatever parses must run through
//! the engine without panicking and must conserve cash to the cent.
//!
//! Run: cargo +nightly fuzz run fuzz_request_parse

#![no_main]
use libfuzzer_sys::fuzz_target;
use waterfall_core::{calculate_waterfall, parse_request};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parsed) = parse_request(s) else {
        return;
    };
    // Invalid tier parameters are a clean error, never a panic
    let Ok(result) = calculate_waterfall(&parsed.request) else {
        return;
    };

    assert_eq!(
        result.total_distributed + result.remaining_undistributed,
        parsed.request.total_distributable
    );
    let items: u128 = result.line_items.iter().map(|i| i.amount).sum();
    assert_eq!(items, result.total_distributed);
});
