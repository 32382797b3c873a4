#![no_main]
use libfuzzer_sys::fuzz_target;

use bsoncore::raw::RawDocument;
use bsoncore::validator::{flags, validate};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through envelope parsing and full validation.
    // Err/Some results are expected and fine; what's verified is no panics.
    if let Ok(doc) = RawDocument::from_bytes(data) {
        let _ = validate(doc, flags::UTF8 | flags::DOLLAR_KEYS | flags::DOT_KEYS);
    }
});
