#![no_main]
use libfuzzer_sys::fuzz_target;

use bsoncore::Decimal128;

fuzz_target!(|data: &[u8]| {
    // Malformed UTF-8 input can't reach `Decimal128::parse` (it takes
    // `&str`); skip bytes that don't decode.
    let Ok(s) = std::str::from_utf8(data) else { return };

    // Must never panic, regardless of input; a render of a successfully
    // parsed non-NaN value must itself re-parse to the same bit pattern.
    let parsed = Decimal128::parse(s);
    if !parsed.is_nan() {
        let rendered = parsed.render();
        let reparsed = Decimal128::parse(&rendered);
        assert_eq!(
            reparsed.to_parts(),
            parsed.to_parts(),
            "round trip of {:?} via {:?} did not converge",
            s,
            rendered
        );
    }
});
