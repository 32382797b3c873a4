#![no_main]
use libfuzzer_sys::fuzz_target;

use bsoncore::raw::RawDocumentBuf;

fuzz_target!(|data: &[u8]| {
    // Treat the input as a list of (key-byte, value) int32 pairs and check
    // that every appended pair is recoverable afterwards, and that the
    // builder's own output re-parses cleanly.
    let mut builder = RawDocumentBuf::new();
    let mut expected = Vec::new();

    for pair in data.chunks_exact(5) {
        let key = pair[0].to_string();
        let value = i32::from_le_bytes([pair[1], pair[2], pair[3], pair[4]]);
        if builder.append_i32(&key, value).is_err() {
            // Only the size limit can fail here; stop appending but still
            // check what was built so far.
            break;
        }
        expected.push((key, value));
    }

    let doc = builder.as_document();
    for (key, value) in &expected {
        let found = doc.get(key).unwrap().and_then(|v| v.as_i32());
        // Duplicate keys overwrite nothing (BSON allows repeats); only
        // assert that *some* value is present for every key we appended.
        assert!(found.is_some(), "key {:?} missing after building", key);
    }
});
