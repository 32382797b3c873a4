//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! End-to-end coverage of the six worked scenarios, built and read through
//! the public surface only (no access to crate internals).

use bsoncore::raw::{RawDocument, RawDocumentBuf};
use bsoncore::validator::{flags, validate};
use bsoncore::Decimal128;

#[test]
fn empty_document_is_five_bytes() {
    let b = RawDocumentBuf::new();
    assert_eq!(b.as_bytes(), &[0x05, 0x00, 0x00, 0x00, 0x00]);

    let doc = b.as_document();
    let mut iter = doc.iter();
    assert_eq!(iter.advance().unwrap(), None);
}

#[test]
fn single_int32_matches_wire_bytes() {
    let mut b = RawDocumentBuf::new();
    b.append_i32("a", 1).unwrap();
    assert_eq!(
        b.as_bytes(),
        &[0x0C, 0x00, 0x00, 0x00, 0x10, 0x61, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );

    let doc = b.as_document();
    let mut iter = doc.iter();
    let element = iter.advance().unwrap().unwrap();
    assert_eq!(element.key, "a");
    assert_eq!(element.value.as_i32(), Some(1));
    assert_eq!(iter.advance().unwrap(), None);
}

#[test]
fn nested_array_round_trips_two_int32s() {
    let mut b = RawDocumentBuf::new();
    b.start_array("xs").unwrap();
    b.append_i32("0", 10).unwrap();
    b.append_i32("1", 20).unwrap();
    b.finish_array().unwrap();
    assert_eq!(b.as_bytes().len(), 27);

    let doc = b.as_document();
    let xs = doc.get("xs").unwrap().unwrap().as_array().unwrap();
    let mut it = xs.iter();
    assert_eq!(it.advance().unwrap().unwrap().value.as_i32(), Some(10));
    assert_eq!(it.advance().unwrap().unwrap().value.as_i32(), Some(20));
    assert_eq!(it.advance().unwrap(), None);
}

#[test]
fn decimal128_one_round_trips_through_the_string_form() {
    let d = Decimal128::from_parts(0x3040000000000000, 0x0000000000000001);
    assert_eq!(d.render(), "1");
    assert_eq!(Decimal128::parse("1").to_parts(), d.to_parts());
}

#[test]
fn decimal128_tiny_negative_renders_in_scientific_form() {
    let d = Decimal128::from_parts(0x8000000000000000, 0x0000000000000001);
    assert_eq!(d.render(), "-1E-6176");
}

#[test]
fn corrupt_string_length_is_reported_at_the_discriminator_offset() {
    // `10 61 00` (int32 "a") followed by a string element whose declared
    // length reaches past the document's end.
    let bytes: Vec<u8> = vec![
        0x00, 0x00, 0x00, 0x00, // length patched below
        0x02, b'b', 0x00, // discriminator + key "b"
        0xFF, 0x00, 0x00, 0x00, // declared length far past the buffer
        b'x', 0x00,
        0x00, // terminator
    ];
    let mut bytes = bytes;
    let len = bytes.len() as i32;
    bytes[0..4].copy_from_slice(&len.to_le_bytes());

    let doc = RawDocument::from_bytes(&bytes).unwrap();
    let offset = validate(doc, flags::UTF8);
    assert_eq!(offset, Some(4));
}
