//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Decimal128 <-> string vectors, mined from reference conformance
//! fixtures for the BID encoding this format uses on the wire.

use bsoncore::Decimal128;

fn render(high: u64, low: u64) -> String {
    Decimal128::from_parts(high, low).render()
}

#[test]
fn small_integers_render_without_an_exponent() {
    assert_eq!(render(0x3040000000000000, 1), "1");
    assert_eq!(render(0x3040000000000000, 0), "0");
    assert_eq!(render(0x3040000000000000, 2), "2");
    assert_eq!(render(0xb040000000000000, 1), "-1");
    assert_eq!(render(0xb040000000000000, 0), "-0");
}

#[test]
fn fixed_point_fractions_render_without_an_exponent() {
    assert_eq!(render(0x303e000000000000, 1), "0.1");
    assert_eq!(render(0x3034000000000000, 0x4d2), "0.001234");
    assert_eq!(render(0x302a000000000000, 0x075aef40), "0.00123400000");
}

#[test]
fn large_significands_render_as_plain_integers() {
    assert_eq!(render(0x3040000000000000, 0x1cbe991a14), "123456789012");
}

#[test]
fn zero_with_a_large_exponent_renders_in_scientific_form() {
    assert_eq!(render(0x3298000000000000, 0), "0E+300");
    assert_eq!(render(0x2b90000000000000, 0), "0E-600");
}

#[test]
fn parse_round_trips_every_rendered_form() {
    let vectors: &[(u64, u64)] = &[
        (0x3040000000000000, 1),
        (0x3040000000000000, 0),
        (0xb040000000000000, 1),
        (0x303e000000000000, 1),
        (0x3034000000000000, 0x4d2),
        (0x302a000000000000, 0x075aef40),
        (0x3298000000000000, 0),
        (0x2b90000000000000, 0),
    ];
    for &(high, low) in vectors {
        let original = Decimal128::from_parts(high, low);
        let reparsed = Decimal128::parse(&original.render());
        assert_eq!(reparsed.to_parts(), original.to_parts(), "round trip of {}", original.render());
    }
}

#[test]
fn parse_handles_scientific_notation_and_normalizes_trailing_zeros() {
    assert_eq!(Decimal128::parse("10e0").to_parts(), (0x3040000000000000, 0xa));
    assert_eq!(Decimal128::parse("1e1").to_parts(), (0x3042000000000000, 0x1));
    assert_eq!(Decimal128::parse("10e-1").to_parts(), (0x303e000000000000, 0xa));
    assert_eq!(Decimal128::parse("-100E-10").to_parts(), (0xb02c000000000000, 0x64));
}

#[test]
fn parse_strips_leading_zeros_from_the_integer_part() {
    assert_eq!(
        Decimal128::parse("0.12345").to_parts(),
        (0x3036000000000000, 0x3039)
    );
    assert_eq!(
        Decimal128::parse("0.0012345").to_parts(),
        (0x3032000000000000, 0x3039)
    );
    assert_eq!(
        Decimal128::parse("00012345678901234567").to_parts(),
        Decimal128::parse("12345678901234567").to_parts()
    );
}

#[test]
fn parse_treats_every_malformed_input_as_nan() {
    for input in &[
        ".", ".e", "", "invalid", "in", "i", "E02", "..1", "1abcede", "1.24abc",
        "1.24abcE+02", "1.24E+02abc2d", "E+02", "e+02",
    ] {
        assert!(Decimal128::parse(input).is_nan(), "expected NaN for {:?}", input);
    }
}

#[test]
fn parse_recognizes_every_nan_spelling() {
    for input in &["NaN", "+NaN", "-NaN", "-nan", "+nan", "nan", "Nan", "+Nan", "-Nan"] {
        assert!(Decimal128::parse(input).is_nan(), "expected NaN for {:?}", input);
    }
}

#[test]
fn parse_recognizes_infinity_with_and_without_a_sign() {
    assert!(Decimal128::parse("Infinity").is_infinite());
    assert!(!Decimal128::parse("Infinity").is_negative());
    assert!(Decimal128::parse("+Infinity").is_infinite());
    assert!(Decimal128::parse("+Inf").is_infinite());
    assert!(Decimal128::parse("-Inf").is_infinite());
    assert!(Decimal128::parse("-Inf").is_negative());
    assert!(Decimal128::parse("-Infinity").is_infinite());
    assert!(Decimal128::parse("-Infinity").is_negative());
}

#[test]
fn parse_rounds_half_to_even_when_the_exponent_underflows() {
    assert_eq!(Decimal128::parse("10E-6177").to_parts(), (0, 1));
    assert_eq!(Decimal128::parse("15E-6177").to_parts(), (0, 2));
    assert_eq!(Decimal128::parse("251E-6178").to_parts(), (0, 3));
    assert_eq!(Decimal128::parse("250E-6178").to_parts(), (0, 2));
}

#[test]
fn parse_zero_with_various_exponents() {
    assert_eq!(Decimal128::parse("0").to_parts(), (0x3040000000000000, 0));
    assert_eq!(Decimal128::parse("0e-611").to_parts(), (0x2b7a000000000000, 0));
    assert_eq!(Decimal128::parse("0e+6000").to_parts(), (0x5f20000000000000, 0));
    assert_eq!(Decimal128::parse("-0e-1").to_parts(), (0xb03e000000000000, 0));
}
