//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use super::{Decimal128, Kind};

/// Formats a decimal128 per its canonical string rules (§4.4): a plain
/// integer when the exponent is non-negative and the result isn't too
/// wide, a fixed-point form for small negative exponents, and scientific
/// notation otherwise.
pub fn to_string(value: Decimal128) -> String {
    let sign = if value.is_negative() { "-" } else { "" };
    match value.kind() {
        Kind::NaN => "NaN".to_string(),
        Kind::Infinity => format!("{}Infinity", sign),
        Kind::Finite { exponent, significand } => format_finite(sign, exponent, significand),
    }
}

fn format_finite(sign: &str, exponent: i32, significand: u128) -> String {
    let digits = significand.to_string();
    let ndigits = digits.len() as i32;
    let point = ndigits + exponent;

    if exponent >= 0 {
        if point <= 34 {
            let mut out = String::with_capacity(sign.len() + point as usize);
            out.push_str(sign);
            out.push_str(&digits);
            out.push_str(&"0".repeat(exponent as usize));
            return out;
        }
        return scientific(sign, &digits, exponent);
    }

    if point > 0 {
        let point = point as usize;
        format!("{}{}.{}", sign, &digits[..point], &digits[point..])
    } else if point > -6 {
        format!("{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
    } else if significand == 0 {
        format!("{}0E{}", sign, format_signed_exponent(exponent))
    } else {
        scientific(sign, &digits, exponent)
    }
}

fn scientific(sign: &str, digits: &str, exponent: i32) -> String {
    let adjusted = exponent + digits.len() as i32 - 1;
    if digits.len() == 1 {
        format!("{}{}E{}", sign, digits, format_signed_exponent(adjusted))
    } else {
        format!(
            "{}{}.{}E{}",
            sign,
            &digits[..1],
            &digits[1..],
            format_signed_exponent(adjusted)
        )
    }
}

fn format_signed_exponent(exponent: i32) -> String {
    if exponent >= 0 {
        format!("+{}", exponent)
    } else {
        exponent.to_string()
    }
}
