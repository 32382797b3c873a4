//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Little-endian load/store helpers and bounds-checked slicing.
//!
//! Every function here either returns a value or fails with [`Error::TruncatedDocument`],
//! never panics on a short buffer. This is the only place in the crate that reaches
//! into a byte slice with a raw numeric offset; every other module goes through these.

use std::convert::{TryFrom, TryInto};

use crate::error::{Error, Result};

/// The maximum size of a BSON document: `2^31 - 1` bytes.
pub const MAX_DOCUMENT_SIZE: i64 = i32::max_value() as i64;

#[inline]
pub fn read_i32(buf: &[u8]) -> Result<i32> {
    let arr: [u8; 4] = buf.get(0..4)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::TruncatedDocument)?;
    Ok(i32::from_le_bytes(arr))
}

#[inline]
pub fn read_u32(buf: &[u8]) -> Result<u32> {
    read_i32(buf).map(|v| v as u32)
}

#[inline]
pub fn read_i64(buf: &[u8]) -> Result<i64> {
    let arr: [u8; 8] = buf.get(0..8)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::TruncatedDocument)?;
    Ok(i64::from_le_bytes(arr))
}

#[inline]
pub fn read_u64(buf: &[u8]) -> Result<u64> {
    read_i64(buf).map(|v| v as u64)
}

#[inline]
pub fn read_f64(buf: &[u8]) -> Result<f64> {
    let arr: [u8; 8] = buf.get(0..8)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::TruncatedDocument)?;
    Ok(f64::from_le_bytes(arr))
}

#[inline]
pub fn read_u8(buf: &[u8]) -> Result<u8> {
    buf.get(0).copied().ok_or(Error::TruncatedDocument)
}

pub fn write_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u32(buf: &mut Vec<u8>, value: u32) {
    write_i32(buf, value as i32);
}

pub fn write_i64(buf: &mut Vec<u8>, value: i64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_u8(buf: &mut Vec<u8>, value: u8) {
    buf.push(value);
}

/// Converts a declared length to a `usize`, rejecting negative values.
pub fn usize_from_i32(value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::MalformedLength)
}

/// Adds two `usize` values, rejecting overflow rather than wrapping.
pub fn checked_add(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_add(rhs).ok_or(Error::MalformedLength)
}

/// Scans `buf` for the first `0x00` byte and returns the byte range of the
/// C string (excluding the terminator) together with the index just past it.
pub fn find_cstring_end(buf: &[u8]) -> Result<usize> {
    buf.iter().position(|&b| b == 0).ok_or(Error::MissingOrInvalidKeyTerminator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_i32_roundtrip() {
        let mut buf = Vec::new();
        write_i32(&mut buf, -42);
        assert_eq!(read_i32(&buf).unwrap(), -42);
    }

    #[test]
    fn test_read_i32_truncated() {
        assert_eq!(read_i32(&[0x01, 0x02]).unwrap_err(), Error::TruncatedDocument);
    }

    #[test]
    fn test_find_cstring_end() {
        assert_eq!(find_cstring_end(b"abc\0def").unwrap(), 3);
        assert_eq!(find_cstring_end(b"abc").unwrap_err(), Error::MissingOrInvalidKeyTerminator);
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(checked_add(usize::max_value(), 1).unwrap_err(), Error::MalformedLength);
    }
}
