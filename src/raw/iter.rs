//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The zero-copy forward iterator/validator (§4.1).
//!
//! A stateless-per-step cursor: each `advance` re-derives everything it
//! needs from `next_offset` and the document slice, rather than carrying
//! forward any parsed state from the previous element. On any validation
//! failure the iterator goes terminal and remembers the offending offset,
//! mirroring `bson_iter_t`'s `err_off` field in
//! `original_source/bson/bson-iter.c`.

use std::convert::TryFrom;
use std::str;

use crate::bytes::{checked_add, find_cstring_end, read_f64, read_i32, read_i64, read_u32, read_u64, read_u8, usize_from_i32};
use crate::element_type::ElementType;
use crate::error::{Error, Result};
use crate::oid::ObjectId;
use crate::raw::document::RawDocument;
use crate::raw::value::RawBsonRef;
use crate::decimal128::Decimal128;

/// One decoded element: its discriminator, key, the offset of its
/// discriminator byte (useful for diagnostics and `corrupt` callbacks), and
/// its fully-decoded value.
#[derive(Copy, Clone, Debug)]
pub struct RawElement<'a> {
    pub element_type: ElementType,
    pub key: &'a str,
    pub offset: usize,
    pub value: RawBsonRef<'a>,
}

/// Forward iterator over a single document's direct elements. Does not
/// recurse into nested documents/arrays on its own; see
/// [`RawIter::recurse`].
#[derive(Clone, Debug)]
pub struct RawIter<'a> {
    doc: &'a [u8],
    next_offset: usize,
    terminal: bool,
    error_offset: Option<usize>,
}

impl<'a> RawIter<'a> {
    /// Initializes at the start of `doc`, which must already have passed
    /// [`RawDocument::from_bytes`]'s envelope check.
    pub(crate) fn new(doc: &'a [u8]) -> Self {
        RawIter { doc, next_offset: 4, terminal: false, error_offset: None }
    }

    /// The offset of the first offending byte, once the iterator has gone
    /// terminal due to a validation failure (as opposed to a clean end).
    pub fn error_offset(&self) -> Option<usize> {
        self.error_offset
    }

    fn fail(&mut self, offset: usize, err: Error) -> Error {
        self.terminal = true;
        self.error_offset = Some(offset);
        err
    }

    /// Advances one step. `Ok(None)` means the document ended cleanly;
    /// `Err` means the iterator is now terminal and [`error_offset`] is set.
    pub fn advance(&mut self) -> Result<Option<RawElement<'a>>> {
        if self.terminal {
            return Ok(None);
        }
        let offset = self.next_offset;
        let type_byte = match self.doc.get(offset) {
            Some(&b) => b,
            None => return Err(self.fail(offset, Error::TruncatedDocument)),
        };
        if type_byte == 0 {
            if offset != self.doc.len() - 1 {
                return Err(self.fail(offset, Error::MalformedLength));
            }
            self.terminal = true;
            return Ok(None);
        }

        let element_type = match ElementType::try_from(type_byte) {
            Ok(t) => t,
            Err(e) => return Err(self.fail(offset, e)),
        };

        let key_start = offset + 1;
        let key_rel_end = match find_cstring_end(&self.doc[key_start..]) {
            Ok(rel) => rel,
            Err(e) => return Err(self.fail(offset, e)),
        };
        let key_end = key_start + key_rel_end;
        let key = match str::from_utf8(&self.doc[key_start..key_end]) {
            Ok(k) => k,
            Err(_) => return Err(self.fail(offset, Error::InvalidUtf8 { offset: key_start })),
        };

        let value_start = key_end + 1;
        let (value, next_offset) = match parse_value(self.doc, value_start, element_type) {
            Ok(pair) => pair,
            Err(e) => return Err(self.fail(offset, e)),
        };
        if next_offset > self.doc.len() - 1 {
            return Err(self.fail(offset, Error::TruncatedDocument));
        }

        self.next_offset = next_offset;
        Ok(Some(RawElement { element_type, key, offset, value }))
    }

    /// Advances until a key matches (byte-exact), consuming the iterator
    /// even on a miss, per §4.1 ("Find by key").
    pub fn find_key(&mut self, target: &str) -> Result<Option<RawBsonRef<'a>>> {
        while let Some(element) = self.advance()? {
            if element.key == target {
                return Ok(Some(element.value));
            }
        }
        Ok(None)
    }

    /// Case-insensitive (ASCII-only, locale-independent) variant of
    /// [`find_key`](Self::find_key), per Design Note "case-insensitive key
    /// lookup".
    pub fn find_key_ci(&mut self, target: &str) -> Result<Option<RawBsonRef<'a>>> {
        while let Some(element) = self.advance()? {
            if element.key.eq_ignore_ascii_case(target) {
                return Ok(Some(element.value));
            }
        }
        Ok(None)
    }

    /// Splits `path` on the first `.`, finds the prefix key, and if it is a
    /// document or array, recurses with the suffix; otherwise fails to find.
    pub fn find_path(&mut self, path: &str) -> Result<Option<RawBsonRef<'a>>> {
        match path.find('.') {
            None => self.find_key(path),
            Some(dot) => {
                let (prefix, suffix) = (&path[..dot], &path[dot + 1..]);
                match self.find_key(prefix)? {
                    Some(RawBsonRef::Document(sub)) | Some(RawBsonRef::Array(sub)) => {
                        sub.iter().find_path(suffix)
                    }
                    _ => Ok(None),
                }
            }
        }
    }

    /// Overwrites a fixed-width element's payload bytes in place. Only
    /// legal for bool, int32, int64 and double (§4.1, "Fixed-width in-place
    /// overwrite"); the element's length cannot change, so this never
    /// reshapes the buffer. `element_offset` is an offset previously
    /// yielded as [`RawElement::offset`].
    pub fn overwrite_fixed_width(buf: &mut [u8], element_offset: usize, new_value: RawBsonRef) -> Result<()> {
        let key_start = element_offset.checked_add(1).filter(|&o| o <= buf.len())
            .ok_or(Error::OffsetOutOfRange(element_offset))?;
        let key_end = key_start + find_cstring_end(&buf[key_start..])?;
        let value_start = key_end + 1;
        let width = match new_value {
            RawBsonRef::Boolean(_) => 1,
            RawBsonRef::Int32(_) => 4,
            RawBsonRef::Int64(_) | RawBsonRef::Double(_) => 8,
            _ => return Err(Error::Message("overwrite_fixed_width only supports bool/int32/int64/double".to_string())),
        };
        let value_end = value_start.checked_add(width).filter(|&o| o <= buf.len())
            .ok_or(Error::OffsetOutOfRange(value_start))?;
        match new_value {
            RawBsonRef::Boolean(v) => buf[value_start] = v as u8,
            RawBsonRef::Int32(v) => buf[value_start..value_end].copy_from_slice(&v.to_le_bytes()),
            RawBsonRef::Int64(v) => buf[value_start..value_end].copy_from_slice(&v.to_le_bytes()),
            RawBsonRef::Double(v) => buf[value_start..value_end].copy_from_slice(&v.to_le_bytes()),
            _ => unreachable!(),
        }
        Ok(())
    }
}

/// Parses the value payload for `element_type` starting at `pos` in `doc`,
/// returning the decoded value and the offset of the first byte after it.
/// Implements validation rules (c)-(g) from §4.1.
fn parse_value(doc: &[u8], pos: usize, element_type: ElementType) -> Result<(RawBsonRef, usize)> {
    use ElementType::*;
    match element_type {
        Double => Ok((RawBsonRef::Double(read_f64(slice_from(doc, pos)?)?), checked_add(pos, 8)?)),
        Int32 => Ok((RawBsonRef::Int32(read_i32(slice_from(doc, pos)?)?), checked_add(pos, 4)?)),
        Int64 => Ok((RawBsonRef::Int64(read_i64(slice_from(doc, pos)?)?), checked_add(pos, 8)?)),
        DateTime => Ok((RawBsonRef::DateTime(read_i64(slice_from(doc, pos)?)?), checked_add(pos, 8)?)),
        Timestamp => {
            let increment = read_u32(slice_from(doc, pos)?)?;
            let seconds = read_u32(slice_from(doc, checked_add(pos, 4)?)?)?;
            Ok((RawBsonRef::Timestamp { increment, seconds }, checked_add(pos, 8)?))
        }
        Decimal128 => {
            let low = read_u64(slice_from(doc, pos)?)?;
            let high = read_u64(slice_from(doc, checked_add(pos, 8)?)?)?;
            Ok((RawBsonRef::Decimal128(Decimal128::from_parts(high, low)), checked_add(pos, 16)?))
        }
        Boolean => {
            let byte = read_u8(slice_from(doc, pos)?)?;
            Ok((RawBsonRef::Boolean(byte != 0), checked_add(pos, 1)?))
        }
        ObjectId => {
            let end = checked_add(pos, 12)?;
            let bytes = doc.get(pos..end).ok_or(Error::TruncatedDocument)?;
            let mut arr = [0u8; 12];
            arr.copy_from_slice(bytes);
            Ok((RawBsonRef::ObjectId(ObjectId::from_bytes(arr)), end))
        }
        Undefined => Ok((RawBsonRef::Undefined, pos)),
        Null => Ok((RawBsonRef::Null, pos)),
        MinKey => Ok((RawBsonRef::MinKey, pos)),
        MaxKey => Ok((RawBsonRef::MaxKey, pos)),
        Utf8String => {
            let (s, end) = parse_length_prefixed_string(doc, pos)?;
            Ok((RawBsonRef::String(s), end))
        }
        JavaScriptCode => {
            let (s, end) = parse_length_prefixed_string(doc, pos)?;
            Ok((RawBsonRef::JavaScriptCode(s), end))
        }
        Symbol => {
            let (s, end) = parse_length_prefixed_string(doc, pos)?;
            Ok((RawBsonRef::Symbol(s), end))
        }
        EmbeddedDocument => {
            let (sub, end) = parse_nested_document(doc, pos)?;
            Ok((RawBsonRef::Document(sub), end))
        }
        Array => {
            let (sub, end) = parse_nested_document(doc, pos)?;
            Ok((RawBsonRef::Array(sub), end))
        }
        Binary => {
            let l = usize_from_i32(read_i32(slice_from(doc, pos)?)?)?;
            let subtype_byte = read_u8(slice_from(doc, checked_add(pos, 4)?)?)?;
            let run_start = checked_add(pos, 5)?;
            let run_end = checked_add(run_start, l)?;
            let run = doc.get(run_start..run_end).ok_or(Error::TruncatedDocument)?;
            let subtype = crate::element_type::BinarySubtype::from_u8(subtype_byte);
            let data = if subtype_byte == 0x02 {
                if l < 4 {
                    return Err(Error::DeprecatedBinarySubtype2Underflow);
                }
                &run[4..]
            } else {
                run
            };
            Ok((RawBsonRef::Binary { subtype, data }, run_end))
        }
        RegularExpression => {
            let pattern_end = checked_add(
                pos,
                find_cstring_end(doc.get(pos..).ok_or(Error::TruncatedDocument)?).map_err(|_| Error::InvalidRegex)?,
            )?;
            let pattern = str::from_utf8(&doc[pos..pattern_end]).map_err(|_| Error::InvalidUtf8 { offset: pos })?;
            let options_start = checked_add(pattern_end, 1)?;
            let options_end = checked_add(
                options_start,
                find_cstring_end(doc.get(options_start..).ok_or(Error::TruncatedDocument)?).map_err(|_| Error::InvalidRegex)?,
            )?;
            let options = str::from_utf8(&doc[options_start..options_end]).map_err(|_| Error::InvalidUtf8 { offset: options_start })?;
            Ok((RawBsonRef::RegularExpression { pattern, options }, checked_add(options_end, 1)?))
        }
        DbPointer => {
            let (namespace, after_ns) = parse_length_prefixed_string(doc, pos)?;
            let oid_end = checked_add(after_ns, 12)?;
            let oid_bytes = doc.get(after_ns..oid_end).ok_or(Error::TruncatedDocument)?;
            let mut arr = [0u8; 12];
            arr.copy_from_slice(oid_bytes);
            Ok((RawBsonRef::DbPointer { namespace, id: ObjectId::from_bytes(arr) }, oid_end))
        }
        JavaScriptCodeWithScope => {
            let total = usize_from_i32(read_i32(slice_from(doc, pos)?)?)?;
            if total < 14 {
                return Err(Error::InvalidCodeWithScopeLength);
            }
            let outer_end = checked_add(pos, total)?;
            if outer_end > doc.len() {
                return Err(Error::TruncatedDocument);
            }
            let (code, after_code) = parse_length_prefixed_string(doc, checked_add(pos, 4)?)?;
            let (scope, after_scope) = parse_nested_document(doc, after_code)?;
            if after_scope != outer_end {
                return Err(Error::InvalidCodeWithScopeLength);
            }
            Ok((RawBsonRef::JavaScriptCodeWithScope { code, scope }, outer_end))
        }
    }
}

fn slice_from(doc: &[u8], pos: usize) -> Result<&[u8]> {
    doc.get(pos..).ok_or(Error::TruncatedDocument)
}

/// Parses an `int32 length, bytes..., NUL` payload (rule d): `length` must
/// be `>= 1` and the byte at `length - 1` must be `0x00`.
fn parse_length_prefixed_string(doc: &[u8], pos: usize) -> Result<(&str, usize)> {
    let l = usize_from_i32(read_i32(slice_from(doc, pos)?)?)?;
    if l < 1 {
        return Err(Error::InvalidStringLength);
    }
    let data_start = checked_add(pos, 4)?;
    let data_end = checked_add(data_start, l)?;
    let run = doc.get(data_start..data_end).ok_or(Error::InvalidStringLength)?;
    if run[l - 1] != 0 {
        return Err(Error::MissingStringTerminator);
    }
    let s = str::from_utf8(&run[..l - 1]).map_err(|_| Error::InvalidUtf8 { offset: data_start })?;
    Ok((s, data_end))
}

/// Parses a nested document/array value (rule g): its declared length must
/// fit within the remaining bytes and its own trailing byte must be `0x00`.
fn parse_nested_document(doc: &[u8], pos: usize) -> Result<(RawDocument, usize)> {
    let l = usize_from_i32(read_i32(slice_from(doc, pos)?)?)?;
    if l < 5 {
        return Err(Error::MalformedLength);
    }
    let end = checked_add(pos, l)?;
    let sub = doc.get(pos..end).ok_or(Error::MalformedLength)?;
    if sub[l - 1] != 0 {
        return Err(Error::MissingTerminator);
    }
    Ok((RawDocument::from_validated_slice(sub), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::builder::RawDocumentBuf;

    #[test]
    fn test_overwrite_fixed_width_replaces_int32_in_place() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        let offset = b.as_document().iter().advance().unwrap().unwrap().offset;
        let mut bytes = b.as_document().as_bytes().to_vec();
        RawIter::overwrite_fixed_width(&mut bytes, offset, RawBsonRef::Int32(42)).unwrap();
        let doc = RawDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.get("a").unwrap().unwrap().as_i32(), Some(42));
    }

    #[test]
    fn test_overwrite_fixed_width_rejects_out_of_range_offset() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        let mut bytes = b.as_document().as_bytes().to_vec();
        let bogus_offset = bytes.len() + 10;
        assert_eq!(
            RawIter::overwrite_fixed_width(&mut bytes, bogus_offset, RawBsonRef::Int32(1)),
            Err(Error::OffsetOutOfRange(bogus_offset))
        );
    }

    #[test]
    fn test_regex_missing_options_terminator_is_invalid_regex() {
        // Hand-built: discriminator + key, a properly terminated pattern
        // cstring, then an options run with no 0x00 anywhere in the rest
        // of the buffer.
        let bytes: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x00, // length header (irrelevant to this check)
            0x0B, b'r', b'e', 0x00, // discriminator + key "re"
            b'^', b'a', b'+', b'$', 0x00, // pattern cstring
            b'i', // options, never terminated
        ];
        let doc = RawDocument::from_validated_slice(&bytes);
        let mut iter = doc.iter();
        assert_eq!(iter.advance().unwrap_err(), Error::InvalidRegex);
    }
}
