//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The validator (§4.3): end-to-end structural checks plus opt-in key and
//! string policy, selected by a bitset.

use crate::error::Error;
use crate::raw::document::RawDocument;
use crate::raw::value::RawBsonRef;

/// Validator flag bits (§6), composed by bitwise-or.
pub mod flags {
    pub const UTF8: u32 = 0x1;
    pub const DOLLAR_KEYS: u32 = 0x2;
    pub const DOT_KEYS: u32 = 0x4;
    pub const UTF8_ALLOW_NULL: u32 = 0x8;
    pub const KEY_NUL: u32 = 0x10;
}

/// Runs the iterator end-to-end over `doc` (recursing into every nested
/// document/array), additionally checking whatever `flags` request.
/// Returns the offset of the first offending byte, or `None` if the
/// document is clean.
pub fn validate(doc: RawDocument, flags: u32) -> Option<usize> {
    validate_recursive(doc, flags).err().map(|(offset, _)| offset)
}

/// Same traversal as [`validate`], but keeps the specific [`Error`] each
/// check produces instead of collapsing every failure down to an offset.
fn validate_recursive(doc: RawDocument, flags: u32) -> std::result::Result<(), (usize, Error)> {
    let mut iter = doc.iter();
    loop {
        match iter.advance() {
            Ok(None) => return Ok(()),
            Err(err) => return Err((iter.error_offset().unwrap_or(0), err)),
            Ok(Some(element)) => {
                if flags & flags::DOLLAR_KEYS != 0 && element.key.starts_with('$') {
                    return Err((element.offset, Error::KeyStartsWithDollar));
                }
                if flags & flags::DOT_KEYS != 0 && element.key.contains('.') {
                    return Err((element.offset, Error::KeyContainsDot));
                }
                // A key is decoded as everything up to the first 0x00 in the
                // buffer (see bytes::find_cstring_end), so an embedded NUL
                // would already have terminated the key before this point.
                // Checked anyway to keep this flag's coverage honest rather
                // than pretending the bitset has one fewer check than it does.
                if flags & flags::KEY_NUL != 0 && element.key.as_bytes().contains(&0) {
                    return Err((element.offset, Error::KeyContainsNul));
                }
                if flags & flags::UTF8 != 0 {
                    if let Some(offset) = check_utf8(&element.value, flags) {
                        return Err((offset, Error::InvalidUtf8 { offset }));
                    }
                }
                match element.value {
                    RawBsonRef::Document(sub) | RawBsonRef::Array(sub) => {
                        validate_recursive(sub, flags)?;
                    }
                    RawBsonRef::JavaScriptCodeWithScope { scope, .. } => {
                        validate_recursive(scope, flags)?;
                    }
                    _ => {}
                }
            }
        }
    }
}

/// String-like payloads are already guaranteed valid UTF-8 by the iterator
/// (it rejects invalid UTF-8 as [`Error::InvalidUtf8`] while decoding); this
/// flag governs the narrower "allow embedded NUL" relaxation.
fn check_utf8(value: &RawBsonRef, flags: u32) -> Option<usize> {
    let allow_null = flags & flags::UTF8_ALLOW_NULL != 0;
    let contains_disallowed_null = |s: &str| !allow_null && s.as_bytes().contains(&0);
    match value {
        RawBsonRef::String(s) | RawBsonRef::JavaScriptCode(s) | RawBsonRef::Symbol(s) => {
            if contains_disallowed_null(s) {
                Some(0)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Convenience: validate and convert a clean result into `Result<(), Error>`,
/// surfacing whichever specific [`Error`] the failing check produced.
pub fn validate_strict(doc: RawDocument, flags: u32) -> crate::error::Result<()> {
    validate_recursive(doc, flags).map_err(|(_, err)| err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::builder::RawDocumentBuf;

    #[test]
    fn test_clean_document_validates() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        assert_eq!(validate(b.as_document(), flags::UTF8), None);
    }

    #[test]
    fn test_dollar_key_rejected() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("$bad", 1).unwrap();
        assert!(validate(b.as_document(), flags::DOLLAR_KEYS).is_some());
    }

    #[test]
    fn test_dot_key_rejected() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a.b", 1).unwrap();
        assert!(validate(b.as_document(), flags::DOT_KEYS).is_some());
    }

    #[test]
    fn test_dollar_key_strict_reports_specific_error() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("$bad", 1).unwrap();
        assert_eq!(
            validate_strict(b.as_document(), flags::DOLLAR_KEYS),
            Err(Error::KeyStartsWithDollar)
        );
    }

    #[test]
    fn test_key_nul_flag_never_fires_given_cstring_key_parsing() {
        // Keys are decoded up to the first 0x00 in the buffer, so a decoded
        // key can never itself contain an embedded NUL; this flag exists for
        // parity with the other per-key checks and always passes on input
        // that made it through key decoding at all.
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        assert_eq!(validate(b.as_document(), flags::KEY_NUL), None);
    }

    #[test]
    fn test_corrupt_string_length_reports_discriminator_offset() {
        // "a": utf8 with declared length far past the end of the buffer.
        let bytes: Vec<u8> = vec![
            0x0D, 0x00, 0x00, 0x00, // total length (wrong on purpose, irrelevant to this check)
            0x02, b'a', 0x00, // discriminator + key
            0xFF, 0x00, 0x00, 0x00, // declared string length: way too large
            0x00,
        ];
        // Construct directly to bypass the envelope check (we only care
        // about per-element validation here).
        let doc = crate::raw::document::RawDocument::from_validated_slice(&bytes);
        assert_eq!(validate(doc, 0), Some(4));
    }
}
