//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # `RawDocument` — a validated, read-only, zero-copy view of a document.
//!
//! Mirrors `bson_iter_init`'s envelope check in
//! `original_source/bson/bson-iter.c`: length at least 5, trailing byte
//! `0x00`. Per-element validation is deferred to [`RawIter`] as elements are
//! actually visited, the same "validate on the fly" split the original
//! implementation makes between `bson_iter_init` and `bson_iter_next`.

use crate::bytes::{read_i32, usize_from_i32};
use crate::error::{Error, Result};
use crate::raw::iter::RawIter;

/// A borrowed, envelope-validated document. Construction checks only the
/// outer length/terminator invariant (§3); per-element structure is
/// validated lazily by [`iter`](Self::iter).
#[derive(Copy, Clone, Debug)]
pub struct RawDocument<'a>(&'a [u8]);

impl<'a> RawDocument<'a> {
    /// Validates `data`'s envelope and wraps it. Rejects buffers shorter
    /// than 5 bytes, a declared length that disagrees with `data.len()`,
    /// and a missing trailing `0x00`.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        if data.len() < 5 {
            return Err(Error::TruncatedDocument);
        }
        let declared = usize_from_i32(read_i32(data)?)?;
        if declared != data.len() {
            return Err(Error::MalformedLength);
        }
        if data[data.len() - 1] != 0 {
            return Err(Error::MissingTerminator);
        }
        Ok(RawDocument(data))
    }

    /// Wraps an already-validated slice (the nested-document case: its
    /// length and terminator were checked by the parent's `parse_value`
    /// as it sliced `sub` out of the enclosing buffer).
    pub(crate) fn from_validated_slice(data: &'a [u8]) -> Self {
        RawDocument(data)
    }

    /// The raw bytes backing this document, including the length header
    /// and terminator.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// A fresh iterator positioned before this document's first element.
    pub fn iter(&self) -> RawIter<'a> {
        RawIter::new(self.0)
    }

    /// Looks up a key by byte-exact match, consuming a fresh iterator.
    pub fn get(&self, key: &str) -> Result<Option<crate::raw::value::RawBsonRef<'a>>> {
        self.iter().find_key(key)
    }

    /// Looks up a dotted path, recursing through nested documents/arrays.
    pub fn get_path(&self, path: &str) -> Result<Option<crate::raw::value::RawBsonRef<'a>>> {
        self.iter().find_path(path)
    }

    /// The number of direct (non-recursive) elements, or the first
    /// validation error encountered while counting.
    pub fn len(&self) -> Result<usize> {
        crate::copy::count(*self)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<'a> PartialEq for RawDocument<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<'a> Eq for RawDocument<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_roundtrip() {
        let bytes = [0x05, 0x00, 0x00, 0x00, 0x00];
        let doc = RawDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.iter().advance().unwrap(), None);
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert_eq!(RawDocument::from_bytes(&[0x01, 0x00]).unwrap_err(), Error::TruncatedDocument);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let bytes = [0x06, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(RawDocument::from_bytes(&bytes).unwrap_err(), Error::MalformedLength);
    }

    #[test]
    fn test_rejects_missing_terminator() {
        let bytes = [0x05, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(RawDocument::from_bytes(&bytes).unwrap_err(), Error::MissingTerminator);
    }
}
