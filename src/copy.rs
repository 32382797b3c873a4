//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Derived whole-document operations built on top of the iterator and
//! builder: equality, element count, and copy-excluding (§4.2, "Copy
//! excluding").

use crate::error::Result;
use crate::raw::document::RawDocument;
use crate::raw::builder::RawDocumentBuf;

/// Byte-for-byte equality. Two documents compare equal exactly when their
/// backing bytes match, which is also the finest-grained notion possible
/// since the wire format has no canonical form beyond the bytes themselves.
pub fn bytes_equal(a: RawDocument, b: RawDocument) -> bool {
    a.as_bytes() == b.as_bytes()
}

/// The number of direct (non-recursive) elements in `doc`.
pub fn count(doc: RawDocument) -> Result<usize> {
    let mut iter = doc.iter();
    let mut n = 0usize;
    while iter.advance()?.is_some() {
        n += 1;
    }
    Ok(n)
}

/// Walks `source`; for each element whose key is not in `exclude`, appends
/// it to a freshly initialized document using append-from-iterator. The
/// result contains the filtered subset in source order.
pub fn copy_excluding(source: RawDocument, exclude: &[&str]) -> Result<RawDocumentBuf> {
    let mut out = RawDocumentBuf::new();
    let mut iter = source.iter();
    while let Some(element) = iter.advance()? {
        if !exclude.contains(&element.key) {
            out.append_value(element.key, element.value)?;
        }
    }
    Ok(out)
}

/// Copies `source` verbatim via append-from-iterator (§8, "Round-trip:
/// copying D field-by-field via iterator + append-from-iterator produces a
/// byte-identical document").
pub fn copy_all(source: RawDocument) -> Result<RawDocumentBuf> {
    copy_excluding(source, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::builder::RawDocumentBuf;

    #[test]
    fn test_count() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        b.append_i32("b", 2).unwrap();
        assert_eq!(count(b.as_document()).unwrap(), 2);
    }

    #[test]
    fn test_copy_excluding() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        b.append_i32("b", 2).unwrap();
        let filtered = copy_excluding(b.as_document(), &["b"]).unwrap();
        assert_eq!(count(filtered.as_document()).unwrap(), 1);
        assert_eq!(filtered.as_document().get("a").unwrap().unwrap().as_i32(), Some(1));
    }

    #[test]
    fn test_copy_all_is_byte_identical() {
        let mut b = RawDocumentBuf::new();
        b.append_str("k", "v").unwrap();
        let copied = copy_all(b.as_document()).unwrap();
        assert!(bytes_equal(b.as_document(), copied.as_document()));
    }
}
