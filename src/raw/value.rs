//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A single enum covering every discriminator, so typed accessors and the
//! visitor callbacks share one representation instead of sixteen separate
//! `get_*` signatures duplicating the same match. Modeled on the real `bson`
//! crate's `RawBsonRef` (`other_examples/67dee747_mongodb-bson-rust__src-raw.rs.rs`).

use crate::decimal128::Decimal128;
use crate::element_type::{BinarySubtype, ElementType};
use crate::oid::ObjectId;
use crate::raw::document::RawDocument;

/// A borrowed BSON value: every variant either holds a `Copy` scalar or a
/// slice/sub-view into the original document buffer. Lives exactly as long
/// as the document it was read from (§4.1, "pointer-returning accessors
/// return slices that live as long as the underlying document").
#[derive(Copy, Clone, Debug)]
pub enum RawBsonRef<'a> {
    Double(f64),
    String(&'a str),
    Document(RawDocument<'a>),
    Array(RawDocument<'a>),
    Binary { subtype: BinarySubtype, data: &'a [u8] },
    Undefined,
    ObjectId(ObjectId),
    Boolean(bool),
    DateTime(i64),
    Null,
    RegularExpression { pattern: &'a str, options: &'a str },
    DbPointer { namespace: &'a str, id: ObjectId },
    JavaScriptCode(&'a str),
    Symbol(&'a str),
    JavaScriptCodeWithScope { code: &'a str, scope: RawDocument<'a> },
    Int32(i32),
    Timestamp { increment: u32, seconds: u32 },
    Int64(i64),
    Decimal128(Decimal128),
    MinKey,
    MaxKey,
}

impl<'a> RawBsonRef<'a> {
    pub fn element_type(&self) -> ElementType {
        use RawBsonRef::*;
        match self {
            Double(_) => ElementType::Double,
            String(_) => ElementType::Utf8String,
            Document(_) => ElementType::EmbeddedDocument,
            Array(_) => ElementType::Array,
            Binary { .. } => ElementType::Binary,
            Undefined => ElementType::Undefined,
            ObjectId(_) => ElementType::ObjectId,
            Boolean(_) => ElementType::Boolean,
            DateTime(_) => ElementType::DateTime,
            Null => ElementType::Null,
            RegularExpression { .. } => ElementType::RegularExpression,
            DbPointer { .. } => ElementType::DbPointer,
            JavaScriptCode(_) => ElementType::JavaScriptCode,
            Symbol(_) => ElementType::Symbol,
            JavaScriptCodeWithScope { .. } => ElementType::JavaScriptCodeWithScope,
            Int32(_) => ElementType::Int32,
            Timestamp { .. } => ElementType::Timestamp,
            Int64(_) => ElementType::Int64,
            Decimal128(_) => ElementType::Decimal128,
            MinKey => ElementType::MinKey,
            MaxKey => ElementType::MaxKey,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawBsonRef::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            RawBsonRef::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            RawBsonRef::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawBsonRef::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawBsonRef::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<RawDocument<'a>> {
        match self {
            RawBsonRef::Document(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<RawDocument<'a>> {
        match self {
            RawBsonRef::Array(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            RawBsonRef::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_datetime_millis(&self) -> Option<i64> {
        match self {
            RawBsonRef::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<(BinarySubtype, &'a [u8])> {
        match self {
            RawBsonRef::Binary { subtype, data } => Some((*subtype, data)),
            _ => None,
        }
    }

    pub fn as_decimal128(&self) -> Option<Decimal128> {
        match self {
            RawBsonRef::Decimal128(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<(&'a str, &'a str)> {
        match self {
            RawBsonRef::RegularExpression { pattern, options } => Some((pattern, options)),
            _ => None,
        }
    }

    pub fn as_db_pointer(&self) -> Option<(&'a str, ObjectId)> {
        match self {
            RawBsonRef::DbPointer { namespace, id } => Some((namespace, *id)),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&'a str> {
        match self {
            RawBsonRef::JavaScriptCode(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&'a str> {
        match self {
            RawBsonRef::Symbol(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_code_with_scope(&self) -> Option<(&'a str, RawDocument<'a>)> {
        match self {
            RawBsonRef::JavaScriptCodeWithScope { code, scope } => Some((code, *scope)),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<(u32, u32)> {
        match self {
            RawBsonRef::Timestamp { increment, seconds } => Some((*increment, *seconds)),
            _ => None,
        }
    }

    /// Widens numeric and boolean types to a boolean per the `as-bool`
    /// conversion table in §7: bool keeps its value, double/int32/int64
    /// are nonzero-truthy, utf8 is always true, null/undefined are false,
    /// everything else is true.
    pub fn widen_to_bool(&self) -> bool {
        use RawBsonRef::*;
        match self {
            Boolean(v) => *v,
            Double(v) => *v != 0.0,
            Int32(v) => *v != 0,
            Int64(v) => *v != 0,
            Null | Undefined => false,
            _ => true,
        }
    }

    /// Widens numeric and boolean types to an `i64` per the `as-int64`
    /// conversion table in §7.
    pub fn widen_to_i64(&self) -> i64 {
        use RawBsonRef::*;
        match self {
            Boolean(v) => i64::from(*v),
            Double(v) => *v as i64,
            Int32(v) => i64::from(*v),
            Int64(v) => *v,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::raw::builder::RawDocumentBuf;

    #[test]
    fn test_as_regex() {
        let mut b = RawDocumentBuf::new();
        b.append_regular_expression("re", "^a+$", "i").unwrap();
        let doc = b.as_document();
        assert_eq!(doc.get("re").unwrap().unwrap().as_regex(), Some(("^a+$", "i")));
    }

    #[test]
    fn test_as_code_and_as_symbol() {
        let mut b = RawDocumentBuf::new();
        b.append_javascript("fn", "return 1;").unwrap();
        b.append_symbol("sym", "s").unwrap();
        let doc = b.as_document();
        assert_eq!(doc.get("fn").unwrap().unwrap().as_code(), Some("return 1;"));
        assert_eq!(doc.get("sym").unwrap().unwrap().as_symbol(), Some("s"));
    }

    #[test]
    fn test_as_timestamp() {
        let mut b = RawDocumentBuf::new();
        b.append_timestamp("ts", 7, 1234).unwrap();
        let doc = b.as_document();
        assert_eq!(doc.get("ts").unwrap().unwrap().as_timestamp(), Some((7, 1234)));
    }

    #[test]
    fn test_as_db_pointer() {
        use crate::oid::ObjectId;
        let mut b = RawDocumentBuf::new();
        let id = ObjectId::from_bytes([1; 12]);
        b.append_db_pointer("ptr", "db.coll", id).unwrap();
        let doc = b.as_document();
        let (namespace, got_id) = doc.get("ptr").unwrap().unwrap().as_db_pointer().unwrap();
        assert_eq!(namespace, "db.coll");
        assert_eq!(got_id, id);
    }

    #[test]
    fn test_as_code_with_scope() {
        let mut b = RawDocumentBuf::new();
        let mut scope = RawDocumentBuf::new();
        scope.append_i32("x", 1).unwrap();
        b.append_code_with_scope("cws", "return x;", scope.as_document()).unwrap();
        let doc = b.as_document();
        let (code, scope_doc) = doc.get("cws").unwrap().unwrap().as_code_with_scope().unwrap();
        assert_eq!(code, "return x;");
        assert_eq!(scope_doc.get("x").unwrap().unwrap().as_i32(), Some(1));
    }
}
