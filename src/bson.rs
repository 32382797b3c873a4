//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # `Bson` — an owned value model (§4.6).
//!
//! Every [`RawBsonRef`](crate::raw::value::RawBsonRef) variant has an owned
//! counterpart here. Unlike the borrowed type, `Bson` can outlive the buffer
//! it was read from, at the cost of copying strings, binary blobs and
//! sub-documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::de;

use crate::decimal128::Decimal128;
use crate::element_type::BinarySubtype;
use crate::oid::ObjectId;
use crate::raw::value::RawBsonRef;

/// An owned BSON value.
#[derive(Clone, PartialEq, Debug)]
pub enum Bson {
    Double(f64),
    String(String),
    Document(BTreeMap<String, Bson>),
    Array(Vec<Bson>),
    Binary { subtype: BinarySubtype, data: Vec<u8> },
    Undefined,
    ObjectId(ObjectId),
    Boolean(bool),
    DateTime(i64),
    Null,
    RegularExpression { pattern: String, options: String },
    DbPointer { namespace: String, id: ObjectId },
    JavaScriptCode(String),
    Symbol(String),
    JavaScriptCodeWithScope { code: String, scope: BTreeMap<String, Bson> },
    Int32(i32),
    Timestamp { increment: u32, seconds: u32 },
    Int64(i64),
    Decimal128(Decimal128),
    MinKey,
    MaxKey,
}

impl<'a> From<RawBsonRef<'a>> for Bson {
    fn from(value: RawBsonRef<'a>) -> Self {
        match value {
            RawBsonRef::Double(v) => Bson::Double(v),
            RawBsonRef::String(v) => Bson::String(v.to_string()),
            RawBsonRef::Document(d) => Bson::Document(document_to_map(d)),
            RawBsonRef::Array(d) => Bson::Array(document_to_vec(d)),
            RawBsonRef::Binary { subtype, data } => Bson::Binary { subtype, data: data.to_vec() },
            RawBsonRef::Undefined => Bson::Undefined,
            RawBsonRef::ObjectId(id) => Bson::ObjectId(id),
            RawBsonRef::Boolean(v) => Bson::Boolean(v),
            RawBsonRef::DateTime(v) => Bson::DateTime(v),
            RawBsonRef::Null => Bson::Null,
            RawBsonRef::RegularExpression { pattern, options } => {
                Bson::RegularExpression { pattern: pattern.to_string(), options: options.to_string() }
            }
            RawBsonRef::DbPointer { namespace, id } => {
                Bson::DbPointer { namespace: namespace.to_string(), id }
            }
            RawBsonRef::JavaScriptCode(v) => Bson::JavaScriptCode(v.to_string()),
            RawBsonRef::Symbol(v) => Bson::Symbol(v.to_string()),
            RawBsonRef::JavaScriptCodeWithScope { code, scope } => {
                Bson::JavaScriptCodeWithScope { code: code.to_string(), scope: document_to_map(scope) }
            }
            RawBsonRef::Int32(v) => Bson::Int32(v),
            RawBsonRef::Timestamp { increment, seconds } => Bson::Timestamp { increment, seconds },
            RawBsonRef::Int64(v) => Bson::Int64(v),
            RawBsonRef::Decimal128(v) => Bson::Decimal128(v),
            RawBsonRef::MinKey => Bson::MinKey,
            RawBsonRef::MaxKey => Bson::MaxKey,
        }
    }
}

fn document_to_map(doc: crate::raw::document::RawDocument) -> BTreeMap<String, Bson> {
    let mut map = BTreeMap::new();
    let mut iter = doc.iter();
    while let Ok(Some(element)) = iter.advance() {
        map.insert(element.key.to_string(), Bson::from(element.value));
    }
    map
}

fn document_to_vec(doc: crate::raw::document::RawDocument) -> Vec<Bson> {
    let mut vec = Vec::new();
    let mut iter = doc.iter();
    while let Ok(Some(element)) = iter.advance() {
        vec.push(Bson::from(element.value));
    }
    vec
}

/// Deserialization of any serde-compatible value into the `Bson` object
/// model. A document deserializes to `Bson::Document`, an array to
/// `Bson::Array`; scalars map onto their closest `Bson` variant.
impl<'de> de::Deserialize<'de> for Bson {
    fn deserialize<D>(deserializer: D) -> Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct BsonVisitor;

        impl<'de> de::Visitor<'de> for BsonVisitor {
            type Value = Bson;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid BSON value")
            }

            #[inline]
            fn visit_bool<E>(self, value: bool) -> Result<Bson, E> {
                Ok(Bson::Boolean(value))
            }

            #[inline]
            fn visit_i32<E>(self, value: i32) -> Result<Bson, E> {
                Ok(Bson::Int32(value))
            }

            #[inline]
            fn visit_i64<E>(self, value: i64) -> Result<Bson, E> {
                Ok(Bson::Int64(value))
            }

            #[inline]
            fn visit_u64<E>(self, value: u64) -> Result<Bson, E>
            where
                E: de::Error,
            {
                if value <= i64::max_value() as u64 {
                    Ok(Bson::Int64(value as i64))
                } else {
                    Err(de::Error::custom("u64 value was too large for a BSON int64"))
                }
            }

            #[inline]
            fn visit_f64<E>(self, value: f64) -> Result<Bson, E> {
                Ok(Bson::Double(value))
            }

            #[inline]
            fn visit_str<E>(self, value: &str) -> Result<Bson, E> {
                Ok(Bson::String(value.into()))
            }

            #[inline]
            fn visit_string<E>(self, value: String) -> Result<Bson, E> {
                Ok(Bson::String(value))
            }

            #[inline]
            fn visit_bytes<E>(self, value: &[u8]) -> Result<Bson, E> {
                Ok(Bson::Binary { subtype: BinarySubtype::Generic, data: value.into() })
            }

            #[inline]
            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Bson, E> {
                Ok(Bson::Binary { subtype: BinarySubtype::Generic, data: value })
            }

            #[inline]
            fn visit_unit<E>(self) -> Result<Bson, E> {
                Ok(Bson::Null)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<Bson, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = visitor.next_element()? {
                    vec.push(elem);
                }
                Ok(Bson::Array(vec))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Bson, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut map = BTreeMap::<String, Bson>::new();
                while let Some(key) = visitor.next_key::<String>()? {
                    if map.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key: `{}`", key)));
                    }
                    let value = visitor.next_value()?;
                    map.insert(key, value);
                }
                Ok(Bson::Document(map))
            }
        }

        deserializer.deserialize_any(BsonVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::builder::RawDocumentBuf;

    #[test]
    fn test_from_raw_bson_ref_builds_document() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        b.append_str("b", "x").unwrap();
        let doc = b.as_document();
        let bson = document_to_map(doc);
        assert_eq!(bson.get("a"), Some(&Bson::Int32(1)));
        assert_eq!(bson.get("b"), Some(&Bson::String("x".to_string())));
    }

    #[test]
    fn test_deserialize_from_document() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("a", 1).unwrap();
        b.start_array("xs").unwrap();
        b.append_i32("0", 10).unwrap();
        b.finish_array().unwrap();
        let value: Bson = crate::de::from_document(&b.as_document()).unwrap();
        match value {
            Bson::Document(map) => {
                assert_eq!(map.get("a"), Some(&Bson::Int32(1)));
                assert_eq!(map.get("xs"), Some(&Bson::Array(vec![Bson::Int32(10)])));
            }
            other => panic!("expected a document, got {:?}", other),
        }
    }
}
