//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The serde deserialization front-end (§4.6).
//!
//! A document is always a map at the wire level, so [`Deserializer`] only
//! ever produces `visit_map` calls at the top. Each field's value is handed
//! off to [`ValueDeserializer`], which dispatches on the decoded
//! [`RawBsonRef`] the same way the per-type `visit_*` match in
//! [`crate::visitor`] does. Regex, db-pointer, timestamp and
//! code-with-scope have no native serde type; they deserialize as a
//! two-element sequence of their constituent parts, since BSON already
//! gives every type its own discriminator and there is no magic-field
//! trick needed the way a generic binary tree format would require.
//!
//! Document recursion here has no separate cycle-detection need: BSON
//! documents are a strict tree (a sub-document's bytes are wholly contained
//! within its parent's), never a graph with back-references, so unlike a
//! format built over an offset table this front-end does not need an
//! enter/exit-collection guard.

use std::fmt;

use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess};

use crate::error::{Error, Result};
use crate::raw::document::RawDocument;
use crate::raw::iter::RawIter;
use crate::raw::value::RawBsonRef;

/// Deserializes `T` from an already-validated document.
pub fn from_document<'de, T>(doc: &RawDocument<'de>) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    let mut deserializer = Deserializer::new(*doc);
    T::deserialize(&mut deserializer)
}

/// Validates `data`'s envelope and deserializes `T` from it.
pub fn from_slice<'de, T>(data: &'de [u8]) -> Result<T>
where
    T: de::Deserialize<'de>,
{
    let doc = RawDocument::from_bytes(data)?;
    from_document(&doc)
}

/// Top-level deserializer over a whole document.
#[derive(Debug)]
pub struct Deserializer<'de> {
    doc: RawDocument<'de>,
}

impl<'de> Deserializer<'de> {
    fn new(doc: RawDocument<'de>) -> Self {
        Deserializer { doc }
    }
}

impl<'de, 'b> de::Deserializer<'de> for &'b mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(DocumentMapAccess::new(self.doc.iter()))
    }

    serde::forward_to_deserialize_any! {
        bool
        u8 u16 u32 u64 u128
        i8 i16 i32 i64 i128
        f32 f64
        char str string
        seq map
        bytes byte_buf
        enum
        struct
        unit unit_struct
        tuple tuple_struct
        newtype_struct
        ignored_any
        option
        identifier
    }
}

/// Drives the field-by-field deserialization of a document's elements.
struct DocumentMapAccess<'de> {
    iter: RawIter<'de>,
    pending: Option<RawBsonRef<'de>>,
}

impl<'de> DocumentMapAccess<'de> {
    fn new(iter: RawIter<'de>) -> Self {
        DocumentMapAccess { iter, pending: None }
    }
}

impl<'de> MapAccess<'de> for DocumentMapAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.advance()? {
            None => Ok(None),
            Some(element) => {
                self.pending = Some(element.value);
                seed.deserialize(element.key.into_deserializer()).map(Some)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self.pending.take().expect("next_value_seed called out of order");
        seed.deserialize(ValueDeserializer(value))
    }
}

/// Drives the element-by-element deserialization of an array's values.
struct ArraySeqAccess<'de> {
    iter: RawIter<'de>,
}

impl<'de> ArraySeqAccess<'de> {
    fn new(iter: RawIter<'de>) -> Self {
        ArraySeqAccess { iter }
    }
}

impl<'de> SeqAccess<'de> for ArraySeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.advance()? {
            None => Ok(None),
            Some(element) => seed.deserialize(ValueDeserializer(element.value)).map(Some),
        }
    }
}

/// A fixed, pre-decoded sequence of values, used to represent the few
/// compound types (regex, db-pointer, timestamp, code-with-scope) that have
/// no native serde shape.
struct TupleSeqAccess<'de> {
    items: std::vec::IntoIter<RawBsonRef<'de>>,
}

impl<'de> TupleSeqAccess<'de> {
    fn new(items: Vec<RawBsonRef<'de>>) -> Self {
        TupleSeqAccess { items: items.into_iter() }
    }
}

impl<'de> SeqAccess<'de> for TupleSeqAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            None => Ok(None),
            Some(value) => seed.deserialize(ValueDeserializer(value)).map(Some),
        }
    }
}

/// Deserializes a single already-decoded value, dispatching on its
/// discriminator the same way [`crate::visitor::walk`] does.
struct ValueDeserializer<'de>(RawBsonRef<'de>);

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            RawBsonRef::Double(v) => visitor.visit_f64(v),
            RawBsonRef::String(v) => visitor.visit_borrowed_str(v),
            RawBsonRef::Document(d) => visitor.visit_map(DocumentMapAccess::new(d.iter())),
            RawBsonRef::Array(d) => visitor.visit_seq(ArraySeqAccess::new(d.iter())),
            RawBsonRef::Binary { data, .. } => visitor.visit_borrowed_bytes(data),
            RawBsonRef::Undefined => visitor.visit_unit(),
            RawBsonRef::ObjectId(id) => visitor.visit_bytes(&id.bytes()),
            RawBsonRef::Boolean(v) => visitor.visit_bool(v),
            RawBsonRef::DateTime(v) => visitor.visit_i64(v),
            RawBsonRef::Null => visitor.visit_unit(),
            RawBsonRef::RegularExpression { pattern, options } => visitor.visit_seq(TupleSeqAccess::new(vec![
                RawBsonRef::String(pattern),
                RawBsonRef::String(options),
            ])),
            RawBsonRef::DbPointer { namespace, id } => visitor.visit_seq(TupleSeqAccess::new(vec![
                RawBsonRef::String(namespace),
                RawBsonRef::ObjectId(id),
            ])),
            RawBsonRef::JavaScriptCode(v) => visitor.visit_borrowed_str(v),
            RawBsonRef::Symbol(v) => visitor.visit_borrowed_str(v),
            RawBsonRef::JavaScriptCodeWithScope { code, scope } => visitor.visit_seq(TupleSeqAccess::new(vec![
                RawBsonRef::String(code),
                RawBsonRef::Document(scope),
            ])),
            RawBsonRef::Int32(v) => visitor.visit_i32(v),
            RawBsonRef::Timestamp { increment, seconds } => visitor.visit_seq(TupleSeqAccess::new(vec![
                RawBsonRef::Int64(i64::from(increment)),
                RawBsonRef::Int64(i64::from(seconds)),
            ])),
            RawBsonRef::Int64(v) => visitor.visit_i64(v),
            RawBsonRef::Decimal128(v) => visitor.visit_string(v.render()),
            RawBsonRef::MinKey => visitor.visit_unit(),
            RawBsonRef::MaxKey => visitor.visit_unit(),
        }
    }

    serde::forward_to_deserialize_any! {
        bool
        u8 u16 u32 u64 u128
        i8 i16 i32 i64 i128
        f32 f64
        char str string
        seq map
        bytes byte_buf
        enum
        struct
        unit unit_struct
        tuple tuple_struct
        newtype_struct
        ignored_any
        option
        identifier
    }
}

impl fmt::Debug for ValueDeserializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ValueDeserializer").field(&self.0.element_type()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::builder::RawDocumentBuf;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_deserialize_struct_from_document() {
        let mut b = RawDocumentBuf::new();
        b.append_i32("x", 3).unwrap();
        b.append_i32("y", 4).unwrap();
        let point: Point = from_document(&b.as_document()).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Wrapper {
        name: String,
        values: Vec<i32>,
    }

    #[test]
    fn test_deserialize_nested_array_field() {
        let mut b = RawDocumentBuf::new();
        b.append_str("name", "xs").unwrap();
        b.start_array("values").unwrap();
        b.append_i32("0", 1).unwrap();
        b.append_i32("1", 2).unwrap();
        b.finish_array().unwrap();
        let w: Wrapper = from_slice(b.as_bytes()).unwrap();
        assert_eq!(w, Wrapper { name: "xs".to_string(), values: vec![1, 2] });
    }
}
