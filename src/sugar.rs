//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The `append_many` sugar layer.
//!
//! A variadic-macro front end where callers list key/type/value triples
//! terminated by a sentinel, each value preceded by a type tag naming which
//! append function to call, turns into a single call taking a tagged-union
//! array once ported to a typed language: [`AppendValue`] is the tag set,
//! [`append_many`] is the single entry point that walks the list and
//! dispatches to the typed `append_*` calls on [`RawDocumentBuf`] (§4.2).
//! This is sugar only; every variant it recognizes is just one of the
//! builder's own methods, named here so callers don't have to match on
//! their own value type before calling the right one.

use crate::element_type::BinarySubtype;
use crate::error::Result;
use crate::oid::ObjectId;
use crate::raw::builder::RawDocumentBuf;
use crate::raw::value::RawBsonRef;

/// One key/value pair in an [`append_many`] call.
pub struct AppendValue<'a> {
    pub key: &'a str,
    pub value: RawBsonRef<'a>,
}

impl<'a> AppendValue<'a> {
    pub fn new(key: &'a str, value: RawBsonRef<'a>) -> Self {
        AppendValue { key, value }
    }
}

/// Appends every key/value pair in `items` to `builder`, in order,
/// stopping at the first error. Equivalent to calling
/// [`RawDocumentBuf::append_value`](crate::raw::builder::RawDocumentBuf::append_value)
/// once per item; the only thing this buys over doing that directly is a
/// single call site for a caller holding a dynamically-built list of
/// heterogeneous values, which is exactly the shape the variadic macro
/// front-end this replaces was built for.
pub fn append_many(builder: &mut RawDocumentBuf, items: &[AppendValue]) -> Result<()> {
    for item in items {
        builder.append_value(item.key, item.value)?;
    }
    Ok(())
}

/// Convenience constructor so a caller building an `AppendValue` list
/// doesn't have to name `BinarySubtype`/`ObjectId` themselves for the
/// common scalar cases.
impl<'a> AppendValue<'a> {
    pub fn i32(key: &'a str, value: i32) -> Self {
        AppendValue::new(key, RawBsonRef::Int32(value))
    }

    pub fn i64(key: &'a str, value: i64) -> Self {
        AppendValue::new(key, RawBsonRef::Int64(value))
    }

    pub fn f64(key: &'a str, value: f64) -> Self {
        AppendValue::new(key, RawBsonRef::Double(value))
    }

    pub fn str(key: &'a str, value: &'a str) -> Self {
        AppendValue::new(key, RawBsonRef::String(value))
    }

    pub fn bool(key: &'a str, value: bool) -> Self {
        AppendValue::new(key, RawBsonRef::Boolean(value))
    }

    pub fn null(key: &'a str) -> Self {
        AppendValue::new(key, RawBsonRef::Null)
    }

    pub fn object_id(key: &'a str, id: ObjectId) -> Self {
        AppendValue::new(key, RawBsonRef::ObjectId(id))
    }

    pub fn binary(key: &'a str, subtype: BinarySubtype, data: &'a [u8]) -> Self {
        AppendValue::new(key, RawBsonRef::Binary { subtype, data })
    }
}
