//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The visitor walk (§4.1, "Visitor walk").
//!
//! A set of optional per-type callbacks plus `before`/`after`/`corrupt`.
//! Any callback returning `true` aborts the walk early and the walker
//! propagates `true` up to its own caller (and to any enclosing recursive
//! walk, for nested documents/arrays).

use crate::raw::document::RawDocument;
use crate::raw::iter::RawElement;
use crate::raw::value::RawBsonRef;

/// Per-type callbacks are all optional; a callback returning `true` aborts
/// the walk. Default no-op implementations let implementors override only
/// the types they care about.
pub trait Visitor {
    /// Called before the type-specific callback for every element.
    /// Returning `true` aborts the walk.
    fn before(&mut self, _element: &RawElement) -> bool {
        false
    }

    /// Called after the type-specific callback for every element.
    fn after(&mut self, _element: &RawElement) -> bool {
        false
    }

    /// Called with the faulting offset when the iterator hits a parse
    /// error partway through the walk.
    fn corrupt(&mut self, _offset: usize) {}

    fn visit_double(&mut self, _element: &RawElement, _value: f64) -> bool {
        false
    }
    fn visit_utf8(&mut self, _element: &RawElement, _value: &str) -> bool {
        false
    }
    fn visit_document(&mut self, _element: &RawElement, _value: RawDocument) -> bool {
        false
    }
    fn visit_array(&mut self, _element: &RawElement, _value: RawDocument) -> bool {
        false
    }
    fn visit_binary(&mut self, _element: &RawElement, _subtype: crate::element_type::BinarySubtype, _data: &[u8]) -> bool {
        false
    }
    fn visit_undefined(&mut self, _element: &RawElement) -> bool {
        false
    }
    fn visit_object_id(&mut self, _element: &RawElement, _value: crate::oid::ObjectId) -> bool {
        false
    }
    fn visit_bool(&mut self, _element: &RawElement, _value: bool) -> bool {
        false
    }
    fn visit_datetime(&mut self, _element: &RawElement, _millis: i64) -> bool {
        false
    }
    fn visit_null(&mut self, _element: &RawElement) -> bool {
        false
    }
    fn visit_regex(&mut self, _element: &RawElement, _pattern: &str, _options: &str) -> bool {
        false
    }
    fn visit_db_pointer(&mut self, _element: &RawElement, _namespace: &str, _id: crate::oid::ObjectId) -> bool {
        false
    }
    fn visit_code(&mut self, _element: &RawElement, _code: &str) -> bool {
        false
    }
    fn visit_symbol(&mut self, _element: &RawElement, _symbol: &str) -> bool {
        false
    }
    fn visit_code_with_scope(&mut self, _element: &RawElement, _code: &str, _scope: RawDocument) -> bool {
        false
    }
    fn visit_int32(&mut self, _element: &RawElement, _value: i32) -> bool {
        false
    }
    fn visit_timestamp(&mut self, _element: &RawElement, _increment: u32, _seconds: u32) -> bool {
        false
    }
    fn visit_int64(&mut self, _element: &RawElement, _value: i64) -> bool {
        false
    }
    fn visit_decimal128(&mut self, _element: &RawElement, _value: crate::decimal128::Decimal128) -> bool {
        false
    }
    fn visit_min_key(&mut self, _element: &RawElement) -> bool {
        false
    }
    fn visit_max_key(&mut self, _element: &RawElement) -> bool {
        false
    }
}

/// Walks `doc` element-by-element, dispatching to `visitor`. Returns `true`
/// if any callback aborted the walk, `false` if it ran to completion
/// (including a clean parse error report via `corrupt`).
pub fn walk<V: Visitor>(doc: RawDocument, visitor: &mut V) -> bool {
    let mut iter = doc.iter();
    loop {
        match iter.advance() {
            Err(_) => {
                if let Some(offset) = iter.error_offset() {
                    visitor.corrupt(offset);
                }
                return false;
            }
            Ok(None) => return false,
            Ok(Some(element)) => {
                if visitor.before(&element) {
                    return true;
                }
                let aborted = dispatch(visitor, &element);
                if aborted {
                    return true;
                }
                if visitor.after(&element) {
                    return true;
                }
            }
        }
    }
}

fn dispatch<V: Visitor>(visitor: &mut V, element: &RawElement) -> bool {
    match element.value {
        RawBsonRef::Double(v) => visitor.visit_double(element, v),
        RawBsonRef::String(v) => visitor.visit_utf8(element, v),
        RawBsonRef::Document(v) => visitor.visit_document(element, v),
        RawBsonRef::Array(v) => visitor.visit_array(element, v),
        RawBsonRef::Binary { subtype, data } => visitor.visit_binary(element, subtype, data),
        RawBsonRef::Undefined => visitor.visit_undefined(element),
        RawBsonRef::ObjectId(v) => visitor.visit_object_id(element, v),
        RawBsonRef::Boolean(v) => visitor.visit_bool(element, v),
        RawBsonRef::DateTime(v) => visitor.visit_datetime(element, v),
        RawBsonRef::Null => visitor.visit_null(element),
        RawBsonRef::RegularExpression { pattern, options } => visitor.visit_regex(element, pattern, options),
        RawBsonRef::DbPointer { namespace, id } => visitor.visit_db_pointer(element, namespace, id),
        RawBsonRef::JavaScriptCode(v) => visitor.visit_code(element, v),
        RawBsonRef::Symbol(v) => visitor.visit_symbol(element, v),
        RawBsonRef::JavaScriptCodeWithScope { code, scope } => visitor.visit_code_with_scope(element, code, scope),
        RawBsonRef::Int32(v) => visitor.visit_int32(element, v),
        RawBsonRef::Timestamp { increment, seconds } => visitor.visit_timestamp(element, increment, seconds),
        RawBsonRef::Int64(v) => visitor.visit_int64(element, v),
        RawBsonRef::Decimal128(v) => visitor.visit_decimal128(element, v),
        RawBsonRef::MinKey => visitor.visit_min_key(element),
        RawBsonRef::MaxKey => visitor.visit_max_key(element),
    }
}
