//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # `RawDocumentBuf` — the appending document builder (§4.2).
//!
//! Nested scopes are modeled as Design Note 2's "simpler" alternative: an
//! explicit frame stack inside a single owned `Vec<u8>`, rather than a
//! distinct child object borrowing the parent. Every append inserts bytes
//! just before the buffer's trailing `0x00` (always the innermost open
//! scope's terminator) and then bumps every enclosing scope's 4-byte length
//! header — including the root — by the same delta. Closing a scope is
//! just popping the frame: the terminator byte was already written when
//! the scope was opened and never moves.

use std::convert::TryInto;

use crate::bytes::{usize_from_i32, MAX_DOCUMENT_SIZE};
use crate::element_type::{BinarySubtype, ElementType};
use crate::error::{Error, Result};
use crate::oid::ObjectId;
use crate::decimal128::Decimal128;
use crate::raw::document::RawDocument;
use crate::raw::iter::RawElement;
use crate::raw::value::RawBsonRef;

/// Hard cap on nested scope depth (§4.2, "suggested 100").
pub const MAX_SCOPE_DEPTH: usize = 100;

/// An owned, growable document under construction.
#[derive(Clone, Debug)]
pub struct RawDocumentBuf {
    buf: Vec<u8>,
    /// Offsets (within `buf`) of each open scope's 4-byte length header,
    /// outermost first. Empty means "appending to the root document".
    scope_stack: Vec<usize>,
}

impl Default for RawDocumentBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl RawDocumentBuf {
    /// A freshly opened, empty document: `05 00 00 00 00`.
    pub fn new() -> Self {
        RawDocumentBuf { buf: vec![0x05, 0x00, 0x00, 0x00, 0x00], scope_stack: Vec::new() }
    }

    /// Copies an existing validated document as the starting point for
    /// further appends.
    pub fn from_document(doc: RawDocument) -> Self {
        RawDocumentBuf { buf: doc.as_bytes().to_vec(), scope_stack: Vec::new() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_document(&self) -> RawDocument {
        RawDocument::from_validated_slice(&self.buf)
    }

    fn bump_all_lengths(&mut self, delta: i32) {
        for &offset in std::iter::once(&0).chain(self.scope_stack.iter()) {
            let current = i32::from_le_bytes(self.buf[offset..offset + 4].try_into().unwrap());
            self.buf[offset..offset + 4].copy_from_slice(&(current + delta).to_le_bytes());
        }
    }

    /// Inserts `element_bytes` just before the trailing terminator, checks
    /// the size limit first, and patches every enclosing length header.
    /// Returns the offset (within `buf`) where `element_bytes` landed.
    fn splice_in(&mut self, element_bytes: &[u8]) -> Result<usize> {
        // Checked against the root document's actual byte length, not the
        // innermost open scope's header: every append bumps the root
        // header by the same delta as any nested one, so the nested
        // header always under-counts the true total size.
        let prospective = self.buf.len() as i64 + element_bytes.len() as i64;
        if prospective > MAX_DOCUMENT_SIZE {
            return Err(Error::SizeLimitExceeded);
        }
        let insert_at = self.buf.len() - 1;
        self.buf.splice(insert_at..insert_at, element_bytes.iter().copied());
        self.bump_all_lengths(element_bytes.len() as i32);
        Ok(insert_at)
    }

    fn append_raw(&mut self, element_type: ElementType, key: &str, payload: &[u8]) -> Result<()> {
        let mut element_bytes = Vec::with_capacity(1 + key.len() + 1 + payload.len());
        element_bytes.push(element_type.to_u8());
        element_bytes.extend_from_slice(key.as_bytes());
        element_bytes.push(0);
        element_bytes.extend_from_slice(payload);
        self.splice_in(&element_bytes)?;
        Ok(())
    }

    fn append_length_prefixed_string(&mut self, element_type: ElementType, key: &str, value: &str) -> Result<()> {
        let mut payload = Vec::with_capacity(4 + value.len() + 1);
        let len = value.len() as i32 + 1;
        payload.extend_from_slice(&len.to_le_bytes());
        payload.extend_from_slice(value.as_bytes());
        payload.push(0);
        self.append_raw(element_type, key, &payload)
    }

    pub fn append_f64(&mut self, key: &str, value: f64) -> Result<()> {
        self.append_raw(ElementType::Double, key, &value.to_le_bytes())
    }

    pub fn append_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.append_length_prefixed_string(ElementType::Utf8String, key, value)
    }

    pub fn append_javascript(&mut self, key: &str, code: &str) -> Result<()> {
        self.append_length_prefixed_string(ElementType::JavaScriptCode, key, code)
    }

    pub fn append_symbol(&mut self, key: &str, symbol: &str) -> Result<()> {
        self.append_length_prefixed_string(ElementType::Symbol, key, symbol)
    }

    pub fn append_i32(&mut self, key: &str, value: i32) -> Result<()> {
        self.append_raw(ElementType::Int32, key, &value.to_le_bytes())
    }

    pub fn append_i64(&mut self, key: &str, value: i64) -> Result<()> {
        self.append_raw(ElementType::Int64, key, &value.to_le_bytes())
    }

    pub fn append_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.append_raw(ElementType::Boolean, key, &[value as u8])
    }

    pub fn append_datetime_millis(&mut self, key: &str, millis: i64) -> Result<()> {
        self.append_raw(ElementType::DateTime, key, &millis.to_le_bytes())
    }

    pub fn append_timestamp(&mut self, key: &str, increment: u32, seconds: u32) -> Result<()> {
        let mut payload = [0u8; 8];
        payload[..4].copy_from_slice(&increment.to_le_bytes());
        payload[4..].copy_from_slice(&seconds.to_le_bytes());
        self.append_raw(ElementType::Timestamp, key, &payload)
    }

    pub fn append_decimal128(&mut self, key: &str, value: Decimal128) -> Result<()> {
        let (high, low) = value.to_parts();
        let mut payload = [0u8; 16];
        payload[..8].copy_from_slice(&low.to_le_bytes());
        payload[8..].copy_from_slice(&high.to_le_bytes());
        self.append_raw(ElementType::Decimal128, key, &payload)
    }

    pub fn append_null(&mut self, key: &str) -> Result<()> {
        self.append_raw(ElementType::Null, key, &[])
    }

    pub fn append_undefined(&mut self, key: &str) -> Result<()> {
        self.append_raw(ElementType::Undefined, key, &[])
    }

    pub fn append_min_key(&mut self, key: &str) -> Result<()> {
        self.append_raw(ElementType::MinKey, key, &[])
    }

    pub fn append_max_key(&mut self, key: &str) -> Result<()> {
        self.append_raw(ElementType::MaxKey, key, &[])
    }

    pub fn append_object_id(&mut self, key: &str, id: ObjectId) -> Result<()> {
        self.append_raw(ElementType::ObjectId, key, &id.bytes())
    }

    pub fn append_binary(&mut self, key: &str, subtype: BinarySubtype, data: &[u8]) -> Result<()> {
        let mut payload = Vec::with_capacity(5 + data.len());
        payload.extend_from_slice(&(data.len() as i32).to_le_bytes());
        payload.push(subtype.to_u8());
        payload.extend_from_slice(data);
        self.append_raw(ElementType::Binary, key, &payload)
    }

    pub fn append_regular_expression(&mut self, key: &str, pattern: &str, options: &str) -> Result<()> {
        let mut payload = Vec::with_capacity(pattern.len() + 1 + options.len() + 1);
        payload.extend_from_slice(pattern.as_bytes());
        payload.push(0);
        payload.extend_from_slice(options.as_bytes());
        payload.push(0);
        self.append_raw(ElementType::RegularExpression, key, &payload)
    }

    pub fn append_db_pointer(&mut self, key: &str, namespace: &str, id: ObjectId) -> Result<()> {
        let mut payload = Vec::with_capacity(4 + namespace.len() + 1 + 12);
        let len = namespace.len() as i32 + 1;
        payload.extend_from_slice(&len.to_le_bytes());
        payload.extend_from_slice(namespace.as_bytes());
        payload.push(0);
        payload.extend_from_slice(&id.bytes());
        self.append_raw(ElementType::DbPointer, key, &payload)
    }

    /// Appends a document's bytes verbatim under `key`, re-emitting the
    /// discriminator; used for copying whole sub-documents without
    /// re-validating them.
    pub fn append_document_raw(&mut self, key: &str, doc: RawDocument) -> Result<()> {
        self.append_raw(ElementType::EmbeddedDocument, key, doc.as_bytes())
    }

    pub fn append_array_raw(&mut self, key: &str, doc: RawDocument) -> Result<()> {
        self.append_raw(ElementType::Array, key, doc.as_bytes())
    }

    /// Opens a nested document scope under `key`. Appends made on `self`
    /// until the matching [`finish_document`](Self::finish_document) land
    /// inside this scope.
    pub fn start_document(&mut self, key: &str) -> Result<()> {
        self.open_scope(ElementType::EmbeddedDocument, key)
    }

    pub fn finish_document(&mut self) -> Result<()> {
        self.close_scope()
    }

    /// Opens a nested array scope under `key`. The caller is responsible
    /// for supplying monotonically increasing decimal-string indices as
    /// keys to subsequent appends (§4.2); see [`crate::raw::array`] for a
    /// small helper that does this automatically.
    pub fn start_array(&mut self, key: &str) -> Result<()> {
        self.open_scope(ElementType::Array, key)
    }

    pub fn finish_array(&mut self) -> Result<()> {
        self.close_scope()
    }

    fn open_scope(&mut self, element_type: ElementType, key: &str) -> Result<()> {
        if self.scope_stack.len() >= MAX_SCOPE_DEPTH {
            return Err(Error::ScopeStackOverflow);
        }
        let mut element_bytes = Vec::with_capacity(1 + key.len() + 1 + 5);
        element_bytes.push(element_type.to_u8());
        element_bytes.extend_from_slice(key.as_bytes());
        element_bytes.push(0);
        let child_header_rel_offset = element_bytes.len();
        element_bytes.extend_from_slice(&[0x05, 0x00, 0x00, 0x00, 0x00]);

        let insert_at = self.splice_in(&element_bytes)?;
        self.scope_stack.push(insert_at + child_header_rel_offset);
        Ok(())
    }

    fn close_scope(&mut self) -> Result<()> {
        self.scope_stack.pop().ok_or_else(|| Error::Message("no open scope to close".to_string()))?;
        Ok(())
    }

    /// The current nesting depth (0 at the root).
    pub fn depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// Re-emits a single element read from an iterator under `key` (or the
    /// element's own key, if the caller passes it through), per §4.2
    /// "Append from iterator". Sub-documents are copied verbatim.
    pub fn append_from_element(&mut self, key: &str, element: &RawElement) -> Result<()> {
        self.append_value(key, element.value)
    }

    /// Appends an already-decoded value under `key`. This is the common
    /// path both `append_from_element` and the sugar layer funnel through.
    pub fn append_value(&mut self, key: &str, value: RawBsonRef) -> Result<()> {
        match value {
            RawBsonRef::Double(v) => self.append_f64(key, v),
            RawBsonRef::String(v) => self.append_str(key, v),
            RawBsonRef::Document(d) => self.append_document_raw(key, d),
            RawBsonRef::Array(d) => self.append_array_raw(key, d),
            RawBsonRef::Binary { subtype, data } => self.append_binary(key, subtype, data),
            RawBsonRef::Undefined => self.append_undefined(key),
            RawBsonRef::ObjectId(id) => self.append_object_id(key, id),
            RawBsonRef::Boolean(v) => self.append_bool(key, v),
            RawBsonRef::DateTime(v) => self.append_datetime_millis(key, v),
            RawBsonRef::Null => self.append_null(key),
            RawBsonRef::RegularExpression { pattern, options } => self.append_regular_expression(key, pattern, options),
            RawBsonRef::DbPointer { namespace, id } => self.append_db_pointer(key, namespace, id),
            RawBsonRef::JavaScriptCode(v) => self.append_javascript(key, v),
            RawBsonRef::Symbol(v) => self.append_symbol(key, v),
            RawBsonRef::JavaScriptCodeWithScope { code, scope } => self.append_code_with_scope(key, code, scope),
            RawBsonRef::Int32(v) => self.append_i32(key, v),
            RawBsonRef::Timestamp { increment, seconds } => self.append_timestamp(key, increment, seconds),
            RawBsonRef::Int64(v) => self.append_i64(key, v),
            RawBsonRef::Decimal128(v) => self.append_decimal128(key, v),
            RawBsonRef::MinKey => self.append_min_key(key),
            RawBsonRef::MaxKey => self.append_max_key(key),
        }
    }

    pub fn append_code_with_scope(&mut self, key: &str, code: &str, scope: RawDocument) -> Result<()> {
        let code_len = code.len() as i32 + 1;
        let total = 8 + code_len + usize_from_i32(i32::from_le_bytes(scope.as_bytes()[0..4].try_into().unwrap()))? as i32;
        let mut payload = Vec::with_capacity(total as usize);
        payload.extend_from_slice(&total.to_le_bytes());
        payload.extend_from_slice(&code_len.to_le_bytes());
        payload.extend_from_slice(code.as_bytes());
        payload.push(0);
        payload.extend_from_slice(scope.as_bytes());
        self.append_raw(ElementType::JavaScriptCodeWithScope, key, &payload)
    }
}
