//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A thin convenience wrapper around an open array scope that generates
//! the implicit ASCII decimal index keys (`"0"`, `"1"`, …) described in
//! §4.2: "Array scopes additionally generate keys implicitly... At the
//! builder layer, the caller supplies the key." This is that sugar, kept
//! out of `RawDocumentBuf` itself so the builder layer stays index-agnostic.

use crate::error::Result;
use crate::raw::builder::RawDocumentBuf;
use crate::raw::value::RawBsonRef;

/// Wraps a [`RawDocumentBuf`] with an open array scope, tracking the next
/// implicit index to assign.
pub struct ArrayAppender<'a> {
    builder: &'a mut RawDocumentBuf,
    next_index: u32,
}

impl<'a> ArrayAppender<'a> {
    /// Opens an array scope under `key` and returns an appender for it.
    /// The caller must call [`finish`](Self::finish) to close the scope.
    pub fn start(builder: &'a mut RawDocumentBuf, key: &str) -> Result<Self> {
        builder.start_array(key)?;
        Ok(ArrayAppender { builder, next_index: 0 })
    }

    fn next_key(&mut self) -> String {
        let key = self.next_index.to_string();
        self.next_index += 1;
        key
    }

    pub fn push_value(&mut self, value: RawBsonRef) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_value(&key, value)?;
        Ok(self)
    }

    pub fn push_i32(&mut self, value: i32) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_i32(&key, value)?;
        Ok(self)
    }

    pub fn push_i64(&mut self, value: i64) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_i64(&key, value)?;
        Ok(self)
    }

    pub fn push_f64(&mut self, value: f64) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_f64(&key, value)?;
        Ok(self)
    }

    pub fn push_str(&mut self, value: &str) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_str(&key, value)?;
        Ok(self)
    }

    pub fn push_bool(&mut self, value: bool) -> Result<&mut Self> {
        let key = self.next_key();
        self.builder.append_bool(&key, value)?;
        Ok(self)
    }

    /// Closes the array scope.
    pub fn finish(self) -> Result<()> {
        self.builder.finish_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_indices() {
        let mut b = RawDocumentBuf::new();
        {
            let mut arr = ArrayAppender::start(&mut b, "xs").unwrap();
            arr.push_i32(10).unwrap();
            arr.push_i32(20).unwrap();
            arr.finish().unwrap();
        }
        let doc = b.as_document();
        let xs = doc.get("xs").unwrap().unwrap().as_array().unwrap();
        let mut it = xs.iter();
        let first = it.advance().unwrap().unwrap();
        assert_eq!(first.key, "0");
        assert_eq!(first.value.as_i32(), Some(10));
        let second = it.advance().unwrap().unwrap();
        assert_eq!(second.key, "1");
    }
}
