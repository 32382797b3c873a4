//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The BSON element discriminator set.
//!
//! Every element in a document begins with a single discriminator byte
//! naming the type of its payload. The set is closed: any other byte is a
//! fatal parse error for the iterator (§4.1, rule a).
//!
//! # References
//!
//! 1. http://bsonspec.org/spec.html
//! 2. `original_source/bson/bson.h` (`bson_type_t`)

use std::convert::TryFrom;

use crate::error::Error;

/// A BSON element discriminator, as defined by the wire format (§6).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ElementType {
    Double = 0x01,
    Utf8String = 0x02,
    EmbeddedDocument = 0x03,
    Array = 0x04,
    Binary = 0x05,
    Undefined = 0x06,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    RegularExpression = 0x0B,
    DbPointer = 0x0C,
    JavaScriptCode = 0x0D,
    Symbol = 0x0E,
    JavaScriptCodeWithScope = 0x0F,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    Decimal128 = 0x13,
    MaxKey = 0x7F,
    MinKey = 0xFF,
}

impl ElementType {
    /// Returns the discriminator byte for this element type.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// The fixed payload width in bytes, for types whose payload has no
    /// length prefix and no internal structure (§3, value payload table).
    /// Returns `None` for variable-length or compound types.
    pub fn fixed_payload_len(self) -> Option<usize> {
        use ElementType::*;
        match self {
            Double => Some(8),
            ObjectId => Some(12),
            Boolean => Some(1),
            DateTime | Int64 | Timestamp => Some(8),
            Int32 => Some(4),
            Decimal128 => Some(16),
            Undefined | Null | MinKey | MaxKey => Some(0),
            Utf8String | EmbeddedDocument | Array | Binary | RegularExpression
            | DbPointer | JavaScriptCode | Symbol | JavaScriptCodeWithScope => None,
        }
    }
}

impl TryFrom<u8> for ElementType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Error> {
        use ElementType::*;
        Ok(match byte {
            0x01 => Double,
            0x02 => Utf8String,
            0x03 => EmbeddedDocument,
            0x04 => Array,
            0x05 => Binary,
            0x06 => Undefined,
            0x07 => ObjectId,
            0x08 => Boolean,
            0x09 => DateTime,
            0x0A => Null,
            0x0B => RegularExpression,
            0x0C => DbPointer,
            0x0D => JavaScriptCode,
            0x0E => Symbol,
            0x0F => JavaScriptCodeWithScope,
            0x10 => Int32,
            0x11 => Timestamp,
            0x12 => Int64,
            0x13 => Decimal128,
            0x7F => MaxKey,
            0xFF => MinKey,
            other => return Err(Error::UnknownElementType(other)),
        })
    }
}

/// Binary subtypes, as defined by §6. `DeprecatedBinary` (2) carries an
/// inner length prefix which is subtracted from the exposed length; see
/// the Open Question in spec §9 about rejecting an ill-formed inner length.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum BinarySubtype {
    Generic,
    Function,
    DeprecatedBinary,
    UuidOld,
    Uuid,
    Md5,
    User(u8),
}

impl BinarySubtype {
    pub fn to_u8(self) -> u8 {
        match self {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::DeprecatedBinary => 0x02,
            BinarySubtype::UuidOld => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::User(byte) => byte,
        }
    }

    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0x00 => BinarySubtype::Generic,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::DeprecatedBinary,
            0x03 => BinarySubtype::UuidOld,
            0x04 => BinarySubtype::Uuid,
            0x05 => BinarySubtype::Md5,
            other => BinarySubtype::User(other),
        }
    }
}
