//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

use serde::{de, ser};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating, iterating or building a BSON document.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Constructed from serialization and deserialization errors.
    Message(String),
    /// A document's declared total length does not fit the rules in §3: too
    /// short, overflowing, or inconsistent with the buffer actually supplied.
    MalformedLength,
    /// The document (or a nested document/array) is missing its trailing
    /// `0x00` terminator at the declared length.
    MissingTerminator,
    /// The discriminator byte is not one of the closed set in §6.
    UnknownElementType(u8),
    /// A key was not terminated by a `0x00` before the document ended.
    MissingOrInvalidKeyTerminator,
    /// A string-like payload declared a length outside `[1, remaining]`.
    InvalidStringLength,
    /// A string-like payload's last byte was not `0x00`.
    MissingStringTerminator,
    /// `code_with_scope`'s outer length was not `8 + code_length + doc_length`.
    InvalidCodeWithScopeLength,
    /// A regex element was missing one of its two NUL-terminated strings.
    InvalidRegex,
    /// The buffer ended before an element's payload could be read in full.
    TruncatedDocument,
    /// A computed offset fell outside the document's declared length.
    OffsetOutOfRange(usize),
    /// An append would have grown the document past `2^31 - 1` bytes.
    SizeLimitExceeded,
    /// Opening a nested scope would exceed the builder's stack depth limit.
    ScopeStackOverflow,
    /// A string-like payload or key was not well-formed UTF-8.
    InvalidUtf8 { offset: usize },
    /// A key contained an embedded `0x00` byte.
    KeyContainsNul,
    /// A key began with `$` and the dollar-keys validator flag was set.
    KeyStartsWithDollar,
    /// A key contained `.` and the dot-keys validator flag was set.
    KeyContainsDot,
    /// Deprecated binary subtype 2 declared an inner length `< 4`, which
    /// would underflow the 4-byte adjustment described in §3.
    DeprecatedBinarySubtype2Underflow,
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) =>
                formatter.write_str(msg),
            Error::MalformedLength =>
                formatter.write_str("document length header is malformed"),
            Error::MissingTerminator =>
                formatter.write_str("document is missing its trailing NUL terminator"),
            Error::UnknownElementType(byte) =>
                write!(formatter, "unknown element discriminator: {:#04x}", byte),
            Error::MissingOrInvalidKeyTerminator =>
                formatter.write_str("element key is not NUL-terminated"),
            Error::InvalidStringLength =>
                formatter.write_str("string-like payload has an invalid declared length"),
            Error::MissingStringTerminator =>
                formatter.write_str("string-like payload is missing its trailing NUL"),
            Error::InvalidCodeWithScopeLength =>
                formatter.write_str("code_with_scope outer length does not match its parts"),
            Error::InvalidRegex =>
                formatter.write_str("regex element is missing a NUL-terminated string"),
            Error::TruncatedDocument =>
                formatter.write_str("document ends before the current element's payload"),
            Error::OffsetOutOfRange(offset) =>
                write!(formatter, "offset {} is outside the document", offset),
            Error::SizeLimitExceeded =>
                formatter.write_str("append would exceed the maximum document size of 2^31 - 1 bytes"),
            Error::ScopeStackOverflow =>
                formatter.write_str("nested scope depth limit exceeded"),
            Error::InvalidUtf8 { offset } =>
                write!(formatter, "invalid UTF-8 at offset {}", offset),
            Error::KeyContainsNul =>
                formatter.write_str("key contains an embedded NUL byte"),
            Error::KeyStartsWithDollar =>
                formatter.write_str("key begins with '$'"),
            Error::KeyContainsDot =>
                formatter.write_str("key contains '.'"),
            Error::DeprecatedBinarySubtype2Underflow =>
                formatter.write_str("deprecated binary subtype 2 declares a length < 4"),
        }
    }
}

impl std::error::Error for Error {}
