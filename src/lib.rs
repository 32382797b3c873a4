//
// Copyright 2020 bsoncore Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! A native Rust reader, writer and decimal128 codec for the BSON binary
//! document-serialization format, independent of any driver or server.
//!
//! - [`raw`] — the zero-copy iterator/validator ([`raw::RawDocument`],
//!   [`raw::RawIter`]) and the appending builder ([`raw::RawDocumentBuf`]).
//! - [`decimal128`] — a lossless decimal128 <-> string codec.
//! - [`validator`] — end-to-end structural and policy validation.
//! - [`visitor`] — a callback-driven document walk.
//! - [`copy`] — equality, counting and copy-excluding built on the above.
//! - [`Bson`] plus the `serde` front-end ([`from_slice`], [`from_document`])
//!   for deserializing arbitrary types out of a document.

mod bson;
mod bytes;
mod de;
mod element_type;
mod oid;

pub mod copy;
pub mod decimal128;
pub mod error;
pub mod raw;
pub mod sugar;
pub mod validator;
pub mod visitor;

pub use bson::Bson;
pub use de::{from_document, from_slice, Deserializer};
pub use decimal128::Decimal128;
pub use element_type::{BinarySubtype, ElementType};
pub use error::{Error, Result};
pub use oid::ObjectId;
pub use raw::{RawBsonRef, RawDocument, RawDocumentBuf, RawElement, RawIter};
pub use sugar::{append_many, AppendValue};
