// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # marketcodec
//!
//! Self-describing binary codec for market data.
//!
//! This library encodes and decodes a layered data model:
//! - **Primitives** in [`core`](crate::core) - integers, decimals
//!   ([`Real`]), temporal values, quality of service, stream state,
//!   enums, strings, and homogeneous arrays, each with explicit blank
//!   semantics ([`Datum`]).
//! - **Containers** in [`container`](crate::container) - field lists,
//!   element lists, filter lists, series, vectors, and maps, nesting
//!   each other and messages to any depth.
//! - **Messages** in [`message`](crate::message) - request, refresh,
//!   update, status, generic, post, and ack envelopes whose key
//!   attributes and payloads are containers.
//! - **Dictionary** in [`dictionary`](crate::dictionary) - read-only
//!   field and enum metadata, loaded once and shared by every decode.
//!
//! ## Example: encode and decode a field list
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use marketcodec::container::{FieldEntry, FieldList, WireEncode};
//! use marketcodec::dictionary::DataDictionary;
//! use marketcodec::container::FieldListRef;
//! use marketcodec::{DataType, PrimitiveValue};
//!
//! let mut dictionary = DataDictionary::new();
//! dictionary.add_field("PROD_PERM", 1, DataType::UInt, 5)?;
//!
//! let mut list = FieldList::new();
//! list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)));
//! let buf = list.encode_to_vec()?;
//!
//! let decoded = FieldListRef::decode(&buf)?;
//! for entry in decoded.iter(&dictionary) {
//!     let entry = entry?;
//!     println!("{} = {:?}", entry.field_id, entry.payload()?.datum()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Decoding is restartable: container views keep their raw entry range
//! and every `iter()` call replays from the first entry. Entry-level
//! damage (an undecodable payload inside an intact entry) is attached
//! to the entry, and siblings still decode.

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{
    ArrayValue, CodecError, DataCode, DataState, DataType, Date, DateTime, Datum, PrimitiveValue,
    Qos, Rate, Real, RealHint, Result, State, StreamState, Time, Timeliness,
};

// Byte-level wire layer and primitive codec
pub mod encoding;

// Container codecs
pub mod container;

// Message codec
pub mod message;

// Dictionary service
pub mod dictionary;

// Re-export the types most callers touch
pub use container::{Payload, PayloadRef, WireEncode};
pub use dictionary::{DataDictionary, DictionaryError};
pub use encoding::{WireCursor, WireWriter};
pub use message::{Msg, MsgClass, MsgEncoder, MsgKey, MsgRef};
