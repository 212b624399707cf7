// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Container codecs.
//!
//! Six container kinds sequence typed entries with positional or keyed
//! addressing; any entry payload may itself be a primitive, another
//! container, or a message, so nesting is unbounded.
//!
//! Each kind has an owned model used for encoding (`FieldList`, `Map`,
//! ...) and a borrowing decode view (`FieldListRef`, `MapRef`, ...).
//! A decode view parses only the container header and retains the raw
//! entry byte range; every call to `iter()` derives a fresh cursor over
//! that range, so iteration is restartable and exhausted iterators never
//! affect later ones.
//!
//! Entry-level decode errors (a damaged payload inside an intact entry
//! slot) are attached to the entry and iteration continues with the next
//! sibling. Structural errors (a truncated entry header) end iteration.

pub mod element_list;
pub mod field_list;
pub mod filter_list;
pub mod map;
pub mod series;
pub mod vector;

pub use element_list::{ElementEntry, ElementEntryRef, ElementList, ElementListRef};
pub use field_list::{FieldEntry, FieldEntryRef, FieldList, FieldListInfo, FieldListRef};
pub use filter_list::{FilterAction, FilterEntry, FilterEntryRef, FilterList, FilterListRef};
pub use map::{Map, MapAction, MapEntry, MapEntryRef, MapKey, MapRef};
pub use series::{Series, SeriesRef};
pub use vector::{Vector, VectorAction, VectorEntry, VectorEntryRef, VectorRef};

use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::core::value::{Datum, PrimitiveValue};
use crate::encoding::primitive::{decode_datum, encode_primitive};
use crate::encoding::wire::WireWriter;
use crate::message::{Msg, MsgRef};

/// Types that encode themselves into a wire writer.
pub trait WireEncode {
    /// Encode into the writer. On failure the writer is rolled back to
    /// where this value started; previously written sibling data is
    /// untouched.
    fn encode(&self, w: &mut WireWriter) -> Result<()>;

    /// Encode into a fresh growable buffer.
    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut w = WireWriter::new();
        self.encode(&mut w)?;
        Ok(w.finish())
    }
}

/// Owned payload for encoding: a primitive, any container, or a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload (DELETE/CLEAR entries, messages without data)
    None,
    /// A primitive slot, present or blank
    Primitive(Datum),
    /// Field-id keyed container
    FieldList(FieldList),
    /// Name keyed container
    ElementList(ElementList),
    /// Filter-id keyed container
    FilterList(FilterList),
    /// Ordered homogeneous container
    Series(Series),
    /// Indexed container
    Vector(Vector),
    /// Keyed container
    Map(Map),
    /// Nested message envelope
    Msg(Box<Msg>),
    /// Opaque bytes passed through unexamined
    Opaque(Vec<u8>),
    /// Verbatim pre-encoded payload; accepted only by map entries
    PreEncoded(DataType, Vec<u8>),
}

impl Payload {
    /// Convenience constructor for a present primitive payload.
    #[must_use]
    pub fn value(value: PrimitiveValue) -> Self {
        Payload::Primitive(Datum::Present(value))
    }

    /// Convenience constructor for a blank primitive payload.
    #[must_use]
    pub fn blank(data_type: DataType) -> Self {
        Payload::Primitive(Datum::Blank(data_type))
    }

    /// Get the declared wire type of this payload.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Payload::None => DataType::NoData,
            Payload::Primitive(datum) => datum.data_type(),
            Payload::FieldList(_) => DataType::FieldList,
            Payload::ElementList(_) => DataType::ElementList,
            Payload::FilterList(_) => DataType::FilterList,
            Payload::Series(_) => DataType::Series,
            Payload::Vector(_) => DataType::Vector,
            Payload::Map(_) => DataType::Map,
            Payload::Msg(_) => DataType::Msg,
            Payload::Opaque(_) => DataType::Opaque,
            Payload::PreEncoded(data_type, _) => *data_type,
        }
    }

    /// Encode the payload body (the contents of its slot).
    ///
    /// A blank primitive writes nothing, which decodes back to blank.
    /// `None` and `PreEncoded` are handled by the owning entry encoder;
    /// reaching them here is a caller error.
    pub(crate) fn encode_body(&self, w: &mut WireWriter) -> Result<()> {
        match self {
            Payload::None => Err(CodecError::invalid_argument(
                "entry requires a payload but none was set",
            )),
            Payload::Primitive(Datum::Blank(_)) => Ok(()),
            Payload::Primitive(Datum::Present(value)) => encode_primitive(w, value),
            Payload::FieldList(v) => v.encode(w),
            Payload::ElementList(v) => v.encode(w),
            Payload::FilterList(v) => v.encode(w),
            Payload::Series(v) => v.encode(w),
            Payload::Vector(v) => v.encode(w),
            Payload::Map(v) => v.encode(w),
            Payload::Msg(v) => v.encode(w),
            Payload::Opaque(bytes) => w.write_bytes(bytes),
            Payload::PreEncoded(..) => Err(CodecError::invalid_argument(
                "pre-encoded payloads are only supported in map entries",
            )),
        }
    }
}

impl From<PrimitiveValue> for Payload {
    fn from(value: PrimitiveValue) -> Self {
        Payload::value(value)
    }
}

/// Decoded payload view: the declared type selects the variant.
#[derive(Debug, Clone)]
pub enum PayloadRef<'a> {
    /// No payload
    None,
    /// A primitive slot, present or blank
    Primitive(Datum),
    /// Field-id keyed container
    FieldList(FieldListRef<'a>),
    /// Name keyed container
    ElementList(ElementListRef<'a>),
    /// Filter-id keyed container
    FilterList(FilterListRef<'a>),
    /// Ordered homogeneous container
    Series(SeriesRef<'a>),
    /// Indexed container
    Vector(VectorRef<'a>),
    /// Keyed container
    Map(MapRef<'a>),
    /// Nested message envelope
    Msg(Box<MsgRef<'a>>),
    /// Opaque bytes
    Opaque(&'a [u8]),
}

impl<'a> PayloadRef<'a> {
    /// Decode a payload of the declared type from its slot bytes.
    ///
    /// An empty slot reports no data for container types and blank for
    /// primitive types.
    pub fn decode(data_type: DataType, bytes: &'a [u8]) -> Result<Self> {
        if data_type == DataType::NoData {
            if !bytes.is_empty() {
                return Err(CodecError::invalid_argument(
                    "no_data payload must be empty",
                ));
            }
            return Ok(PayloadRef::None);
        }
        if data_type.is_primitive() {
            return Ok(PayloadRef::Primitive(decode_datum(data_type, bytes)?));
        }
        if bytes.is_empty() && data_type != DataType::Opaque {
            return Ok(PayloadRef::None);
        }
        match data_type {
            DataType::FieldList => Ok(PayloadRef::FieldList(FieldListRef::decode(bytes)?)),
            DataType::ElementList => Ok(PayloadRef::ElementList(ElementListRef::decode(bytes)?)),
            DataType::FilterList => Ok(PayloadRef::FilterList(FilterListRef::decode(bytes)?)),
            DataType::Series => Ok(PayloadRef::Series(SeriesRef::decode(bytes)?)),
            DataType::Vector => Ok(PayloadRef::Vector(VectorRef::decode(bytes)?)),
            DataType::Map => Ok(PayloadRef::Map(MapRef::decode(bytes)?)),
            DataType::Msg => Ok(PayloadRef::Msg(Box::new(MsgRef::decode(bytes)?))),
            DataType::Opaque => Ok(PayloadRef::Opaque(bytes)),
            // NoData and primitives handled above.
            _ => unreachable!(),
        }
    }

    /// Get the declared type of this payload.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            PayloadRef::None => DataType::NoData,
            PayloadRef::Primitive(datum) => datum.data_type(),
            PayloadRef::FieldList(_) => DataType::FieldList,
            PayloadRef::ElementList(_) => DataType::ElementList,
            PayloadRef::FilterList(_) => DataType::FilterList,
            PayloadRef::Series(_) => DataType::Series,
            PayloadRef::Vector(_) => DataType::Vector,
            PayloadRef::Map(_) => DataType::Map,
            PayloadRef::Msg(_) => DataType::Msg,
            PayloadRef::Opaque(_) => DataType::Opaque,
        }
    }

    /// Get the primitive datum.
    pub fn datum(&self) -> Result<&Datum> {
        match self {
            PayloadRef::Primitive(datum) => Ok(datum),
            other => Err(CodecError::invalid_argument(format!(
                "payload is {}, not a primitive",
                other.data_type()
            ))),
        }
    }

    /// Get the field list view.
    pub fn field_list(&self) -> Result<&FieldListRef<'a>> {
        match self {
            PayloadRef::FieldList(v) => Ok(v),
            other => Err(CodecError::wrong_type(
                DataType::FieldList,
                other.data_type(),
            )),
        }
    }

    /// Get the element list view.
    pub fn element_list(&self) -> Result<&ElementListRef<'a>> {
        match self {
            PayloadRef::ElementList(v) => Ok(v),
            other => Err(CodecError::wrong_type(
                DataType::ElementList,
                other.data_type(),
            )),
        }
    }

    /// Get the filter list view.
    pub fn filter_list(&self) -> Result<&FilterListRef<'a>> {
        match self {
            PayloadRef::FilterList(v) => Ok(v),
            other => Err(CodecError::wrong_type(
                DataType::FilterList,
                other.data_type(),
            )),
        }
    }

    /// Get the series view.
    pub fn series(&self) -> Result<&SeriesRef<'a>> {
        match self {
            PayloadRef::Series(v) => Ok(v),
            other => Err(CodecError::wrong_type(DataType::Series, other.data_type())),
        }
    }

    /// Get the vector view.
    pub fn vector(&self) -> Result<&VectorRef<'a>> {
        match self {
            PayloadRef::Vector(v) => Ok(v),
            other => Err(CodecError::wrong_type(DataType::Vector, other.data_type())),
        }
    }

    /// Get the map view.
    pub fn map(&self) -> Result<&MapRef<'a>> {
        match self {
            PayloadRef::Map(v) => Ok(v),
            other => Err(CodecError::wrong_type(DataType::Map, other.data_type())),
        }
    }

    /// Get the nested message view.
    pub fn msg(&self) -> Result<&MsgRef<'a>> {
        match self {
            PayloadRef::Msg(v) => Ok(v),
            other => Err(CodecError::wrong_type(DataType::Msg, other.data_type())),
        }
    }

    /// Get the opaque bytes.
    pub fn opaque(&self) -> Result<&'a [u8]> {
        match self {
            PayloadRef::Opaque(bytes) => Ok(bytes),
            other => Err(CodecError::wrong_type(DataType::Opaque, other.data_type())),
        }
    }
}

/// Shared helper: fail unless the declared container type is a container.
pub(crate) fn check_container_type(data_type: DataType) -> Result<()> {
    if !data_type.is_container() {
        return Err(CodecError::invalid_argument(format!(
            "declared container type must be a container, got {data_type}"
        )));
    }
    Ok(())
}

/// Shared helper: fail unless the entry count fits a u16.
pub(crate) fn check_count(count: usize) -> Result<u16> {
    u16::try_from(count)
        .map_err(|_| CodecError::invalid_argument(format!("entry count {count} exceeds u16")))
}
