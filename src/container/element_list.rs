// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Element list: entries keyed by name with per-entry type tags.
//!
//! Unlike a field list, every element entry is self-describing: the name
//! slot is followed by a one-byte type tag and the payload slot, so no
//! dictionary is needed to decode. An unknown type tag or a damaged
//! payload is an entry-level error; the intact slot structure lets
//! iteration continue with the next sibling.

use crate::container::{check_count, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_INFO: u8 = 0x01;

/// One element entry: a name, a declared type, and a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementEntry {
    /// Entry name
    pub name: String,
    /// Entry payload
    pub payload: Payload,
}

impl ElementEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Owned element list for encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementList {
    /// Optional template number
    pub list_num: Option<i16>,
    /// Entries in encode order
    pub entries: Vec<ElementEntry>,
}

impl ElementList {
    /// Create an empty element list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: ElementEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    fn encode_inner(&self, w: &mut WireWriter) -> Result<()> {
        let mut flags = 0u8;
        if self.list_num.is_some() {
            flags |= HAS_INFO;
        }
        w.write_u8(flags)?;
        if let Some(list_num) = self.list_num {
            w.write_i16(list_num)?;
        }
        w.write_u16(check_count(self.entries.len())?)?;
        for entry in &self.entries {
            w.write_slot(entry.name.as_bytes())?;
            w.write_u8(entry.payload.data_type().code())?;
            match &entry.payload {
                Payload::Primitive(datum) => {
                    crate::encoding::primitive::encode_datum_slot(w, datum)?
                }
                payload => {
                    let slot = w.begin_slot()?;
                    payload.encode_body(w)?;
                    w.end_slot(slot)?;
                }
            }
        }
        Ok(())
    }
}

impl WireEncode for ElementList {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded element list view.
#[derive(Debug, Clone)]
pub struct ElementListRef<'a> {
    /// Optional template number
    pub list_num: Option<i16>,
    count: u16,
    entries_raw: &'a [u8],
}

impl<'a> ElementListRef<'a> {
    /// Decode the container header, leaving entries for iteration.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let flags = cursor.read_u8()?;
        let list_num = if flags & HAS_INFO != 0 {
            Some(cursor.read_i16()?)
        } else {
            None
        };
        let count = cursor.read_u16()?;
        Ok(Self {
            list_num,
            count,
            entries_raw: cursor.take_rest(),
        })
    }

    /// Get the entry count.
    #[must_use]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Iterate the entries from the first.
    #[must_use]
    pub fn iter(&self) -> ElementEntries<'a> {
        ElementEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            failed: false,
        }
    }
}

/// Restartable iterator over element entries.
pub struct ElementEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u16,
    failed: bool,
}

impl<'a> Iterator for ElementEntries<'a> {
    type Item = Result<ElementEntryRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let name_raw = match self.cursor.read_slot() {
            Ok(slot) => slot,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        let type_code = match self.cursor.read_u8() {
            Ok(code) => code,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        let raw = match self.cursor.read_slot() {
            Ok(slot) => slot,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        let payload =
            DataType::from_code(type_code).and_then(|data_type| PayloadRef::decode(data_type, raw));
        if let Err(e) = &payload {
            warn!(name = %String::from_utf8_lossy(name_raw), error = %e,
                "element entry payload failed to decode; continuing");
        }
        Some(Ok(ElementEntryRef {
            name_raw,
            raw,
            payload,
        }))
    }
}

/// Decoded element entry.
#[derive(Debug, Clone)]
pub struct ElementEntryRef<'a> {
    name_raw: &'a [u8],
    raw: &'a [u8],
    payload: Result<PayloadRef<'a>>,
}

impl<'a> ElementEntryRef<'a> {
    /// Get the entry name.
    pub fn name(&self) -> Result<&'a str> {
        std::str::from_utf8(self.name_raw)
            .map_err(|_| CodecError::invalid_argument("element name is not UTF-8"))
    }

    /// Get the raw name bytes.
    #[must_use]
    pub fn name_raw(&self) -> &'a [u8] {
        self.name_raw
    }

    /// Get the decoded payload, or the error attached to this entry.
    pub fn payload(&self) -> Result<&PayloadRef<'a>> {
        match &self.payload {
            Ok(payload) => Ok(payload),
            Err(e) => Err(e.clone()),
        }
    }

    /// Get the raw payload bytes.
    #[must_use]
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::real::{Real, RealHint};
    use crate::core::temporal::{Date, DateTime, Time};
    use crate::core::value::{ArrayValue, Datum, PrimitiveValue};

    fn sample() -> ElementList {
        let mut list = ElementList::new();
        list.push(ElementEntry::new(
            "count",
            Payload::value(PrimitiveValue::Int(-5)),
        ))
        .push(ElementEntry::new(
            "price",
            Payload::value(PrimitiveValue::Real(Real::new(11, RealHint::ExponentNeg2))),
        ))
        .push(ElementEntry::new(
            "stamp",
            Payload::value(PrimitiveValue::DateTime(DateTime::new(
                Date::new(2023, 5, 14),
                Time::new(9, 30, 0, 0),
            ))),
        ))
        .push(ElementEntry::new(
            "levels",
            Payload::value(PrimitiveValue::Array(ArrayValue::new(
                DataType::UInt,
                vec![
                    Datum::Present(PrimitiveValue::UInt(1)),
                    Datum::Present(PrimitiveValue::UInt(2)),
                ],
            ))),
        ));
        list
    }

    #[test]
    fn test_round_trip() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        assert_eq!(decoded.count(), 4);

        let entries: Vec<_> = decoded.iter().map(|e| e.unwrap()).collect();
        assert_eq!(entries[0].name().unwrap(), "count");
        assert_eq!(
            entries[0].payload().unwrap().datum().unwrap().as_int().unwrap(),
            -5
        );
        assert_eq!(
            entries[1].payload().unwrap().datum().unwrap().as_real().unwrap(),
            Real::new(11, RealHint::ExponentNeg2)
        );
        assert_eq!(entries[2].name().unwrap(), "stamp");
        let array = entries[3]
            .payload()
            .unwrap()
            .datum()
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        assert_eq!(array.items.len(), 2);
    }

    #[test]
    fn test_restartable_iteration() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        let mut iter = decoded.iter();
        iter.next();
        drop(iter);
        let names: Vec<String> = decoded
            .iter()
            .map(|e| e.unwrap().name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["count", "price", "stamp", "levels"]);
    }

    #[test]
    fn test_list_num_round_trip() {
        let mut list = ElementList::new();
        list.list_num = Some(42);
        list.push(ElementEntry::new(
            "x",
            Payload::value(PrimitiveValue::UInt(1)),
        ));
        let buf = list.encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        assert_eq!(decoded.list_num, Some(42));
    }

    #[test]
    fn test_blank_entry() {
        let mut list = ElementList::new();
        list.push(ElementEntry::new("gap", Payload::blank(DataType::Time)));
        let buf = list.encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        let payload = entry.payload().unwrap().clone();
        let datum = payload.datum().unwrap();
        assert!(datum.is_blank());
        assert_eq!(datum.data_type(), DataType::Time);
    }

    #[test]
    fn test_nested_element_list() {
        let mut inner = ElementList::new();
        inner.push(ElementEntry::new(
            "leaf",
            Payload::value(PrimitiveValue::UInt(9)),
        ));
        let mut outer = ElementList::new();
        outer.push(ElementEntry::new("branch", Payload::ElementList(inner)));

        let buf = outer.encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        assert_eq!(entry.payload().unwrap().data_type(), DataType::ElementList);
        let payload = entry.payload().unwrap().clone();
        let nested = payload.element_list().unwrap();
        let leaf = nested.iter().next().unwrap().unwrap();
        assert_eq!(leaf.name().unwrap(), "leaf");
        assert_eq!(
            leaf.payload().unwrap().datum().unwrap().as_uint().unwrap(),
            9
        );
    }

    #[test]
    fn test_unknown_type_tag_is_entry_level() {
        // Hand-build: flags, count=2, entry with bogus type 77, then a
        // valid entry. The bad entry is flagged; the sibling decodes.
        let mut w = WireWriter::new();
        w.write_u8(0).unwrap();
        w.write_u16(2).unwrap();
        w.write_slot(b"bad").unwrap();
        w.write_u8(77).unwrap();
        w.write_slot(&[0x01]).unwrap();
        w.write_slot(b"good").unwrap();
        w.write_u8(DataType::UInt.code()).unwrap();
        w.write_slot(&[0x40]).unwrap();

        let buf = w.finish();
        let decoded = ElementListRef::decode(&buf).unwrap();
        let entries: Vec<_> = decoded.iter().map(|e| e.unwrap()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].payload().unwrap_err(),
            CodecError::unsupported_type(77)
        );
        assert_eq!(entries[1].name().unwrap(), "good");
        assert_eq!(
            entries[1].payload().unwrap().datum().unwrap().as_uint().unwrap(),
            64
        );
    }

    #[test]
    fn test_wrong_getter_fails() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        let err = entry.payload().unwrap().map().unwrap_err();
        assert!(matches!(err, CodecError::WrongDataTypeAccess { .. }));
    }

    #[test]
    fn test_empty_list() {
        let buf = ElementList::new().encode_to_vec().unwrap();
        let decoded = ElementListRef::decode(&buf).unwrap();
        assert_eq!(decoded.count(), 0);
        assert!(decoded.iter().next().is_none());
    }
}
