// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field list: entries keyed by dictionary field ids.
//!
//! Field entries carry no per-entry type tag on the wire; the decoder
//! resolves each field id through the dictionary to learn the payload
//! type. An id the dictionary does not know, or a payload the resolved
//! type cannot decode, is an entry-level error: it is attached to that
//! entry and iteration continues with the next sibling, because the
//! entry's own length prefix is still intact.

use crate::container::{check_count, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::core::value::PrimitiveValue;
use crate::dictionary::DataDictionary;
use crate::encoding::primitive::encode_datum_slot;
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_INFO: u8 = 0x01;

/// Dictionary reference carried in a field list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldListInfo {
    /// Dictionary the field ids resolve against
    pub dictionary_id: u8,
    /// Record template number
    pub field_list_num: i16,
}

/// One field entry: a field id and a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// Dictionary field id; negative ids are user-defined
    pub field_id: i16,
    /// Entry payload
    pub payload: Payload,
}

impl FieldEntry {
    /// Create an entry holding a present primitive value.
    #[must_use]
    pub fn new(field_id: i16, value: PrimitiveValue) -> Self {
        Self {
            field_id,
            payload: Payload::value(value),
        }
    }

    /// Create an explicitly blank entry of the given type.
    #[must_use]
    pub fn blank(field_id: i16, data_type: DataType) -> Self {
        Self {
            field_id,
            payload: Payload::blank(data_type),
        }
    }

    /// Create an entry holding a container or message payload.
    #[must_use]
    pub fn container(field_id: i16, payload: Payload) -> Self {
        Self { field_id, payload }
    }
}

/// Owned field list for encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldList {
    /// Optional dictionary reference
    pub info: Option<FieldListInfo>,
    /// Entries in encode order
    pub entries: Vec<FieldEntry>,
}

impl FieldList {
    /// Create an empty field list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty field list with header info.
    #[must_use]
    pub fn with_info(info: FieldListInfo) -> Self {
        Self {
            info: Some(info),
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: FieldEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    fn encode_inner(&self, w: &mut WireWriter) -> Result<()> {
        let mut flags = 0u8;
        if self.info.is_some() {
            flags |= HAS_INFO;
        }
        w.write_u8(flags)?;
        if let Some(info) = &self.info {
            w.write_u8(info.dictionary_id)?;
            w.write_i16(info.field_list_num)?;
        }
        w.write_u16(check_count(self.entries.len())?)?;
        for entry in &self.entries {
            w.write_i16(entry.field_id)?;
            match &entry.payload {
                Payload::Primitive(datum) => encode_datum_slot(w, datum)?,
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

impl WireEncode for FieldList {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded field list view.
///
/// Holds the parsed header and the raw entry range; [`iter`] derives a
/// fresh cursor per call, so iteration is restartable.
///
/// [`iter`]: FieldListRef::iter
#[derive(Debug, Clone)]
pub struct FieldListRef<'a> {
    /// Optional dictionary reference
    pub info: Option<FieldListInfo>,
    count: u16,
    entries_raw: &'a [u8],
}

impl<'a> FieldListRef<'a> {
    /// Decode the container header, leaving entries for iteration.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let flags = cursor.read_u8()?;
        let info = if flags & HAS_INFO != 0 {
            let dictionary_id = cursor.read_u8()?;
            let field_list_num = cursor.read_i16()?;
            Some(FieldListInfo {
                dictionary_id,
                field_list_num,
            })
        } else {
            None
        };
        let count = cursor.read_u16()?;
        Ok(Self {
            info,
            count,
            entries_raw: cursor.take_rest(),
        })
    }

    /// Get the entry count.
    #[must_use]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Iterate the entries from the first, resolving types through the
    /// dictionary.
    #[must_use]
    pub fn iter(&self, dictionary: &'a DataDictionary) -> FieldEntries<'a> {
        FieldEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            dictionary,
            failed: false,
        }
    }
}

/// Restartable iterator over field entries.
pub struct FieldEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u16,
    dictionary: &'a DataDictionary,
    failed: bool,
}

impl<'a> Iterator for FieldEntries<'a> {
    type Item = Result<FieldEntryRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // Entry structure: a broken header here is fatal to iteration.
        let field_id = match self.cursor.read_i16() {
            Ok(id) => id,
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

        // Payload typing and decode are local to the entry.
        let payload = match self.dictionary.field(field_id) {
            Some(def) => PayloadRef::decode(def.data_type, raw),
            None => Err(CodecError::field_not_found(field_id)),
        };
        if let Err(e) = &payload {
            warn!(field_id, error = %e, "field entry payload failed to decode; continuing");
        }
        Some(Ok(FieldEntryRef {
            field_id,
            raw,
            payload,
        }))
    }
}

/// Decoded field entry.
#[derive(Debug, Clone)]
pub struct FieldEntryRef<'a> {
    /// Dictionary field id
    pub field_id: i16,
    raw: &'a [u8],
    payload: Result<PayloadRef<'a>>,
}

impl<'a> FieldEntryRef<'a> {
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

    /// Get the field's acronym from the dictionary.
    #[must_use]
    pub fn acronym(&self, dictionary: &'a DataDictionary) -> Option<&'a str> {
        dictionary.field(self.field_id).map(|def| def.acronym.as_str())
    }

    /// Resolve an enum entry's display string through the dictionary.
    pub fn enum_display(&self, dictionary: &'a DataDictionary) -> Result<&'a str> {
        let code = self.payload()?.datum()?.as_enum()?;
        dictionary.enum_display(self.field_id, code)
    }
}
