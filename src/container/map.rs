// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Map: keyed container of homogeneously typed entries with actions.
//!
//! Keys are primitives of a single declared key type; entries carry an
//! action (ADD, UPDATE, DELETE) and optional permission bytes. DELETE
//! entries carry no payload: `load()` reports no data and `payload()`
//! fails with `NoPayloadForDelete`.
//!
//! A map entry may also inject a pre-encoded key and payload verbatim,
//! bypassing type checking. This is the one supported raw passthrough
//! mode; every other container validates payload types on encode.

use crate::container::{check_container_type, check_count, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::core::value::{Datum, PrimitiveValue};
use crate::encoding::primitive::{decode_datum, encode_primitive};
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_SUMMARY: u8 = 0x01;
const HAS_COUNT_HINT: u8 = 0x02;
const HAS_KEY_FIELD_ID: u8 = 0x04;

const ENTRY_HAS_PERM: u8 = 0x10;

/// Action carried by a map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MapAction {
    /// Insert the keyed entry
    Add = 1,
    /// Apply the payload as an update to the keyed entry
    Update = 2,
    /// Remove the keyed entry; no payload
    Delete = 3,
}

impl MapAction {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(MapAction::Add),
            2 => Ok(MapAction::Update),
            3 => Ok(MapAction::Delete),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized map action code {other}"
            ))),
        }
    }

    /// Check if this action carries a payload.
    #[must_use]
    pub fn has_payload(self) -> bool {
        !matches!(self, MapAction::Delete)
    }
}

/// Key of a map entry: a typed primitive or pre-encoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    /// A typed key value matching the map's declared key type
    Value(PrimitiveValue),
    /// Verbatim key bytes, written without type checking
    PreEncoded(Vec<u8>),
}

impl From<PrimitiveValue> for MapKey {
    fn from(value: PrimitiveValue) -> Self {
        MapKey::Value(value)
    }
}

/// One map entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Entry action
    pub action: MapAction,
    /// Entry key
    pub key: MapKey,
    /// Optional permission bytes
    pub perm_data: Option<Vec<u8>>,
    /// Entry payload; must be `Payload::None` for DELETE
    pub payload: Payload,
}

impl MapEntry {
    /// Create an ADD entry.
    #[must_use]
    pub fn add(key: impl Into<MapKey>, payload: Payload) -> Self {
        Self {
            action: MapAction::Add,
            key: key.into(),
            perm_data: None,
            payload,
        }
    }

    /// Create an UPDATE entry.
    #[must_use]
    pub fn update(key: impl Into<MapKey>, payload: Payload) -> Self {
        Self {
            action: MapAction::Update,
            key: key.into(),
            perm_data: None,
            payload,
        }
    }

    /// Create a DELETE entry.
    #[must_use]
    pub fn delete(key: impl Into<MapKey>) -> Self {
        Self {
            action: MapAction::Delete,
            key: key.into(),
            perm_data: None,
            payload: Payload::None,
        }
    }

    /// Create an ADD entry from pre-encoded key and payload bytes,
    /// injected verbatim with no type checking.
    #[must_use]
    pub fn add_pre_encoded(key: Vec<u8>, payload_type: DataType, payload: Vec<u8>) -> Self {
        Self {
            action: MapAction::Add,
            key: MapKey::PreEncoded(key),
            perm_data: None,
            payload: Payload::PreEncoded(payload_type, payload),
        }
    }

    /// Attach permission bytes.
    #[must_use]
    pub fn with_perm_data(mut self, perm_data: Vec<u8>) -> Self {
        self.perm_data = Some(perm_data);
        self
    }
}

/// Owned map for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Declared primitive type of every key
    pub key_type: DataType,
    /// Declared type of every entry payload
    pub container_type: DataType,
    /// Field id the keys correspond to, if any
    pub key_field_id: Option<i16>,
    /// Optional summary data of the declared payload type
    pub summary: Option<Box<Payload>>,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    /// Entries in encode order
    pub entries: Vec<MapEntry>,
}

impl Map {
    /// Create an empty map with the given key and payload types.
    #[must_use]
    pub fn new(key_type: DataType, container_type: DataType) -> Self {
        Self {
            key_type,
            container_type,
            key_field_id: None,
            summary: None,
            total_count_hint: None,
            entries: Vec::new(),
        }
    }

    /// Set the summary data.
    #[must_use]
    pub fn with_summary(mut self, summary: Payload) -> Self {
        self.summary = Some(Box::new(summary));
        self
    }

    /// Append an entry.
    pub fn push(&mut self, entry: MapEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    fn encode_inner(&self, w: &mut WireWriter) -> Result<()> {
        if !self.key_type.is_primitive() || self.key_type == DataType::Array {
            return Err(CodecError::invalid_argument(format!(
                "map keys must be non-array primitives, got {}",
                self.key_type
            )));
        }
        check_container_type(self.container_type)?;
        let mut flags = 0u8;
        if self.summary.is_some() {
            flags |= HAS_SUMMARY;
        }
        if self.total_count_hint.is_some() {
            flags |= HAS_COUNT_HINT;
        }
        if self.key_field_id.is_some() {
            flags |= HAS_KEY_FIELD_ID;
        }
        w.write_u8(flags)?;
        w.write_u8(self.key_type.code())?;
        w.write_u8(self.container_type.code())?;
        if let Some(fid) = self.key_field_id {
            w.write_i16(fid)?;
        }
        if let Some(summary) = &self.summary {
            if summary.data_type() != self.container_type {
                return Err(CodecError::wrong_type(
                    self.container_type,
                    summary.data_type(),
                ));
            }
            let slot = w.begin_slot()?;
            summary.encode_body(w)?;
            w.end_slot(slot)?;
        }
        if let Some(hint) = self.total_count_hint {
            w.write_u30rb(hint)?;
        }
        w.write_u16(check_count(self.entries.len())?)?;
        for entry in &self.entries {
            self.encode_entry(w, entry)?;
        }
        Ok(())
    }

    fn encode_entry(&self, w: &mut WireWriter, entry: &MapEntry) -> Result<()> {
        let has_payload = !matches!(entry.payload, Payload::None);
        if entry.action.has_payload() != has_payload {
            return Err(CodecError::invalid_argument(format!(
                "map {:?} entries {} a payload",
                entry.action,
                if entry.action.has_payload() {
                    "require"
                } else {
                    "do not carry"
                }
            )));
        }

        let mut entry_flags = entry.action as u8;
        if entry.perm_data.is_some() {
            entry_flags |= ENTRY_HAS_PERM;
        }
        w.write_u8(entry_flags)?;
        if let Some(perm) = &entry.perm_data {
            w.write_slot(perm)?;
        }

        match &entry.key {
            MapKey::Value(value) => {
                if value.data_type() != self.key_type {
                    return Err(CodecError::wrong_type(self.key_type, value.data_type()));
                }
                let slot = w.begin_slot()?;
                encode_primitive(w, value)?;
                w.end_slot(slot)?;
            }
            MapKey::PreEncoded(bytes) => w.write_slot(bytes)?,
        }

        if has_payload {
            match &entry.payload {
                // The raw passthrough: bytes go out verbatim.
                Payload::PreEncoded(_, bytes) => w.write_slot(bytes)?,
                payload => {
                    if payload.data_type() != self.container_type {
                        return Err(CodecError::wrong_type(
                            self.container_type,
                            payload.data_type(),
                        ));
                    }
                    let slot = w.begin_slot()?;
                    payload.encode_body(w)?;
                    w.end_slot(slot)?;
                }
            }
        }
        Ok(())
    }
}

impl WireEncode for Map {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded map view.
#[derive(Debug, Clone)]
pub struct MapRef<'a> {
    /// Declared primitive type of every key
    pub key_type: DataType,
    /// Declared type of every entry payload
    pub container_type: DataType,
    /// Field id the keys correspond to, if any
    pub key_field_id: Option<i16>,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    summary_raw: Option<&'a [u8]>,
    count: u16,
    entries_raw: &'a [u8],
}

impl<'a> MapRef<'a> {
    /// Decode the container header, leaving entries for iteration.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let flags = cursor.read_u8()?;
        let key_type = DataType::from_code(cursor.read_u8()?)?;
        let container_type = DataType::from_code(cursor.read_u8()?)?;
        let key_field_id = if flags & HAS_KEY_FIELD_ID != 0 {
            Some(cursor.read_i16()?)
        } else {
            None
        };
        let summary_raw = if flags & HAS_SUMMARY != 0 {
            Some(cursor.read_slot()?)
        } else {
            None
        };
        let total_count_hint = if flags & HAS_COUNT_HINT != 0 {
            Some(cursor.read_u30rb()?)
        } else {
            None
        };
        let count = cursor.read_u16()?;
        Ok(Self {
            key_type,
            container_type,
            key_field_id,
            total_count_hint,
            summary_raw,
            count,
            entries_raw: cursor.take_rest(),
        })
    }

    /// Get the entry count.
    #[must_use]
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Check whether summary data is present.
    #[must_use]
    pub fn has_summary(&self) -> bool {
        self.summary_raw.is_some()
    }

    /// Decode the summary data with the declared payload type.
    pub fn summary(&self) -> Result<Option<PayloadRef<'a>>> {
        match self.summary_raw {
            Some(raw) => Ok(Some(PayloadRef::decode(self.container_type, raw)?)),
            None => Ok(None),
        }
    }

    /// Iterate the entries from the first.
    #[must_use]
    pub fn iter(&self) -> MapEntries<'a> {
        MapEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            key_type: self.key_type,
            container_type: self.container_type,
            failed: false,
        }
    }
}

/// Restartable iterator over map entries.
pub struct MapEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u16,
    key_type: DataType,
    container_type: DataType,
    failed: bool,
}

impl<'a> MapEntries<'a> {
    fn next_inner(&mut self) -> Result<MapEntryRef<'a>> {
        let entry_flags = self.cursor.read_u8()?;
        let action = MapAction::from_code(entry_flags & 0x07)?;
        let perm_data = if entry_flags & ENTRY_HAS_PERM != 0 {
            Some(self.cursor.read_slot()?)
        } else {
            None
        };
        let key_raw = self.cursor.read_slot()?;
        let key = decode_datum(self.key_type, key_raw);
        if let Err(e) = &key {
            warn!(error = %e, "map entry key failed to decode; continuing");
        }
        let (raw, load) = if action.has_payload() {
            let raw = self.cursor.read_slot()?;
            let load = PayloadRef::decode(self.container_type, raw);
            if let Err(e) = &load {
                warn!(error = %e, "map entry payload failed to decode; continuing");
            }
            (raw, load)
        } else {
            (&[] as &[u8], Ok(PayloadRef::None))
        };
        Ok(MapEntryRef {
            action,
            key,
            perm_data,
            raw,
            load,
        })
    }
}

impl<'a> Iterator for MapEntries<'a> {
    type Item = Result<MapEntryRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.next_inner() {
            Ok(entry) => Some(Ok(entry)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decoded map entry.
#[derive(Debug, Clone)]
pub struct MapEntryRef<'a> {
    /// Entry action
    pub action: MapAction,
    key: Result<Datum>,
    perm_data: Option<&'a [u8]>,
    raw: &'a [u8],
    load: Result<PayloadRef<'a>>,
}

impl<'a> MapEntryRef<'a> {
    /// Get the decoded key, or the error attached to it.
    pub fn key(&self) -> Result<&Datum> {
        match &self.key {
            Ok(key) => Ok(key),
            Err(e) => Err(e.clone()),
        }
    }

    /// Get the permission bytes, if present.
    #[must_use]
    pub fn perm_data(&self) -> Option<&'a [u8]> {
        self.perm_data
    }

    /// Get whatever the entry carries: DELETE entries report
    /// [`PayloadRef::None`], whose data type is no-data.
    pub fn load(&self) -> Result<&PayloadRef<'a>> {
        match &self.load {
            Ok(load) => Ok(load),
            Err(e) => Err(e.clone()),
        }
    }

    /// Get the payload; fails with `NoPayloadForDelete` on DELETE entries.
    pub fn payload(&self) -> Result<&PayloadRef<'a>> {
        if self.action == MapAction::Delete {
            return Err(CodecError::NoPayloadForDelete);
        }
        self.load()
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
    use crate::container::{FieldEntry, FieldList};
    use crate::core::value::PrimitiveValue;

    fn field_list(value: u64) -> FieldList {
        let mut list = FieldList::new();
        list.push(FieldEntry::new(1, PrimitiveValue::UInt(value)));
        list
    }

    fn sample() -> Map {
        let mut map = Map::new(DataType::UInt, DataType::FieldList);
        map.push(MapEntry::add(
            PrimitiveValue::UInt(1),
            Payload::FieldList(field_list(100)),
        ))
        .push(MapEntry::update(
            PrimitiveValue::UInt(2),
            Payload::FieldList(field_list(200)),
        ))
        .push(MapEntry::delete(PrimitiveValue::UInt(3)));
        map
    }

    #[test]
    fn test_round_trip() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        assert_eq!(decoded.key_type, DataType::UInt);
        assert_eq!(decoded.container_type, DataType::FieldList);
        assert_eq!(decoded.count(), 3);

        let entries: Vec<_> = decoded.iter().map(|e| e.unwrap()).collect();
        assert_eq!(entries[0].action, MapAction::Add);
        assert_eq!(entries[0].key().unwrap().as_uint().unwrap(), 1);
        assert!(entries[0].payload().unwrap().field_list().is_ok());

        assert_eq!(entries[1].action, MapAction::Update);
        assert_eq!(entries[1].key().unwrap().as_uint().unwrap(), 2);

        assert_eq!(entries[2].action, MapAction::Delete);
        assert_eq!(entries[2].key().unwrap().as_uint().unwrap(), 3);
        // DELETE: load reports no data, payload access is an error.
        assert_eq!(entries[2].load().unwrap().data_type(), DataType::NoData);
        assert_eq!(
            entries[2].payload().unwrap_err(),
            CodecError::NoPayloadForDelete
        );
    }

    #[test]
    fn test_delete_rejects_payload_on_encode() {
        let mut map = Map::new(DataType::UInt, DataType::FieldList);
        map.push(MapEntry {
            action: MapAction::Delete,
            key: MapKey::Value(PrimitiveValue::UInt(1)),
            perm_data: None,
            payload: Payload::FieldList(field_list(1)),
        });
        assert!(map.encode_to_vec().is_err());
    }

    #[test]
    fn test_key_type_enforced() {
        let mut map = Map::new(DataType::UInt, DataType::FieldList);
        map.push(MapEntry::add(
            PrimitiveValue::Int(-1),
            Payload::FieldList(field_list(1)),
        ));
        assert_eq!(
            map.encode_to_vec().unwrap_err(),
            CodecError::wrong_type(DataType::UInt, DataType::Int)
        );
    }

    #[test]
    fn test_array_key_type_rejected() {
        let map = Map::new(DataType::Array, DataType::FieldList);
        assert!(map.encode_to_vec().is_err());
    }

    #[test]
    fn test_buffer_keys() {
        let mut map = Map::new(DataType::Buffer, DataType::FieldList);
        map.push(MapEntry::add(
            PrimitiveValue::Buffer(vec![0xCA, 0xFE]),
            Payload::FieldList(field_list(1)),
        ));
        let buf = map.encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        assert_eq!(entry.key().unwrap().as_buffer().unwrap(), &[0xCA, 0xFE]);
    }

    #[test]
    fn test_pre_encoded_passthrough() {
        // Encode the key and payload by hand, inject them verbatim, and
        // confirm they decode as if written through the typed path.
        let key_bytes = vec![0x07];
        let payload_bytes = field_list(55).encode_to_vec().unwrap();

        let mut map = Map::new(DataType::UInt, DataType::FieldList);
        map.push(MapEntry::add_pre_encoded(
            key_bytes,
            DataType::FieldList,
            payload_bytes,
        ));

        let buf = map.encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        assert_eq!(entry.key().unwrap().as_uint().unwrap(), 7);
        assert!(entry.payload().unwrap().field_list().is_ok());
    }

    #[test]
    fn test_pre_encoded_bypasses_type_check() {
        // The passthrough accepts bytes that do not match the declared
        // container type; the mismatch surfaces at decode time instead.
        let mut map = Map::new(DataType::UInt, DataType::FieldList);
        map.push(MapEntry::add_pre_encoded(
            vec![0x01],
            DataType::ElementList,
            vec![0xFF],
        ));
        let buf = map.encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        assert!(entry.payload().is_err());
    }

    #[test]
    fn test_summary_and_hints() {
        let mut map = Map::new(DataType::AsciiString, DataType::FieldList)
            .with_summary(Payload::FieldList(field_list(0)));
        map.key_field_id = Some(32);
        map.total_count_hint = Some(100);
        map.push(
            MapEntry::add(
                PrimitiveValue::Ascii("TRI.N".to_string()),
                Payload::FieldList(field_list(1)),
            )
            .with_perm_data(vec![9, 9]),
        );

        let buf = map.encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        assert_eq!(decoded.key_field_id, Some(32));
        assert_eq!(decoded.total_count_hint, Some(100));
        assert!(decoded.summary().unwrap().is_some());
        let entry = decoded.iter().next().unwrap().unwrap();
        assert_eq!(entry.key().unwrap().as_ascii().unwrap(), "TRI.N");
        assert_eq!(entry.perm_data(), Some(&[9, 9][..]));
    }

    #[test]
    fn test_restartable_iteration() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = MapRef::decode(&buf).unwrap();
        let mut iter = decoded.iter();
        iter.next();
        let keys: Vec<u64> = decoded
            .iter()
            .map(|e| e.unwrap().key().unwrap().as_uint().unwrap())
            .collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }
}
