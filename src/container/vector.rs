// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Vector: indexed container of homogeneously typed entries with actions.
//!
//! Entries are addressed by a 30-bit index and carry an action (SET,
//! UPDATE, CLEAR, DELETE) plus optional permission bytes. CLEAR and
//! DELETE entries carry no payload. An optional summary data block of
//! the declared type describes all entries uniformly.

use crate::container::{check_container_type, check_count, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_SUMMARY: u8 = 0x01;
const HAS_COUNT_HINT: u8 = 0x02;

const ENTRY_HAS_PERM: u8 = 0x10;

/// Action carried by a vector entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VectorAction {
    /// Replace the entry at the index
    Set = 1,
    /// Apply the payload as an update
    Update = 2,
    /// Clear the position, keeping it addressable; no payload
    Clear = 3,
    /// Remove the position; no payload
    Delete = 4,
}

impl VectorAction {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(VectorAction::Set),
            2 => Ok(VectorAction::Update),
            3 => Ok(VectorAction::Clear),
            4 => Ok(VectorAction::Delete),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized vector action code {other}"
            ))),
        }
    }

    /// Check if this action carries a payload.
    #[must_use]
    pub fn has_payload(self) -> bool {
        matches!(self, VectorAction::Set | VectorAction::Update)
    }
}

/// One vector entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    /// Position of the entry
    pub index: u32,
    /// Entry action
    pub action: VectorAction,
    /// Optional permission bytes
    pub perm_data: Option<Vec<u8>>,
    /// Entry payload; must be `Payload::None` for CLEAR/DELETE
    pub payload: Payload,
}

impl VectorEntry {
    /// Create a SET entry.
    #[must_use]
    pub fn set(index: u32, payload: Payload) -> Self {
        Self {
            index,
            action: VectorAction::Set,
            perm_data: None,
            payload,
        }
    }

    /// Create an UPDATE entry.
    #[must_use]
    pub fn update(index: u32, payload: Payload) -> Self {
        Self {
            index,
            action: VectorAction::Update,
            perm_data: None,
            payload,
        }
    }

    /// Create a CLEAR entry.
    #[must_use]
    pub fn clear(index: u32) -> Self {
        Self {
            index,
            action: VectorAction::Clear,
            perm_data: None,
            payload: Payload::None,
        }
    }

    /// Create a DELETE entry.
    #[must_use]
    pub fn delete(index: u32) -> Self {
        Self {
            index,
            action: VectorAction::Delete,
            perm_data: None,
            payload: Payload::None,
        }
    }

    /// Attach permission bytes.
    #[must_use]
    pub fn with_perm_data(mut self, perm_data: Vec<u8>) -> Self {
        self.perm_data = Some(perm_data);
        self
    }
}

/// Owned vector for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    /// Declared type of every entry
    pub container_type: DataType,
    /// Optional summary data of the declared type
    pub summary: Option<Box<Payload>>,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    /// Entries in encode order
    pub entries: Vec<VectorEntry>,
}

impl Vector {
    /// Create an empty vector with the given entry type.
    #[must_use]
    pub fn new(container_type: DataType) -> Self {
        Self {
            container_type,
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
    pub fn push(&mut self, entry: VectorEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    fn encode_inner(&self, w: &mut WireWriter) -> Result<()> {
        check_container_type(self.container_type)?;
        let mut flags = 0u8;
        if self.summary.is_some() {
            flags |= HAS_SUMMARY;
        }
        if self.total_count_hint.is_some() {
            flags |= HAS_COUNT_HINT;
        }
        w.write_u8(flags)?;
        w.write_u8(self.container_type.code())?;
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

    fn encode_entry(&self, w: &mut WireWriter, entry: &VectorEntry) -> Result<()> {
        let has_payload = !matches!(entry.payload, Payload::None);
        if entry.action.has_payload() != has_payload {
            return Err(CodecError::invalid_argument(format!(
                "vector {:?} entries {} a payload",
                entry.action,
                if entry.action.has_payload() {
                    "require"
                } else {
                    "do not carry"
                }
            )));
        }
        if has_payload && entry.payload.data_type() != self.container_type {
            return Err(CodecError::wrong_type(
                self.container_type,
                entry.payload.data_type(),
            ));
        }
        w.write_u30rb(entry.index)?;
        let mut entry_flags = entry.action as u8;
        if entry.perm_data.is_some() {
            entry_flags |= ENTRY_HAS_PERM;
        }
        w.write_u8(entry_flags)?;
        if let Some(perm) = &entry.perm_data {
            w.write_slot(perm)?;
        }
        if has_payload {
            let slot = w.begin_slot()?;
            entry.payload.encode_body(w)?;
            w.end_slot(slot)?;
        }
        Ok(())
    }
}

impl WireEncode for Vector {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded vector view.
#[derive(Debug, Clone)]
pub struct VectorRef<'a> {
    /// Declared type of every entry
    pub container_type: DataType,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    summary_raw: Option<&'a [u8]>,
    count: u16,
    entries_raw: &'a [u8],
}

impl<'a> VectorRef<'a> {
    /// Decode the container header, leaving entries for iteration.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let flags = cursor.read_u8()?;
        let container_type = DataType::from_code(cursor.read_u8()?)?;
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
            container_type,
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

    /// Decode the summary data with the declared entry type.
    pub fn summary(&self) -> Result<Option<PayloadRef<'a>>> {
        match self.summary_raw {
            Some(raw) => Ok(Some(PayloadRef::decode(self.container_type, raw)?)),
            None => Ok(None),
        }
    }

    /// Iterate the entries from the first.
    #[must_use]
    pub fn iter(&self) -> VectorEntries<'a> {
        VectorEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            container_type: self.container_type,
            failed: false,
        }
    }
}

/// Restartable iterator over vector entries.
pub struct VectorEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u16,
    container_type: DataType,
    failed: bool,
}

impl<'a> VectorEntries<'a> {
    fn next_inner(&mut self) -> Result<VectorEntryRef<'a>> {
        let index = self.cursor.read_u30rb()?;
        let entry_flags = self.cursor.read_u8()?;
        let action = VectorAction::from_code(entry_flags & 0x07)?;
        let perm_data = if entry_flags & ENTRY_HAS_PERM != 0 {
            Some(self.cursor.read_slot()?)
        } else {
            None
        };
        let (raw, payload) = if action.has_payload() {
            let raw = self.cursor.read_slot()?;
            let payload = PayloadRef::decode(self.container_type, raw);
            if let Err(e) = &payload {
                warn!(index, error = %e, "vector entry payload failed to decode; continuing");
            }
            (raw, payload)
        } else {
            (&[] as &[u8], Ok(PayloadRef::None))
        };
        Ok(VectorEntryRef {
            index,
            action,
            perm_data,
            raw,
            payload,
        })
    }
}

impl<'a> Iterator for VectorEntries<'a> {
    type Item = Result<VectorEntryRef<'a>>;

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

/// Decoded vector entry.
#[derive(Debug, Clone)]
pub struct VectorEntryRef<'a> {
    /// Position of the entry
    pub index: u32,
    /// Entry action
    pub action: VectorAction,
    perm_data: Option<&'a [u8]>,
    raw: &'a [u8],
    payload: Result<PayloadRef<'a>>,
}

impl<'a> VectorEntryRef<'a> {
    /// Get the permission bytes, if present.
    #[must_use]
    pub fn perm_data(&self) -> Option<&'a [u8]> {
        self.perm_data
    }

    /// Get the decoded payload, or the error attached to this entry.
    ///
    /// CLEAR and DELETE entries report [`PayloadRef::None`].
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
    use crate::container::{ElementEntry, ElementList, Series};
    use crate::core::value::PrimitiveValue;

    fn element_list(value: u64) -> ElementList {
        let mut list = ElementList::new();
        list.push(ElementEntry::new(
            "v",
            Payload::value(PrimitiveValue::UInt(value)),
        ));
        list
    }

    fn sample() -> Vector {
        let mut vector = Vector::new(DataType::ElementList)
            .with_summary(Payload::ElementList(element_list(0)));
        vector.total_count_hint = Some(4);
        vector
            .push(VectorEntry::set(0, Payload::ElementList(element_list(10))).with_perm_data(vec![1]))
            .push(VectorEntry::update(1, Payload::ElementList(element_list(20))))
            .push(VectorEntry::clear(2))
            .push(VectorEntry::delete(3));
        vector
    }

    #[test]
    fn test_round_trip() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = VectorRef::decode(&buf).unwrap();
        assert_eq!(decoded.container_type, DataType::ElementList);
        assert_eq!(decoded.total_count_hint, Some(4));
        assert_eq!(decoded.count(), 4);
        assert!(decoded.summary().unwrap().is_some());

        let entries: Vec<_> = decoded.iter().map(|e| e.unwrap()).collect();
        assert_eq!(entries[0].index, 0);
        assert_eq!(entries[0].action, VectorAction::Set);
        assert_eq!(entries[0].perm_data(), Some(&[1][..]));
        assert!(entries[0].payload().unwrap().element_list().is_ok());

        assert_eq!(entries[1].action, VectorAction::Update);
        assert_eq!(entries[2].action, VectorAction::Clear);
        assert_eq!(entries[2].payload().unwrap().data_type(), DataType::NoData);
        assert_eq!(entries[3].action, VectorAction::Delete);
        assert_eq!(entries[3].payload().unwrap().data_type(), DataType::NoData);
    }

    #[test]
    fn test_large_index() {
        let mut vector = Vector::new(DataType::ElementList);
        vector.push(VectorEntry::set(
            1_000_000,
            Payload::ElementList(element_list(1)),
        ));
        let buf = vector.encode_to_vec().unwrap();
        let decoded = VectorRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        assert_eq!(entry.index, 1_000_000);
    }

    #[test]
    fn test_clear_delete_reject_payload() {
        let mut vector = Vector::new(DataType::ElementList);
        vector.push(VectorEntry {
            index: 0,
            action: VectorAction::Delete,
            perm_data: None,
            payload: Payload::ElementList(element_list(1)),
        });
        assert!(vector.encode_to_vec().is_err());
    }

    #[test]
    fn test_set_requires_payload() {
        let mut vector = Vector::new(DataType::ElementList);
        vector.push(VectorEntry::set(0, Payload::None));
        assert!(vector.encode_to_vec().is_err());
    }

    #[test]
    fn test_entry_type_must_match() {
        let mut vector = Vector::new(DataType::Series);
        vector.push(VectorEntry::set(0, Payload::ElementList(element_list(1))));
        assert_eq!(
            vector.encode_to_vec().unwrap_err(),
            CodecError::wrong_type(DataType::Series, DataType::ElementList)
        );
    }

    #[test]
    fn test_vector_of_series() {
        let mut series = Series::new(DataType::ElementList);
        series.push(Payload::ElementList(element_list(7)));
        let mut vector = Vector::new(DataType::Series);
        vector.push(VectorEntry::set(0, Payload::Series(series)));

        let buf = vector.encode_to_vec().unwrap();
        let decoded = VectorRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        let payload = entry.payload().unwrap().clone();
        assert_eq!(payload.series().unwrap().count(), 1);
    }

    #[test]
    fn test_restartable_iteration() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = VectorRef::decode(&buf).unwrap();
        let first: Vec<u32> = decoded.iter().map(|e| e.unwrap().index).collect();
        let second: Vec<u32> = decoded.iter().map(|e| e.unwrap().index).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        assert_eq!(first, second);
    }
}
