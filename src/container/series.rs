// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Series: ordered container of homogeneously typed entries.
//!
//! Every entry carries a payload of the single declared container type,
//! with no key and no action. An optional summary data block of the same
//! declared type describes all entries uniformly and is decoded with the
//! same logic as any entry.

use crate::container::{check_container_type, check_count, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_SUMMARY: u8 = 0x01;
const HAS_COUNT_HINT: u8 = 0x02;

/// Owned series for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Declared type of every entry
    pub container_type: DataType,
    /// Optional summary data of the declared type
    pub summary: Option<Box<Payload>>,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    /// Entry payloads in encode order
    pub entries: Vec<Payload>,
}

impl Series {
    /// Create an empty series with the given entry type.
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

    /// Append an entry payload.
    pub fn push(&mut self, payload: Payload) -> &mut Self {
        self.entries.push(payload);
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
        for payload in &self.entries {
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
        Ok(())
    }
}

impl WireEncode for Series {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded series view.
#[derive(Debug, Clone)]
pub struct SeriesRef<'a> {
    /// Declared type of every entry
    pub container_type: DataType,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u32>,
    summary_raw: Option<&'a [u8]>,
    count: u16,
    entries_raw: &'a [u8],
}

impl<'a> SeriesRef<'a> {
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
    pub fn iter(&self) -> SeriesEntries<'a> {
        SeriesEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            container_type: self.container_type,
            failed: false,
        }
    }
}

/// Restartable iterator over series entries.
pub struct SeriesEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u16,
    container_type: DataType,
    failed: bool,
}

impl<'a> Iterator for SeriesEntries<'a> {
    type Item = Result<SeriesEntryRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let raw = match self.cursor.read_slot() {
            Ok(slot) => slot,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        let payload = PayloadRef::decode(self.container_type, raw);
        if let Err(e) = &payload {
            warn!(error = %e, "series entry payload failed to decode; continuing");
        }
        Some(Ok(SeriesEntryRef { raw, payload }))
    }
}

/// Decoded series entry.
#[derive(Debug, Clone)]
pub struct SeriesEntryRef<'a> {
    raw: &'a [u8],
    payload: Result<PayloadRef<'a>>,
}

impl<'a> SeriesEntryRef<'a> {
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
    use crate::container::{ElementEntry, ElementList};
    use crate::core::value::PrimitiveValue;

    fn element_list(value: u64) -> ElementList {
        let mut list = ElementList::new();
        list.push(ElementEntry::new(
            "v",
            Payload::value(PrimitiveValue::UInt(value)),
        ));
        list
    }

    fn sample() -> Series {
        let mut series =
            Series::new(DataType::ElementList).with_summary(Payload::ElementList(element_list(0)));
        series.total_count_hint = Some(3);
        series
            .push(Payload::ElementList(element_list(1)))
            .push(Payload::ElementList(element_list(2)))
            .push(Payload::ElementList(element_list(3)));
        series
    }

    fn entry_value(entry: &SeriesEntryRef<'_>) -> u64 {
        entry
            .payload()
            .unwrap()
            .element_list()
            .unwrap()
            .iter()
            .next()
            .unwrap()
            .unwrap()
            .payload()
            .unwrap()
            .datum()
            .unwrap()
            .as_uint()
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = SeriesRef::decode(&buf).unwrap();
        assert_eq!(decoded.container_type, DataType::ElementList);
        assert_eq!(decoded.total_count_hint, Some(3));
        assert_eq!(decoded.count(), 3);
        assert!(decoded.has_summary());

        let summary = decoded.summary().unwrap().unwrap();
        assert_eq!(summary.data_type(), DataType::ElementList);

        let values: Vec<u64> = decoded
            .iter()
            .map(|e| entry_value(&e.unwrap()))
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_no_summary_no_hint() {
        let mut series = Series::new(DataType::ElementList);
        series.push(Payload::ElementList(element_list(9)));
        let buf = series.encode_to_vec().unwrap();
        let decoded = SeriesRef::decode(&buf).unwrap();
        assert!(!decoded.has_summary());
        assert!(decoded.summary().unwrap().is_none());
        assert_eq!(decoded.total_count_hint, None);
        assert_eq!(decoded.count(), 1);
    }

    #[test]
    fn test_summary_type_must_match() {
        let series = Series::new(DataType::ElementList)
            .with_summary(Payload::FieldList(crate::container::FieldList::new()));
        assert_eq!(
            series.encode_to_vec().unwrap_err(),
            CodecError::wrong_type(DataType::ElementList, DataType::FieldList)
        );
    }

    #[test]
    fn test_entry_type_must_match() {
        let mut series = Series::new(DataType::ElementList);
        series.push(Payload::FieldList(crate::container::FieldList::new()));
        assert!(series.encode_to_vec().is_err());
    }

    #[test]
    fn test_restartable_iteration() {
        let buf = sample().encode_to_vec().unwrap();
        let decoded = SeriesRef::decode(&buf).unwrap();
        let mut iter = decoded.iter();
        iter.next();
        iter.next();
        let replay: Vec<u64> = decoded.iter().map(|e| entry_value(&e.unwrap())).collect();
        assert_eq!(replay, vec![1, 2, 3]);
    }

    #[test]
    fn test_large_count_hint() {
        let mut series = Series::new(DataType::ElementList);
        series.total_count_hint = Some(1_000_000);
        let buf = series.encode_to_vec().unwrap();
        let decoded = SeriesRef::decode(&buf).unwrap();
        assert_eq!(decoded.total_count_hint, Some(1_000_000));
    }

    #[test]
    fn test_nested_series() {
        let mut inner = Series::new(DataType::ElementList);
        inner.push(Payload::ElementList(element_list(5)));
        let mut outer = Series::new(DataType::Series);
        outer.push(Payload::Series(inner));

        let buf = outer.encode_to_vec().unwrap();
        let decoded = SeriesRef::decode(&buf).unwrap();
        let entry = decoded.iter().next().unwrap().unwrap();
        let payload = entry.payload().unwrap().clone();
        let nested = payload.series().unwrap();
        assert_eq!(nested.count(), 1);
    }
}
