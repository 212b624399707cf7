// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Filter list: sparse entries keyed by small filter ids with actions.
//!
//! A filter list declares a default container type, but entries are
//! heterogeneous: any entry may carry its own type tag overriding the
//! default. Entries have an action (SET, CLEAR, UPDATE) and optional
//! permission bytes; CLEAR entries carry no payload.

use crate::container::{check_container_type, Payload, PayloadRef, WireEncode};
use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use crate::encoding::wire::{WireCursor, WireWriter};
use tracing::warn;

const HAS_COUNT_HINT: u8 = 0x01;

const ENTRY_HAS_TYPE: u8 = 0x08;
const ENTRY_HAS_PERM: u8 = 0x10;

/// Action carried by a filter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterAction {
    /// Replace the entry's contents
    Set = 1,
    /// Clear the entry; carries no payload
    Clear = 2,
    /// Apply the payload as an update
    Update = 3,
}

impl FilterAction {
    fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(FilterAction::Set),
            2 => Ok(FilterAction::Clear),
            3 => Ok(FilterAction::Update),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized filter action code {other}"
            ))),
        }
    }
}

/// One filter entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    /// Filter id
    pub id: u8,
    /// Entry action
    pub action: FilterAction,
    /// Optional permission bytes
    pub perm_data: Option<Vec<u8>>,
    /// Entry payload; must be `Payload::None` for CLEAR
    pub payload: Payload,
}

impl FilterEntry {
    /// Create a SET entry.
    #[must_use]
    pub fn set(id: u8, payload: Payload) -> Self {
        Self {
            id,
            action: FilterAction::Set,
            perm_data: None,
            payload,
        }
    }

    /// Create an UPDATE entry.
    #[must_use]
    pub fn update(id: u8, payload: Payload) -> Self {
        Self {
            id,
            action: FilterAction::Update,
            perm_data: None,
            payload,
        }
    }

    /// Create a CLEAR entry.
    #[must_use]
    pub fn clear(id: u8) -> Self {
        Self {
            id,
            action: FilterAction::Clear,
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

/// Owned filter list for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterList {
    /// Default entry container type
    pub container_type: DataType,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u8>,
    /// Entries in encode order
    pub entries: Vec<FilterEntry>,
}

impl FilterList {
    /// Create an empty filter list with the given default type.
    #[must_use]
    pub fn new(container_type: DataType) -> Self {
        Self {
            container_type,
            total_count_hint: None,
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn push(&mut self, entry: FilterEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    fn encode_inner(&self, w: &mut WireWriter) -> Result<()> {
        check_container_type(self.container_type)?;
        let mut flags = 0u8;
        if self.total_count_hint.is_some() {
            flags |= HAS_COUNT_HINT;
        }
        w.write_u8(flags)?;
        w.write_u8(self.container_type.code())?;
        if let Some(hint) = self.total_count_hint {
            w.write_u8(hint)?;
        }
        let count = u8::try_from(self.entries.len()).map_err(|_| {
            CodecError::invalid_argument(format!(
                "filter list entry count {} exceeds u8",
                self.entries.len()
            ))
        })?;
        w.write_u8(count)?;
        for entry in &self.entries {
            self.encode_entry(w, entry)?;
        }
        Ok(())
    }

    fn encode_entry(&self, w: &mut WireWriter, entry: &FilterEntry) -> Result<()> {
        let has_payload = !matches!(entry.payload, Payload::None);
        if entry.action == FilterAction::Clear && has_payload {
            return Err(CodecError::invalid_argument(
                "filter CLEAR entries carry no payload",
            ));
        }
        if entry.action != FilterAction::Clear && !has_payload {
            return Err(CodecError::invalid_argument(
                "filter SET/UPDATE entries require a payload",
            ));
        }
        let entry_type = entry.payload.data_type();
        let needs_type = has_payload && entry_type != self.container_type;

        let mut entry_flags = entry.action as u8;
        if needs_type {
            entry_flags |= ENTRY_HAS_TYPE;
        }
        if entry.perm_data.is_some() {
            entry_flags |= ENTRY_HAS_PERM;
        }
        w.write_u8(entry.id)?;
        w.write_u8(entry_flags)?;
        if needs_type {
            w.write_u8(entry_type.code())?;
        }
        if let Some(perm) = &entry.perm_data {
            w.write_slot(perm)?;
        }
        if has_payload {
            let slot = w.begin_slot()?;
            entry.payload.encode_body(w)?;
            w.end_slot(slot)?;
        } else {
            w.write_blank_slot()?;
        }
        Ok(())
    }
}

impl WireEncode for FilterList {
    fn encode(&self, w: &mut WireWriter) -> Result<()> {
        let mark = w.mark();
        self.encode_inner(w).inspect_err(|_| w.truncate(mark))
    }
}

/// Decoded filter list view.
#[derive(Debug, Clone)]
pub struct FilterListRef<'a> {
    /// Default entry container type
    pub container_type: DataType,
    /// Expected number of entries across all parts
    pub total_count_hint: Option<u8>,
    count: u8,
    entries_raw: &'a [u8],
}

impl<'a> FilterListRef<'a> {
    /// Decode the container header, leaving entries for iteration.
    pub fn decode(bytes: &'a [u8]) -> Result<Self> {
        let mut cursor = WireCursor::new(bytes);
        let flags = cursor.read_u8()?;
        let container_type = DataType::from_code(cursor.read_u8()?)?;
        let total_count_hint = if flags & HAS_COUNT_HINT != 0 {
            Some(cursor.read_u8()?)
        } else {
            None
        };
        let count = cursor.read_u8()?;
        Ok(Self {
            container_type,
            total_count_hint,
            count,
            entries_raw: cursor.take_rest(),
        })
    }

    /// Get the entry count.
    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Iterate the entries from the first.
    #[must_use]
    pub fn iter(&self) -> FilterEntries<'a> {
        FilterEntries {
            cursor: WireCursor::new(self.entries_raw),
            remaining: self.count,
            container_type: self.container_type,
            failed: false,
        }
    }
}

/// Restartable iterator over filter entries.
pub struct FilterEntries<'a> {
    cursor: WireCursor<'a>,
    remaining: u8,
    container_type: DataType,
    failed: bool,
}

impl<'a> FilterEntries<'a> {
    fn next_inner(&mut self) -> Result<FilterEntryRef<'a>> {
        let id = self.cursor.read_u8()?;
        let entry_flags = self.cursor.read_u8()?;
        let action = FilterAction::from_code(entry_flags & 0x07)?;
        let declared_type = if entry_flags & ENTRY_HAS_TYPE != 0 {
            DataType::from_code(self.cursor.read_u8()?)?
        } else {
            self.container_type
        };
        let perm_data = if entry_flags & ENTRY_HAS_PERM != 0 {
            Some(self.cursor.read_slot()?)
        } else {
            None
        };
        let raw = self.cursor.read_slot()?;

        let payload = PayloadRef::decode(declared_type, raw);
        if let Err(e) = &payload {
            warn!(id, error = %e, "filter entry payload failed to decode; continuing");
        }
        Ok(FilterEntryRef {
            id,
            action,
            declared_type,
            perm_data,
            raw,
            payload,
        })
    }
}

impl<'a> Iterator for FilterEntries<'a> {
    type Item = Result<FilterEntryRef<'a>>;

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

/// Decoded filter entry.
#[derive(Debug, Clone)]
pub struct FilterEntryRef<'a> {
    /// Filter id
    pub id: u8,
    /// Entry action
    pub action: FilterAction,
    /// Resolved payload type (entry override or list default)
    pub declared_type: DataType,
    perm_data: Option<&'a [u8]>,
    raw: &'a [u8],
    payload: Result<PayloadRef<'a>>,
}

impl<'a> FilterEntryRef<'a> {
    /// Get the permission bytes, if present.
    #[must_use]
    pub fn perm_data(&self) -> Option<&'a [u8]> {
        self.perm_data
    }

    /// Get the decoded payload, or the error attached to this entry.
    ///
    /// CLEAR entries report [`PayloadRef::None`].
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
