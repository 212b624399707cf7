// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dictionary service: field and enum metadata resolution.
//!
//! A [`DataDictionary`] maps field ids to type and name metadata and
//! enum codes to display strings. It is built once at startup - from
//! definition files or programmatically - and then shared read-only by
//! every decode operation, typically behind an `Arc`. Every lookup
//! takes `&self`, so concurrent readers need no further coordination;
//! there is no reload path.
//!
//! The definition file formats are this crate's own; the grammar lives
//! in `parser/dictionary.pest`.

mod parser;

use crate::core::error::{CodecError, Result};
use crate::core::types::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from loading dictionary definition files.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Definition file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Definition file does not match the grammar
    #[error("dictionary syntax error: {message}")]
    Syntax {
        /// Parser diagnostic
        message: String,
    },

    /// Type keyword is not a known wire type
    #[error("unknown wire type keyword '{keyword}' for field {acronym}")]
    UnknownType {
        /// Field being defined
        acronym: String,
        /// The unrecognized keyword
        keyword: String,
    },

    /// Two definitions share a field id
    #[error("duplicate definition for field id {field_id}")]
    DuplicateField {
        /// The duplicated id
        field_id: i16,
    },

    /// VALUE line with no preceding FIDS line
    #[error("VALUE line before any FIDS line")]
    ValueOutsideTable,
}

impl From<DictionaryError> for CodecError {
    fn from(err: DictionaryError) -> Self {
        CodecError::parse("dictionary", err.to_string())
    }
}

/// Definition of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field acronym, unique per dictionary
    pub acronym: String,
    /// Field id; negative ids are user-defined
    pub fid: i16,
    /// Wire type of the field's values
    pub data_type: DataType,
    /// Suggested display length
    pub length: u16,
}

/// One enum display value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Wire code
    pub code: u16,
    /// Display string
    pub display: String,
    /// Longer description, if any
    pub meaning: Option<String>,
}

impl EnumValue {
    /// Create a value with no meaning text.
    #[must_use]
    pub fn new(code: u16, display: impl Into<String>) -> Self {
        Self {
            code,
            display: display.into(),
            meaning: None,
        }
    }
}

/// Enum table shared by one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTable {
    /// Field ids using this table
    pub fids: Vec<i16>,
    values: HashMap<u16, EnumValue>,
}

impl EnumTable {
    /// Create an empty table for the given field ids.
    #[must_use]
    pub fn new(fids: Vec<i16>) -> Self {
        Self {
            fids,
            values: HashMap::new(),
        }
    }

    /// Insert a value, replacing any previous definition of its code.
    pub fn insert(&mut self, value: EnumValue) {
        self.values.insert(value.code, value);
    }

    /// Look up a value by code.
    #[must_use]
    pub fn get(&self, code: u16) -> Option<&EnumValue> {
        self.values.get(&code)
    }

    /// Get the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Read-only field and enum metadata, loaded once and shared.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    fields: HashMap<i16, FieldDef>,
    by_acronym: HashMap<String, i16>,
    enum_tables: Vec<EnumTable>,
    enum_table_by_fid: HashMap<i16, usize>,
}

impl DataDictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of field definitions.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Get the number of enum tables.
    #[must_use]
    pub fn enum_table_count(&self) -> usize {
        self.enum_tables.len()
    }

    /// Check if no definitions are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.enum_tables.is_empty()
    }

    /// Add a field definition.
    pub fn add_field(
        &mut self,
        acronym: impl Into<String>,
        fid: i16,
        data_type: DataType,
        length: u16,
    ) -> Result<()> {
        self.insert_field(FieldDef {
            acronym: acronym.into(),
            fid,
            data_type,
            length,
        })
        .map_err(CodecError::from)
    }

    fn insert_field(&mut self, def: FieldDef) -> std::result::Result<(), DictionaryError> {
        if self.fields.contains_key(&def.fid) {
            return Err(DictionaryError::DuplicateField { field_id: def.fid });
        }
        self.by_acronym.insert(def.acronym.clone(), def.fid);
        self.fields.insert(def.fid, def);
        Ok(())
    }

    /// Add an enum table.
    pub fn add_enum_table(&mut self, table: EnumTable) {
        let index = self.enum_tables.len();
        for &fid in &table.fids {
            self.enum_table_by_fid.insert(fid, index);
        }
        self.enum_tables.push(table);
    }

    /// Parse field definitions from a string and add them.
    pub fn parse_field_dictionary(
        &mut self,
        input: &str,
    ) -> std::result::Result<(), DictionaryError> {
        let defs = parser::parse_field_definitions(input)?;
        let count = defs.len();
        for def in defs {
            self.insert_field(def)?;
        }
        info!(fields = count, "parsed field dictionary");
        Ok(())
    }

    /// Parse enum definitions from a string and add them.
    pub fn parse_enum_dictionary(
        &mut self,
        input: &str,
    ) -> std::result::Result<(), DictionaryError> {
        let tables = parser::parse_enum_definitions(input)?;
        let count = tables.len();
        for table in tables {
            self.add_enum_table(table);
        }
        info!(tables = count, "parsed enum dictionary");
        Ok(())
    }

    /// Load a field definition file.
    pub fn load_field_dictionary(
        &mut self,
        path: impl AsRef<Path>,
    ) -> std::result::Result<(), DictionaryError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_field_dictionary(&input)?;
        info!(path = %path.display(), "loaded field dictionary");
        Ok(())
    }

    /// Load an enum definition file.
    pub fn load_enum_dictionary(
        &mut self,
        path: impl AsRef<Path>,
    ) -> std::result::Result<(), DictionaryError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_enum_dictionary(&input)?;
        info!(path = %path.display(), "loaded enum dictionary");
        Ok(())
    }

    /// Look up a field definition by id.
    #[must_use]
    pub fn field(&self, fid: i16) -> Option<&FieldDef> {
        self.fields.get(&fid)
    }

    /// Look up a field definition by acronym.
    #[must_use]
    pub fn field_by_name(&self, acronym: &str) -> Option<&FieldDef> {
        self.by_acronym
            .get(acronym)
            .and_then(|fid| self.fields.get(fid))
    }

    /// Iterate all field definitions in unspecified order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    /// Resolve an enum code to its display string for a field.
    ///
    /// Fails with `EnumValueNotInDictionary` when the field has no enum
    /// table or the table has no mapping for the code.
    pub fn enum_display(&self, fid: i16, code: u16) -> Result<&str> {
        self.enum_table_by_fid
            .get(&fid)
            .and_then(|&index| self.enum_tables[index].get(code))
            .map(|value| value.display.as_str())
            .ok_or_else(|| CodecError::enum_not_found(fid, code))
    }
}
