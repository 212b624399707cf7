// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dictionary service integration tests.
//!
//! Tests cover:
//! - Loading definition files from disk and from strings
//! - Lookup by field id and acronym
//! - Enum display resolution and its failure isolation
//! - Shared read-only use across threads during decoding

mod common;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use marketcodec::container::{FieldEntry, FieldList, FieldListRef, WireEncode};
use marketcodec::dictionary::{DataDictionary, DictionaryError};
use marketcodec::{CodecError, DataType, PrimitiveValue};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Get a temporary directory for test files
fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "marketcodec_dict_{}_{}",
        std::process::id(),
        random
    ))
}

/// Cleanup guard for test temporary files
struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn write_fixtures() -> (PathBuf, PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();
    let fields = dir.join("fields.def");
    let enums = dir.join("enums.def");
    fs::write(
        &fields,
        concat!(
            "! test field definitions\n",
            "\"PROD_PERM\"   1      UINT          5\n",
            "\"BID\"         22     REAL          17\n",
            "\"ASK\"         25     REAL          17\n",
            "\"CURRENCY\"    15     ENUM          3\n",
            "\"CONTEXT\"     30127  ELEMENT_LIST  0\n",
            "\"USER_INT\"    -2     INT           8\n",
        ),
    )
    .unwrap();
    fs::write(
        &enums,
        concat!(
            "! currency table\n",
            "FIDS 15\n",
            "VALUE 840 \"USD\" \"US Dollar\"\n",
            "VALUE 978 \"EUR\" \"Euro\"\n",
        ),
    )
    .unwrap();
    (fields, enums, CleanupGuard(dir))
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_definition_files() {
    let (fields, enums, _guard) = write_fixtures();
    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(&fields).unwrap();
    dictionary.load_enum_dictionary(&enums).unwrap();

    assert_eq!(dictionary.field_count(), 6);
    assert_eq!(dictionary.enum_table_count(), 1);
    assert_eq!(dictionary.field(22).unwrap().acronym, "BID");
    assert_eq!(dictionary.field(22).unwrap().data_type, DataType::Real);
    assert_eq!(dictionary.field(-2).unwrap().data_type, DataType::Int);
    assert_eq!(
        dictionary.field(30127).unwrap().data_type,
        DataType::ElementList
    );
    assert_eq!(dictionary.field_by_name("ASK").unwrap().fid, 25);
    assert_eq!(dictionary.enum_display(15, 840).unwrap(), "USD");
}

#[test]
fn test_missing_file_is_io_error() {
    let mut dictionary = DataDictionary::new();
    let err = dictionary
        .load_field_dictionary("/definitely/not/here.def")
        .unwrap_err();
    assert!(matches!(err, DictionaryError::Io { .. }));
}

#[test]
fn test_malformed_file_is_syntax_error() {
    let dir = temp_dir();
    fs::create_dir_all(&dir).unwrap();
    let _guard = CleanupGuard(dir.clone());
    let path = dir.join("bad.def");
    fs::write(&path, "not a definition line\n").unwrap();

    let mut dictionary = DataDictionary::new();
    let err = dictionary.load_field_dictionary(&path).unwrap_err();
    assert!(matches!(err, DictionaryError::Syntax { .. }));
}

#[test]
fn test_duplicate_fid_across_loads() {
    let mut dictionary = DataDictionary::new();
    dictionary
        .parse_field_dictionary("\"BID\" 22 REAL 17\n")
        .unwrap();
    let err = dictionary
        .parse_field_dictionary("\"BID_1\" 22 REAL 17\n")
        .unwrap_err();
    assert!(matches!(
        err,
        DictionaryError::DuplicateField { field_id: 22 }
    ));
}

// ============================================================================
// Decode Integration
// ============================================================================

#[test]
fn test_decode_against_loaded_dictionary() {
    let (fields, enums, _guard) = write_fixtures();
    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(&fields).unwrap();
    dictionary.load_enum_dictionary(&enums).unwrap();

    let mut list = FieldList::new();
    list.push(FieldEntry::new(
        22,
        PrimitiveValue::Real(marketcodec::Real::new(
            39806,
            marketcodec::RealHint::ExponentNeg3,
        )),
    ))
    .push(FieldEntry::new(15, PrimitiveValue::Enum(978)));

    let buf = list.encode_to_vec().unwrap();
    let decoded = FieldListRef::decode(&buf).unwrap();
    let entries: Vec<_> = decoded.iter(&dictionary).map(|e| e.unwrap()).collect();

    assert_eq!(entries[0].acronym(&dictionary), Some("BID"));
    let bid = entries[0].payload().unwrap().datum().unwrap().as_real().unwrap();
    assert!((bid.to_f64() - 39.806).abs() < 1e-9);
    assert_eq!(entries[1].enum_display(&dictionary).unwrap(), "EUR");
}

#[test]
fn test_concurrent_decodes_share_dictionary() {
    let (fields, enums, _guard) = write_fixtures();
    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(&fields).unwrap();
    dictionary.load_enum_dictionary(&enums).unwrap();
    let dictionary = Arc::new(dictionary);

    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)))
        .push(FieldEntry::new(15, PrimitiveValue::Enum(840)));
    let buf = Arc::new(list.encode_to_vec().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dictionary = Arc::clone(&dictionary);
            let buf = Arc::clone(&buf);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let decoded = FieldListRef::decode(&buf).unwrap();
                    let entries: Vec<_> =
                        decoded.iter(&dictionary).map(|e| e.unwrap()).collect();
                    assert_eq!(
                        entries[0]
                            .payload()
                            .unwrap()
                            .datum()
                            .unwrap()
                            .as_uint()
                            .unwrap(),
                        64
                    );
                    assert_eq!(entries[1].enum_display(&dictionary).unwrap(), "USD");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_enum_miss_does_not_poison_dictionary() {
    let (fields, enums, _guard) = write_fixtures();
    let mut dictionary = DataDictionary::new();
    dictionary.load_field_dictionary(&fields).unwrap();
    dictionary.load_enum_dictionary(&enums).unwrap();

    assert_eq!(
        dictionary.enum_display(15, 111).unwrap_err(),
        CodecError::enum_not_found(15, 111)
    );
    // The dictionary still answers the next lookup.
    assert_eq!(dictionary.enum_display(15, 840).unwrap(), "USD");
}
