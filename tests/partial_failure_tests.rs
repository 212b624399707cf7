// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Partial-failure and resynchronization integration tests.
//!
//! A damaged payload inside an intact entry slot must not take the
//! container down with it: the error is attached to the entry and
//! every sibling still decodes in order. Encode-side failures roll the
//! whole container back without touching sibling data already written.

mod common;

use common::dictionary;
use marketcodec::container::{FieldEntry, FieldList, FieldListRef, WireEncode};
use marketcodec::{CodecError, DataType, PrimitiveValue, RealHint, WireWriter};

// ============================================================================
// Decode-Side Resynchronization
// ============================================================================

#[test]
fn test_corrupt_middle_entry_flanked_by_valid_entries() {
    let dictionary = dictionary();

    // Field 6 is REAL in the dictionary. Writing it as a one-byte
    // buffer leaves a bare hint byte: the slot is intact, the payload
    // is truncated for the declared type.
    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)))
        .push(FieldEntry::new(
            6,
            PrimitiveValue::Buffer(vec![RealHint::Exponent0.code()]),
        ))
        .push(FieldEntry::new(-2, PrimitiveValue::Int(32)));

    let buf = list.encode_to_vec().unwrap();
    let decoded = FieldListRef::decode(&buf).unwrap();
    let entries: Vec<_> = decoded.iter(&dictionary).map(|e| e.unwrap()).collect();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].field_id, 1);
    assert_eq!(
        entries[0].payload().unwrap().datum().unwrap().as_uint().unwrap(),
        64
    );

    assert_eq!(entries[1].field_id, 6);
    assert_eq!(
        entries[1].payload().unwrap_err(),
        CodecError::incomplete(2, 1, 0)
    );

    assert_eq!(entries[2].field_id, -2);
    assert_eq!(
        entries[2].payload().unwrap().datum().unwrap().as_int().unwrap(),
        32
    );
}

#[test]
fn test_resync_is_stable_across_replays() {
    let dictionary = dictionary();
    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)))
        .push(FieldEntry::new(6, PrimitiveValue::Buffer(vec![0x0E])))
        .push(FieldEntry::new(-2, PrimitiveValue::Int(32)));
    let buf = list.encode_to_vec().unwrap();
    let decoded = FieldListRef::decode(&buf).unwrap();

    for _ in 0..2 {
        let results: Vec<bool> = decoded
            .iter(&dictionary)
            .map(|entry| entry.unwrap().payload().is_ok())
            .collect();
        assert_eq!(results, vec![true, false, true]);
    }
}

#[test]
fn test_date_encoded_where_real_expected() {
    let dictionary = dictionary();

    // A four-byte date payload under a REAL field id: hint byte 14 is a
    // valid exponent, so the remaining three bytes decode as mantissa -
    // present but wrong. A date under field 17 with five bytes is a
    // size mismatch and is flagged.
    let mut list = FieldList::new();
    list.push(FieldEntry::new(
        17,
        PrimitiveValue::Buffer(vec![14, 5, 0x07, 0xE7, 0x00]),
    ))
    .push(FieldEntry::new(1, PrimitiveValue::UInt(1)));

    let buf = list.encode_to_vec().unwrap();
    let decoded = FieldListRef::decode(&buf).unwrap();
    let entries: Vec<_> = decoded.iter(&dictionary).map(|e| e.unwrap()).collect();

    // Field 17 is DATE (4 bytes); the 5-byte payload is flagged.
    assert!(entries[0].payload().is_err());
    assert!(entries[1].payload().is_ok());
}

#[test]
fn test_unknown_field_id_between_valid_entries() {
    let dictionary = dictionary();
    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)))
        .push(FieldEntry::new(22222, PrimitiveValue::UInt(5)))
        .push(FieldEntry::new(-2, PrimitiveValue::Int(32)));

    let buf = list.encode_to_vec().unwrap();
    let decoded = FieldListRef::decode(&buf).unwrap();
    let entries: Vec<_> = decoded.iter(&dictionary).map(|e| e.unwrap()).collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[1].payload().unwrap_err(),
        CodecError::field_not_found(22222)
    );
    assert!(entries[0].payload().is_ok());
    assert!(entries[2].payload().is_ok());
    // The raw bytes of the unresolvable entry remain available.
    assert_eq!(entries[1].raw(), &[5]);
}

#[test]
fn test_structurally_truncated_buffer_stops_iteration() {
    let dictionary = dictionary();
    let buf = common::canonical_field_list().encode_to_vec().unwrap();

    // Chop the buffer inside the last entry's payload: its slot header
    // promises more bytes than exist, which is a structural error.
    let cut = &buf[..buf.len() - 1];
    let decoded = FieldListRef::decode(cut).unwrap();
    let results: Vec<_> = decoded.iter(&dictionary).collect();

    // Two clean entries, then the structural error, then nothing.
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
}

// ============================================================================
// Encode-Side Rollback
// ============================================================================

#[test]
fn test_failed_container_rolls_back_cleanly() {
    let mut w = WireWriter::new();

    // A completed sibling container first.
    common::canonical_field_list().encode(&mut w).unwrap();
    let sibling_len = w.len();

    // This one fails on its second entry (oversized payload).
    let mut bad = FieldList::new();
    bad.push(FieldEntry::new(1, PrimitiveValue::UInt(1)))
        .push(FieldEntry::new(
            2,
            PrimitiveValue::Buffer(vec![0u8; 0x9000]),
        ));
    assert!(bad.encode(&mut w).is_err());

    // The sibling is untouched and the failed container left no bytes.
    assert_eq!(w.len(), sibling_len);
    let decoded = FieldListRef::decode(w.data()).unwrap();
    assert_eq!(decoded.count(), 3);
}

#[test]
fn test_buffer_too_small_then_grow_and_retry() {
    let list = common::canonical_field_list();
    let full_len = list.encode_to_vec().unwrap().len();

    // A fixed buffer half the needed size fails...
    let mut w = WireWriter::with_limit(full_len / 2);
    let err = list.encode(&mut w).unwrap_err();
    assert!(matches!(err, CodecError::BufferTooSmall { .. }));
    // ...and leaves nothing behind.
    assert!(w.is_empty());

    // The caller retries the whole encode with a larger buffer.
    let mut w = WireWriter::with_limit(full_len);
    list.encode(&mut w).unwrap();
    assert_eq!(w.len(), full_len);

    let dictionary = dictionary();
    let decoded = FieldListRef::decode(w.data()).unwrap();
    assert_eq!(decoded.iter(&dictionary).count(), 3);
}

#[test]
fn test_invalid_entry_type_check_rolls_back() {
    // An ascii value with non-ASCII bytes fails validation mid-encode.
    let mut w = WireWriter::new();
    w.write_u8(0x7E).unwrap();

    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(1)))
        .push(FieldEntry::new(
            215,
            PrimitiveValue::Ascii("naïve".to_string()),
        ));
    assert!(list.encode(&mut w).is_err());
    assert_eq!(w.data(), &[0x7E]);
}

#[test]
fn test_mismatched_container_types_do_not_partially_encode() {
    use marketcodec::container::{Payload, Series};

    let mut series = Series::new(DataType::ElementList);
    series
        .push(Payload::ElementList(common::small_element_list("ok")))
        .push(Payload::FieldList(FieldList::new()));

    let mut w = WireWriter::new();
    assert!(series.encode(&mut w).is_err());
    assert!(w.is_empty());
}
