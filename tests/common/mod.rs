// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use marketcodec::container::{ElementEntry, ElementList, FieldEntry, FieldList, Payload};
use marketcodec::dictionary::{DataDictionary, EnumTable, EnumValue};
use marketcodec::{DataType, PrimitiveValue, Real, RealHint};

// ============================================================================
// Test Dictionary
// ============================================================================

/// Build the dictionary shared by the integration suites.
///
/// Field ids follow the shape of a typical market-price record: a
/// permission field, a trade price, a currency enum, and a user-defined
/// negative id.
pub fn dictionary() -> DataDictionary {
    let mut dictionary = DataDictionary::new();
    dictionary
        .add_field("PROD_PERM", 1, DataType::UInt, 5)
        .unwrap();
    dictionary
        .add_field("TRDPRC_1", 6, DataType::Real, 17)
        .unwrap();
    dictionary
        .add_field("ACTIV_DATE", 17, DataType::Date, 11)
        .unwrap();
    dictionary
        .add_field("TRDTIM_1", 18, DataType::Time, 8)
        .unwrap();
    dictionary
        .add_field("CURRENCY", 15, DataType::Enum, 3)
        .unwrap();
    dictionary
        .add_field("DSPLY_NAME", 3, DataType::RmtesString, 16)
        .unwrap();
    dictionary
        .add_field("ROW64_1", 215, DataType::AsciiString, 64)
        .unwrap();
    dictionary
        .add_field("CONTEXT", 30127, DataType::ElementList, 0)
        .unwrap();
    dictionary
        .add_field("NESTED_MSG", 30141, DataType::Msg, 0)
        .unwrap();
    dictionary.add_field("USER_INT", -2, DataType::Int, 8).unwrap();

    let mut currency = EnumTable::new(vec![15]);
    currency.insert(EnumValue::new(840, "USD"));
    currency.insert(EnumValue::new(978, "EUR"));
    dictionary.add_enum_table(currency);

    dictionary
}

// ============================================================================
// Sample Payloads
// ============================================================================

/// The field list from the canonical round-trip scenario: a uint, a
/// real with a negative exponent hint, and a negative user-defined id.
pub fn canonical_field_list() -> FieldList {
    let mut list = FieldList::new();
    list.push(FieldEntry::new(1, PrimitiveValue::UInt(64)))
        .push(FieldEntry::new(
            6,
            PrimitiveValue::Real(Real::new(11, RealHint::ExponentNeg2)),
        ))
        .push(FieldEntry::new(-2, PrimitiveValue::Int(32)));
    list
}

/// A small element list usable as attrib or payload.
pub fn small_element_list(tag: &str) -> ElementList {
    let mut list = ElementList::new();
    list.push(ElementEntry::new(
        "tag",
        Payload::value(PrimitiveValue::Ascii(tag.to_string())),
    ));
    list
}
