// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire data type tags.
//!
//! Every value, container, and message on the wire is identified by a
//! one-byte type code. Codes below 64 are primitive types, codes from
//! 128 upward are container types (messages included). The tag set is
//! closed: decoding an unknown code fails with `UnsupportedDataType`
//! rather than being skipped.

use crate::core::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type tag for a wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    /// Absence of data (DELETE/CLEAR entries, messages without payload)
    NoData = 0,
    /// 64-bit signed integer
    Int = 3,
    /// 64-bit unsigned integer
    UInt = 4,
    /// 32-bit IEEE float
    Float = 5,
    /// 64-bit IEEE double
    Double = 6,
    /// Fixed-point decimal: mantissa plus exponent/fraction hint
    Real = 8,
    /// Calendar date (day, month, year; components individually optional)
    Date = 9,
    /// Time of day with millisecond precision
    Time = 10,
    /// Date and time combined
    DateTime = 11,
    /// Quality of service (timeliness and rate)
    Qos = 12,
    /// Stream and data state with code and text
    State = 13,
    /// Enumerated value resolved through the dictionary
    Enum = 14,
    /// Homogeneous list of one primitive type
    Array = 15,
    /// Raw byte buffer
    Buffer = 16,
    /// ASCII string
    AsciiString = 17,
    /// UTF-8 string
    Utf8String = 18,
    /// RMTES-encoded string, kept as raw bytes
    RmtesString = 19,
    /// Opaque pass-through payload
    Opaque = 128,
    /// Container keyed by dictionary field ids
    FieldList = 132,
    /// Container keyed by element names
    ElementList = 133,
    /// Sparse container keyed by filter ids with entry actions
    FilterList = 134,
    /// Ordered container of homogeneously typed entries
    Series = 136,
    /// Indexed container with entry actions
    Vector = 137,
    /// Keyed container with entry actions
    Map = 138,
    /// Message envelope used as a nested payload
    Msg = 141,
}

impl DataType {
    /// Decode a type tag from its wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(DataType::NoData),
            3 => Ok(DataType::Int),
            4 => Ok(DataType::UInt),
            5 => Ok(DataType::Float),
            6 => Ok(DataType::Double),
            8 => Ok(DataType::Real),
            9 => Ok(DataType::Date),
            10 => Ok(DataType::Time),
            11 => Ok(DataType::DateTime),
            12 => Ok(DataType::Qos),
            13 => Ok(DataType::State),
            14 => Ok(DataType::Enum),
            15 => Ok(DataType::Array),
            16 => Ok(DataType::Buffer),
            17 => Ok(DataType::AsciiString),
            18 => Ok(DataType::Utf8String),
            19 => Ok(DataType::RmtesString),
            128 => Ok(DataType::Opaque),
            132 => Ok(DataType::FieldList),
            133 => Ok(DataType::ElementList),
            134 => Ok(DataType::FilterList),
            136 => Ok(DataType::Series),
            137 => Ok(DataType::Vector),
            138 => Ok(DataType::Map),
            141 => Ok(DataType::Msg),
            other => Err(CodecError::unsupported_type(other)),
        }
    }

    /// Get the wire code for this type tag.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check if this tag names a container (messages included).
    #[must_use]
    pub const fn is_container(self) -> bool {
        self.code() >= 128
    }

    /// Check if this tag names a primitive value type.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !self.is_container() && !matches!(self, DataType::NoData)
    }

    /// Parse a type tag from a dictionary keyword.
    pub fn try_from_keyword(s: &str) -> Option<Self> {
        match s {
            "INT" => Some(DataType::Int),
            "UINT" => Some(DataType::UInt),
            "FLOAT" => Some(DataType::Float),
            "DOUBLE" => Some(DataType::Double),
            "REAL" => Some(DataType::Real),
            "DATE" => Some(DataType::Date),
            "TIME" => Some(DataType::Time),
            "DATETIME" => Some(DataType::DateTime),
            "QOS" => Some(DataType::Qos),
            "STATE" => Some(DataType::State),
            "ENUM" => Some(DataType::Enum),
            "ARRAY" => Some(DataType::Array),
            "BUFFER" => Some(DataType::Buffer),
            "ASCII_STRING" => Some(DataType::AsciiString),
            "UTF8_STRING" => Some(DataType::Utf8String),
            "RMTES_STRING" => Some(DataType::RmtesString),
            "OPAQUE" => Some(DataType::Opaque),
            "FIELD_LIST" => Some(DataType::FieldList),
            "ELEMENT_LIST" => Some(DataType::ElementList),
            "FILTER_LIST" => Some(DataType::FilterList),
            "SERIES" => Some(DataType::Series),
            "VECTOR" => Some(DataType::Vector),
            "MAP" => Some(DataType::Map),
            "MSG" => Some(DataType::Msg),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::NoData => "no_data",
            DataType::Int => "int",
            DataType::UInt => "uint",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Real => "real",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::DateTime => "datetime",
            DataType::Qos => "qos",
            DataType::State => "state",
            DataType::Enum => "enum",
            DataType::Array => "array",
            DataType::Buffer => "buffer",
            DataType::AsciiString => "ascii_string",
            DataType::Utf8String => "utf8_string",
            DataType::RmtesString => "rmtes_string",
            DataType::Opaque => "opaque",
            DataType::FieldList => "field_list",
            DataType::ElementList => "element_list",
            DataType::FilterList => "filter_list",
            DataType::Series => "series",
            DataType::Vector => "vector",
            DataType::Map => "map",
            DataType::Msg => "msg",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let tags = [
            DataType::NoData,
            DataType::Int,
            DataType::UInt,
            DataType::Float,
            DataType::Double,
            DataType::Real,
            DataType::Date,
            DataType::Time,
            DataType::DateTime,
            DataType::Qos,
            DataType::State,
            DataType::Enum,
            DataType::Array,
            DataType::Buffer,
            DataType::AsciiString,
            DataType::Utf8String,
            DataType::RmtesString,
            DataType::Opaque,
            DataType::FieldList,
            DataType::ElementList,
            DataType::FilterList,
            DataType::Series,
            DataType::Vector,
            DataType::Map,
            DataType::Msg,
        ];
        for tag in tags {
            assert_eq!(DataType::from_code(tag.code()).unwrap(), tag);
        }
    }

    #[test]
    fn test_unknown_code() {
        let err = DataType::from_code(77).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedDataType { type_code: 77 }
        ));
    }

    #[test]
    fn test_is_container() {
        assert!(DataType::FieldList.is_container());
        assert!(DataType::Msg.is_container());
        assert!(DataType::Opaque.is_container());
        assert!(!DataType::Real.is_container());
        assert!(!DataType::NoData.is_container());
    }

    #[test]
    fn test_is_primitive() {
        assert!(DataType::UInt.is_primitive());
        assert!(DataType::Array.is_primitive());
        assert!(!DataType::Map.is_primitive());
        assert!(!DataType::NoData.is_primitive());
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!(DataType::try_from_keyword("REAL"), Some(DataType::Real));
        assert_eq!(
            DataType::try_from_keyword("ELEMENT_LIST"),
            Some(DataType::ElementList)
        );
        assert_eq!(DataType::try_from_keyword("real"), None);
        assert_eq!(DataType::try_from_keyword("BOGUS"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Real.to_string(), "real");
        assert_eq!(DataType::AsciiString.to_string(), "ascii_string");
        assert_eq!(DataType::Msg.to_string(), "msg");
    }
}
