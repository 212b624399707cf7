// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec primitive value model.
//!
//! [`PrimitiveValue`] is the tagged union over every scalar type the wire
//! format supports. [`Datum`] pairs a value slot with its presence marker:
//! a decoded entry is either present with a value or explicitly blank, and
//! typed accessors on a blank datum fail with `BlankValueAccess` rather
//! than producing a default.
//!
//! # Design Principles
//!
//! - **Serde support**: all variants are serializable for downstream processing
//! - **Owned types**: values own their strings and byte buffers
//! - **Closed set**: one variant per wire type, matched exhaustively at
//!   every encode and decode site

use crate::core::error::{CodecError, Result};
use crate::core::quality::{Qos, State};
use crate::core::real::Real;
use crate::core::temporal::{Date, DateTime, Time};
use crate::core::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presence marker carried by every decoded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataCode {
    /// Value is present
    NoCode,
    /// Value is explicitly empty
    Blank,
}

/// Unified scalar value for encode and decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    /// 64-bit unsigned integer
    UInt(u64),
    /// 64-bit signed integer
    Int(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit double
    Double(f64),
    /// Fixed-point decimal
    Real(Real),
    /// Calendar date
    Date(Date),
    /// Time of day
    Time(Time),
    /// Combined date and time
    DateTime(DateTime),
    /// Quality of service
    Qos(Qos),
    /// Stream/data state
    State(State),
    /// Enumerated code, display resolved through the dictionary
    Enum(u16),
    /// Raw bytes
    Buffer(Vec<u8>),
    /// ASCII string
    Ascii(String),
    /// UTF-8 string
    Utf8(String),
    /// RMTES string, kept as raw bytes
    Rmtes(Vec<u8>),
    /// Homogeneous list of one primitive type
    Array(ArrayValue),
}

/// Homogeneous array of primitive items.
///
/// `item_width` of zero means variable-width items, each written in its
/// own slot; a nonzero width packs every item into exactly that many
/// bytes. Items may individually be blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Type of every item
    pub item_type: DataType,
    /// Fixed item width in bytes, 0 for variable
    pub item_width: u8,
    /// The items, each present or blank
    pub items: Vec<Datum>,
}

impl ArrayValue {
    /// Create a variable-width array.
    #[must_use]
    pub fn new(item_type: DataType, items: Vec<Datum>) -> Self {
        Self {
            item_type,
            item_width: 0,
            items,
        }
    }

    /// Create a fixed-width array.
    #[must_use]
    pub fn fixed(item_type: DataType, item_width: u8, items: Vec<Datum>) -> Self {
        Self {
            item_type,
            item_width,
            items,
        }
    }
}

impl PrimitiveValue {
    /// Get the wire type tag for this value.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            PrimitiveValue::UInt(_) => DataType::UInt,
            PrimitiveValue::Int(_) => DataType::Int,
            PrimitiveValue::Float(_) => DataType::Float,
            PrimitiveValue::Double(_) => DataType::Double,
            PrimitiveValue::Real(_) => DataType::Real,
            PrimitiveValue::Date(_) => DataType::Date,
            PrimitiveValue::Time(_) => DataType::Time,
            PrimitiveValue::DateTime(_) => DataType::DateTime,
            PrimitiveValue::Qos(_) => DataType::Qos,
            PrimitiveValue::State(_) => DataType::State,
            PrimitiveValue::Enum(_) => DataType::Enum,
            PrimitiveValue::Buffer(_) => DataType::Buffer,
            PrimitiveValue::Ascii(_) => DataType::AsciiString,
            PrimitiveValue::Utf8(_) => DataType::Utf8String,
            PrimitiveValue::Rmtes(_) => DataType::RmtesString,
            PrimitiveValue::Array(_) => DataType::Array,
        }
    }

    /// Check if this value is numeric (integer, float, or real).
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveValue::UInt(_)
                | PrimitiveValue::Int(_)
                | PrimitiveValue::Float(_)
                | PrimitiveValue::Double(_)
                | PrimitiveValue::Real(_)
        )
    }

    /// Check if this value is a string type.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            PrimitiveValue::Ascii(_) | PrimitiveValue::Utf8(_) | PrimitiveValue::Rmtes(_)
        )
    }

    /// Try to convert a numeric value to f64.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            PrimitiveValue::UInt(v) => Some(*v as f64),
            PrimitiveValue::Int(v) => Some(*v as f64),
            PrimitiveValue::Float(v) => Some(f64::from(*v)),
            PrimitiveValue::Double(v) => Some(*v),
            PrimitiveValue::Real(r) => Some(r.to_f64()),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::UInt(v) => write!(f, "{v}"),
            PrimitiveValue::Int(v) => write!(f, "{v}"),
            PrimitiveValue::Float(v) => write!(f, "{v}"),
            PrimitiveValue::Double(v) => write!(f, "{v}"),
            PrimitiveValue::Real(v) => write!(f, "{v}"),
            PrimitiveValue::Date(v) => write!(f, "{v}"),
            PrimitiveValue::Time(v) => write!(f, "{v}"),
            PrimitiveValue::DateTime(v) => write!(f, "{v}"),
            PrimitiveValue::Qos(v) => write!(f, "{v}"),
            PrimitiveValue::State(v) => write!(f, "{v}"),
            PrimitiveValue::Enum(v) => write!(f, "enum({v})"),
            PrimitiveValue::Buffer(v) => write!(f, "<{} bytes>", v.len()),
            PrimitiveValue::Ascii(v) => write!(f, "\"{v}\""),
            PrimitiveValue::Utf8(v) => write!(f, "\"{v}\""),
            PrimitiveValue::Rmtes(v) => write!(f, "<rmtes {} bytes>", v.len()),
            PrimitiveValue::Array(v) => write!(f, "[{} items]", v.items.len()),
        }
    }
}

/// A primitive slot: a present value or an explicit blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    /// A present value
    Present(PrimitiveValue),
    /// An explicitly blank slot of the declared type
    Blank(DataType),
}

impl Datum {
    /// Get the presence marker.
    #[must_use]
    pub fn code(&self) -> DataCode {
        match self {
            Datum::Present(_) => DataCode::NoCode,
            Datum::Blank(_) => DataCode::Blank,
        }
    }

    /// Get the declared type of this slot.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Present(v) => v.data_type(),
            Datum::Blank(dt) => *dt,
        }
    }

    /// Check if this slot is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Datum::Blank(_))
    }

    /// Get the value, failing with `BlankValueAccess` on a blank slot.
    pub fn value(&self) -> Result<&PrimitiveValue> {
        match self {
            Datum::Present(v) => Ok(v),
            Datum::Blank(dt) => Err(CodecError::blank_access(*dt)),
        }
    }

    fn typed_value(&self, expected: DataType) -> Result<&PrimitiveValue> {
        let value = self.value()?;
        let actual = value.data_type();
        if actual != expected {
            return Err(CodecError::wrong_type(expected, actual));
        }
        Ok(value)
    }

    /// Get the unsigned integer value.
    pub fn as_uint(&self) -> Result<u64> {
        match self.typed_value(DataType::UInt)? {
            PrimitiveValue::UInt(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the signed integer value.
    pub fn as_int(&self) -> Result<i64> {
        match self.typed_value(DataType::Int)? {
            PrimitiveValue::Int(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the float value.
    pub fn as_float(&self) -> Result<f32> {
        match self.typed_value(DataType::Float)? {
            PrimitiveValue::Float(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the double value.
    pub fn as_double(&self) -> Result<f64> {
        match self.typed_value(DataType::Double)? {
            PrimitiveValue::Double(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the real value.
    pub fn as_real(&self) -> Result<Real> {
        match self.typed_value(DataType::Real)? {
            PrimitiveValue::Real(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the date value.
    pub fn as_date(&self) -> Result<Date> {
        match self.typed_value(DataType::Date)? {
            PrimitiveValue::Date(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the time value.
    pub fn as_time(&self) -> Result<Time> {
        match self.typed_value(DataType::Time)? {
            PrimitiveValue::Time(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the datetime value.
    pub fn as_datetime(&self) -> Result<DateTime> {
        match self.typed_value(DataType::DateTime)? {
            PrimitiveValue::DateTime(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the QoS value.
    pub fn as_qos(&self) -> Result<Qos> {
        match self.typed_value(DataType::Qos)? {
            PrimitiveValue::Qos(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the state value.
    pub fn as_state(&self) -> Result<&State> {
        match self.typed_value(DataType::State)? {
            PrimitiveValue::State(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    /// Get the enum code.
    pub fn as_enum(&self) -> Result<u16> {
        match self.typed_value(DataType::Enum)? {
            PrimitiveValue::Enum(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    /// Get the buffer bytes.
    pub fn as_buffer(&self) -> Result<&[u8]> {
        match self.typed_value(DataType::Buffer)? {
            PrimitiveValue::Buffer(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    /// Get the ASCII string.
    pub fn as_ascii(&self) -> Result<&str> {
        match self.typed_value(DataType::AsciiString)? {
            PrimitiveValue::Ascii(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    /// Get the UTF-8 string.
    pub fn as_utf8(&self) -> Result<&str> {
        match self.typed_value(DataType::Utf8String)? {
            PrimitiveValue::Utf8(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    /// Get the RMTES bytes.
    pub fn as_rmtes(&self) -> Result<&[u8]> {
        match self.typed_value(DataType::RmtesString)? {
            PrimitiveValue::Rmtes(v) => Ok(v),
            _ => unreachable!(),
        }
    }

    /// Get the array value.
    pub fn as_array(&self) -> Result<&ArrayValue> {
        match self.typed_value(DataType::Array)? {
            PrimitiveValue::Array(v) => Ok(v),
            _ => unreachable!(),
        }
    }
}

impl From<PrimitiveValue> for Datum {
    fn from(value: PrimitiveValue) -> Self {
        Datum::Present(value)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Present(v) => write!(f, "{v}"),
            Datum::Blank(dt) => write!(f, "blank({dt})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::real::RealHint;

    #[test]
    fn test_data_type_mapping() {
        assert_eq!(PrimitiveValue::UInt(1).data_type(), DataType::UInt);
        assert_eq!(PrimitiveValue::Int(-1).data_type(), DataType::Int);
        assert_eq!(
            PrimitiveValue::Real(Real::new(1, RealHint::Exponent0)).data_type(),
            DataType::Real
        );
        assert_eq!(
            PrimitiveValue::Ascii("x".to_string()).data_type(),
            DataType::AsciiString
        );
        assert_eq!(
            PrimitiveValue::Array(ArrayValue::new(DataType::UInt, vec![])).data_type(),
            DataType::Array
        );
    }

    #[test]
    fn test_predicates() {
        assert!(PrimitiveValue::Double(1.5).is_numeric());
        assert!(PrimitiveValue::Real(Real::new(1, RealHint::Exponent0)).is_numeric());
        assert!(!PrimitiveValue::Ascii("x".to_string()).is_numeric());
        assert!(PrimitiveValue::Utf8("x".to_string()).is_string());
        assert!(!PrimitiveValue::UInt(1).is_string());
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(PrimitiveValue::UInt(42).to_f64(), Some(42.0));
        assert_eq!(PrimitiveValue::Int(-2).to_f64(), Some(-2.0));
        let real = PrimitiveValue::Real(Real::new(11, RealHint::ExponentNeg2));
        assert!((real.to_f64().unwrap() - 0.11).abs() < 1e-12);
        assert_eq!(PrimitiveValue::Ascii("x".to_string()).to_f64(), None);
    }

    #[test]
    fn test_datum_code() {
        let present = Datum::Present(PrimitiveValue::UInt(64));
        assert_eq!(present.code(), DataCode::NoCode);
        assert!(!present.is_blank());

        let blank = Datum::Blank(DataType::Real);
        assert_eq!(blank.code(), DataCode::Blank);
        assert!(blank.is_blank());
        assert_eq!(blank.data_type(), DataType::Real);
    }

    #[test]
    fn test_blank_access_fails() {
        let blank = Datum::Blank(DataType::UInt);
        let err = blank.as_uint().unwrap_err();
        assert!(matches!(
            err,
            CodecError::BlankValueAccess {
                data_type: DataType::UInt
            }
        ));
        assert!(blank.value().is_err());
    }

    #[test]
    fn test_wrong_type_access_fails() {
        let datum = Datum::Present(PrimitiveValue::Int(32));
        let err = datum.as_uint().unwrap_err();
        assert_eq!(
            err,
            CodecError::wrong_type(DataType::UInt, DataType::Int)
        );
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Datum::Present(PrimitiveValue::UInt(64)).as_uint().unwrap(), 64);
        assert_eq!(Datum::Present(PrimitiveValue::Int(-32)).as_int().unwrap(), -32);
        assert_eq!(
            Datum::Present(PrimitiveValue::Real(Real::new(11, RealHint::ExponentNeg2)))
                .as_real()
                .unwrap(),
            Real::new(11, RealHint::ExponentNeg2)
        );
        assert_eq!(
            Datum::Present(PrimitiveValue::Ascii("ok".to_string()))
                .as_ascii()
                .unwrap(),
            "ok"
        );
        assert_eq!(Datum::Present(PrimitiveValue::Enum(3)).as_enum().unwrap(), 3);
    }

    #[test]
    fn test_array_items_can_be_blank() {
        let arr = ArrayValue::new(
            DataType::UInt,
            vec![
                Datum::Present(PrimitiveValue::UInt(1)),
                Datum::Blank(DataType::UInt),
            ],
        );
        assert_eq!(arr.items.len(), 2);
        assert!(arr.items[1].is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Datum::Present(PrimitiveValue::UInt(7)).to_string(), "7");
        assert_eq!(Datum::Blank(DataType::Date).to_string(), "blank(date)");
        assert_eq!(
            PrimitiveValue::Buffer(vec![1, 2, 3]).to_string(),
            "<3 bytes>"
        );
    }

    #[test]
    fn test_serialization() {
        let value = Datum::Present(PrimitiveValue::Real(Real::new(11, RealHint::ExponentNeg2)));
        let json = serde_json::to_string(&value).unwrap();
        let decoded: Datum = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, value);
    }
}
