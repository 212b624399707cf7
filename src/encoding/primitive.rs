// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Primitive codec: scalar values to and from their wire payloads.
//!
//! A primitive payload always lives inside a slot written by the
//! enclosing container; the empty slot is the blank marker for every
//! type, so these functions deal only with non-empty payloads plus the
//! [`decode_datum`] entry point that maps emptiness to
//! [`Datum::Blank`].
//!
//! Integer payloads are minimal-width (leading bytes that carry no
//! information are trimmed), so a `u64` of 64 occupies one byte. Decode
//! is tolerant of component values outside calendar range but strict
//! about payload sizes: a short payload is `IncompleteData`, an
//! oversized one is a caller error.

use crate::core::error::{CodecError, Result};
use crate::core::quality::{DataState, Qos, Rate, State, StreamState, Timeliness};
use crate::core::real::{Real, RealHint};
use crate::core::temporal::{Date, DateTime, Time};
use crate::core::types::DataType;
use crate::core::value::{ArrayValue, Datum, PrimitiveValue};
use crate::encoding::wire::{WireCursor, WireWriter};

// ============================================================================
// Minimal-width integers
// ============================================================================

fn uint_width(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

fn int_width(value: i64) -> usize {
    let bytes = value.to_be_bytes();
    let mut width = 8;
    while width > 1 {
        let lead = bytes[8 - width];
        let next = bytes[8 - width + 1];
        let redundant = (lead == 0x00 && next & 0x80 == 0) || (lead == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        width -= 1;
    }
    width
}

fn write_uint_minimal(w: &mut WireWriter, value: u64) -> Result<()> {
    let width = uint_width(value);
    w.write_bytes(&value.to_be_bytes()[8 - width..])
}

fn write_int_minimal(w: &mut WireWriter, value: i64) -> Result<()> {
    let width = int_width(value);
    w.write_bytes(&value.to_be_bytes()[8 - width..])
}

fn decode_uint(payload: &[u8]) -> Result<u64> {
    if payload.is_empty() {
        return Err(CodecError::incomplete(1, 0, 0));
    }
    if payload.len() > 8 {
        return Err(CodecError::invalid_argument(format!(
            "uint payload of {} bytes exceeds 8",
            payload.len()
        )));
    }
    let mut value = 0u64;
    for &byte in payload {
        value = (value << 8) | u64::from(byte);
    }
    Ok(value)
}

fn decode_int(payload: &[u8]) -> Result<i64> {
    if payload.is_empty() {
        return Err(CodecError::incomplete(1, 0, 0));
    }
    if payload.len() > 8 {
        return Err(CodecError::invalid_argument(format!(
            "int payload of {} bytes exceeds 8",
            payload.len()
        )));
    }
    let mut value: i64 = if payload[0] & 0x80 != 0 { -1 } else { 0 };
    for &byte in payload {
        value = (value << 8) | i64::from(byte);
    }
    Ok(value)
}

fn expect_len(payload: &[u8], len: usize) -> Result<()> {
    if payload.len() < len {
        return Err(CodecError::incomplete(len, payload.len(), 0));
    }
    if payload.len() > len {
        return Err(CodecError::invalid_argument(format!(
            "payload of {} bytes, expected {len}",
            payload.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Encode
// ============================================================================

/// Encode a primitive value payload (no slot prefix).
pub fn encode_primitive(w: &mut WireWriter, value: &PrimitiveValue) -> Result<()> {
    match value {
        PrimitiveValue::UInt(v) => write_uint_minimal(w, *v),
        PrimitiveValue::Int(v) => write_int_minimal(w, *v),
        PrimitiveValue::Float(v) => w.write_bytes(&v.to_be_bytes()),
        PrimitiveValue::Double(v) => w.write_bytes(&v.to_be_bytes()),
        PrimitiveValue::Real(v) => encode_real(w, v),
        PrimitiveValue::Date(v) => encode_date(w, v),
        PrimitiveValue::Time(v) => encode_time(w, v),
        PrimitiveValue::DateTime(v) => {
            if !v.is_valid() {
                return Err(CodecError::invalid_argument("datetime out of range"));
            }
            encode_date_unchecked(w, &v.date)?;
            encode_time_unchecked(w, &v.time)
        }
        PrimitiveValue::Qos(v) => encode_qos(w, v),
        PrimitiveValue::State(v) => encode_state(w, v),
        PrimitiveValue::Enum(v) => {
            if *v <= 0xFF {
                w.write_u8(*v as u8)
            } else {
                w.write_u16(*v)
            }
        }
        PrimitiveValue::Buffer(v) => w.write_bytes(v),
        PrimitiveValue::Ascii(v) => {
            if !v.is_ascii() {
                return Err(CodecError::invalid_argument(
                    "ascii string contains non-ASCII bytes",
                ));
            }
            w.write_bytes(v.as_bytes())
        }
        PrimitiveValue::Utf8(v) => w.write_bytes(v.as_bytes()),
        PrimitiveValue::Rmtes(v) => w.write_bytes(v),
        PrimitiveValue::Array(v) => encode_array(w, v),
    }
}

/// Encode a datum into a slot: blank writes the empty slot.
pub fn encode_datum_slot(w: &mut WireWriter, datum: &Datum) -> Result<()> {
    match datum {
        Datum::Blank(_) => w.write_blank_slot(),
        Datum::Present(value) => {
            let slot = w.begin_slot()?;
            encode_primitive(w, value)?;
            w.end_slot(slot)
        }
    }
}

fn encode_real(w: &mut WireWriter, real: &Real) -> Result<()> {
    w.write_u8(real.hint.code())?;
    if real.hint.is_special() {
        return Ok(());
    }
    write_int_minimal(w, real.mantissa)
}

fn encode_date(w: &mut WireWriter, date: &Date) -> Result<()> {
    if !date.is_valid() {
        return Err(CodecError::invalid_argument("date out of range"));
    }
    encode_date_unchecked(w, date)
}

fn encode_date_unchecked(w: &mut WireWriter, date: &Date) -> Result<()> {
    w.write_u8(date.day)?;
    w.write_u8(date.month)?;
    w.write_u16(date.year)
}

fn encode_time(w: &mut WireWriter, time: &Time) -> Result<()> {
    if !time.is_valid() {
        return Err(CodecError::invalid_argument("time out of range"));
    }
    encode_time_unchecked(w, time)
}

fn encode_time_unchecked(w: &mut WireWriter, time: &Time) -> Result<()> {
    w.write_u8(time.hour)?;
    w.write_u8(time.minute)?;
    w.write_u8(time.second)?;
    w.write_u16(time.millisecond)
}

fn encode_qos(w: &mut WireWriter, qos: &Qos) -> Result<()> {
    let packed =
        ((qos.timeliness as u8) << 5) | ((qos.rate as u8) << 2) | (u8::from(qos.dynamic) << 1);
    w.write_u8(packed)?;
    if qos.timeliness == Timeliness::Delayed {
        w.write_u16(qos.time_info)?;
    }
    if qos.rate == Rate::TimeConflated {
        w.write_u16(qos.rate_info)?;
    }
    Ok(())
}

fn encode_state(w: &mut WireWriter, state: &State) -> Result<()> {
    let packed = ((state.stream_state as u8) << 3) | (state.data_state as u8);
    w.write_u8(packed)?;
    w.write_u8(state.code)?;
    if state.text.len() > crate::encoding::wire::MAX_SLOT_LEN {
        return Err(CodecError::invalid_argument("state text too long"));
    }
    w.write_u15rb(state.text.len() as u16)?;
    w.write_bytes(state.text.as_bytes())
}

fn encode_array(w: &mut WireWriter, array: &ArrayValue) -> Result<()> {
    if !array.item_type.is_primitive() || array.item_type == DataType::Array {
        return Err(CodecError::invalid_argument(format!(
            "array items must be non-array primitives, got {}",
            array.item_type
        )));
    }
    w.write_u8(array.item_type.code())?;
    w.write_u8(array.item_width)?;
    if array.items.len() > crate::encoding::wire::MAX_SLOT_LEN {
        return Err(CodecError::invalid_argument("array too long"));
    }
    w.write_u15rb(array.items.len() as u16)?;
    for item in &array.items {
        if let Datum::Present(value) = item {
            let actual = value.data_type();
            if actual != array.item_type {
                return Err(CodecError::wrong_type(array.item_type, actual));
            }
        }
        if array.item_width == 0 {
            encode_datum_slot(w, item)?;
        } else {
            encode_fixed_item(w, item, array.item_width)?;
        }
    }
    Ok(())
}

fn encode_fixed_item(w: &mut WireWriter, item: &Datum, width: u8) -> Result<()> {
    let value = match item {
        Datum::Present(value) => value,
        // A fixed-width item has no way to mark emptiness.
        Datum::Blank(_) => {
            return Err(CodecError::invalid_argument(
                "blank items require a variable-width array",
            ))
        }
    };
    let width = usize::from(width);
    match value {
        PrimitiveValue::UInt(v) => {
            if uint_width(*v) > width || width > 8 {
                return Err(CodecError::invalid_argument(format!(
                    "uint {v} does not fit item width {width}"
                )));
            }
            w.write_bytes(&v.to_be_bytes()[8 - width..])
        }
        PrimitiveValue::Int(v) => {
            if int_width(*v) > width || width > 8 {
                return Err(CodecError::invalid_argument(format!(
                    "int {v} does not fit item width {width}"
                )));
            }
            w.write_bytes(&v.to_be_bytes()[8 - width..])
        }
        PrimitiveValue::Enum(v) => {
            if width != 1 && width != 2 {
                return Err(CodecError::invalid_argument("enum item width must be 1 or 2"));
            }
            if width == 1 {
                if *v > 0xFF {
                    return Err(CodecError::invalid_argument(format!(
                        "enum {v} does not fit item width 1"
                    )));
                }
                w.write_u8(*v as u8)
            } else {
                w.write_u16(*v)
            }
        }
        PrimitiveValue::Float(v) => {
            if width != 4 {
                return Err(CodecError::invalid_argument("float item width must be 4"));
            }
            w.write_bytes(&v.to_be_bytes())
        }
        PrimitiveValue::Double(v) => {
            if width != 8 {
                return Err(CodecError::invalid_argument("double item width must be 8"));
            }
            w.write_bytes(&v.to_be_bytes())
        }
        other => Err(CodecError::invalid_argument(format!(
            "{} items require a variable-width array",
            other.data_type()
        ))),
    }
}

// ============================================================================
// Decode
// ============================================================================

/// Decode a primitive slot payload, mapping emptiness to blank.
pub fn decode_datum(data_type: DataType, payload: &[u8]) -> Result<Datum> {
    if !data_type.is_primitive() {
        return Err(CodecError::invalid_argument(format!(
            "{data_type} is not a primitive type"
        )));
    }
    if payload.is_empty() {
        return Ok(Datum::Blank(data_type));
    }
    Ok(Datum::Present(decode_primitive(data_type, payload)?))
}

/// Decode a non-empty primitive payload of the declared type.
pub fn decode_primitive(data_type: DataType, payload: &[u8]) -> Result<PrimitiveValue> {
    match data_type {
        DataType::UInt => Ok(PrimitiveValue::UInt(decode_uint(payload)?)),
        DataType::Int => Ok(PrimitiveValue::Int(decode_int(payload)?)),
        DataType::Float => {
            expect_len(payload, 4)?;
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(payload);
            Ok(PrimitiveValue::Float(f32::from_be_bytes(bytes)))
        }
        DataType::Double => {
            expect_len(payload, 8)?;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(payload);
            Ok(PrimitiveValue::Double(f64::from_be_bytes(bytes)))
        }
        DataType::Real => decode_real(payload),
        DataType::Date => {
            expect_len(payload, 4)?;
            let mut cursor = WireCursor::new(payload);
            Ok(PrimitiveValue::Date(decode_date_fields(&mut cursor)?))
        }
        DataType::Time => {
            expect_len(payload, 5)?;
            let mut cursor = WireCursor::new(payload);
            Ok(PrimitiveValue::Time(decode_time_fields(&mut cursor)?))
        }
        DataType::DateTime => {
            expect_len(payload, 9)?;
            let mut cursor = WireCursor::new(payload);
            let date = decode_date_fields(&mut cursor)?;
            let time = decode_time_fields(&mut cursor)?;
            Ok(PrimitiveValue::DateTime(DateTime::new(date, time)))
        }
        DataType::Qos => decode_qos(payload),
        DataType::State => decode_state(payload),
        DataType::Enum => match payload.len() {
            1 => Ok(PrimitiveValue::Enum(u16::from(payload[0]))),
            2 => Ok(PrimitiveValue::Enum(u16::from_be_bytes([
                payload[0], payload[1],
            ]))),
            n => Err(CodecError::invalid_argument(format!(
                "enum payload of {n} bytes, expected 1 or 2"
            ))),
        },
        DataType::Buffer => Ok(PrimitiveValue::Buffer(payload.to_vec())),
        DataType::AsciiString => {
            if !payload.is_ascii() {
                return Err(CodecError::invalid_argument(
                    "ascii string contains non-ASCII bytes",
                ));
            }
            Ok(PrimitiveValue::Ascii(
                String::from_utf8_lossy(payload).into_owned(),
            ))
        }
        DataType::Utf8String => match String::from_utf8(payload.to_vec()) {
            Ok(text) => Ok(PrimitiveValue::Utf8(text)),
            Err(_) => Err(CodecError::invalid_argument("invalid UTF-8 payload")),
        },
        DataType::RmtesString => Ok(PrimitiveValue::Rmtes(payload.to_vec())),
        DataType::Array => decode_array(payload),
        other => Err(CodecError::invalid_argument(format!(
            "{other} is not a primitive type"
        ))),
    }
}

fn decode_real(payload: &[u8]) -> Result<PrimitiveValue> {
    let hint = RealHint::from_code(payload[0])?;
    if hint.is_special() {
        if payload.len() != 1 {
            return Err(CodecError::invalid_argument(
                "special real hint carries no mantissa",
            ));
        }
        return Ok(PrimitiveValue::Real(Real::new(0, hint)));
    }
    if payload.len() < 2 {
        return Err(CodecError::incomplete(2, payload.len(), 0));
    }
    let mantissa = decode_int(&payload[1..])?;
    Ok(PrimitiveValue::Real(Real::new(mantissa, hint)))
}

fn decode_date_fields(cursor: &mut WireCursor<'_>) -> Result<Date> {
    let day = cursor.read_u8()?;
    let month = cursor.read_u8()?;
    let year = cursor.read_u16()?;
    Ok(Date::new(year, month, day))
}

fn decode_time_fields(cursor: &mut WireCursor<'_>) -> Result<Time> {
    let hour = cursor.read_u8()?;
    let minute = cursor.read_u8()?;
    let second = cursor.read_u8()?;
    let millisecond = cursor.read_u16()?;
    Ok(Time::new(hour, minute, second, millisecond))
}

fn decode_qos(payload: &[u8]) -> Result<PrimitiveValue> {
    let mut cursor = WireCursor::new(payload);
    let packed = cursor.read_u8()?;
    let timeliness = Timeliness::from_code(packed >> 5)?;
    let rate = Rate::from_code((packed >> 2) & 0x07)?;
    let dynamic = packed & 0x02 != 0;
    let time_info = if timeliness == Timeliness::Delayed {
        cursor.read_u16()?
    } else {
        0
    };
    let rate_info = if rate == Rate::TimeConflated {
        cursor.read_u16()?
    } else {
        0
    };
    if !cursor.is_at_end() {
        return Err(CodecError::invalid_argument("trailing bytes after qos"));
    }
    Ok(PrimitiveValue::Qos(Qos {
        timeliness,
        rate,
        dynamic,
        time_info,
        rate_info,
    }))
}

fn decode_state(payload: &[u8]) -> Result<PrimitiveValue> {
    let mut cursor = WireCursor::new(payload);
    let packed = cursor.read_u8()?;
    let stream_state = StreamState::from_code(packed >> 3)?;
    let data_state = DataState::from_code(packed & 0x07)?;
    let code = cursor.read_u8()?;
    let text_bytes = cursor.read_slot()?;
    let text = match std::str::from_utf8(text_bytes) {
        Ok(text) => text.to_string(),
        Err(_) => return Err(CodecError::invalid_argument("state text is not UTF-8")),
    };
    if !cursor.is_at_end() {
        return Err(CodecError::invalid_argument("trailing bytes after state"));
    }
    Ok(PrimitiveValue::State(State {
        stream_state,
        data_state,
        code,
        text,
    }))
}

fn decode_array(payload: &[u8]) -> Result<PrimitiveValue> {
    let mut cursor = WireCursor::new(payload);
    let item_type = DataType::from_code(cursor.read_u8()?)?;
    if !item_type.is_primitive() || item_type == DataType::Array {
        return Err(CodecError::invalid_argument(format!(
            "array items must be non-array primitives, got {item_type}"
        )));
    }
    let item_width = cursor.read_u8()?;
    let count = cursor.read_u15rb()?;
    let mut items = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        if item_width == 0 {
            let slot = cursor.read_slot()?;
            items.push(decode_datum(item_type, slot)?);
        } else {
            let bytes = cursor.read_bytes(usize::from(item_width))?;
            items.push(Datum::Present(decode_fixed_item(item_type, bytes)?));
        }
    }
    if !cursor.is_at_end() {
        return Err(CodecError::invalid_argument("trailing bytes after array"));
    }
    Ok(PrimitiveValue::Array(ArrayValue {
        item_type,
        item_width,
        items,
    }))
}

fn decode_fixed_item(item_type: DataType, bytes: &[u8]) -> Result<PrimitiveValue> {
    match item_type {
        DataType::UInt => Ok(PrimitiveValue::UInt(decode_uint(bytes)?)),
        DataType::Int => Ok(PrimitiveValue::Int(decode_int(bytes)?)),
        DataType::Enum => {
            let value = decode_uint(bytes)?;
            if value > u64::from(u16::MAX) {
                return Err(CodecError::invalid_argument("enum item out of range"));
            }
            Ok(PrimitiveValue::Enum(value as u16))
        }
        DataType::Float => decode_primitive(DataType::Float, bytes),
        DataType::Double => decode_primitive(DataType::Double, bytes),
        other => Err(CodecError::invalid_argument(format!(
            "{other} items require a variable-width array"
        ))),
    }
}
