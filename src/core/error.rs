// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for marketcodec.
//!
//! Provides error types for codec operations:
//! - Wire decoding (truncation, unknown type codes)
//! - Typed value access (blank values, wrong declared types)
//! - Dictionary resolution (unknown field ids, unmapped enum codes)
//! - Encoding (fixed buffers, invalid arguments)

use crate::core::types::DataType;
use std::fmt;

/// Errors that can occur during encode, decode, or typed access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte stream too short for the declared type or structure.
    IncompleteData {
        /// Bytes required by the declared type
        requested: usize,
        /// Bytes actually available
        available: usize,
        /// Position in the buffer when the shortfall was detected
        position: usize,
    },

    /// Fixed-capacity output buffer cannot hold the next write.
    BufferTooSmall {
        /// Bytes needed for the write
        needed: usize,
        /// Total capacity of the buffer
        capacity: usize,
    },

    /// Declared type code is not part of the wire format.
    UnsupportedDataType {
        /// The unrecognized type code
        type_code: u8,
    },

    /// Field id has no definition in the loaded dictionary.
    FieldIdNotFound {
        /// The unresolved field id
        field_id: i16,
    },

    /// Enum code has no display mapping for this field.
    EnumValueNotInDictionary {
        /// Field the lookup was made for
        field_id: i16,
        /// The unmapped enum code
        code: u16,
    },

    /// Value accessor called on an explicitly blank entry.
    BlankValueAccess {
        /// Declared type of the blank entry
        data_type: DataType,
    },

    /// Typed accessor does not match the declared type.
    WrongDataTypeAccess {
        /// Type the accessor expected
        expected: DataType,
        /// Type actually declared on the wire
        actual: DataType,
    },

    /// Payload access on a map DELETE entry, which carries none.
    NoPayloadForDelete,

    /// Caller error: unsupported combination of arguments.
    InvalidArgument {
        /// What the caller got wrong
        message: String,
    },

    /// Parse error in a dictionary definition file.
    ParseError {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },
}

impl CodecError {
    /// Create an incomplete-data error.
    pub fn incomplete(requested: usize, available: usize, position: usize) -> Self {
        CodecError::IncompleteData {
            requested,
            available,
            position,
        }
    }

    /// Create a buffer-too-small error.
    pub fn buffer_too_small(needed: usize, capacity: usize) -> Self {
        CodecError::BufferTooSmall { needed, capacity }
    }

    /// Create an unsupported-data-type error.
    pub fn unsupported_type(type_code: u8) -> Self {
        CodecError::UnsupportedDataType { type_code }
    }

    /// Create a field-id-not-found error.
    pub fn field_not_found(field_id: i16) -> Self {
        CodecError::FieldIdNotFound { field_id }
    }

    /// Create an enum-value-not-in-dictionary error.
    pub fn enum_not_found(field_id: i16, code: u16) -> Self {
        CodecError::EnumValueNotInDictionary { field_id, code }
    }

    /// Create a blank-value-access error.
    pub fn blank_access(data_type: DataType) -> Self {
        CodecError::BlankValueAccess { data_type }
    }

    /// Create a wrong-data-type-access error.
    pub fn wrong_type(expected: DataType, actual: DataType) -> Self {
        CodecError::WrongDataTypeAccess { expected, actual }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CodecError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::ParseError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::IncompleteData {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::BufferTooSmall { needed, capacity } => vec![
                ("needed", needed.to_string()),
                ("capacity", capacity.to_string()),
            ],
            CodecError::UnsupportedDataType { type_code } => {
                vec![("type_code", type_code.to_string())]
            }
            CodecError::FieldIdNotFound { field_id } => {
                vec![("field_id", field_id.to_string())]
            }
            CodecError::EnumValueNotInDictionary { field_id, code } => vec![
                ("field_id", field_id.to_string()),
                ("code", code.to_string()),
            ],
            CodecError::BlankValueAccess { data_type } => {
                vec![("data_type", data_type.to_string())]
            }
            CodecError::WrongDataTypeAccess { expected, actual } => vec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            CodecError::NoPayloadForDelete => vec![],
            CodecError::InvalidArgument { message } => {
                vec![("message", message.clone())]
            }
            CodecError::ParseError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::IncompleteData {
                requested,
                available,
                position,
            } => write!(
                f,
                "Incomplete data: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            CodecError::BufferTooSmall { needed, capacity } => write!(
                f,
                "Buffer too small: write needs {needed} bytes, capacity is {capacity}"
            ),
            CodecError::UnsupportedDataType { type_code } => {
                write!(f, "Unsupported data type code: {type_code}")
            }
            CodecError::FieldIdNotFound { field_id } => {
                write!(f, "Field id {field_id} not found in dictionary")
            }
            CodecError::EnumValueNotInDictionary { field_id, code } => write!(
                f,
                "Enum code {code} for field id {field_id} not in dictionary"
            ),
            CodecError::BlankValueAccess { data_type } => {
                write!(f, "Value access on blank {data_type} entry")
            }
            CodecError::WrongDataTypeAccess { expected, actual } => write!(
                f,
                "Wrong data type access: expected {expected}, declared type is {actual}"
            ),
            CodecError::NoPayloadForDelete => {
                write!(f, "Map DELETE entry carries no payload")
            }
            CodecError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {message}")
            }
            CodecError::ParseError { context, message } => {
                write!(f, "Parse error in {context}: {message}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for marketcodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_data() {
        let err = CodecError::incomplete(8, 3, 12);
        assert!(matches!(err, CodecError::IncompleteData { .. }));
        assert_eq!(
            err.to_string(),
            "Incomplete data: requested 8 bytes at position 12, but only 3 bytes available"
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let err = CodecError::buffer_too_small(64, 16);
        assert_eq!(
            err.to_string(),
            "Buffer too small: write needs 64 bytes, capacity is 16"
        );
    }

    #[test]
    fn test_unsupported_type() {
        let err = CodecError::unsupported_type(250);
        assert_eq!(err.to_string(), "Unsupported data type code: 250");
    }

    #[test]
    fn test_field_not_found() {
        let err = CodecError::field_not_found(-2);
        assert_eq!(err.to_string(), "Field id -2 not found in dictionary");
    }

    #[test]
    fn test_enum_not_found() {
        let err = CodecError::enum_not_found(4, 9999);
        assert_eq!(
            err.to_string(),
            "Enum code 9999 for field id 4 not in dictionary"
        );
    }

    #[test]
    fn test_blank_access() {
        let err = CodecError::blank_access(DataType::Real);
        assert_eq!(err.to_string(), "Value access on blank real entry");
    }

    #[test]
    fn test_wrong_type() {
        let err = CodecError::wrong_type(DataType::FieldList, DataType::Map);
        assert_eq!(
            err.to_string(),
            "Wrong data type access: expected field_list, declared type is map"
        );
    }

    #[test]
    fn test_no_payload_for_delete() {
        let err = CodecError::NoPayloadForDelete;
        assert_eq!(err.to_string(), "Map DELETE entry carries no payload");
        assert!(err.log_fields().is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = CodecError::parse("field dictionary", "bad line");
        assert_eq!(err.to_string(), "Parse error in field dictionary: bad line");
    }

    #[test]
    fn test_log_fields_incomplete() {
        let err = CodecError::incomplete(8, 3, 12);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("requested", "8".to_string()));
        assert_eq!(fields[1], ("available", "3".to_string()));
        assert_eq!(fields[2], ("position", "12".to_string()));
    }

    #[test]
    fn test_log_fields_wrong_type() {
        let err = CodecError::wrong_type(DataType::UInt, DataType::Int);
        let fields = err.log_fields();
        assert_eq!(fields[0], ("expected", "uint".to_string()));
        assert_eq!(fields[1], ("actual", "int".to_string()));
    }

    #[test]
    fn test_error_clone_eq() {
        let err1 = CodecError::field_not_found(7);
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
