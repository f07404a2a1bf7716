//! Error types for the `mctest-schema` crate.

use thiserror::Error;

use crate::wire::WireType;

/// Errors that can occur while building, encoding or decoding records.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The bytes do not parse as the declared wire structure.
    #[error("Malformed input ({message}): {reason}")]
    MalformedInput {
        /// The record type being decoded.
        message: &'static str,
        /// A description of the failure.
        reason: String,
    },

    /// A required field was absent.
    #[error("Missing required field {message}.{field}")]
    MissingRequiredField {
        /// The record type that is missing the field.
        message: &'static str,
        /// The schema name of the missing field.
        field: &'static str,
    },

    /// An enum field carried a value outside its declared range.
    #[error("Invalid enum value {value} for {message}.{field}")]
    InvalidEnumValue {
        /// The record type being decoded.
        message: &'static str,
        /// The schema name of the enum field.
        field: &'static str,
        /// The rejected value, sign-extended from the wire varint.
        value: i64,
    },

    /// A known tag was encoded with a wire type that does not match its schema type.
    #[error(
        "Type mismatch for {message}.{field} (tag {tag}): expected {expected} wire type, found {actual}"
    )]
    TypeMismatch {
        /// The record type being decoded.
        message: &'static str,
        /// The schema name of the field.
        field: &'static str,
        /// The field tag.
        tag: u32,
        /// The wire type the schema declares.
        expected: WireType,
        /// The wire type found in the input.
        actual: WireType,
    },

    /// A question type name that is neither `one` nor `multiple`.
    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    /// A length-prefixed frame is larger than the configured limit.
    #[error("Frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge {
        /// The frame length.
        len: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error from the underlying reader or writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
