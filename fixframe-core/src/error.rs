/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the FixFrame FIX codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all FixFrame operations.

use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all FixFrame operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during dictionary construction.
    #[error("schema load error: {0}")]
    SchemaLoad(#[from] SchemaLoadError),

    /// Error during message framing.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Error during message validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error during typed field value decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors that abort dictionary construction.
///
/// Any of these makes the whole load fail; a partial dictionary is never
/// exposed to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaLoadError {
    /// A field number was declared more than once.
    #[error("duplicate field fid {fid}")]
    DuplicateFid {
        /// The duplicated field number.
        fid: u32,
    },

    /// A field name was declared more than once.
    #[error("duplicate field name '{name}'")]
    DuplicateName {
        /// The duplicated field name.
        name: String,
    },

    /// A field list referenced a field or component that is not yet defined.
    #[error("undefined reference to '{name}'")]
    UndefinedReference {
        /// The unresolved field or component name.
        name: String,
    },

    /// An element carried a missing or malformed attribute.
    #[error("malformed attribute '{attribute}' on <{element}>: {reason}")]
    MalformedAttribute {
        /// The schema element being parsed.
        element: String,
        /// The offending attribute name.
        attribute: String,
        /// Why the attribute is unusable.
        reason: String,
    },

    /// The schema document itself could not be parsed.
    #[error("schema document error: {0}")]
    Xml(String),
}

/// Errors that occur while framing raw bytes into discrete messages.
///
/// The framer itself reports a tri-state result per call; these variants
/// carry the reason when the stream is not safely resumable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Message buffer is incomplete, need more data.
    #[error("incomplete message, need more data")]
    Incomplete,

    /// Invalid BeginString field (tag 8).
    #[error("invalid begin string: message must start with 8=")]
    InvalidBeginString,

    /// Missing or malformed BodyLength field (tag 9).
    #[error("invalid body length field (tag 9)")]
    InvalidBodyLength,

    /// Message exceeds maximum allowed size.
    #[error("message too large: {size} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Declared message size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max_size: usize,
    },
}

/// Errors reported as a structured per-message verdict by the assembler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field appeared out of its declared position.
    #[error("sequence violation: expected tag {expected}, found tag {found}")]
    SequenceViolation {
        /// The fid the schema requires at this position.
        expected: u32,
        /// The tag actually present on the wire.
        found: u32,
    },

    /// A required field is absent from the message.
    #[error("missing required field: fid {fid}")]
    MissingRequiredField {
        /// The fid of the missing field.
        fid: u32,
    },

    /// A bound value is not part of the field's enumerated domain.
    #[error("unknown enum value '{value}' for fid {fid}")]
    UnknownEnumValue {
        /// The fid of the enumerated field.
        fid: u32,
        /// The offending wire value.
        value: String,
    },

    /// Repeating group count does not match the repetitions on the wire.
    #[error("group count mismatch for fid {count_fid}: expected {expected}, found {actual}")]
    GroupCountMismatch {
        /// The fid carrying the group count.
        count_fid: u32,
        /// Declared number of repetitions.
        expected: u32,
        /// Repetitions actually consumed.
        actual: u32,
    },

    /// A tag not part of the message schema was left unconsumed.
    #[error("unknown field: tag {fid}")]
    UnknownField {
        /// The unexpected tag.
        fid: u32,
    },

    /// A hard capacity limit was exceeded by adversarial input.
    #[error("capacity exceeded: {what} limit is {limit}")]
    CapacityExceeded {
        /// Which limit was hit.
        what: &'static str,
        /// The configured limit.
        limit: usize,
    },
}

/// Errors that occur during typed field value decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Invalid UTF-8 in string field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Invalid field value for the expected type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },
}
