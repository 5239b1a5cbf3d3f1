/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field types for FIX protocol messages.
//!
//! Fields are addressed by their bare tag number throughout; the
//! dictionary, decoder, and validator all share that keying. Field
//! values stay as raw byte slices into the wire buffer; typed
//! representations are produced on demand by the `as_*` parse methods.

use crate::error::DecodeError;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Zero-copy reference to a field within a FIX message buffer.
///
/// This struct holds references to the original message buffer,
/// avoiding allocation during parsing. It never outlives the buffer
/// the message arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef<'a> {
    /// The field tag number.
    pub tag: u32,
    /// Reference to the field value bytes (without delimiters).
    pub value: &'a [u8],
}

impl<'a> FieldRef<'a> {
    /// Creates a new field reference.
    ///
    /// # Arguments
    /// * `tag` - The field tag number
    /// * `value` - Reference to the value bytes
    #[inline]
    #[must_use]
    pub const fn new(tag: u32, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Returns the value as a string slice.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidUtf8` if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.value).map_err(DecodeError::from)
    }

    /// Parses the value as the specified type.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if parsing fails.
    pub fn parse<T: FromStr>(&self) -> Result<T, DecodeError> {
        let s = self.as_str()?;
        s.parse().map_err(|_| DecodeError::InvalidFieldValue {
            tag: self.tag,
            reason: format!("failed to parse '{}' as {}", s, std::any::type_name::<T>()),
        })
    }

    /// Returns the value as a u64.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid integer.
    pub fn as_u64(&self) -> Result<u64, DecodeError> {
        self.parse()
    }

    /// Returns the value as an i64.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid integer.
    pub fn as_i64(&self) -> Result<i64, DecodeError> {
        self.parse()
    }

    /// Returns the value as a Decimal.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid decimal.
    pub fn as_decimal(&self) -> Result<Decimal, DecodeError> {
        self.parse()
    }

    /// Returns the value as a bool (FIX uses 'Y'/'N').
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not 'Y' or 'N'.
    pub fn as_bool(&self) -> Result<bool, DecodeError> {
        match self.value {
            b"Y" => Ok(true),
            b"N" => Ok(false),
            _ => Err(DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "expected 'Y' or 'N'".to_string(),
            }),
        }
    }

    /// Returns the value as a single character.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a single ASCII character.
    pub fn as_char(&self) -> Result<char, DecodeError> {
        if self.value.len() == 1 && self.value[0].is_ascii() {
            Ok(self.value[0] as char)
        } else {
            Err(DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: "expected single ASCII character".to_string(),
            })
        }
    }

    /// Returns the value as a UTC timestamp.
    ///
    /// Accepts the FIX `YYYYMMDD-HH:MM:SS` format with optional fractional
    /// seconds (`.sss`, `.ssssss`, or `.sssssssss`).
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidFieldValue` if the value is not a valid timestamp.
    pub fn as_utc_timestamp(&self) -> Result<DateTime<Utc>, DecodeError> {
        let s = self.as_str()?;
        NaiveDateTime::parse_from_str(s, "%Y%m%d-%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| DecodeError::InvalidFieldValue {
                tag: self.tag,
                reason: format!("failed to parse '{}' as UTC timestamp", s),
            })
    }

    /// Returns the raw bytes of the value.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.value
    }

    /// Returns the length of the value in bytes.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the value is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_as_str() {
        let field = FieldRef::new(11, b"ORDER123");
        assert_eq!(field.as_str().unwrap(), "ORDER123");
    }

    #[test]
    fn test_field_ref_as_u64() {
        let field = FieldRef::new(34, b"12345");
        assert_eq!(field.as_u64().unwrap(), 12345);
    }

    #[test]
    fn test_field_ref_as_decimal() {
        let field = FieldRef::new(44, b"99.25");
        assert_eq!(field.as_decimal().unwrap(), Decimal::new(9925, 2));
    }

    #[test]
    fn test_field_ref_as_bool() {
        let yes = FieldRef::new(141, b"Y");
        let no = FieldRef::new(141, b"N");
        assert!(yes.as_bool().unwrap());
        assert!(!no.as_bool().unwrap());
    }

    #[test]
    fn test_field_ref_as_char() {
        let field = FieldRef::new(54, b"1");
        assert_eq!(field.as_char().unwrap(), '1');
    }

    #[test]
    fn test_field_ref_as_utc_timestamp() {
        let field = FieldRef::new(52, b"20260115-14:30:05.123");
        let ts = field.as_utc_timestamp().unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 123);

        let no_frac = FieldRef::new(52, b"20260115-14:30:05");
        assert!(no_frac.as_utc_timestamp().is_ok());

        let bad = FieldRef::new(52, b"yesterday");
        assert!(bad.as_utc_timestamp().is_err());
    }

    #[test]
    fn test_field_ref_invalid_utf8() {
        let field = FieldRef::new(1, &[0xFF, 0xFE]);
        assert!(field.as_str().is_err());
    }
}
