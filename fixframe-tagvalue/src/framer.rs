/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX message framing.
//!
//! The framer detects one complete wire message in an accumulating byte
//! buffer and reports its exact length, or signals that more bytes are
//! needed, or that the stream head is not a FIX message. It is a pure
//! function of the buffer contents and keeps no state of its own; the
//! caller owns buffer retention across calls.

use bytes::BytesMut;
use fixframe_core::error::FrameError;
use memchr::memchr;
use tracing::warn;

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Bytes occupied by the trailing `10=NNN<SOH>` checksum field.
const CHECKSUM_FIELD_LEN: usize = 7;

/// Smallest buffer worth inspecting at all.
const MIN_FRAME_PROBE: usize = 10;

/// Outcome of one framing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameResult {
    /// A complete message occupies exactly this many leading bytes.
    Complete(usize),
    /// Not enough bytes yet; retain the buffer and wait for more.
    Incomplete,
    /// The stream head is not a well-formed message; not resumable here.
    Invalid(FrameError),
}

/// Frames FIX messages out of an accumulating byte stream.
#[derive(Debug, Clone)]
pub struct Framer {
    /// Maximum message size in bytes.
    max_message_size: usize,
}

impl Framer {
    /// Creates a new framer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_message_size: 1024 * 1024, // 1MB
        }
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Attempts to frame the next complete message at the head of `buf`.
    ///
    /// On `Complete(n)` the caller must split the buffer at `n` and retain
    /// the remainder unmodified for the next call; no message ever spans
    /// two calls and no bytes are lost or duplicated across calls.
    ///
    /// The buffer is mutable only for one documented leniency: a stream
    /// that omits the final delimiter has it forcibly restored in place.
    pub fn frame_next(&self, buf: &mut [u8]) -> FrameResult {
        if buf.len() < MIN_FRAME_PROBE {
            return FrameResult::Incomplete;
        }

        if &buf[..2] != b"8=" {
            return FrameResult::Invalid(FrameError::InvalidBeginString);
        }
        let Some(begin_soh) = memchr(SOH, buf) else {
            return self.stalled(buf.len());
        };

        let len_start = begin_soh + 1;
        let Some(rel) = memchr(SOH, &buf[len_start..]) else {
            return self.stalled(buf.len());
        };
        let len_soh = len_start + rel;
        let len_field = &buf[len_start..len_soh];
        if len_field.len() < 3 || &len_field[..2] != b"9=" {
            return FrameResult::Invalid(FrameError::InvalidBodyLength);
        }
        let Some(body_length) = parse_length(&len_field[2..]) else {
            return FrameResult::Invalid(FrameError::InvalidBodyLength);
        };

        // Body length counts from just after its own delimiter up to the
        // checksum field; the trailing 7 bytes cover 10=NNN<SOH>.
        let total = len_soh + 1 + body_length + CHECKSUM_FIELD_LEN;
        if total > self.max_message_size {
            return FrameResult::Invalid(FrameError::MessageTooLarge {
                size: total,
                max_size: self.max_message_size,
            });
        }
        if buf.len() < total {
            return FrameResult::Incomplete;
        }

        if buf[total - 1] != SOH {
            warn!(length = total, "restoring missing final delimiter");
            buf[total - 1] = SOH;
        }

        FrameResult::Complete(total)
    }

    /// Incomplete only while the buffer could still hold a legal message.
    ///
    /// A stream head that keeps growing without ever delivering the
    /// delimiters needed to parse a body length would otherwise have the
    /// caller buffering it forever.
    fn stalled(&self, buffered: usize) -> FrameResult {
        if buffered > self.max_message_size {
            return FrameResult::Invalid(FrameError::MessageTooLarge {
                size: buffered,
                max_size: self.max_message_size,
            });
        }
        FrameResult::Incomplete
    }

    /// Splits the next complete message off the front of a stream buffer.
    ///
    /// # Returns
    /// `Ok(Some(msg))` with the message bytes, `Ok(None)` if more bytes are
    /// needed, or the framing error for an unrecoverable stream head.
    ///
    /// # Errors
    /// Returns `FrameError` when the stream head is not a FIX message;
    /// resynchronization is the session layer's concern.
    pub fn split_frame(&self, src: &mut BytesMut) -> Result<Option<BytesMut>, FrameError> {
        match self.frame_next(src.as_mut()) {
            FrameResult::Complete(len) => Ok(Some(src.split_to(len))),
            FrameResult::Incomplete => Ok(None),
            FrameResult::Invalid(err) => Err(err),
        }
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a body length from ASCII digits, rejecting anything else.
#[inline]
fn parse_length(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }
    let mut result: usize = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add((b - b'0') as usize)?;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{calculate_checksum, format_checksum};

    fn make_message(body: &str) -> Vec<u8> {
        let head = format!("8=FIX.4.4\x019={}\x01{}", body.len(), body);
        let digits = format_checksum(calculate_checksum(head.as_bytes()));
        let mut msg = head.into_bytes();
        msg.extend_from_slice(b"10=");
        msg.extend_from_slice(&digits);
        msg.push(SOH);
        msg
    }

    #[test]
    fn test_complete_message_exact_length() {
        let framer = Framer::new();
        let mut msg = make_message("35=0\x01");
        let len = msg.len();
        assert_eq!(framer.frame_next(&mut msg), FrameResult::Complete(len));
    }

    #[test]
    fn test_every_strict_prefix_is_incomplete() {
        let framer = Framer::new();
        let msg = make_message("35=0\x01");
        for cut in 0..msg.len() {
            let mut prefix = msg[..cut].to_vec();
            assert_eq!(
                framer.frame_next(&mut prefix),
                FrameResult::Incomplete,
                "prefix of {cut} bytes"
            );
        }
    }

    #[test]
    fn test_concatenated_messages_frame_in_order() {
        let framer = Framer::new();
        let first = make_message("35=0\x01");
        let second = make_message("35=D\x0154=1\x01");

        let mut buf = BytesMut::new();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&second);

        let got_first = framer.split_frame(&mut buf).unwrap().unwrap();
        assert_eq!(&got_first[..], &first[..]);
        let got_second = framer.split_frame(&mut buf).unwrap().unwrap();
        assert_eq!(&got_second[..], &second[..]);
        assert!(buf.is_empty());
        assert_eq!(framer.split_frame(&mut buf), Ok(None));
    }

    #[test]
    fn test_invalid_begin_string() {
        let framer = Framer::new();
        let mut buf = b"9=FIX.4.4\x019=5\x0135=0\x0110=000\x01".to_vec();
        assert_eq!(
            framer.frame_next(&mut buf),
            FrameResult::Invalid(FrameError::InvalidBeginString)
        );
    }

    #[test]
    fn test_second_field_must_be_body_length() {
        let framer = Framer::new();
        let mut buf = b"8=FIX.4.4\x0135=0\x019=5\x0110=000\x01".to_vec();
        assert_eq!(
            framer.frame_next(&mut buf),
            FrameResult::Invalid(FrameError::InvalidBodyLength)
        );
    }

    #[test]
    fn test_non_numeric_body_length() {
        let framer = Framer::new();
        let mut buf = b"8=FIX.4.4\x019=abc\x0135=0\x0110=000\x01".to_vec();
        assert_eq!(
            framer.frame_next(&mut buf),
            FrameResult::Invalid(FrameError::InvalidBodyLength)
        );
    }

    #[test]
    fn test_missing_final_delimiter_is_restored() {
        let framer = Framer::new();
        let mut msg = make_message("35=0\x01");
        let len = msg.len();
        *msg.last_mut().unwrap() = b'X';
        assert_eq!(framer.frame_next(&mut msg), FrameResult::Complete(len));
        assert_eq!(msg[len - 1], SOH);
    }

    #[test]
    fn test_delimiterless_stream_rejected_beyond_limit() {
        let framer = Framer::new().with_max_message_size(16);
        let mut buf = b"8=FIX.4.4 followed by garbage that never delimits".to_vec();
        assert!(matches!(
            framer.frame_next(&mut buf),
            FrameResult::Invalid(FrameError::MessageTooLarge { .. })
        ));

        // Same stall after the first delimiter, with no second in sight.
        let mut buf = b"8=FIX.4.4\x019=123456 and no delimiter after".to_vec();
        assert!(matches!(
            framer.frame_next(&mut buf),
            FrameResult::Invalid(FrameError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn test_delimiterless_stream_within_limit_stays_incomplete() {
        let framer = Framer::new();
        let mut buf = b"8=FIX.4.4 no delimiter yet".to_vec();
        assert_eq!(framer.frame_next(&mut buf), FrameResult::Incomplete);
    }

    #[test]
    fn test_oversized_message_rejected() {
        let framer = Framer::new().with_max_message_size(16);
        let mut msg = make_message("35=0\x01");
        assert!(matches!(
            framer.frame_next(&mut msg),
            FrameResult::Invalid(FrameError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn test_remainder_preserved_across_split() {
        let framer = Framer::new();
        let first = make_message("35=0\x01");
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(b"8=FIX.4.4\x019=");

        let msg = framer.split_frame(&mut buf).unwrap().unwrap();
        assert_eq!(&msg[..], &first[..]);
        assert_eq!(&buf[..], b"8=FIX.4.4\x019=");
        assert_eq!(framer.split_frame(&mut buf), Ok(None));
    }
}
