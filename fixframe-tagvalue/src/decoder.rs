/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Zero-copy tag/value tokenization.
//!
//! One complete framed message is split into an ordered sequence of
//! `(tag, value)` pairs referencing the original buffer, navigated through
//! a cursor. The cursor is the sole interface the schema assembler uses;
//! no schema reasoning happens here.

use crate::framer::SOH;
use fixframe_core::error::ValidationError;
use fixframe_core::field::FieldRef;
use memchr::memchr;
use smallvec::SmallVec;

/// Equals sign delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Hard cap on tokens in one message, to bound adversarial input.
pub const MAX_TOKENS_PER_MESSAGE: usize = 1024;

/// Ordered token sequence over one message, with a navigable cursor.
///
/// Tokens reference the message buffer and never outlive it; each
/// in-flight message gets its own cursor, so nothing is shared across
/// concurrent messages.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: SmallVec<[FieldRef<'a>; 32]>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Tokenizes one complete message.
    ///
    /// Pairs are split on SOH and `=` in wire order. Tokenization stops
    /// cleanly at the first malformed pair or at the end of the buffer.
    ///
    /// # Errors
    /// Returns `ValidationError::CapacityExceeded` if the message holds
    /// more than [`MAX_TOKENS_PER_MESSAGE`] pairs.
    pub fn parse(input: &'a [u8]) -> Result<Self, ValidationError> {
        let mut tokens: SmallVec<[FieldRef<'a>; 32]> = SmallVec::new();
        let mut offset = 0;

        while offset < input.len() {
            let remaining = &input[offset..];
            let Some(eq_pos) = memchr(EQUALS, remaining) else {
                break;
            };
            let Some(tag) = parse_tag(&remaining[..eq_pos]) else {
                break;
            };
            let value_start = eq_pos + 1;
            let Some(soh_pos) = memchr(SOH, &remaining[value_start..]) else {
                break;
            };
            if tokens.len() >= MAX_TOKENS_PER_MESSAGE {
                return Err(ValidationError::CapacityExceeded {
                    what: "tokens per message",
                    limit: MAX_TOKENS_PER_MESSAGE,
                });
            }
            tokens.push(FieldRef::new(
                tag,
                &remaining[value_start..value_start + soh_pos],
            ));
            offset += value_start + soh_pos + 1;
        }

        Ok(Self { tokens, pos: 0 })
    }

    /// Returns the token under the cursor, if the cursor is valid.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<FieldRef<'a>> {
        self.tokens.get(self.pos).copied()
    }

    /// Moves the cursor forward one token.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Moves the cursor back one token.
    #[inline]
    pub fn prev(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Resets the cursor to the first token.
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Returns true if the cursor points at a token.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Returns true if the cursor points at the final token.
    #[inline]
    #[must_use]
    pub fn is_last(&self) -> bool {
        !self.tokens.is_empty() && self.pos == self.tokens.len() - 1
    }

    /// Returns the cursor position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restores a previously saved cursor position.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    /// All tokens in wire order.
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &[FieldRef<'a>] {
        &self.tokens
    }

    /// Number of tokens.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the message produced no tokens.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parses a tag number from ASCII bytes.
///
/// # Returns
/// The parsed tag number, or `None` if invalid.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag(b"8"), Some(8));
        assert_eq!(parse_tag(b"35"), Some(35));
        assert_eq!(parse_tag(b"12345"), Some(12345));
        assert_eq!(parse_tag(b""), None);
        assert_eq!(parse_tag(b"abc"), None);
        assert_eq!(parse_tag(b"12a"), None);
    }

    #[test]
    fn test_tokenize_preserves_wire_order() {
        let input = b"8=FIX4.4\x019=20\x0135=D\x0149=001\x0156=YYY\x0110=123\x01";
        let cursor = TokenCursor::parse(input).unwrap();
        let pairs: Vec<(u32, &[u8])> = cursor.tokens().iter().map(|t| (t.tag, t.value)).collect();
        assert_eq!(
            pairs,
            vec![
                (8, b"FIX4.4".as_ref()),
                (9, b"20".as_ref()),
                (35, b"D".as_ref()),
                (49, b"001".as_ref()),
                (56, b"YYY".as_ref()),
                (10, b"123".as_ref()),
            ]
        );
    }

    #[test]
    fn test_cursor_navigation() {
        let input = b"8=X\x019=5\x0135=0\x01";
        let mut cursor = TokenCursor::parse(input).unwrap();

        assert!(cursor.is_valid());
        assert_eq!(cursor.current().unwrap().tag, 8);
        cursor.advance();
        assert_eq!(cursor.current().unwrap().tag, 9);
        cursor.prev();
        assert_eq!(cursor.current().unwrap().tag, 8);

        cursor.advance();
        cursor.advance();
        assert!(cursor.is_last());
        assert_eq!(cursor.current().unwrap().tag, 35);
        cursor.advance();
        assert!(!cursor.is_valid());
        assert!(cursor.current().is_none());

        cursor.reset();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current().unwrap().tag, 8);
    }

    #[test]
    fn test_prev_at_start_stays_put() {
        let input = b"8=X\x01";
        let mut cursor = TokenCursor::parse(input).unwrap();
        cursor.prev();
        assert_eq!(cursor.position(), 0);
        assert!(cursor.is_valid());
    }

    #[test]
    fn test_empty_input() {
        let cursor = TokenCursor::parse(b"").unwrap();
        assert!(cursor.is_empty());
        assert!(!cursor.is_valid());
        assert!(!cursor.is_last());
    }

    #[test]
    fn test_stops_at_malformed_pair() {
        let input = b"8=X\x01garbage";
        let cursor = TokenCursor::parse(input).unwrap();
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor.tokens()[0].tag, 8);
    }

    #[test]
    fn test_token_cap_enforced() {
        let mut input = Vec::new();
        for _ in 0..=MAX_TOKENS_PER_MESSAGE {
            input.extend_from_slice(b"1=x\x01");
        }
        let err = TokenCursor::parse(&input).unwrap_err();
        assert!(matches!(err, ValidationError::CapacityExceeded { .. }));
    }
}
