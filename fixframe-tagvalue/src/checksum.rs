/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FIX checksum calculation.
//!
//! The FIX checksum is the sum of all bytes in the message (excluding the
//! checksum field itself) modulo 256, formatted as a 3-digit zero-padded string.

/// Calculates the FIX checksum for the given data.
///
/// The checksum is the sum of all bytes modulo 256.
///
/// # Arguments
/// * `data` - The message bytes to checksum (excluding the 10=XXX| field)
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| b as u32).sum();
    (sum % 256) as u8
}

/// Formats a checksum value as a 3-digit zero-padded string.
///
/// # Arguments
/// * `checksum` - The checksum value (0-255)
#[inline]
#[must_use]
pub fn format_checksum(checksum: u8) -> [u8; 3] {
    let d0 = b'0' + (checksum / 100);
    let d1 = b'0' + ((checksum / 10) % 10);
    let d2 = b'0' + (checksum % 10);
    [d0, d1, d2]
}

/// Parses a 3-digit checksum string to a u8 value.
///
/// # Arguments
/// * `bytes` - The 3-byte checksum string
///
/// # Returns
/// `Some(checksum)` if valid, `None` otherwise.
#[inline]
#[must_use]
pub fn parse_checksum(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 3 {
        return None;
    }

    let d0 = bytes[0].checked_sub(b'0')?;
    let d1 = bytes[1].checked_sub(b'0')?;
    let d2 = bytes[2].checked_sub(b'0')?;

    if d0 > 9 || d1 > 9 || d2 > 9 {
        return None;
    }

    d0.checked_mul(100)?.checked_add(d1 * 10 + d2)
}

/// Verifies the trailing checksum field of one complete framed message.
///
/// The message must end with `10=NNN<SOH>`; everything before that field
/// participates in the sum.
#[must_use]
pub fn verify_checksum(msg: &[u8]) -> bool {
    if msg.len() < 8 || msg[msg.len() - 1] != 0x01 {
        return false;
    }
    let field_start = msg.len() - 7;
    if &msg[field_start..field_start + 3] != b"10=" {
        return false;
    }
    let Some(declared) = parse_checksum(&msg[field_start + 3..field_start + 6]) else {
        return false;
    };
    calculate_checksum(&msg[..field_start]) == declared
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum_empty() {
        assert_eq!(calculate_checksum(b""), 0);
    }

    #[test]
    fn test_calculate_checksum_simple() {
        let data = b"ABC";
        let expected = (b'A' as u32 + b'B' as u32 + b'C' as u32) % 256;
        assert_eq!(calculate_checksum(data), expected as u8);
    }

    #[test]
    fn test_calculate_checksum_wraps() {
        let data = vec![255u8; 1000];
        let expected = ((255u32 * 1000) % 256) as u8;
        assert_eq!(calculate_checksum(&data), expected);
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0), *b"000");
        assert_eq!(format_checksum(42), *b"042");
        assert_eq!(format_checksum(255), *b"255");
    }

    #[test]
    fn test_parse_checksum() {
        assert_eq!(parse_checksum(b"000"), Some(0));
        assert_eq!(parse_checksum(b"042"), Some(42));
        assert_eq!(parse_checksum(b"255"), Some(255));
        assert_eq!(parse_checksum(b"256"), None);
        assert_eq!(parse_checksum(b""), None);
        assert_eq!(parse_checksum(b"00"), None);
        assert_eq!(parse_checksum(b"abc"), None);
    }

    #[test]
    fn test_verify_checksum() {
        let body = b"8=FIX.4.4\x019=5\x0135=0\x01";
        let sum = calculate_checksum(body);
        let digits = format_checksum(sum);
        let mut msg = body.to_vec();
        msg.extend_from_slice(b"10=");
        msg.extend_from_slice(&digits);
        msg.push(0x01);
        assert!(verify_checksum(&msg));

        // Corrupt one byte of the body.
        msg[0] = b'9';
        assert!(!verify_checksum(&msg));
    }

    #[test]
    fn test_verify_checksum_malformed_trailer() {
        assert!(!verify_checksum(b""));
        assert!(!verify_checksum(b"8=X\x0111=abc\x01"));
    }
}
