//! Hex-string parsing helpers for keys, IVs, and nonces.
//!
//! Kept as small free functions rather than methods on any one cipher or
//! context type, since every caller needs the same "decode, then check the
//! length" shape regardless of which cipher or mode it's feeding.

use crate::bail;
use crate::error::Error;

/// Decode a hex string into raw bytes.
pub fn parse_hex_bytes<V: AsRef<[u8]>>(hex_str: V) -> Result<Vec<u8>, Error> {
    Ok(hex::decode(hex_str)?)
}

/// Decode a hex string and require it to be exactly `expected_len` bytes,
/// the shape needed for a key, IV, or nonce of fixed size.
pub fn parse_hex_fixed<V: AsRef<[u8]>>(hex_str: V, expected_len: usize) -> Result<Vec<u8>, Error> {
    let bytes = parse_hex_bytes(hex_str)?;
    bail!(
        bytes.len() != expected_len,
        Error::InvalidArgument(format!(
            "expected a {expected_len}-byte hex string, got {} bytes",
            bytes.len()
        ))
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hex() {
        let bytes = parse_hex_bytes("deadbeef").unwrap();
        assert_eq!(bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(parse_hex_bytes("not-hex").is_err());
    }

    #[test]
    fn fixed_length_checks_size() {
        assert!(parse_hex_fixed("0011", 2).is_ok());
        assert!(parse_hex_fixed("0011", 4).is_err());
    }
}
