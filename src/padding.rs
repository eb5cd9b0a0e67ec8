//! Padding providers: add/remove block-alignment padding under four schemes.
//!
//! The padding length `P` is always `block_size - (|data| mod block_size)`,
//! reset to `0` when it would equal `block_size` — this library never pads
//! an already-aligned buffer with a whole extra block. That is a deliberate
//! deviation from canonical PKCS#7 and is covered by the tests below.

use rand::RngCore;

use crate::error::Error;

/// The four supported padding schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingScheme {
    Zeros,
    AnsiX923,
    Pkcs7,
    Iso10126,
}

impl PaddingScheme {
    /// Append padding bytes so that `data.len()` becomes a multiple of
    /// `block_size`. Returns the padded buffer.
    pub fn add(self, data: &[u8], block_size: usize) -> Vec<u8> {
        let pad_len = pad_len(data.len(), block_size);
        let mut out = Vec::with_capacity(data.len() + pad_len);
        out.extend_from_slice(data);

        if pad_len == 0 {
            return out;
        }

        match self {
            PaddingScheme::Zeros => {
                out.extend(std::iter::repeat(0u8).take(pad_len));
            }
            PaddingScheme::AnsiX923 => {
                out.extend(std::iter::repeat(0u8).take(pad_len - 1));
                out.push(pad_len as u8);
            }
            PaddingScheme::Pkcs7 => {
                out.extend(std::iter::repeat(pad_len as u8).take(pad_len));
            }
            PaddingScheme::Iso10126 => {
                let mut random = vec![0u8; pad_len - 1];
                rand::rngs::OsRng.fill_bytes(&mut random);
                out.extend(random);
                out.push(pad_len as u8);
            }
        }
        out
    }

    /// Strip padding from a fully-assembled, block-aligned buffer.
    pub fn remove(self, data: &[u8], block_size: usize) -> Result<Vec<u8>, Error> {
        match self {
            PaddingScheme::Zeros => {
                let trimmed = data.len() - data.iter().rev().take_while(|&&b| b == 0).count();
                Ok(data[..trimmed].to_vec())
            }
            PaddingScheme::AnsiX923 => {
                let Some(&last) = data.last() else {
                    return Ok(data.to_vec());
                };
                let len = last as usize;
                if len > 0 && len < block_size && len <= data.len() {
                    Ok(data[..data.len() - len].to_vec())
                } else {
                    Ok(data.to_vec())
                }
            }
            PaddingScheme::Pkcs7 => {
                let Some(&last) = data.last() else {
                    return Ok(data.to_vec());
                };
                let len = last as usize;
                if len > 0
                    && len <= block_size
                    && len <= data.len()
                    && data[data.len() - len..].iter().all(|&b| b == last)
                {
                    Ok(data[..data.len() - len].to_vec())
                } else {
                    // Permissive: not valid padding, return unchanged.
                    Ok(data.to_vec())
                }
            }
            PaddingScheme::Iso10126 => {
                let Some(&last) = data.last() else {
                    return Ok(data.to_vec());
                };
                let len = last as usize;
                if len == 0 || len > block_size {
                    return Err(Error::InvalidData(format!(
                        "ISO 10126 padding length {len} out of range 1..={block_size}"
                    )));
                }
                Ok(data[..data.len() - len].to_vec())
            }
        }
    }
}

/// Compute the padding length for a given data length and block size,
/// resetting a full-block pad to zero (see module docs).
fn pad_len(data_len: usize, block_size: usize) -> usize {
    let rem = data_len % block_size;
    if rem == 0 {
        0
    } else {
        block_size - rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_pads_and_strips() {
        let data = b"hello";
        let padded = PaddingScheme::Zeros.add(data, 8);
        assert_eq!(padded.len(), 8);
        assert_eq!(&padded[5..], &[0, 0, 0]);
        let stripped = PaddingScheme::Zeros.remove(&padded, 8).unwrap();
        assert_eq!(stripped, data);
    }

    #[test]
    fn zeros_already_aligned_adds_nothing() {
        let data = [1u8; 8];
        let padded = PaddingScheme::Zeros.add(&data, 8);
        assert_eq!(padded.len(), 8);
    }

    #[test]
    fn ansi_x923_pads_and_strips() {
        let data = b"hello";
        let padded = PaddingScheme::AnsiX923.add(data, 8);
        assert_eq!(&padded[5..], &[0, 0, 3]);
        let stripped = PaddingScheme::AnsiX923.remove(&padded, 8).unwrap();
        assert_eq!(stripped, data);
    }

    #[test]
    fn ansi_x923_aligned_input_unchanged_last_byte() {
        let data = [9u8; 8];
        let padded = PaddingScheme::AnsiX923.add(&data, 8);
        assert_eq!(padded, data);
    }

    #[test]
    fn pkcs7_pads_and_strips() {
        let data = b"hello";
        let padded = PaddingScheme::Pkcs7.add(data, 8);
        assert_eq!(&padded[5..], &[3, 3, 3]);
        let stripped = PaddingScheme::Pkcs7.remove(&padded, 8).unwrap();
        assert_eq!(stripped, data);
    }

    #[test]
    fn pkcs7_invalid_padding_returned_unchanged() {
        let data = b"bad\x04\x04\x04\x02".to_vec();
        let result = PaddingScheme::Pkcs7.remove(&data, 4).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn pkcs7_full_block_padding_strips_whole_block() {
        let data = b"messages\x08\x08\x08\x08\x08\x08\x08\x08".to_vec();
        let stripped = PaddingScheme::Pkcs7.remove(&data, 8).unwrap();
        assert_eq!(stripped, b"messages");
    }

    #[test]
    fn iso10126_pads_and_strips() {
        let data = b"hello";
        let padded = PaddingScheme::Iso10126.add(data, 8);
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[7], 3);
        let stripped = PaddingScheme::Iso10126.remove(&padded, 8).unwrap();
        assert_eq!(stripped, data);
    }

    #[test]
    fn iso10126_rejects_invalid_length() {
        let data = [0u8; 8];
        let err = PaddingScheme::Iso10126.remove(&data, 8);
        assert!(err.is_err());
    }

    #[test]
    fn already_aligned_input_grows_by_zero() {
        for scheme in [
            PaddingScheme::Zeros,
            PaddingScheme::AnsiX923,
            PaddingScheme::Pkcs7,
            PaddingScheme::Iso10126,
        ] {
            let data = [1u8; 16];
            let padded = scheme.add(&data, 8);
            assert_eq!(padded.len(), 16, "{scheme:?} should not add a whole block");
        }
    }
}
