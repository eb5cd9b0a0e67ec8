//! DES: block size 8, key size 7 (raw) or 8 (with parity bits), 16 rounds,
//! built on the [`crate::feistel`] scaffold.

use crate::bits::{permute, rotate_left_bits};
use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::feistel::{self, KeyExpander, RoundFunction};

const BLOCK_SIZE: usize = 8;
const ROUNDS: usize = 16;

#[rustfmt::skip]
const IP: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2,
    60, 52, 44, 36, 28, 20, 12, 4,
    62, 54, 46, 38, 30, 22, 14, 6,
    64, 56, 48, 40, 32, 24, 16, 8,
    57, 49, 41, 33, 25, 17, 9, 1,
    59, 51, 43, 35, 27, 19, 11, 3,
    61, 53, 45, 37, 29, 21, 13, 5,
    63, 55, 47, 39, 31, 23, 15, 7,
];

#[rustfmt::skip]
const FP: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32,
    39, 7, 47, 15, 55, 23, 63, 31,
    38, 6, 46, 14, 54, 22, 62, 30,
    37, 5, 45, 13, 53, 21, 61, 29,
    36, 4, 44, 12, 52, 20, 60, 28,
    35, 3, 43, 11, 51, 19, 59, 27,
    34, 2, 42, 10, 50, 18, 58, 26,
    33, 1, 41, 9, 49, 17, 57, 25,
];

#[rustfmt::skip]
const PC1: [u8; 56] = [
    57, 49, 41, 33, 25, 17, 9,
    1, 58, 50, 42, 34, 26, 18,
    10, 2, 59, 51, 43, 35, 27,
    19, 11, 3, 60, 52, 44, 36,
    63, 55, 47, 39, 31, 23, 15,
    7, 62, 54, 46, 38, 30, 22,
    14, 6, 61, 53, 45, 37, 29,
    21, 13, 5, 28, 20, 12, 4,
];

#[rustfmt::skip]
const PC2: [u8; 48] = [
    14, 17, 11, 24, 1, 5,
    3, 28, 15, 6, 21, 10,
    23, 19, 12, 4, 26, 8,
    16, 7, 27, 20, 13, 2,
    41, 52, 31, 37, 47, 55,
    30, 40, 51, 45, 33, 48,
    44, 49, 39, 56, 34, 53,
    46, 42, 50, 36, 29, 32,
];

const SHIFT_SCHEDULE: [usize; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

#[rustfmt::skip]
const EBOX: [u8; 48] = [
    32, 1, 2, 3, 4, 5,
    4, 5, 6, 7, 8, 9,
    8, 9, 10, 11, 12, 13,
    12, 13, 14, 15, 16, 17,
    16, 17, 18, 19, 20, 21,
    20, 21, 22, 23, 24, 25,
    24, 25, 26, 27, 28, 29,
    28, 29, 30, 31, 32, 1,
];

#[rustfmt::skip]
const PBOX: [u8; 32] = [
    16, 7, 20, 21, 29, 12, 28, 17,
    1, 15, 23, 26, 5, 18, 31, 10,
    2, 8, 24, 14, 32, 27, 3, 9,
    19, 13, 30, 6, 22, 11, 4, 25,
];

#[rustfmt::skip]
const S_BOXES: [[u8; 64]; 8] = [
    [
        14,4,13,1,2,15,11,8,3,10,6,12,5,9,0,7,
        0,15,7,4,14,2,13,1,10,6,12,11,9,5,3,8,
        4,1,14,8,13,6,2,11,15,12,9,7,3,10,5,0,
        15,12,8,2,4,9,1,7,5,11,3,14,10,0,6,13,
    ],
    [
        15,1,8,14,6,11,3,4,9,7,2,13,12,0,5,10,
        3,13,4,7,15,2,8,14,12,0,1,10,6,9,11,5,
        0,14,7,11,10,4,13,1,5,8,12,6,9,3,2,15,
        13,8,10,1,3,15,4,2,11,6,7,12,0,5,14,9,
    ],
    [
        10,0,9,14,6,3,15,5,1,13,12,7,11,4,2,8,
        13,7,0,9,3,4,6,10,2,8,5,14,12,11,15,1,
        13,6,4,9,8,15,3,0,11,1,2,12,5,10,14,7,
        1,10,13,0,6,9,8,7,4,15,14,3,11,5,2,12,
    ],
    [
        7,13,14,3,0,6,9,10,1,2,8,5,11,12,4,15,
        13,8,11,5,6,15,0,3,4,7,2,12,1,10,14,9,
        10,6,9,0,12,11,7,13,15,1,3,14,5,2,8,4,
        3,15,0,6,10,1,13,8,9,4,5,11,12,7,2,14,
    ],
    [
        2,12,4,1,7,10,11,6,8,5,3,15,13,0,14,9,
        14,11,2,12,4,7,13,1,5,0,15,10,3,9,8,6,
        4,2,1,11,10,13,7,8,15,9,12,5,6,3,0,14,
        11,8,12,7,1,14,2,13,6,15,0,9,10,4,5,3,
    ],
    [
        12,1,10,15,9,2,6,8,0,13,3,4,14,7,5,11,
        10,15,4,2,7,12,9,5,6,1,13,14,0,11,3,8,
        9,14,15,5,2,8,12,3,7,0,4,10,1,13,11,6,
        4,3,2,12,9,5,15,10,11,14,1,7,6,0,8,13,
    ],
    [
        4,11,2,14,15,0,8,13,3,12,9,7,5,10,6,1,
        13,0,11,7,4,9,1,10,14,3,5,12,2,15,8,6,
        1,4,11,13,12,3,7,14,10,15,6,8,0,5,9,2,
        6,11,13,8,1,4,10,7,9,5,0,15,14,2,3,12,
    ],
    [
        13,2,8,4,6,15,11,1,10,9,3,14,5,0,12,7,
        1,15,13,8,10,3,7,4,12,5,6,11,0,14,9,2,
        7,11,4,1,9,12,14,2,0,6,10,13,15,3,5,8,
        2,1,14,7,4,10,8,13,15,12,9,0,3,5,6,11,
    ],
];

fn set_parity_odd(byte: u8) -> u8 {
    let cleared = byte & 0xFE;
    let ones = cleared.count_ones();
    if ones % 2 == 0 {
        cleared | 1
    } else {
        cleared
    }
}

/// Normalize a 7 or 8 byte raw key into the 8-byte form DES's `PC1`
/// table expects, regenerating parity bits per byte when 8 are given.
fn normalize_key(key: &[u8]) -> Result<[u8; 8], Error> {
    match key.len() {
        7 => {
            // Expand 56 bits (7 bytes) into 8 bytes of 7 bits + parity each.
            let mut out = [0u8; 8];
            let mut acc: u64 = 0;
            for &b in key {
                acc = (acc << 8) | b as u64;
            }
            for i in 0..8 {
                let chunk = ((acc >> (49 - i * 7)) & 0x7F) as u8;
                out[i] = set_parity_odd(chunk << 1);
            }
            Ok(out)
        }
        8 => {
            let mut out = [0u8; 8];
            out.copy_from_slice(key);
            for b in out.iter_mut() {
                *b = set_parity_odd(*b);
            }
            Ok(out)
        }
        n => Err(Error::InvalidArgument(format!(
            "DES key must be 7 or 8 bytes, got {n}"
        ))),
    }
}

struct DesKeyExpander;

impl KeyExpander for DesKeyExpander {
    fn round_key_len(&self) -> usize {
        6
    }

    fn expand(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let key = normalize_key(key)?;
        let permuted = permute(&key, &PC1);
        let (mut c, mut d) = split_28(&permuted);

        let mut round_keys = Vec::with_capacity(ROUNDS);
        for &shift in &SHIFT_SCHEDULE {
            c = rotate_left_bits(&c, 28, shift);
            d = rotate_left_bits(&d, 28, shift);
            let combined = join_28(&c, &d);
            round_keys.push(permute(&combined, &PC2));
        }
        Ok(round_keys)
    }
}

fn split_28(packed56: &[u8]) -> (Vec<u8>, Vec<u8>) {
    // packed56 is 7 bytes = 56 bits; split into two 28-bit halves, each
    // stored left-justified in 4 bytes (top 28 bits significant).
    let mut c = vec![0u8; 4];
    let mut d = vec![0u8; 4];
    for i in 0..28 {
        if crate::bits::get_bit(packed56, i) {
            crate::bits::set_bit(&mut c, i);
        }
    }
    for i in 0..28 {
        if crate::bits::get_bit(packed56, 28 + i) {
            crate::bits::set_bit(&mut d, i);
        }
    }
    (c, d)
}

fn join_28(c: &[u8], d: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; 7];
    for i in 0..28 {
        if crate::bits::get_bit(c, i) {
            crate::bits::set_bit(&mut out, i);
        }
    }
    for i in 0..28 {
        if crate::bits::get_bit(d, i) {
            crate::bits::set_bit(&mut out, 28 + i);
        }
    }
    out
}

struct DesRoundFunction;

impl RoundFunction for DesRoundFunction {
    fn half_block_len(&self) -> usize {
        4
    }

    fn apply(&self, half: &[u8], round_key: &[u8]) -> Vec<u8> {
        let expanded = permute(half, &EBOX);
        let mixed: Vec<u8> = expanded
            .iter()
            .zip(round_key.iter())
            .map(|(a, b)| a ^ b)
            .collect();

        let mut s_out = vec![0u8; 4];
        for (box_idx, sbox) in S_BOXES.iter().enumerate() {
            let bit0 = box_idx * 6;
            let bits: Vec<bool> = (0..6).map(|i| crate::bits::get_bit(&mixed, bit0 + i)).collect();
            let row = (bits[0] as usize) << 1 | bits[5] as usize;
            let col = (bits[1] as usize) << 3
                | (bits[2] as usize) << 2
                | (bits[3] as usize) << 1
                | bits[4] as usize;
            let value = sbox[row * 16 + col];
            for bit in 0..4 {
                if (value >> (3 - bit)) & 1 == 1 {
                    crate::bits::set_bit(&mut s_out, box_idx * 4 + bit);
                }
            }
        }

        permute(&s_out, &PBOX)
    }
}

/// The DES block cipher.
pub struct Des {
    round_keys: Vec<Vec<u8>>,
}

impl Des {
    pub const SUPPORTED_KEY_SIZES: [usize; 2] = [7, 8];

    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let round_keys = DesKeyExpander.expand(key)?;
        Ok(Self { round_keys })
    }

    /// The 16 expanded round keys (6 bytes each), exposed per-cipher since
    /// round-key shape differs across ciphers.
    pub fn round_keys(&self) -> &[Vec<u8>] {
        &self.round_keys
    }
}

impl BlockCipher for Des {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        ROUNDS
    }

    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(plaintext)?;
        let f = DesRoundFunction;
        let permuted = permute(plaintext, &IP);
        let ciphered = feistel::encrypt(&permuted, &self.round_keys, &f);
        Ok(permute(&ciphered, &FP))
    }

    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(ciphertext)?;
        let f = DesRoundFunction;
        let permuted = permute(ciphertext, &IP);
        let deciphered = feistel::decrypt(&permuted, &self.round_keys, &f);
        Ok(permute(&deciphered, &FP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_key_fixed_point() {
        // All-zero key bytes normalize to 0101010101010101, one of DES's
        // four canonical weak keys: E_K and D_K collapse to the same
        // involution, so encrypting and decrypting the same block must
        // produce the identical known ciphertext.
        let key = [0u8; 7];
        let des = Des::new(&key).unwrap();
        let block = [0u8; 8];
        let expected = hex::decode("8ca64de9c1b123a7").unwrap();
        let ct = des.encrypt_block(&block).unwrap();
        let pt = des.decrypt_block(&block).unwrap();
        assert_eq!(ct, expected);
        assert_eq!(pt, expected);
        assert_eq!(ct, pt);
        assert_eq!(des.round_keys().len(), 16);
        for rk in des.round_keys() {
            assert_eq!(rk.len(), 6);
        }
    }

    #[test]
    fn round_trip_random_block() {
        let key = b"SECRET7".as_slice();
        let des = Des::new(key).unwrap();
        let block = *b"ABCDEFGH";
        let ct = des.encrypt_block(&block).unwrap();
        let pt = des.decrypt_block(&ct).unwrap();
        assert_eq!(pt, block);
    }

    #[test]
    fn eight_byte_key_is_accepted_with_parity_fixup() {
        let key = *b"SECRET!!";
        let des = Des::new(&key).unwrap();
        let block = *b"ABCDEFGH";
        let ct = des.encrypt_block(&block).unwrap();
        assert_eq!(des.decrypt_block(&ct).unwrap(), block);
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(Des::new(&[0u8; 6]).is_err());
    }
}
