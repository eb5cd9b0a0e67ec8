//! DEAL: a 16-byte-block Feistel cipher whose round function is DES itself,
//! keyed per round by an 8-byte subkey derived from an XOR-feedback chain
//! over the user key, built on the [`crate::feistel`] scaffold.

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::feistel::{self, KeyExpander, RoundFunction};

use super::des::Des;

const BLOCK_SIZE: usize = 16;
const SEGMENT_LEN: usize = 8;
const BASE_KEY: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF];

fn rounds_for_key_len(len: usize) -> Result<usize, Error> {
    match len {
        16 | 24 => Ok(6),
        32 => Ok(8),
        n => Err(Error::InvalidArgument(format!(
            "DEAL key must be 16, 24, or 32 bytes, got {n}"
        ))),
    }
}

struct DealKeyExpander;

impl KeyExpander for DealKeyExpander {
    fn round_key_len(&self) -> usize {
        SEGMENT_LEN
    }

    fn expand(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let rounds = rounds_for_key_len(key.len())?;
        let segments: Vec<&[u8]> = key.chunks(SEGMENT_LEN).collect();
        let base_cipher = Des::new(&BASE_KEY)?;

        let mut accumulator = [0u8; SEGMENT_LEN];
        let mut round_keys = Vec::with_capacity(rounds);

        for round in 0..rounds {
            let segment = segments[round % segments.len()];
            for (acc_byte, seg_byte) in accumulator.iter_mut().zip(segment) {
                *acc_byte ^= seg_byte;
            }
            if (round + 1) % segments.len() == 0 {
                // Rotating constant injected once per pass over all segments.
                let constant = (round / segments.len()) as u8 + 1;
                accumulator[SEGMENT_LEN - 1] ^= constant;
            }
            let encrypted = base_cipher.encrypt_block(&accumulator)?;
            accumulator.copy_from_slice(&encrypted);
            round_keys.push(accumulator.to_vec());
        }

        Ok(round_keys)
    }
}

struct DealRoundFunction;

impl RoundFunction for DealRoundFunction {
    fn half_block_len(&self) -> usize {
        SEGMENT_LEN
    }

    fn apply(&self, half: &[u8], round_key: &[u8]) -> Vec<u8> {
        // `round_key` is always exactly 8 bytes (one DES key), produced by
        // `DealKeyExpander` above, so this construction cannot fail.
        let des = Des::new(round_key).expect("DEAL round keys are valid DES keys");
        des.encrypt_block(half)
            .expect("DEAL half-blocks are valid DES blocks")
    }
}

/// The DEAL block cipher (16-byte blocks, DES as its own round function).
pub struct Deal {
    round_keys: Vec<Vec<u8>>,
    rounds: usize,
}

impl Deal {
    pub const SUPPORTED_KEY_SIZES: [usize; 3] = [16, 24, 32];

    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let rounds = rounds_for_key_len(key.len())?;
        let round_keys = DealKeyExpander.expand(key)?;
        Ok(Self { round_keys, rounds })
    }
}

impl BlockCipher for Deal {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        self.rounds
    }

    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(plaintext)?;
        let f = DealRoundFunction;
        Ok(feistel::encrypt(plaintext, &self.round_keys, &f))
    }

    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(ciphertext)?;
        let f = DealRoundFunction;
        Ok(feistel::decrypt(ciphertext, &self.round_keys, &f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_128_bit_key() {
        let key = [0x42u8; 16];
        let cipher = Deal::new(&key).unwrap();
        let block = *b"ABCDEFGHIJKLMNOP";
        let ct = cipher.encrypt_block(&block).unwrap();
        let pt = cipher.decrypt_block(&ct).unwrap();
        assert_eq!(pt, block);
        assert_eq!(cipher.rounds(), 6);
    }

    #[test]
    fn round_trip_256_bit_key_has_eight_rounds() {
        let key = [0x7Eu8; 32];
        let cipher = Deal::new(&key).unwrap();
        assert_eq!(cipher.rounds(), 8);
        let block = *b"0123456789ABCDEF";
        let ct = cipher.encrypt_block(&block).unwrap();
        assert_eq!(cipher.decrypt_block(&ct).unwrap(), block);
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(Deal::new(&[0u8; 20]).is_err());
    }
}
