//! FROG: a 16-byte-block cipher whose "round keys" are full byte-substitution
//! tables, derived by shuffling an identity permutation with bytes drawn
//! from an XOR-chained expansion of the user key.

use crate::cipher::BlockCipher;
use crate::error::Error;

const BLOCK_SIZE: usize = 16;
const ROUNDS: usize = 8;
const INTERNAL_KEY_LEN: usize = 2304;
const MIN_KEY_LEN: usize = 5;
const MAX_KEY_LEN: usize = 125;

struct RoundKey {
    xor_key: [u8; BLOCK_SIZE],
    sbox: [u8; 256],
    inv_sbox: [u8; 256],
}

/// Expand the user key into the 2304-byte XOR-chained buffer FROG's key
/// schedule builds before deriving each round's substitution table.
fn build_internal_buffer(key: &[u8]) -> [u8; INTERNAL_KEY_LEN] {
    let mut buf = [0u8; INTERNAL_KEY_LEN];
    for (i, slot) in buf.iter_mut().enumerate() {
        *slot = key[i % key.len()];
    }
    let mut last = 0u8;
    for slot in buf.iter_mut() {
        *slot ^= last;
        last = *slot;
    }
    buf
}

fn build_round_keys(key: &[u8]) -> Vec<RoundKey> {
    let buf = build_internal_buffer(key);
    let mut cursor = 0usize;
    let mut next_byte = || {
        let b = buf[cursor % INTERNAL_KEY_LEN];
        cursor += 1;
        b
    };

    let mut rounds = Vec::with_capacity(ROUNDS);
    for _ in 0..ROUNDS {
        let mut xor_key = [0u8; BLOCK_SIZE];
        for slot in xor_key.iter_mut() {
            *slot = next_byte();
        }

        let mut sbox = [0u8; 256];
        for (i, slot) in sbox.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..256usize).rev() {
            let j = next_byte() as usize % (i + 1);
            sbox.swap(i, j);
        }

        let mut inv_sbox = [0u8; 256];
        for (i, &v) in sbox.iter().enumerate() {
            inv_sbox[v as usize] = i as u8;
        }

        rounds.push(RoundKey {
            xor_key,
            sbox,
            inv_sbox,
        });
    }
    rounds
}

fn diffuse_forward(block: &mut [u8; BLOCK_SIZE]) {
    for i in 0..BLOCK_SIZE - 1 {
        block[i + 1] ^= block[i];
    }
    block[0] ^= block[BLOCK_SIZE - 1];
}

fn diffuse_inverse(block: &mut [u8; BLOCK_SIZE]) {
    block[0] ^= block[BLOCK_SIZE - 1];
    for i in (0..BLOCK_SIZE - 1).rev() {
        block[i + 1] ^= block[i];
    }
}

/// The FROG block cipher: 16-byte blocks, 5..=125 byte keys, 8 rounds.
pub struct Frog {
    rounds: Vec<RoundKey>,
}

impl Frog {
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        if key.len() < MIN_KEY_LEN || key.len() > MAX_KEY_LEN {
            return Err(Error::InvalidArgument(format!(
                "FROG key must be {MIN_KEY_LEN}..={MAX_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        Ok(Self {
            rounds: build_round_keys(key),
        })
    }
}

impl BlockCipher for Frog {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        ROUNDS
    }

    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(plaintext)?;
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(plaintext);

        for round in &self.rounds {
            for (b, k) in block.iter_mut().zip(round.xor_key.iter()) {
                *b ^= k;
            }
            for b in block.iter_mut() {
                *b = round.sbox[*b as usize];
            }
            diffuse_forward(&mut block);
        }
        Ok(block.to_vec())
    }

    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(ciphertext)?;
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(ciphertext);

        for round in self.rounds.iter().rev() {
            diffuse_inverse(&mut block);
            for b in block.iter_mut() {
                *b = round.inv_sbox[*b as usize];
            }
            for (b, k) in block.iter_mut().zip(round.xor_key.iter()) {
                *b ^= k;
            }
        }
        Ok(block.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = b"a reasonably long FROG test key";
        let cipher = Frog::new(key).unwrap();
        let block = *b"0123456789ABCDEF";
        let ct = cipher.encrypt_block(&block).unwrap();
        let pt = cipher.decrypt_block(&ct).unwrap();
        assert_eq!(pt, block);
    }

    #[test]
    fn accepts_boundary_key_sizes() {
        assert!(Frog::new(&[1u8; MIN_KEY_LEN]).is_ok());
        assert!(Frog::new(&[1u8; MAX_KEY_LEN]).is_ok());
    }

    #[test]
    fn rejects_out_of_range_key_sizes() {
        assert!(Frog::new(&[1u8; MIN_KEY_LEN - 1]).is_err());
        assert!(Frog::new(&[1u8; MAX_KEY_LEN + 1]).is_err());
    }

    #[test]
    fn round_structures_have_expected_shape() {
        let key = [7u8; 32];
        let rounds = build_round_keys(&key);
        assert_eq!(rounds.len(), ROUNDS);
        for round in &rounds {
            assert_eq!(round.xor_key.len(), 16);
            assert_eq!(round.sbox.len(), 256);
            // sbox/inv_sbox must be mutual inverses.
            for (i, &v) in round.sbox.iter().enumerate() {
                assert_eq!(round.inv_sbox[v as usize], i as u8);
            }
        }
    }
}
