//! The Feistel scaffold: drives any (key-expander, round-function) pair
//! for N rounds over half-blocks, used by [`crate::ciphers::des`],
//! [`crate::ciphers::deal`], and (degenerately, N=1) the whole-key wrap in
//! [`crate::ciphers::triple_des`].

use crate::error::Error;

/// Produces round keys from a master key.
pub trait KeyExpander {
    /// Expand `key` into one round key per round.
    fn expand(&self, key: &[u8]) -> Result<Vec<Vec<u8>>, Error>;

    /// Byte length of each round key this expander produces.
    fn round_key_len(&self) -> usize;
}

/// The per-round mixing function `F(half_block, round_key) -> half_block`.
pub trait RoundFunction {
    /// Byte length of the half-block this function operates on.
    fn half_block_len(&self) -> usize;

    /// Mix `half` under `round_key`, producing a new half-block of the
    /// same length.
    fn apply(&self, half: &[u8], round_key: &[u8]) -> Vec<u8>;
}

/// Encrypt one full block via the canonical Feistel recurrence:
///
/// ```text
/// (L, R) <- (high_half, low_half)
/// for r in 0..rounds:
///     T <- F(R, round_key[r])
///     L, R <- R, L XOR T
/// output = concat(R, L)   # note the final swap
/// ```
pub fn encrypt(block: &[u8], round_keys: &[Vec<u8>], f: &dyn RoundFunction) -> Vec<u8> {
    let half = f.half_block_len();
    let (mut l, mut r) = (block[..half].to_vec(), block[half..].to_vec());

    for round_key in round_keys {
        let t = f.apply(&r, round_key);
        let new_r = xor(&l, &t);
        l = r;
        r = new_r;
    }

    // Final swap: ciphertext is (R, L), not (L, R).
    let mut out = r;
    out.extend_from_slice(&l);
    out
}

/// Decrypt one full block: same recurrence, round keys consumed in
/// reverse order, same final-swap convention.
pub fn decrypt(block: &[u8], round_keys: &[Vec<u8>], f: &dyn RoundFunction) -> Vec<u8> {
    let reversed: Vec<Vec<u8>> = round_keys.iter().rev().cloned().collect();
    encrypt(block, &reversed, f)
}

fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct IdentityRound;
    impl RoundFunction for IdentityRound {
        fn half_block_len(&self) -> usize {
            4
        }
        fn apply(&self, half: &[u8], round_key: &[u8]) -> Vec<u8> {
            xor(half, round_key)
        }
    }

    #[test]
    fn feistel_is_self_inverse_with_identity_round_fn() {
        let f = IdentityRound;
        let round_keys: Vec<Vec<u8>> = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 9, 9, 9]];
        let block = [0xAAu8, 0xBB, 0xCC, 0xDD, 0x11, 0x22, 0x33, 0x44];

        let ct = encrypt(&block, &round_keys, &f);
        let pt = decrypt(&ct, &round_keys, &f);
        assert_eq!(pt, block);
    }
}
