//! Rijndael, parameterized over block size and key size (16/24/32 bytes
//! each) and over the GF(2^8) reduction polynomial used to derive the
//! S-box and `MixColumns` (default `0x1B`, AES's own polynomial).

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::gf256::Gf256;

const AFFINE_CONST: u8 = 0x63;
const VALID_SIZES: [usize; 3] = [16, 24, 32];

fn rotl8(b: u8, n: u32) -> u8 {
    (b << n) | (b >> (8 - n))
}

fn build_sbox(gf: Gf256) -> ([u8; 256], [u8; 256]) {
    let mut sbox = [0u8; 256];
    for (a, slot) in sbox.iter_mut().enumerate() {
        let inv = gf.inverse(a as u8);
        let affine = inv
            ^ rotl8(inv, 1)
            ^ rotl8(inv, 2)
            ^ rotl8(inv, 3)
            ^ rotl8(inv, 4)
            ^ AFFINE_CONST;
        *slot = affine;
    }
    let mut inv_sbox = [0u8; 256];
    for (i, &v) in sbox.iter().enumerate() {
        inv_sbox[v as usize] = i as u8;
    }
    (sbox, inv_sbox)
}

fn rcon(gf: Gf256, i: usize) -> u8 {
    // Rcon[1] = 1, Rcon[i] = 2 * Rcon[i-1] in this field.
    let mut value = 1u8;
    for _ in 1..i {
        value = gf.mul(value, 2);
    }
    value
}

fn sub_word(word: [u8; 4], sbox: &[u8; 256]) -> [u8; 4] {
    [
        sbox[word[0] as usize],
        sbox[word[1] as usize],
        sbox[word[2] as usize],
        sbox[word[3] as usize],
    ]
}

fn rot_word(word: [u8; 4]) -> [u8; 4] {
    [word[1], word[2], word[3], word[0]]
}

fn xor_word(a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

fn expand_key(key: &[u8], nb: usize, nk: usize, nr: usize, sbox: &[u8; 256], gf: Gf256) -> Vec<[u8; 4]> {
    let total_words = nb * (nr + 1);
    let mut words = Vec::with_capacity(total_words);

    for chunk in key.chunks(4) {
        words.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let mut i = nk;
    while words.len() < total_words {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp = xor_word(sub_word(rot_word(temp), sbox), [rcon(gf, i / nk), 0, 0, 0]);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp, sbox);
        }
        let new_word = xor_word(words[i - nk], temp);
        words.push(new_word);
        i += 1;
    }

    words
}

fn shift_amounts(nb: usize) -> [usize; 4] {
    if nb < 8 {
        [0, 1, 2, 3]
    } else {
        [0, 1, 3, 4]
    }
}

fn shift_rows(state: &mut [u8], nb: usize, inverse: bool) {
    let shifts = shift_amounts(nb);
    for row in 1..4 {
        let shift = if inverse {
            (nb - shifts[row] % nb) % nb
        } else {
            shifts[row]
        };
        let mut row_bytes: Vec<u8> = (0..nb).map(|col| state[col * 4 + row]).collect();
        row_bytes.rotate_left(shift);
        for (col, &b) in row_bytes.iter().enumerate() {
            state[col * 4 + row] = b;
        }
    }
}

fn mix_columns(state: &mut [u8], nb: usize, gf: Gf256, inverse: bool) {
    let c: [u8; 4] = if inverse {
        [0x0E, 0x0B, 0x0D, 0x09]
    } else {
        [0x02, 0x03, 0x01, 0x01]
    };
    for col in 0..nb {
        let s: [u8; 4] = [
            state[col * 4],
            state[col * 4 + 1],
            state[col * 4 + 2],
            state[col * 4 + 3],
        ];
        for row in 0..4 {
            let mut acc = 0u8;
            for k in 0..4 {
                acc ^= gf.mul(c[(4 + k - row) % 4], s[k]);
            }
            state[col * 4 + row] = acc;
        }
    }
}

fn sub_bytes(state: &mut [u8], sbox: &[u8; 256]) {
    for b in state.iter_mut() {
        *b = sbox[*b as usize];
    }
}

fn add_round_key(state: &mut [u8], round_key: &[[u8; 4]]) {
    for (col, word) in round_key.iter().enumerate() {
        for row in 0..4 {
            state[col * 4 + row] ^= word[row];
        }
    }
}

/// Parametric Rijndael over `block_size`/`key_size` in `{16, 24, 32}`
/// bytes, with a caller-chosen GF(2^8) reduction polynomial.
pub struct Rijndael {
    block_size: usize,
    nb: usize,
    nr: usize,
    sbox: [u8; 256],
    inv_sbox: [u8; 256],
    round_keys: Vec<[u8; 4]>,
    gf: Gf256,
}

impl Rijndael {
    pub const DEFAULT_POLY: u8 = 0x1B;

    pub fn new(key: &[u8], block_size: usize) -> Result<Self, Error> {
        Self::with_polynomial(key, block_size, Self::DEFAULT_POLY)
    }

    pub fn with_polynomial(key: &[u8], block_size: usize, poly: u8) -> Result<Self, Error> {
        if !VALID_SIZES.contains(&block_size) {
            return Err(Error::InvalidArgument(format!(
                "Rijndael block size must be one of {VALID_SIZES:?}, got {block_size}"
            )));
        }
        if !VALID_SIZES.contains(&key.len()) {
            return Err(Error::InvalidArgument(format!(
                "Rijndael key size must be one of {VALID_SIZES:?}, got {}",
                key.len()
            )));
        }

        let nb = block_size / 4;
        let nk = key.len() / 4;
        let nr = nb.max(nk) + 6;
        let gf = Gf256::new(poly);
        let (sbox, inv_sbox) = build_sbox(gf);
        let round_keys = expand_key(key, nb, nk, nr, &sbox, gf);

        Ok(Self {
            block_size,
            nb,
            nr,
            sbox,
            inv_sbox,
            round_keys,
            gf,
        })
    }

    pub fn round_key_words(&self) -> &[[u8; 4]] {
        &self.round_keys
    }
}

impl BlockCipher for Rijndael {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn rounds(&self) -> usize {
        self.nr
    }

    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(plaintext)?;
        let mut state = plaintext.to_vec();

        add_round_key(&mut state, &self.round_keys[0..self.nb]);
        for round in 1..self.nr {
            sub_bytes(&mut state, &self.sbox);
            shift_rows(&mut state, self.nb, false);
            mix_columns(&mut state, self.nb, self.gf, false);
            add_round_key(&mut state, &self.round_keys[round * self.nb..(round + 1) * self.nb]);
        }
        sub_bytes(&mut state, &self.sbox);
        shift_rows(&mut state, self.nb, false);
        add_round_key(&mut state, &self.round_keys[self.nr * self.nb..(self.nr + 1) * self.nb]);

        Ok(state)
    }

    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(ciphertext)?;
        let mut state = ciphertext.to_vec();

        add_round_key(&mut state, &self.round_keys[self.nr * self.nb..(self.nr + 1) * self.nb]);
        for round in (1..self.nr).rev() {
            shift_rows(&mut state, self.nb, true);
            sub_bytes(&mut state, &self.inv_sbox);
            add_round_key(&mut state, &self.round_keys[round * self.nb..(round + 1) * self.nb]);
            mix_columns(&mut state, self.nb, self.gf, true);
        }
        shift_rows(&mut state, self.nb, true);
        sub_bytes(&mut state, &self.inv_sbox);
        add_round_key(&mut state, &self.round_keys[0..self.nb]);

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_aes_128() {
        let key = [0u8; 16];
        let cipher = Rijndael::new(&key, 16).unwrap();
        let block = [0u8; 16];
        let ct = cipher.encrypt_block(&block).unwrap();
        let pt = cipher.decrypt_block(&ct).unwrap();
        assert_eq!(pt, block);
        assert_eq!(cipher.rounds(), 10);
        assert_eq!(cipher.round_key_words().len(), 44);
    }

    #[test]
    fn known_fips197_vector() {
        let key: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let plaintext: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected: [u8; 16] = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];
        let cipher = Rijndael::new(&key, 16).unwrap();
        let ct = cipher.encrypt_block(&plaintext).unwrap();
        assert_eq!(ct, expected);
        assert_eq!(cipher.decrypt_block(&ct).unwrap(), plaintext);
    }

    #[test]
    fn round_trip_192_and_256() {
        for (key_len, block_size, expected_rounds) in [(24, 16, 12), (32, 16, 14), (32, 32, 14)] {
            let key = vec![0x5Au8; key_len];
            let cipher = Rijndael::new(&key, block_size).unwrap();
            assert_eq!(cipher.rounds(), expected_rounds);
            let block = vec![0xA5u8; block_size];
            let ct = cipher.encrypt_block(&block).unwrap();
            assert_eq!(cipher.decrypt_block(&ct).unwrap(), block);
        }
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(Rijndael::new(&[0u8; 15], 16).is_err());
        assert!(Rijndael::new(&[0u8; 16], 20).is_err());
    }

    #[test]
    fn custom_polynomial_still_round_trips() {
        // Any irreducible polynomial works, not just AES's 0x1B.
        let key = [0x11u8; 16];
        let cipher = Rijndael::with_polynomial(&key, 16, 0x1B).unwrap();
        let block = [0x22u8; 16];
        let ct = cipher.encrypt_block(&block).unwrap();
        assert_eq!(cipher.decrypt_block(&ct).unwrap(), block);
    }
}
