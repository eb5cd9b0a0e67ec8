//! RC4: a stream cipher (`block_size` reported as `0`), keys 5-256 bytes.
//! KSA mixes a 256-byte identity permutation with the key; PRGA then
//! produces one keystream byte per call. Encryption and decryption are
//! the same XOR operation.

use crate::error::Error;

const MIN_KEY_LEN: usize = 5;
const MAX_KEY_LEN: usize = 256;

/// RC4 keystream generator and XOR-cipher.
pub struct Rc4 {
    s: [u8; 256],
    initial_s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        if key.len() < MIN_KEY_LEN || key.len() > MAX_KEY_LEN {
            return Err(Error::InvalidArgument(format!(
                "RC4 key must be {MIN_KEY_LEN}..={MAX_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }

        let mut s = [0u8; 256];
        for (idx, slot) in s.iter_mut().enumerate() {
            *slot = idx as u8;
        }

        let mut j = 0u8;
        for i in 0..256usize {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        Ok(Self {
            s,
            initial_s: s,
            i: 0,
            j: 0,
        })
    }

    /// Restore the permutation to its post-KSA snapshot and reset the
    /// `i`/`j` cursors, so the same key material can be reused to encrypt
    /// another independent stream.
    pub fn reset(&mut self) {
        self.s = self.initial_s;
        self.i = 0;
        self.j = 0;
    }

    fn next_keystream_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let idx = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[idx as usize]
    }

    /// Reported block size: RC4 is a stream cipher, so this is `0`.
    pub fn block_size(&self) -> usize {
        0
    }

    /// Encrypt (equivalently, decrypt) `data` against the current
    /// keystream position, consuming keystream bytes as it goes.
    pub fn apply_keystream(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|b| b ^ self.next_keystream_byte()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc6229_test_vector_1() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut rc4 = Rc4::new(&key).unwrap();
        let keystream = rc4.apply_keystream(&[0u8; 16]);
        assert_eq!(
            keystream,
            vec![
                0xB2, 0x39, 0x63, 0x05, 0xF0, 0x3D, 0xC0, 0x27, 0xCC, 0xC3, 0x52, 0x4A, 0x0A,
                0x11, 0x18, 0xA8,
            ]
        );
    }

    #[test]
    fn rfc6229_test_vector_2() {
        let key = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut rc4 = Rc4::new(&key).unwrap();
        let keystream = rc4.apply_keystream(&[0u8; 16]);
        assert_eq!(
            keystream,
            vec![
                0x29, 0x3F, 0x02, 0xD4, 0x7F, 0x37, 0xC9, 0xB6, 0x33, 0xF2, 0xAF, 0x52, 0x85,
                0xFE, 0xB4, 0x6B,
            ]
        );
    }

    #[test]
    fn encrypt_reset_decrypt_round_trips() {
        let key = b"1234567890123456";
        let plaintext = b"Hello World!!! This is a test message for RC4 algorithm.";

        let mut rc4 = Rc4::new(key).unwrap();
        let ciphertext = rc4.apply_keystream(plaintext);

        rc4.reset();
        let recovered = rc4.apply_keystream(&ciphertext);

        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn rejects_out_of_range_key_sizes() {
        assert!(Rc4::new(&[1u8; MIN_KEY_LEN - 1]).is_err());
        assert!(Rc4::new(&[1u8; MAX_KEY_LEN + 1]).is_err());
    }
}
