//! Triple-DES: key split into three DES keys K1, K2, K3. Encrypt is
//! `E_K3(D_K2(E_K1(P)))`; decrypt is `D_K1(E_K2(D_K3(C)))`.

use crate::cipher::BlockCipher;
use crate::error::Error;

use super::des::Des;

const BLOCK_SIZE: usize = 8;

/// Triple-DES over three independent DES sub-keys (EDE construction).
pub struct TripleDes {
    k1: Des,
    k2: Des,
    k3: Des,
}

impl TripleDes {
    pub const SUPPORTED_KEY_SIZES: [usize; 2] = [21, 24];

    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let third = match key.len() {
            21 => 7,
            24 => 8,
            n => {
                return Err(Error::InvalidArgument(format!(
                    "Triple-DES key must be 21 or 24 bytes, got {n}"
                )))
            }
        };

        Ok(Self {
            k1: Des::new(&key[..third])?,
            k2: Des::new(&key[third..2 * third])?,
            k3: Des::new(&key[2 * third..3 * third])?,
        })
    }
}

impl BlockCipher for TripleDes {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        self.k1.rounds() * 3
    }

    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(plaintext)?;
        let step1 = self.k1.encrypt_block(plaintext)?;
        let step2 = self.k2.decrypt_block(&step1)?;
        self.k3.encrypt_block(&step2)
    }

    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_block_len(ciphertext)?;
        let step1 = self.k3.decrypt_block(ciphertext)?;
        let step2 = self.k2.encrypt_block(&step1)?;
        self.k1.decrypt_block(&step2)
    }
}
