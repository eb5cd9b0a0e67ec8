//! The block-cipher capability consumed by the cipher context.
//!
//! Concrete ciphers construct already-initialized: there is no separate
//! `initialize` step or `is_initialized` flag — a value of a type
//! implementing `BlockCipher` is, by construction, ready to encrypt and
//! decrypt.

use crate::error::Error;

/// A block cipher ready to encrypt/decrypt fixed-size blocks.
///
/// Implementors must be safe to call from multiple threads once
/// constructed — the cipher context's parallel dispatch paths (ECB, CTR,
/// and whole-buffer Triple-DES/Rijndael/DEAL) require `Sync`.
pub trait BlockCipher: Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Number of rounds this instance was configured with.
    fn rounds(&self) -> usize;

    /// Encrypt exactly one block. `plaintext.len()` must equal
    /// `block_size()`.
    fn encrypt_block(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Decrypt exactly one block. `ciphertext.len()` must equal
    /// `block_size()`.
    fn decrypt_block(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Validate a block has the expected length before dispatching to
    /// `encrypt_block`/`decrypt_block`. Shared helper so every cipher
    /// reports the same `Error` shape.
    fn check_block_len(&self, block: &[u8]) -> Result<(), Error> {
        if block.len() != self.block_size() {
            return Err(Error::InvalidArgument(format!(
                "expected a {}-byte block, got {}",
                self.block_size(),
                block.len()
            )));
        }
        Ok(())
    }
}
