//! The cipher context: the mode-of-operation engine and the hard core of
//! this crate.
//!
//! Generic over `C: BlockCipher` rather than holding a trait object, so mode
//! dispatch monomorphizes per cipher and `Sync` is checked at compile time
//! for the parallel paths.

pub mod counter;
pub mod parallel;
pub mod state;
mod stream;

use rand::RngCore;
use zeroize::Zeroize;

use crate::cipher::BlockCipher;
use crate::error::Error;
use crate::mode::EncryptionMode;
use crate::padding::PaddingScheme;

use state::ModeState;

fn random_block(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

fn xor_into(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}

/// A block cipher bound to a mode of operation and padding scheme.
///
/// Owns its IV copy, zeroed on disposal; borrows the block cipher, which the
/// context never owns or disposes.
pub struct CipherContext<'a, C: BlockCipher> {
    cipher: &'a C,
    mode: EncryptionMode,
    padding: PaddingScheme,
    iv: Option<Vec<u8>>,
    disposed: bool,
}

impl<'a, C: BlockCipher> CipherContext<'a, C> {
    /// Build a context. `iv` is required (and must be `block_size` bytes)
    /// for every mode except CTR and RandomDelta, which derive their own
    /// starting state internally on each call.
    pub fn new(
        cipher: &'a C,
        mode: EncryptionMode,
        padding: PaddingScheme,
        iv: Option<Vec<u8>>,
    ) -> Result<Self, Error> {
        let block_size = cipher.block_size();
        if mode.needs_iv() {
            match &iv {
                Some(v) if v.len() == block_size => {}
                Some(v) => {
                    return Err(Error::InvalidArgument(format!(
                        "IV must be {block_size} bytes, got {}",
                        v.len()
                    )))
                }
                None => {
                    return Err(Error::InvalidArgument(format!(
                        "{mode:?} requires an IV"
                    )))
                }
            }
        }
        Ok(Self {
            cipher,
            mode,
            padding,
            iv,
            disposed: false,
        })
    }

    fn check_not_disposed(&self) -> Result<(), Error> {
        if self.disposed {
            Err(Error::UseAfterClose)
        } else {
            Ok(())
        }
    }

    fn build_initial_state(&self) -> Result<ModeState, Error> {
        let block_size = self.cipher.block_size();
        match self.mode {
            EncryptionMode::Ecb => Ok(ModeState::new(Vec::new())),
            EncryptionMode::Ctr => Ok(ModeState::new(random_block(block_size))),
            EncryptionMode::RandomDelta => {
                let random_data = random_block(block_size);
                let half = block_size / 2;
                let delta = random_data[half..].to_vec();
                Ok(ModeState::with_delta(random_data, delta))
            }
            _ => {
                let iv = self
                    .iv
                    .clone()
                    .ok_or_else(|| Error::InvalidArgument(format!("{:?} requires an IV", self.mode)))?;
                Ok(ModeState::new(iv))
            }
        }
    }

    fn state_from_prefix(&self, prefix: &[u8]) -> Result<ModeState, Error> {
        let block_size = self.cipher.block_size();
        match self.mode {
            EncryptionMode::Ctr => Ok(ModeState::new(self.cipher.decrypt_block(prefix)?)),
            EncryptionMode::RandomDelta => {
                let random_data = self.cipher.decrypt_block(prefix)?;
                let half = block_size / 2;
                let delta = random_data[half..].to_vec();
                Ok(ModeState::with_delta(random_data, delta))
            }
            _ => unreachable!("only CTR/RandomDelta carry a prefix block"),
        }
    }

    /// Encrypt a complete buffer. `data` must be non-empty.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_not_disposed()?;
        if data.is_empty() {
            return Err(Error::InvalidArgument("cannot encrypt empty input".into()));
        }

        let mut state = self.build_initial_state()?;
        let mut out = Vec::new();
        if self.mode.has_prefix_block() {
            out.extend(self.cipher.encrypt_block(&state.initial)?);
        }
        out.extend(process_chunk_encrypt(
            self.cipher,
            self.mode,
            self.padding,
            data,
            &mut state,
            true,
        )?);
        Ok(out)
    }

    /// Decrypt a complete buffer. `data` must be a positive multiple of
    /// `block_size` (plus one prefix block for CTR/RandomDelta).
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        self.check_not_disposed()?;
        let block_size = self.cipher.block_size();
        if data.is_empty() || data.len() % block_size != 0 {
            return Err(Error::InvalidArgument(
                "ciphertext must be a positive multiple of the block size".into(),
            ));
        }

        let (mut state, body) = if self.mode.has_prefix_block() {
            if data.len() < block_size {
                return Err(Error::InputTooShort);
            }
            let state = self.state_from_prefix(&data[..block_size])?;
            (state, &data[block_size..])
        } else {
            (self.build_initial_state()?, data)
        };

        if body.is_empty() {
            return Err(Error::InvalidArgument(
                "ciphertext contains only the prefix block".into(),
            ));
        }

        process_chunk_decrypt(self.cipher, self.mode, self.padding, body, &mut state, true)
    }

    /// Encrypt into a caller-provided buffer. Returns `-1` without copying
    /// if `out` is too small to hold the result.
    pub fn encrypt_into(&self, data: &[u8], out: &mut [u8]) -> Result<isize, Error> {
        let result = self.encrypt(data)?;
        if out.len() < result.len() {
            return Ok(-1);
        }
        out[..result.len()].copy_from_slice(&result);
        Ok(result.len() as isize)
    }

    /// Decrypt into a caller-provided buffer. Returns `-1` without copying
    /// if `out` is too small to hold the result.
    pub fn decrypt_into(&self, data: &[u8], out: &mut [u8]) -> Result<isize, Error> {
        let result = self.decrypt(data)?;
        if out.len() < result.len() {
            return Ok(-1);
        }
        out[..result.len()].copy_from_slice(&result);
        Ok(result.len() as isize)
    }

    /// Release the IV (zeroed) and mark the context unusable. Every public
    /// method fails with `UseAfterClose` afterward.
    pub fn dispose(&mut self) {
        if let Some(iv) = self.iv.as_mut() {
            iv.zeroize();
        }
        self.disposed = true;
    }
}

impl<C: BlockCipher> Drop for CipherContext<'_, C> {
    fn drop(&mut self) {
        if let Some(iv) = self.iv.as_mut() {
            iv.zeroize();
        }
    }
}

/// The single-chunk encrypt core shared by the buffer API and the
/// file-streaming loop. Padding is applied only
/// when `is_end`.
fn process_chunk_encrypt<C: BlockCipher>(
    cipher: &C,
    mode: EncryptionMode,
    padding: PaddingScheme,
    data: &[u8],
    state: &mut ModeState,
    is_end: bool,
) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    let padded = if is_end {
        padding.add(data, block_size)
    } else {
        data.to_vec()
    };
    if padded.len() % block_size != 0 {
        return Err(Error::InvalidArgument(
            "data is not block-aligned after padding".into(),
        ));
    }
    let num_blocks = padded.len() / block_size;
    let mut out = vec![0u8; padded.len()];

    match mode {
        EncryptionMode::Ecb => {
            parallel::dispatch_blocks(cipher, num_blocks, &mut out, block_size, |c, idx| {
                c.encrypt_block(&padded[idx * block_size..(idx + 1) * block_size])
                    .expect("block-aligned input")
            });
        }
        EncryptionMode::Cbc => {
            let mut prev = state.initial.clone();
            for i in 0..num_blocks {
                let block = &padded[i * block_size..(i + 1) * block_size];
                let c = cipher.encrypt_block(&xor_into(block, &prev))?;
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&c);
                prev = c;
            }
            state.initial = prev;
        }
        EncryptionMode::Pcbc => {
            let mut prev = state.initial.clone();
            for i in 0..num_blocks {
                let block = &padded[i * block_size..(i + 1) * block_size];
                let c = cipher.encrypt_block(&xor_into(block, &prev))?;
                let new_prev = xor_into(block, &c);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&c);
                prev = new_prev;
            }
            state.initial = prev;
        }
        EncryptionMode::Cfb => {
            let mut shift = state.initial.clone();
            for i in 0..num_blocks {
                let block = &padded[i * block_size..(i + 1) * block_size];
                let e = cipher.encrypt_block(&shift)?;
                let c = xor_into(block, &e);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&c);
                shift = c;
            }
            state.initial = shift;
        }
        EncryptionMode::Ofb => {
            let mut feedback = state.initial.clone();
            for i in 0..num_blocks {
                feedback = cipher.encrypt_block(&feedback)?;
                let block = &padded[i * block_size..(i + 1) * block_size];
                let c = xor_into(block, &feedback);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&c);
            }
            state.initial = feedback;
        }
        EncryptionMode::Ctr => {
            let base = state.initial.clone();
            parallel::dispatch_blocks(cipher, num_blocks, &mut out, block_size, |c, idx| {
                let mut ctr = base.clone();
                counter::add_scalar(&mut ctr, idx as u64);
                let keystream = c.encrypt_block(&ctr).expect("block-aligned counter");
                xor_into(&padded[idx * block_size..(idx + 1) * block_size], &keystream)
            });
            counter::add_scalar(&mut state.initial, num_blocks as u64);
        }
        EncryptionMode::RandomDelta => {
            let half = block_size / 2;
            let delta = state
                .delta
                .clone()
                .expect("RandomDelta state always carries a delta");
            let mut cur = state.initial.clone();
            for i in 0..num_blocks {
                let mut block = padded[i * block_size..(i + 1) * block_size].to_vec();
                for (b, s) in block.iter_mut().take(half).zip(cur.iter().take(half)) {
                    *b ^= s;
                }
                let c = cipher.encrypt_block(&block)?;
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&c);
                counter::add_vector(&mut cur, &delta);
            }
            state.initial = cur;
        }
    }

    Ok(out)
}

/// The single-chunk decrypt core; the mirror of `process_chunk_encrypt`.
/// Padding is stripped only when `is_end`.
fn process_chunk_decrypt<C: BlockCipher>(
    cipher: &C,
    mode: EncryptionMode,
    padding: PaddingScheme,
    data: &[u8],
    state: &mut ModeState,
    is_end: bool,
) -> Result<Vec<u8>, Error> {
    let block_size = cipher.block_size();
    if data.len() % block_size != 0 {
        return Err(Error::InvalidArgument(
            "ciphertext chunk is not block-aligned".into(),
        ));
    }
    let num_blocks = data.len() / block_size;
    let mut out = vec![0u8; data.len()];

    match mode {
        EncryptionMode::Ecb => {
            parallel::dispatch_blocks(cipher, num_blocks, &mut out, block_size, |c, idx| {
                c.decrypt_block(&data[idx * block_size..(idx + 1) * block_size])
                    .expect("block-aligned input")
            });
        }
        EncryptionMode::Cbc => {
            let mut prev = state.initial.clone();
            for i in 0..num_blocks {
                let block = &data[i * block_size..(i + 1) * block_size];
                let d = cipher.decrypt_block(block)?;
                let p = xor_into(&d, &prev);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&p);
                prev = block.to_vec();
            }
            state.initial = prev;
        }
        EncryptionMode::Pcbc => {
            let mut prev = state.initial.clone();
            for i in 0..num_blocks {
                let block = &data[i * block_size..(i + 1) * block_size];
                let d = cipher.decrypt_block(block)?;
                let p = xor_into(&d, &prev);
                let new_prev = xor_into(&p, block);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&p);
                prev = new_prev;
            }
            state.initial = prev;
        }
        EncryptionMode::Cfb => {
            let mut shift = state.initial.clone();
            for i in 0..num_blocks {
                let block = &data[i * block_size..(i + 1) * block_size];
                let e = cipher.encrypt_block(&shift)?;
                let p = xor_into(block, &e);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&p);
                shift = block.to_vec();
            }
            state.initial = shift;
        }
        EncryptionMode::Ofb => {
            let mut feedback = state.initial.clone();
            for i in 0..num_blocks {
                feedback = cipher.encrypt_block(&feedback)?;
                let block = &data[i * block_size..(i + 1) * block_size];
                let p = xor_into(block, &feedback);
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&p);
            }
            state.initial = feedback;
        }
        EncryptionMode::Ctr => {
            let base = state.initial.clone();
            parallel::dispatch_blocks(cipher, num_blocks, &mut out, block_size, |c, idx| {
                let mut ctr = base.clone();
                counter::add_scalar(&mut ctr, idx as u64);
                let keystream = c.encrypt_block(&ctr).expect("block-aligned counter");
                xor_into(&data[idx * block_size..(idx + 1) * block_size], &keystream)
            });
            counter::add_scalar(&mut state.initial, num_blocks as u64);
        }
        EncryptionMode::RandomDelta => {
            let half = block_size / 2;
            let delta = state
                .delta
                .clone()
                .expect("RandomDelta state always carries a delta");
            let mut cur = state.initial.clone();
            for i in 0..num_blocks {
                let block = &data[i * block_size..(i + 1) * block_size];
                let mut p = cipher.decrypt_block(block)?;
                for (b, s) in p.iter_mut().take(half).zip(cur.iter().take(half)) {
                    *b ^= s;
                }
                out[i * block_size..(i + 1) * block_size].copy_from_slice(&p);
                counter::add_vector(&mut cur, &delta);
            }
            state.initial = cur;
        }
    }

    if is_end {
        padding.remove(&out, block_size)
    } else {
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ciphers::Des;

    fn ctx<'a>(
        cipher: &'a Des,
        mode: EncryptionMode,
        iv: Option<Vec<u8>>,
    ) -> CipherContext<'a, Des> {
        CipherContext::new(cipher, mode, PaddingScheme::Pkcs7, iv).unwrap()
    }

    #[test]
    fn cbc_round_trip() {
        let des = Des::new(b"SECRET7").unwrap();
        let iv = vec![0x11u8; 8];
        let context = ctx(&des, EncryptionMode::Cbc, Some(iv));
        let plaintext = b"a message spanning several DES blocks of data";
        let ciphertext = context.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext.len() % 8, 0);
        let recovered = context.decrypt(&ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn ecb_block_independence() {
        let des = Des::new(b"SECRET7").unwrap();
        let context = ctx(&des, EncryptionMode::Ecb, None);
        let a = b"AAAAAAAABBBBBBBB";
        let b = b"BBBBBBBBAAAAAAAA";
        let ct_a = context.encrypt(a).unwrap();
        let ct_b = context.encrypt(b).unwrap();
        assert_eq!(&ct_a[0..8], &ct_b[8..16]);
        assert_eq!(&ct_a[8..16], &ct_b[0..8]);
    }

    #[test]
    fn cfb_and_ofb_round_trip() {
        let des = Des::new(b"SECRET7").unwrap();
        let iv = vec![0x22u8; 8];
        for mode in [EncryptionMode::Cfb, EncryptionMode::Ofb, EncryptionMode::Pcbc] {
            let context = ctx(&des, mode, Some(iv.clone()));
            let plaintext = b"stream-like chained mode data, several blocks long";
            let ciphertext = context.encrypt(plaintext).unwrap();
            let recovered = context.decrypt(&ciphertext).unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn ctr_round_trip_and_prefix_block() {
        let des = Des::new(b"SECRET7").unwrap();
        let context = ctx(&des, EncryptionMode::Ctr, None);
        let plaintext = b"counter mode data across a few blocks";
        let ciphertext = context.encrypt(plaintext).unwrap();
        // one extra block at the head carries E(nonce)
        let expected_len = 8 + padding_len(plaintext.len(), 8);
        assert_eq!(ciphertext.len(), expected_len);
        let recovered = context.decrypt(&ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn random_delta_round_trip_fresh_context() {
        let des = Des::new(b"SECRET7").unwrap();
        let encrypt_ctx = ctx(&des, EncryptionMode::RandomDelta, None);
        let plaintext = vec![0x5Au8; 1024];
        let ciphertext = encrypt_ctx.encrypt(&plaintext).unwrap();

        // A fresh context with no prior state still recovers the payload,
        // since the seed/delta travel inside the ciphertext's prefix block.
        let decrypt_ctx = ctx(&des, EncryptionMode::RandomDelta, None);
        let recovered = decrypt_ctx.decrypt(&ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn iv_mismatch_changes_ciphertext() {
        let des = Des::new(b"SECRET7").unwrap();
        let plaintext = b"identical plaintext, different IVs";
        let ctx_a = ctx(&des, EncryptionMode::Cbc, Some(vec![0x01u8; 8]));
        let ctx_b = ctx(&des, EncryptionMode::Cbc, Some(vec![0x02u8; 8]));
        assert_ne!(
            ctx_a.encrypt(plaintext).unwrap(),
            ctx_b.encrypt(plaintext).unwrap()
        );
    }

    #[test]
    fn dispose_blocks_further_use() {
        let des = Des::new(b"SECRET7").unwrap();
        let mut context = ctx(&des, EncryptionMode::Ecb, None);
        context.dispose();
        assert!(matches!(context.encrypt(b"ABCDEFGH"), Err(Error::UseAfterClose)));
    }

    #[test]
    fn missing_iv_for_chained_mode_is_rejected() {
        let des = Des::new(b"SECRET7").unwrap();
        assert!(CipherContext::new(&des, EncryptionMode::Cbc, PaddingScheme::Pkcs7, None).is_err());
    }

    fn padding_len(data_len: usize, block_size: usize) -> usize {
        let rem = data_len % block_size;
        if rem == 0 {
            0
        } else {
            block_size - rem
        }
    }
}
