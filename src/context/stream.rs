//! File-streaming state machine: drives fixed-size chunks through
//! the same single-chunk core the buffer API uses, carrying `ModeState` by
//! value between iterations instead of storing it on the context.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::cipher::BlockCipher;
use crate::error::Error;

use super::{process_chunk_decrypt, process_chunk_encrypt, CipherContext};

/// Read until `buf` is full or the stream is exhausted, returning the
/// number of bytes actually read (may be less than `buf.len()` only at
/// end of stream).
fn read_fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = reader.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

impl<C: BlockCipher> CipherContext<'_, C> {
    /// Stream-encrypt `in_path` into `out_path` in `chunk_size`-byte pieces.
    /// `chunk_size` must be a positive multiple of the cipher's block size.
    pub fn encrypt_file<P: AsRef<Path>>(
        &self,
        in_path: P,
        out_path: P,
        chunk_size: usize,
    ) -> Result<(), Error> {
        self.check_not_disposed()?;
        let block_size = self.cipher.block_size();
        if chunk_size == 0 || chunk_size % block_size != 0 {
            return Err(Error::InvalidArgument(format!(
                "chunk_size must be a positive multiple of {block_size}, got {chunk_size}"
            )));
        }

        log::debug!("streaming encrypt: mode={:?}, chunk_size={chunk_size}", self.mode);

        let mut reader = BufReader::new(File::open(in_path)?);
        let mut writer = BufWriter::new(File::create(out_path)?);

        let mut state = self.build_initial_state()?;
        if self.mode.has_prefix_block() {
            let prefix = self.cipher.encrypt_block(&state.initial)?;
            writer.write_all(&prefix)?;
        }

        let mut buf = vec![0u8; chunk_size];
        loop {
            let read = read_fill(&mut reader, &mut buf)?;
            let chunk = &buf[..read];
            let is_end = read < chunk_size;

            let out = process_chunk_encrypt(
                self.cipher,
                self.mode,
                self.padding,
                chunk,
                &mut state,
                is_end,
            )?;
            writer.write_all(&out)?;

            if is_end {
                break;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Stream-decrypt `in_path` into `out_path` in `chunk_size`-byte pieces.
    pub fn decrypt_file<P: AsRef<Path>>(
        &self,
        in_path: P,
        out_path: P,
        chunk_size: usize,
    ) -> Result<(), Error> {
        self.check_not_disposed()?;
        let block_size = self.cipher.block_size();
        if chunk_size == 0 || chunk_size % block_size != 0 {
            return Err(Error::InvalidArgument(format!(
                "chunk_size must be a positive multiple of {block_size}, got {chunk_size}"
            )));
        }

        let mut reader = BufReader::new(File::open(in_path)?);
        let mut writer = BufWriter::new(File::create(out_path)?);

        let mut state = if self.mode.has_prefix_block() {
            let mut prefix = vec![0u8; block_size];
            let read = read_fill(&mut reader, &mut prefix)?;
            if read < block_size {
                return Err(Error::InputTooShort);
            }
            self.state_from_prefix(&prefix)?
        } else {
            self.build_initial_state()?
        };

        let mut buf = vec![0u8; chunk_size];
        loop {
            let read = read_fill(&mut reader, &mut buf)?;
            let chunk = &buf[..read];
            let is_end = read < chunk_size;

            let out = process_chunk_decrypt(
                self.cipher,
                self.mode,
                self.padding,
                chunk,
                &mut state,
                is_end,
            )?;
            writer.write_all(&out)?;

            if is_end {
                break;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
