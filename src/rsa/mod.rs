//! RSA public-key encryption: key generation, PKCS#1 v1.5 chunked
//! encrypt/decrypt over buffers and files. A self-contained collaborator
//! built on big-integer arithmetic rather than the block-cipher cores.

mod keygen;
mod padding;
pub mod primality;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use keygen::{generate_key_pair, RsaPrivateKey, RsaPublicKey};

use crate::error::Error;

/// Buffer capacity for file-streaming RSA I/O.
const IO_BUFFER_SIZE: usize = 81_920;

/// Encrypt `data`, chunked into `k - 11`-byte blocks, each PKCS#1 v1.5
/// padded to `k` bytes before modular exponentiation.
pub fn encrypt(data: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, Error> {
    let k = key.byte_len();
    let chunk_len = k.saturating_sub(11);
    if chunk_len == 0 {
        return Err(Error::Rsa("modulus too small to carry any payload".into()));
    }

    let mut out = Vec::with_capacity(data.len().div_ceil(chunk_len) * k);
    for chunk in data.chunks(chunk_len) {
        out.extend(encrypt_block(chunk, key)?);
    }
    Ok(out)
}

fn encrypt_block(chunk: &[u8], key: &RsaPublicKey) -> Result<Vec<u8>, Error> {
    let k = key.byte_len();
    let em = padding::encrypt_pad(chunk, k)?;
    let m = num_bigint_dig::BigUint::from_bytes_be(&em);
    let c = m.modpow(&key.e, &key.n);
    Ok(left_pad(&c.to_bytes_be(), k))
}

/// Decrypt `data`, a concatenation of `k`-byte RSA blocks.
pub fn decrypt(data: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, Error> {
    let k = key.byte_len();
    if data.is_empty() || data.len() % k != 0 {
        return Err(Error::Rsa(format!(
            "ciphertext length {} is not a multiple of the {k}-byte modulus size",
            data.len()
        )));
    }

    let mut out = Vec::new();
    for block in data.chunks(k) {
        out.extend(decrypt_block(block, key)?);
    }
    Ok(out)
}

fn decrypt_block(block: &[u8], key: &RsaPrivateKey) -> Result<Vec<u8>, Error> {
    let k = key.byte_len();
    let c = num_bigint_dig::BigUint::from_bytes_be(block);
    let m = c.modpow(&key.d, &key.n);
    let em = left_pad(&m.to_bytes_be(), k);
    padding::decrypt_unpad(&em, k)
}

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}

/// Stream-encrypt `in_path` into `out_path`, one `k - 11`-byte input chunk
/// producing one `k`-byte output block, through an 81,920-byte I/O buffer.
pub fn encrypt_file<P: AsRef<Path>>(in_path: P, out_path: P, key: &RsaPublicKey) -> Result<(), Error> {
    let k = key.byte_len();
    let chunk_len = k.saturating_sub(11);
    let mut reader = BufReader::with_capacity(IO_BUFFER_SIZE, File::open(in_path)?);
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, File::create(out_path)?);

    let mut buf = vec![0u8; chunk_len];
    loop {
        let read = read_fill(&mut reader, &mut buf)?;
        if read == 0 {
            break;
        }
        let block = encrypt_block(&buf[..read], key)?;
        writer.write_all(&block)?;
        if read < chunk_len {
            break;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Stream-decrypt `in_path` into `out_path`, one `k`-byte input block
/// producing one variable-length output chunk.
pub fn decrypt_file<P: AsRef<Path>>(in_path: P, out_path: P, key: &RsaPrivateKey) -> Result<(), Error> {
    let k = key.byte_len();
    let mut reader = BufReader::with_capacity(IO_BUFFER_SIZE, File::open(in_path)?);
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, File::create(out_path)?);

    let mut buf = vec![0u8; k];
    loop {
        let read = read_fill(&mut reader, &mut buf)?;
        if read == 0 {
            break;
        }
        if read != k {
            return Err(Error::InputTooShort);
        }
        let chunk = decrypt_block(&buf, key)?;
        writer.write_all(&chunk)?;
    }
    writer.flush()?;
    Ok(())
}

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_short_message() {
        let (public, private) = generate_key_pair(512).unwrap();
        let message = b"the quick brown fox";
        let ciphertext = encrypt(message, &public).unwrap();
        let recovered = decrypt(&ciphertext, &private).unwrap();
        assert_eq!(recovered, message);
    }

    #[test]
    fn round_trip_multi_block_message() {
        let (public, private) = generate_key_pair(512).unwrap();
        let message = vec![0xABu8; 200];
        let ciphertext = encrypt(&message, &public).unwrap();
        assert_eq!(ciphertext.len() % public.byte_len(), 0);
        let recovered = decrypt(&ciphertext, &private).unwrap();
        assert_eq!(recovered, message);
    }
}
