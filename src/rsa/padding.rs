//! PKCS#1 v1.5 type-2 padding, modelled on `kaidokert-RSA`'s
//! `pkcs1v15_encrypt_pad` layout (`0x00 || 0x02 || non-zero random || 0x00
//! || payload`), built on `num-bigint-dig` rather than that crate's
//! `no_std` buffer-reuse style.

use rand::RngCore;

use crate::error::Error;

/// Pad `msg` (at most `k - 11` bytes) to exactly `k` bytes.
pub fn encrypt_pad(msg: &[u8], k: usize) -> Result<Vec<u8>, Error> {
    if msg.len() > k.saturating_sub(11) {
        return Err(Error::Rsa(format!(
            "message too long: {} bytes, max {} for a {k}-byte modulus",
            msg.len(),
            k - 11
        )));
    }

    let mut em = vec![0u8; k];
    em[1] = 2;
    let ps_len = k - msg.len() - 3;
    non_zero_random_bytes(&mut em[2..2 + ps_len]);
    em[2 + ps_len] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Recover the message from a padded block, validating the `0x00 || 0x02`
/// header and the zero separator.
pub fn decrypt_unpad(em: &[u8], k: usize) -> Result<Vec<u8>, Error> {
    if em.len() != k || k < 11 {
        return Err(Error::Rsa("PKCS#1 v1.5 block has the wrong length".into()));
    }
    if em[0] != 0 || em[1] != 2 {
        return Err(Error::Rsa("PKCS#1 v1.5 header mismatch".into()));
    }
    let Some(separator) = em[2..].iter().position(|&b| b == 0) else {
        return Err(Error::Rsa("PKCS#1 v1.5 separator not found".into()));
    };
    if separator < 8 {
        return Err(Error::Rsa("PKCS#1 v1.5 padding string too short".into()));
    }
    Ok(em[2 + separator + 1..].to_vec())
}

fn non_zero_random_bytes(data: &mut [u8]) {
    let mut rng = rand::rngs::OsRng;
    rng.fill_bytes(data);
    for byte in data.iter_mut() {
        while *byte == 0 {
            rng.fill_bytes(std::slice::from_mut(byte));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_and_unpad_round_trip() {
        let msg = b"a short RSA message";
        let k = 64;
        let em = encrypt_pad(msg, k).unwrap();
        assert_eq!(em.len(), k);
        assert_eq!(&em[..2], &[0x00, 0x02]);
        let recovered = decrypt_unpad(&em, k).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn rejects_oversized_message() {
        let k = 16;
        assert!(encrypt_pad(&vec![0u8; k], k).is_err());
    }

    #[test]
    fn padding_string_is_never_zero() {
        let msg = b"x";
        let em = encrypt_pad(msg, 32).unwrap();
        assert!(em[2..2 + 32 - msg.len() - 3].iter().all(|&b| b != 0));
    }
}
