//! RSA key generation: two probable primes, fixed public exponent,
//! extended-Euclidean private exponent.

use num_bigint_dig::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed};
use rand::thread_rng;

use crate::error::Error;

use super::primality::is_probable_prime;

/// Fixed public exponent, the near-universal RSA default.
pub const PUBLIC_EXPONENT: u32 = 65537;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigUint,
    pub d: BigUint,
}

impl RsaPublicKey {
    /// `k = ceil(bit_length(n) / 8)`, the modulus size in bytes.
    pub fn byte_len(&self) -> usize {
        self.n.bits().div_ceil(8)
    }
}

impl RsaPrivateKey {
    pub fn byte_len(&self) -> usize {
        self.n.bits().div_ceil(8)
    }
}

fn random_prime(bits: usize) -> BigUint {
    let mut rng = thread_rng();
    // Force the top bit (fixes the candidate's bit length) and oddness.
    let top_bit = BigUint::one() << (bits - 1);
    loop {
        let mut candidate = rng.gen_biguint(bits as u64);
        candidate |= &top_bit;
        candidate |= BigUint::one();
        if is_probable_prime(&candidate, &mut rng) {
            return candidate;
        }
    }
}

/// `a^-1 mod m` via the extended Euclidean algorithm over signed integers.
fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a_signed = BigInt::from_biguint(Sign::Plus, a.clone());
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let egcd = a_signed.extended_gcd(&m_signed);
    if egcd.gcd != BigInt::one() {
        return None;
    }
    let mut x = egcd.x % &m_signed;
    if x.is_negative() {
        x += &m_signed;
    }
    x.to_biguint()
}

/// Generate an RSA key pair with an `n` of approximately `bits` bits.
pub fn generate_key_pair(bits: usize) -> Result<(RsaPublicKey, RsaPrivateKey), Error> {
    if bits < 16 {
        return Err(Error::Rsa("key size must be at least 16 bits".into()));
    }
    let half = bits / 2;
    let e = BigUint::from(PUBLIC_EXPONENT);
    log::info!("generating RSA key pair, ~{bits} bits");

    loop {
        let p = random_prime(half);
        let q = random_prime(bits - half);
        if p == q {
            continue;
        }

        let n = &p * &q;
        let one = BigUint::one();
        let phi = (&p - &one) * (&q - &one);

        let Some(d) = mod_inverse(&e, &phi) else {
            continue;
        };

        return Ok((
            RsaPublicKey { n: n.clone(), e },
            RsaPrivateKey { n, d },
        ));
    }
}
