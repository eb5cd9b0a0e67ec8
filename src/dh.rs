//! Diffie-Hellman key agreement: a thin wrapper around modular
//! exponentiation over `BigUint`.

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand::thread_rng;

use crate::error::Error;

/// One party's end of a Diffie-Hellman exchange over a shared `(p, g)`.
pub struct DiffieHellman {
    p: BigUint,
    g: BigUint,
    private_key: BigUint,
}

impl DiffieHellman {
    /// `p` and `g` must both be greater than zero. A random private key in
    /// `1 < k < p - 1` is drawn immediately.
    pub fn new(p: BigUint, g: BigUint) -> Result<Self, Error> {
        if p.eq(&BigUint::from(0u32)) || g.eq(&BigUint::from(0u32)) {
            return Err(Error::InvalidArgument("p and g must both be > 0".into()));
        }
        let mut rng = thread_rng();
        let lower = BigUint::from(2u32);
        let upper = &p - BigUint::one();
        let private_key = rng.gen_biguint_range(&lower, &upper);
        Ok(Self { p, g, private_key })
    }

    /// Replace the private key, validating `1 < k < p - 1`.
    pub fn set_private_key(&mut self, k: BigUint) -> Result<(), Error> {
        let one = BigUint::one();
        if k <= one || k >= &self.p - &one {
            return Err(Error::InvalidArgument(
                "private key must satisfy 1 < k < p - 1".into(),
            ));
        }
        self.private_key = k;
        Ok(())
    }

    /// `g^private_key mod p`.
    pub fn public_key(&self) -> BigUint {
        self.g.modpow(&self.private_key, &self.p)
    }

    /// Compute the shared secret `peer_public^private_key mod p`, after
    /// validating `0 < peer_public < p`.
    pub fn compute_shared(&self, peer_public: &BigUint) -> Result<BigUint, Error> {
        if peer_public.eq(&BigUint::from(0u32)) || *peer_public >= self.p {
            return Err(Error::InvalidArgument(
                "peer public key must satisfy 0 < peer_public < p".into(),
            ));
        }
        Ok(peer_public.modpow(&self.private_key, &self.p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_peers_agree_on_a_shared_secret() {
        let p = BigUint::from(23u32);
        let g = BigUint::from(5u32);

        let mut alice = DiffieHellman::new(p.clone(), g.clone()).unwrap();
        let mut bob = DiffieHellman::new(p.clone(), g.clone()).unwrap();
        alice.set_private_key(BigUint::from(6u32)).unwrap();
        bob.set_private_key(BigUint::from(15u32)).unwrap();

        let alice_shared = alice.compute_shared(&bob.public_key()).unwrap();
        let bob_shared = bob.compute_shared(&alice.public_key()).unwrap();
        assert_eq!(alice_shared, bob_shared);
    }

    #[test]
    fn rejects_out_of_range_peer_key() {
        let p = BigUint::from(23u32);
        let g = BigUint::from(5u32);
        let dh = DiffieHellman::new(p.clone(), g).unwrap();
        assert!(dh.compute_shared(&p).is_err());
        assert!(dh.compute_shared(&BigUint::from(0u32)).is_err());
    }
}
