//! Wiener's low-exponent attack: a continued-fraction search for a small
//! RSA private exponent `d`, given only the public `(e, n)`.
//!
//! An auxiliary cryptanalysis tool, not part of the block-cipher core,
//! but a natural companion to `generate_key_pair` and the rest of the
//! RSA module.

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Attempt to recover a small private exponent `d` from public `(e, n)`.
/// Returns `None` if `e/n`'s continued-fraction convergents never yield a
/// valid factorization of `n`.
pub fn attack(e: &BigUint, n: &BigUint) -> Option<BigUint> {
    for (k, d) in convergents(e, n) {
        if k.is_zero() || d.is_zero() {
            continue;
        }
        // Guess phi = (e*d - 1) / k; reject guesses where the division
        // isn't exact.
        let ed_minus_one = e * &d;
        if ed_minus_one.is_zero() {
            continue;
        }
        let ed_minus_one = match ed_minus_one.checked_sub(&BigUint::one()) {
            Some(v) => v,
            None => continue,
        };
        let (phi, rem) = ed_minus_one.div_rem(&k);
        if !rem.is_zero() {
            continue;
        }
        if phi >= *n {
            continue;
        }

        // p, q are roots of x^2 - (n - phi + 1) x + n = 0.
        let Some(n_minus_phi) = n.checked_sub(&phi) else {
            continue;
        };
        let b = &n_minus_phi + BigUint::one(); // p + q
        let four_n = n * BigUint::from(4u32);
        let b_squared = &b * &b;
        let Some(discriminant) = b_squared.checked_sub(&four_n) else {
            continue;
        };
        let sqrt_disc = discriminant.sqrt();
        if &sqrt_disc * &sqrt_disc != discriminant {
            continue;
        }

        let two = BigUint::from(2u32);
        let Some(p_numerator) = b.checked_sub(&sqrt_disc) else {
            continue;
        };
        let (p, rem_p) = p_numerator.div_rem(&two);
        if !rem_p.is_zero() || p.is_zero() {
            continue;
        }
        let q = &b - &p;
        if &p * &q == *n {
            return Some(d);
        }
    }
    None
}

/// Continued-fraction convergents `h_i / k_i` of `e / n`.
fn convergents(e: &BigUint, n: &BigUint) -> Vec<(BigUint, BigUint)> {
    let mut quotients = Vec::new();
    let (mut a, mut b) = (e.clone(), n.clone());
    while !b.is_zero() {
        let (q, r) = a.div_rem(&b);
        quotients.push(q);
        a = b;
        b = r;
    }

    let mut result = Vec::with_capacity(quotients.len());
    let (mut h_prev2, mut h_prev1) = (BigUint::zero(), BigUint::one());
    let (mut k_prev2, mut k_prev1) = (BigUint::one(), BigUint::zero());

    for q in &quotients {
        let h = q * &h_prev1 + &h_prev2;
        let k = q * &k_prev1 + &k_prev2;
        result.push((h.clone(), k.clone()));
        h_prev2 = h_prev1;
        h_prev1 = h;
        k_prev2 = k_prev1;
        k_prev1 = k;
    }
    result
}
