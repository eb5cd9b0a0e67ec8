//! Miller-Rabin probable-primality testing over `BigUint`, used by key
//! generation to find `p`/`q` candidates.

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::RngCore;

const DEFAULT_ROUNDS: usize = 40;

/// Run `rounds` (default 40) Miller-Rabin rounds against `n`. A `true`
/// result means `n` is prime with overwhelming probability; `false` is
/// certain.
pub fn is_probable_prime<R: RngCore>(n: &BigUint, rng: &mut R) -> bool {
    is_probable_prime_rounds(n, DEFAULT_ROUNDS, rng)
}

fn is_probable_prime_rounds<R: RngCore>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let zero = BigUint::zero();
    let one = BigUint::one();
    let two = &one + &one;

    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if n % &two == zero {
        return false;
    }
    if *n < BigUint::from(9u32) {
        // Odd, greater than two, and not yet excluded above — the only
        // candidates left below 9 are 3, 5, and 7, all prime. Handled here
        // because the witness range [2, n-2) below is empty for n == 3.
        return true;
    }

    // n - 1 = 2^s * d, d odd
    let n_minus_one = n - &one;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while &d % &two == zero {
        d /= &two;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &(n - &two));
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn detects_small_primes() {
        let mut rng = thread_rng();
        for p in [2u32, 3, 5, 7, 11, 13, 101, 65537] {
            assert!(is_probable_prime(&BigUint::from(p), &mut rng), "{p} should be prime");
        }
    }

    #[test]
    fn rejects_small_composites() {
        let mut rng = thread_rng();
        for c in [4u32, 6, 8, 9, 15, 77, 100] {
            assert!(!is_probable_prime(&BigUint::from(c), &mut rng), "{c} should be composite");
        }
    }
}
