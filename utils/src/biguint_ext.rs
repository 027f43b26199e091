use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One};
use std::borrow::Borrow;
use std::ops::Deref;

/// Number-theoretic extensions on `BigUint` that `num-bigint` does not
/// provide directly. Wraps either an owned value or a reference.
pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> Deref for BigUintExt<T> {
    type Target = BigUint;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// `self * inv = 1 mod modulus`, computed with the signed extended
    /// Euclidean algorithm. `None` when `gcd(self, modulus) != 1`.
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        let (a, n) = (
            BigInt::from(self.deref() % modulus),
            BigInt::from(modulus.clone()),
        );
        let g = a.extended_gcd(&n);
        g.gcd.is_one().then_some(
            g.x.rem_euclid(&n)
                .to_biguint()
                .expect("rem_euclid result is non-negative"),
        )
    }

    /// One Miller-Rabin round: does `a` witness that `self` is composite?
    ///
    /// `self - 1 = 2^r * d` with `d` odd; the caller decomposes once and
    /// draws the witnesses. `self` must be odd and greater than 3.
    pub fn miller_rabin_witness(&self, r: u64, d: &BigUint, a: &BigUint) -> bool {
        let n = self.deref();
        let n_m1 = n - 1u32;

        let mut x = a.modpow(d, n);
        if x.is_one() || x == n_m1 {
            return false;
        }

        for _ in 1..r {
            x = &x * &x % n;
            if x.is_one() {
                return true;
            }
            if x == n_m1 {
                return false;
            }
        }

        true
    }
}
