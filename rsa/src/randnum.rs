//! Uniform random integers on top of a raw byte source.

use crate::transform::{bit_size, bytes_to_int, ceil_div};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rand;

/// `ceil(nbits / 8)` random bytes with the excess top bits cleared, so the
/// big-endian value is below `2^nbits`.
pub fn read_random_bits<R: Rand>(nbits: usize, rng: &mut R) -> Vec<u8> {
    let mut data = vec![0u8; ceil_div(nbits, 8)];
    rng.rand(&mut data);

    let excess = data.len() * 8 - nbits;
    if excess > 0 {
        data[0] &= 0xff >> excess;
    }

    data
}

/// Uniform value in `[0, n)` by rejection sampling on `bit_size(n)`-bit
/// draws. Each draw is accepted with probability at least one half.
pub fn read_random_int<R: Rand>(n: &BigUint, rng: &mut R) -> BigUint {
    debug_assert!(!n.is_zero());

    let nbits = bit_size(n);
    loop {
        let value = bytes_to_int(&read_random_bits(nbits, rng));
        if &value < n {
            return value;
        }
    }
}

/// Random odd integer of exactly `nbits` bits: the top bit and the lowest
/// bit are forced to 1.
pub fn read_random_odd_int<R: Rand>(nbits: usize, rng: &mut R) -> BigUint {
    let mut value = bytes_to_int(&read_random_bits(nbits, rng));
    value.set_bit(nbits as u64 - 1, true);
    value.set_bit(0, true);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::DefaultRand;

    #[test]
    fn random_bits_length_and_mask() {
        let mut rng = DefaultRand::default();
        for _ in 0..50 {
            let bits = read_random_bits(9, &mut rng);
            assert_eq!(bits.len(), 2);
            assert!(bits[0] <= 1);

            let bits = read_random_bits(16, &mut rng);
            assert_eq!(bits.len(), 2);
        }
    }

    #[test]
    fn random_int_in_range() {
        let mut rng = DefaultRand::default();
        let n = BigUint::from(1000u32);
        for _ in 0..200 {
            assert!(read_random_int(&n, &mut rng) < n);
        }
    }

    #[test]
    fn random_odd_int_shape() {
        let mut rng = DefaultRand::default();
        for _ in 0..50 {
            let value = read_random_odd_int(125, &mut rng);
            assert_eq!(value.bits(), 125);
            assert!(value.bit(0));
        }
    }
}
