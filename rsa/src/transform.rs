//! Conversions between non-negative integers and big-endian byte strings.

use crate::RsaError;
use num_bigint::BigUint;
use num_traits::Zero;

/// Index of the most significant 1-bit plus one; 0 for 0.
pub fn bit_size(n: &BigUint) -> usize {
    n.bits() as usize
}

/// Number of bytes needed to hold `n`, rounded up; 1 for 0.
pub fn byte_size(n: &BigUint) -> usize {
    if n.is_zero() {
        1
    } else {
        ceil_div(bit_size(n), 8)
    }
}

pub fn ceil_div(num: usize, div: usize) -> usize {
    (num + div - 1) / div
}

/// Big-endian interpretation; the empty string is 0.
pub fn bytes_to_int(raw: &[u8]) -> BigUint {
    BigUint::from_bytes_be(raw)
}

/// Big-endian encoding of `n`.
///
/// With `length`, the result is left-padded with zeros to exactly that many
/// bytes and the call fails with [`RsaError::Overflow`] when `n` does not
/// fit. Without it, the minimal encoding is returned (empty for 0).
pub fn int_to_bytes(n: &BigUint, length: Option<usize>) -> Result<Vec<u8>, RsaError> {
    let raw = if n.is_zero() {
        Vec::new()
    } else {
        n.to_bytes_be()
    };

    let Some(length) = length else {
        return Ok(raw);
    };

    if raw.len() > length {
        return Err(RsaError::Overflow(format!(
            "needed {} bytes for the integer, but there is only space for {}",
            raw.len(),
            length
        )));
    }

    let mut out = vec![0u8; length - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}
