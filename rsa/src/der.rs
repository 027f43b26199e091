//! DER encoding of the PKCS#1 `RSAPublicKey` and `RSAPrivateKey`
//! structures.
//!
//! ```text
//! RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
//!
//! RSAPrivateKey ::= SEQUENCE {
//!     version         INTEGER (0),
//!     modulus         INTEGER,  -- n
//!     publicExponent  INTEGER,  -- e
//!     privateExponent INTEGER,  -- d
//!     prime1          INTEGER,  -- p
//!     prime2          INTEGER,  -- q
//!     exponent1       INTEGER,  -- d mod (p-1)
//!     exponent2       INTEGER,  -- d mod (q-1)
//!     coefficient     INTEGER   -- q^-1 mod p
//! }
//! ```
//!
//! Definite lengths only; INTEGERs are minimal two's complement, so
//! non-negative values with the high bit set get a leading zero byte.
//! Negative integers are rejected on parse.

use crate::key::{PrivateKey, PublicKey};
use crate::RsaError;
use num_bigint::BigUint;
use num_traits::Zero;

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x30;

fn codec_err(msg: &str) -> RsaError {
    RsaError::Codec(msg.to_string())
}

fn write_length(out: &mut Vec<u8>, length: usize) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }

    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

fn write_uint(out: &mut Vec<u8>, n: &BigUint) {
    let mut content = n.to_bytes_be();
    if content[0] & 0x80 != 0 {
        content.insert(0, 0x00);
    }

    out.push(TAG_INTEGER);
    write_length(out, content.len());
    out.extend_from_slice(&content);
}

fn wrap_sequence(content: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 4);
    out.push(TAG_SEQUENCE);
    write_length(&mut out, content.len());
    out.extend_from_slice(&content);
    out
}

struct DerReader<'a> {
    data: &'a [u8],
}

impl<'a> DerReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn at_end(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads one TLV and returns its content, advancing past it.
    fn read_tlv(&mut self, expected_tag: u8) -> Result<&'a [u8], RsaError> {
        let (&tag, rest) = self
            .data
            .split_first()
            .ok_or_else(|| codec_err("truncated input"))?;
        if tag != expected_tag {
            return Err(RsaError::Codec(format!(
                "expected tag {expected_tag:#04x}, found {tag:#04x}"
            )));
        }

        let (&first, rest) = rest
            .split_first()
            .ok_or_else(|| codec_err("truncated length"))?;
        let (length, rest) = if first < 0x80 {
            (first as usize, rest)
        } else {
            let count = (first & 0x7f) as usize;
            if count == 0 {
                return Err(codec_err("indefinite lengths are not allowed in DER"));
            }
            if count > std::mem::size_of::<usize>() || rest.len() < count {
                return Err(codec_err("unreasonable length"));
            }
            let mut length = 0usize;
            for &b in &rest[..count] {
                length = (length << 8) | b as usize;
            }
            (length, &rest[count..])
        };

        if rest.len() < length {
            return Err(codec_err("truncated content"));
        }

        let (content, rest) = rest.split_at(length);
        self.data = rest;
        Ok(content)
    }

    fn read_uint(&mut self) -> Result<BigUint, RsaError> {
        let content = self.read_tlv(TAG_INTEGER)?;
        if content.is_empty() {
            return Err(codec_err("empty integer"));
        }
        if content[0] & 0x80 != 0 {
            return Err(codec_err("negative integer"));
        }
        Ok(BigUint::from_bytes_be(content))
    }
}

/// Opens the outer SEQUENCE; the whole input must be consumed by it.
fn open_sequence(data: &[u8]) -> Result<DerReader, RsaError> {
    let mut outer = DerReader::new(data);
    let content = outer.read_tlv(TAG_SEQUENCE)?;
    if !outer.at_end() {
        return Err(codec_err("trailing data after the key structure"));
    }
    Ok(DerReader::new(content))
}

pub(crate) fn encode_public(key: &PublicKey) -> Vec<u8> {
    let mut content = Vec::new();
    write_uint(&mut content, key.n());
    write_uint(&mut content, key.e());
    wrap_sequence(content)
}

pub(crate) fn decode_public(data: &[u8]) -> Result<PublicKey, RsaError> {
    let mut seq = open_sequence(data)?;
    let n = seq.read_uint()?;
    let e = seq.read_uint()?;
    if !seq.at_end() {
        return Err(codec_err("unexpected extra field in RSAPublicKey"));
    }

    PublicKey::new(n, e)
}

pub(crate) fn encode_private(key: &PrivateKey) -> Vec<u8> {
    let mut content = Vec::new();
    write_uint(&mut content, &BigUint::zero());
    for field in [
        key.n(),
        key.e(),
        key.d(),
        key.p(),
        key.q(),
        key.exp1(),
        key.exp2(),
        key.coef(),
    ] {
        write_uint(&mut content, field);
    }
    wrap_sequence(content)
}

pub(crate) fn decode_private(data: &[u8]) -> Result<PrivateKey, RsaError> {
    let mut seq = open_sequence(data)?;

    let version = seq.read_uint()?;
    if !version.is_zero() {
        return Err(RsaError::Codec(format!(
            "unable to read this key, version {version} != 0"
        )));
    }

    let n = seq.read_uint()?;
    let e = seq.read_uint()?;
    let d = seq.read_uint()?;
    let p = seq.read_uint()?;
    let q = seq.read_uint()?;
    let exp1 = seq.read_uint()?;
    let exp2 = seq.read_uint()?;
    let coef = seq.read_uint()?;

    if !seq.at_end() {
        // A version-0 key with trailing components would be multi-prime.
        return Err(codec_err("multi-prime RSA keys are not supported"));
    }

    let key = PrivateKey::new(n, e, d, p, q)?;
    if key.exp1() != &exp1 || key.exp2() != &exp2 || key.coef() != &coef {
        log::warn!(
            "the key file carries CRT exponents or coefficient that do not \
             match the primes; using recomputed values"
        );
    }

    Ok(key)
}
