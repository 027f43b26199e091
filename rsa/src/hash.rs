//! The closed set of digest algorithms recognized by the signature scheme.

use crate::RsaError;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// DigestInfo DER prefixes: the encoded `AlgorithmIdentifier` plus the
/// OCTET STRING header. Prepended to the raw digest, they form the value
/// that is signed.
const MD5_PREFIX: &[u8] = &[
    0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02, 0x05, 0x05,
    0x00, 0x04, 0x10,
];
const SHA1_PREFIX: &[u8] = &[
    0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14,
];
const SHA224_PREFIX: &[u8] = &[
    0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04,
    0x05, 0x00, 0x04, 0x1c,
];
const SHA256_PREFIX: &[u8] = &[
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];
const SHA384_PREFIX: &[u8] = &[
    0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02,
    0x05, 0x00, 0x04, 0x30,
];
const SHA512_PREFIX: &[u8] = &[
    0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03,
    0x05, 0x00, 0x04, 0x40,
];

/// A digest algorithm usable with [`sign`](crate::sign) and recovered by
/// [`verify`](crate::verify) from the signature itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlg {
    pub const ALL: [HashAlg; 6] = [
        HashAlg::Md5,
        HashAlg::Sha1,
        HashAlg::Sha224,
        HashAlg::Sha256,
        HashAlg::Sha384,
        HashAlg::Sha512,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HashAlg::Md5 => "MD5",
            HashAlg::Sha1 => "SHA-1",
            HashAlg::Sha224 => "SHA-224",
            HashAlg::Sha256 => "SHA-256",
            HashAlg::Sha384 => "SHA-384",
            HashAlg::Sha512 => "SHA-512",
        }
    }

    pub fn digest_info(self) -> &'static [u8] {
        match self {
            HashAlg::Md5 => MD5_PREFIX,
            HashAlg::Sha1 => SHA1_PREFIX,
            HashAlg::Sha224 => SHA224_PREFIX,
            HashAlg::Sha256 => SHA256_PREFIX,
            HashAlg::Sha384 => SHA384_PREFIX,
            HashAlg::Sha512 => SHA512_PREFIX,
        }
    }

    /// Digest length in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            HashAlg::Md5 => 16,
            HashAlg::Sha1 => 20,
            HashAlg::Sha224 => 28,
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
            HashAlg::Sha512 => 64,
        }
    }

    /// Compute the digest of `msg`.
    pub fn digest(self, msg: &[u8]) -> Vec<u8> {
        match self {
            HashAlg::Md5 => Md5::digest(msg).to_vec(),
            HashAlg::Sha1 => Sha1::digest(msg).to_vec(),
            HashAlg::Sha224 => Sha224::digest(msg).to_vec(),
            HashAlg::Sha256 => Sha256::digest(msg).to_vec(),
            HashAlg::Sha384 => Sha384::digest(msg).to_vec(),
            HashAlg::Sha512 => Sha512::digest(msg).to_vec(),
        }
    }

    /// Split `t` into a recognized DigestInfo prefix and the digest behind
    /// it. The digest length must match the algorithm exactly.
    pub(crate) fn from_digest_info(t: &[u8]) -> Option<(HashAlg, &[u8])> {
        Self::ALL.into_iter().find_map(|alg| {
            let prefix = alg.digest_info();
            let digest = t.strip_prefix(prefix)?;
            (digest.len() == alg.digest_len()).then_some((alg, digest))
        })
    }
}

impl FromStr for HashAlg {
    type Err = RsaError;

    /// Case-sensitive parse of the wire names (`"MD5"`, `"SHA-1"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| RsaError::InvalidArgument(format!("invalid hash method: {s}")))
    }
}

impl Display for HashAlg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
