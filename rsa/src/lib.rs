//! RSA public-key cryptography per PKCS#1 v1.5 (RFC 8017 §7.2/§8.2):
//! key generation, encryption with block type 2 padding, DigestInfo
//! signatures with block type 1 padding, and PKCS#1 DER/PEM key
//! serialization.
//!
//! ```no_run
//! use rand::DefaultRand;
//!
//! let mut rng = DefaultRand::default();
//! let (public, private) = rsa::new_keys(2048, &mut rng)?;
//!
//! let cipher = rsa::encrypt(b"attack at dawn", &public, &mut rng)?;
//! assert_eq!(rsa::decrypt(&cipher, &private, &mut rng)?, b"attack at dawn");
//!
//! let sig = rsa::sign(b"attack at dawn", &private, rsa::HashAlg::Sha256, &mut rng)?;
//! assert_eq!(rsa::verify(b"attack at dawn", &sig, &public)?, rsa::HashAlg::Sha256);
//! # Ok::<(), rsa::RsaError>(())
//! ```
//!
//! # Security notes
//!
//! The arithmetic in this crate is **not constant-time**: `num-bigint` has
//! no constant-time guarantees, and the padding checks run in time
//! dependent on secret data. As a mitigation, every private-key operation
//! blinds the input with a fresh random factor, and all decryption and
//! verification failures collapse into two unspecific error values
//! ([`RsaError::Decryption`], [`RsaError::Verification`]). Do not expose
//! anything beyond those errors to untrusted peers.

mod der;
mod error;
mod hash;
mod key;
mod pem;
mod pkcs1;
mod prime;
mod randnum;
mod transform;

pub use error::RsaError;
pub use hash::HashAlg;
pub use key::{
    new_keys, new_keys_with, CancelFlag, KeyFormat, PrivateKey, PublicKey, DEFAULT_EXPONENT,
};
pub use pem::{load_pem, save_pem};
pub use pkcs1::{compute_hash, decrypt, encrypt, find_signature_hash, sign, sign_hash, verify};
pub use prime::{are_relatively_prime, get_prime, is_probable_prime, miller_rabin};
pub use randnum::{read_random_bits, read_random_int, read_random_odd_int};
pub use transform::{bit_size, byte_size, bytes_to_int, ceil_div, int_to_bytes};
