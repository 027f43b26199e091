//! PKCS#1 v1.5 encryption and signing.
//!
//! Encryption pads with at least 8 random non-zero bytes (block type 2);
//! signatures wrap a DigestInfo-prefixed digest in an FF run (block type
//! 1). Unpadding failures come back as the unspecific
//! [`RsaError::Decryption`] / [`RsaError::Verification`] values.

use crate::hash::HashAlg;
use crate::key::{PrivateKey, PublicKey};
use crate::transform::{byte_size, bytes_to_int, int_to_bytes};
use crate::RsaError;
use rand::Rand;

/// Pads `message` for encryption: `00 02 PS 00 M` with non-zero random
/// padding of at least 8 bytes.
fn pad_for_encryption<R: Rand>(
    message: &[u8],
    target_length: usize,
    rng: &mut R,
) -> Result<Vec<u8>, RsaError> {
    let max_msg_length = target_length.checked_sub(11).ok_or_else(|| {
        RsaError::Overflow("the key is too small for PKCS#1 v1.5 padding".to_string())
    })?;
    if message.len() > max_msg_length {
        return Err(RsaError::Overflow(format!(
            "{} bytes needed for message, but there is only space for {}",
            message.len(),
            max_msg_length
        )));
    }

    let padding_length = target_length - message.len() - 3;

    // Zero bytes are dropped and redrawn, so oversample a little on each
    // pass to usually finish in one.
    let mut padding = Vec::with_capacity(padding_length);
    while padding.len() < padding_length {
        let needed = padding_length - padding.len();
        let mut fresh = vec![0u8; needed + 5];
        rng.rand(&mut fresh);
        padding.extend(fresh.into_iter().filter(|&b| b != 0).take(needed));
    }

    let mut block = Vec::with_capacity(target_length);
    block.extend_from_slice(&[0x00, 0x02]);
    block.extend_from_slice(&padding);
    block.push(0x00);
    block.extend_from_slice(message);
    Ok(block)
}

/// Pads `message` for signing: `00 01 FF..FF 00 M`.
fn pad_for_signing(message: &[u8], target_length: usize) -> Result<Vec<u8>, RsaError> {
    let max_msg_length = target_length.checked_sub(11).ok_or_else(|| {
        RsaError::Overflow("the key is too small for PKCS#1 v1.5 padding".to_string())
    })?;
    if message.len() > max_msg_length {
        return Err(RsaError::Overflow(format!(
            "{} bytes needed for message, but there is only space for {}",
            message.len(),
            max_msg_length
        )));
    }

    let padding_length = target_length - message.len() - 3;

    let mut block = Vec::with_capacity(target_length);
    block.extend_from_slice(&[0x00, 0x01]);
    block.resize(2 + padding_length, 0xff);
    block.push(0x00);
    block.extend_from_slice(message);
    Ok(block)
}

/// Encrypts `message` with PKCS#1 v1.5 block type 2 padding.
///
/// `message` can be at most `k - 11` bytes for a key of `k` bytes; longer
/// input fails with [`RsaError::Overflow`]. The result is exactly `k`
/// bytes and differs between calls thanks to the random padding.
pub fn encrypt<R: Rand>(
    message: &[u8],
    key: &PublicKey,
    rng: &mut R,
) -> Result<Vec<u8>, RsaError> {
    let key_length = byte_size(key.n());
    let padded = pad_for_encryption(message, key_length, rng)?;

    let payload = bytes_to_int(&padded);
    let encrypted = key.rsaep(&payload)?;

    int_to_bytes(&encrypted, Some(key_length))
}

/// Decrypts a ciphertext produced by [`encrypt`].
///
/// Fails with [`RsaError::Decryption`] when the ciphertext length is wrong
/// or the recovered block is not well formed. No further detail is exposed
/// or logged; distinguishing the failure modes would hand a padding oracle
/// to an attacker.
pub fn decrypt<R: Rand>(
    crypto: &[u8],
    key: &PrivateKey,
    rng: &mut R,
) -> Result<Vec<u8>, RsaError> {
    let block_size = byte_size(key.n());

    // Leading zeros vanish when the ciphertext is treated as an integer,
    // so enforce the length up front, before any private-key operation.
    // A valid padded block is never shorter than 11 bytes.
    if crypto.len() != block_size || block_size < 11 {
        return Err(RsaError::Decryption);
    }

    let encrypted = bytes_to_int(crypto);
    let decrypted = key
        .blinded_decrypt(&encrypted, rng)
        .map_err(|_| RsaError::Decryption)?;
    let cleartext = int_to_bytes(&decrypted, Some(block_size)).map_err(|_| RsaError::Decryption)?;

    // Single combined verdict; no early exit between the checks.
    let marker_bad = (cleartext[0] != 0x00) | (cleartext[1] != 0x02);

    // The zero separator must leave at least 8 bytes of padding, i.e. sit
    // at index 10 or later.
    let sep_idx = cleartext
        .iter()
        .enumerate()
        .skip(2)
        .find(|(_, &b)| b == 0x00)
        .map(|(idx, _)| idx)
        .unwrap_or_default();
    let sep_bad = sep_idx < 10;

    if marker_bad | sep_bad {
        return Err(RsaError::Decryption);
    }

    Ok(cleartext[sep_idx + 1..].to_vec())
}

/// Digest of `message` under `alg`.
pub fn compute_hash(message: &[u8], alg: HashAlg) -> Vec<u8> {
    alg.digest(message)
}

/// Signs a precomputed digest (a detached signature over `hash_value`,
/// which must be the digest of the message under `alg`).
pub fn sign_hash<R: Rand>(
    hash_value: &[u8],
    key: &PrivateKey,
    alg: HashAlg,
    rng: &mut R,
) -> Result<Vec<u8>, RsaError> {
    if matches!(alg, HashAlg::Md5 | HashAlg::Sha1) {
        log::warn!("signing with {alg} is cryptographically weak; prefer SHA-256 or stronger");
    }

    let mut cleartext = alg.digest_info().to_vec();
    cleartext.extend_from_slice(hash_value);

    let key_length = byte_size(key.n());
    let padded = pad_for_signing(&cleartext, key_length)?;

    let payload = bytes_to_int(&padded);
    let encrypted = key.blinded_decrypt(&payload, rng)?;

    int_to_bytes(&encrypted, Some(key_length))
}

/// Hashes `message` with `alg` and signs the digest.
pub fn sign<R: Rand>(
    message: &[u8],
    key: &PrivateKey,
    alg: HashAlg,
    rng: &mut R,
) -> Result<Vec<u8>, RsaError> {
    sign_hash(&alg.digest(message), key, alg, rng)
}

/// Verifies `signature` over `message` and returns the digest algorithm
/// recovered from the signature block itself; the caller never names it.
///
/// Every failure mode is the same [`RsaError::Verification`] value.
pub fn verify(message: &[u8], signature: &[u8], key: &PublicKey) -> Result<HashAlg, RsaError> {
    let (alg, digest) = recover_digest_info(signature, key)?;
    if alg.digest(message) != digest {
        return Err(RsaError::Verification);
    }
    Ok(alg)
}

/// Returns the digest algorithm a signature was made with, without
/// checking the signature against a message.
pub fn find_signature_hash(signature: &[u8], key: &PublicKey) -> Result<HashAlg, RsaError> {
    recover_digest_info(signature, key).map(|(alg, _)| alg)
}

/// Opens the signature block and splits the DigestInfo payload.
fn recover_digest_info(
    signature: &[u8],
    key: &PublicKey,
) -> Result<(HashAlg, Vec<u8>), RsaError> {
    let key_length = byte_size(key.n());
    if signature.len() != key_length {
        return Err(RsaError::Verification);
    }

    let encrypted = bytes_to_int(signature);
    let decrypted = key.rsaep(&encrypted).map_err(|_| RsaError::Verification)?;
    let clear_sig =
        int_to_bytes(&decrypted, Some(key_length)).map_err(|_| RsaError::Verification)?;

    let payload = unpad_signature(&clear_sig)?;
    let (alg, digest) = HashAlg::from_digest_info(payload).ok_or(RsaError::Verification)?;
    Ok((alg, digest.to_vec()))
}

/// Strict type 1 unpadding: `00 01 FF..FF 00 T` with at least 8 bytes of
/// `FF`.
fn unpad_signature(block: &[u8]) -> Result<&[u8], RsaError> {
    if block.len() < 11 || block[0] != 0x00 || block[1] != 0x01 {
        return Err(RsaError::Verification);
    }

    let sep_idx = block
        .iter()
        .enumerate()
        .skip(2)
        .find(|(_, &b)| b != 0xff)
        .map(|(idx, _)| idx)
        .ok_or(RsaError::Verification)?;

    if block[sep_idx] != 0x00 || sep_idx < 10 {
        return Err(RsaError::Verification);
    }

    Ok(&block[sep_idx + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{new_keys, CancelFlag, PrivateKey};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand::DefaultRand;

    // 512-bit test key from the Go standard library's PKCS#1 v1.5 suite.
    fn test_key() -> PrivateKey {
        let n = BigUint::from_str_radix("9353930466774385905609975137998169297361893554149986716853295022578535724979677252958524466350471210367835187480748268864277464700638583474144061408845077", 10).unwrap();
        let e = BigUint::from(65537u32);
        let d = BigUint::from_str_radix("7266398431328116344057699379749222532279343923819063639497049039389899328538543087657733766554155839834519529439851673014800261285757759040931985506583861", 10).unwrap();
        let p = BigUint::from_str_radix("98920366548084643601728869055592650835572950932266967461790948584315647051443", 10).unwrap();
        let q = BigUint::from_str_radix("94560208308847015747498523884063394671606671904944666360068158221458669711639", 10).unwrap();
        PrivateKey::new(n, e, d, p, q).unwrap()
    }

    #[test]
    fn encryption_padding_shape() {
        let mut rng = DefaultRand::default();
        let block = pad_for_encryption(b"hello", 16, &mut rng).unwrap();
        assert_eq!(block.len(), 16);
        assert_eq!(&block[..2], &[0x00, 0x02]);
        assert_eq!(&block[10..], b"\x00hello");
        assert!(block[2..10].iter().all(|&b| b != 0));
    }

    #[test]
    fn signing_padding_shape() {
        let block = pad_for_signing(b"hello", 16).unwrap();
        assert_eq!(block.len(), 16);
        assert_eq!(&block[..2], &[0x00, 0x01]);
        assert_eq!(&block[2..10], &[0xff; 8]);
        assert_eq!(&block[10..], b"\x00hello");
    }

    #[test]
    fn fixed_key_decryption() {
        // (ciphertext, plaintext) pairs from the Go test suite.
        let cases = [
            (
                "gIcUIoVkD6ATMBk/u/nlCZCCWRKdkfjCgFdo35VpRXLduiKXhNz1XupLLzTXAybEq15juc+EgY5o0DHv/nt3yg==",
                "x",
            ),
            (
                "Y7TOCSqofGhkRb+jaVRLzK8xw2cSo1IVES19utzv6hwvx+M8kFsoWQm5DzBeJCZTCVDPkTpavUuEbgp8hnUGDw==",
                "testing.",
            ),
            (
                "arReP9DJtEVyV2Dg3dDp4c/PSk1O6lxkoJ8HcFupoRorBZG+7+1fDAwT1olNddFnQMjmkb8vxwmNMoTAT/BFjQ==",
                "testing.\n",
            ),
            (
                "WtaBXIoGC54+vH0NH0CHHE+dRDOsMc/6BrfFu2lEqcKL9+uDuWaf+Xj9mrbQCjjZcpQuX733zyok/jsnqe/Ftw==",
                "01234567890123456789012345678901234567890123456789012",
            ),
        ];

        let key = test_key();
        let mut rng = DefaultRand::default();
        for (i, (cipher_b64, want)) in cases.into_iter().enumerate() {
            let cipher = STANDARD.decode(cipher_b64).unwrap();
            let plain = decrypt(&cipher, &key, &mut rng).unwrap();
            assert_eq!(plain, want.as_bytes(), "case {i}");
        }
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        for msg in [
            b"".as_slice(),
            b"x",
            b"attack at dawn",
            b"\x00\x00\x00\x00\x01",
        ] {
            let cipher = encrypt(msg, key.public_key(), &mut rng).unwrap();
            assert_eq!(cipher.len(), 64);
            assert_eq!(decrypt(&cipher, &key, &mut rng).unwrap(), msg);
        }
    }

    #[test]
    fn encryption_is_randomized() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        let a = encrypt(b"attack at dawn", key.public_key(), &mut rng).unwrap();
        let b = encrypt(b"attack at dawn", key.public_key(), &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(decrypt(&a, &key, &mut rng).unwrap(), b"attack at dawn");
        assert_eq!(decrypt(&b, &key, &mut rng).unwrap(), b"attack at dawn");
    }

    #[test]
    fn message_length_boundaries() {
        let key = test_key();
        let mut rng = DefaultRand::default();

        // 64-byte key: 53 bytes fit, 54 do not.
        let fits = vec![0x61u8; 53];
        let cipher = encrypt(&fits, key.public_key(), &mut rng).unwrap();
        assert_eq!(decrypt(&cipher, &key, &mut rng).unwrap(), fits);

        let too_long = vec![0x61u8; 54];
        assert!(matches!(
            encrypt(&too_long, key.public_key(), &mut rng),
            Err(RsaError::Overflow(_))
        ));
    }

    #[test]
    fn ciphertext_length_is_checked_first() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        let cipher = encrypt(b"x", key.public_key(), &mut rng).unwrap();

        assert_eq!(
            decrypt(&cipher[..63], &key, &mut rng).unwrap_err(),
            RsaError::Decryption
        );

        let mut padded = vec![0x00];
        padded.extend_from_slice(&cipher);
        assert_eq!(
            decrypt(&padded, &key, &mut rng).unwrap_err(),
            RsaError::Decryption
        );
    }

    #[test]
    fn short_padding_is_rejected() {
        let key = test_key();
        let mut rng = DefaultRand::default();

        // Forge a block whose padding is only 7 bytes long and run it
        // through the public operation to get a "ciphertext".
        let mut block = vec![0x00, 0x02];
        block.extend_from_slice(&[0x01; 7]);
        block.push(0x00);
        block.extend_from_slice(&[0x61; 54]);
        assert_eq!(block.len(), 64);

        let forged = key.public_key().rsaep(&bytes_to_int(&block)).unwrap();
        let cipher = int_to_bytes(&forged, Some(64)).unwrap();
        assert_eq!(
            decrypt(&cipher, &key, &mut rng).unwrap_err(),
            RsaError::Decryption
        );
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        let mut cipher = encrypt(b"attack at dawn", key.public_key(), &mut rng).unwrap();
        cipher[10] ^= 0xff;
        assert_eq!(
            decrypt(&cipher, &key, &mut rng).unwrap_err(),
            RsaError::Decryption
        );
    }

    #[test]
    fn sign_verify_round_trip() {
        let key = test_key();
        let mut rng = DefaultRand::default();

        let sig = sign(b"attack at dawn", &key, HashAlg::Sha256, &mut rng).unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(
            verify(b"attack at dawn", &sig, key.public_key()).unwrap(),
            HashAlg::Sha256
        );
        assert_eq!(
            verify(b"attack at noon", &sig, key.public_key()).unwrap_err(),
            RsaError::Verification
        );
    }

    #[test]
    fn all_algorithms_round_trip() {
        let mut rng = DefaultRand::default();
        let (public, private) = new_keys(1024, &mut rng).unwrap();

        for alg in HashAlg::ALL {
            let sig = sign(b"attack at dawn", &private, alg, &mut rng).unwrap();
            assert_eq!(verify(b"attack at dawn", &sig, &public).unwrap(), alg, "{alg}");
            assert_eq!(find_signature_hash(&sig, &public).unwrap(), alg, "{alg}");
        }
    }

    #[test]
    fn oversized_digest_info_overflows() {
        // SHA-512's DigestInfo does not fit a 512-bit key.
        let key = test_key();
        let mut rng = DefaultRand::default();
        assert!(matches!(
            sign(b"attack at dawn", &key, HashAlg::Sha512, &mut rng),
            Err(RsaError::Overflow(_))
        ));
    }

    #[test]
    fn bad_signatures_fail_uniformly() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        let sig = sign(b"attack at dawn", &key, HashAlg::Sha256, &mut rng).unwrap();

        // Wrong length.
        assert_eq!(
            verify(b"attack at dawn", &sig[..63], key.public_key()).unwrap_err(),
            RsaError::Verification
        );

        // Flipped bit.
        let mut bad = sig.clone();
        bad[0] ^= 0x01;
        assert_eq!(
            verify(b"attack at dawn", &bad, key.public_key()).unwrap_err(),
            RsaError::Verification
        );

        // Random garbage of the right length.
        let garbage = vec![0x2au8; 64];
        assert_eq!(
            verify(b"attack at dawn", &garbage, key.public_key()).unwrap_err(),
            RsaError::Verification
        );
    }

    #[test]
    fn signature_unpad_rules() {
        assert!(unpad_signature(&[]).is_err());

        // Separator inside the minimum padding run.
        let mut block = vec![0x00, 0x01];
        block.extend_from_slice(&[0xff; 7]);
        block.push(0x00);
        block.extend_from_slice(&[0x61; 10]);
        assert!(unpad_signature(&block).is_err());

        // A non-FF byte inside the run.
        let mut block = vec![0x00, 0x01];
        block.extend_from_slice(&[0xff; 4]);
        block.push(0x7f);
        block.extend_from_slice(&[0xff; 4]);
        block.push(0x00);
        block.extend_from_slice(&[0x61; 10]);
        assert!(unpad_signature(&block).is_err());

        // Well-formed block.
        let mut block = vec![0x00, 0x01];
        block.extend_from_slice(&[0xff; 8]);
        block.push(0x00);
        block.extend_from_slice(&[0x61; 10]);
        assert_eq!(unpad_signature(&block).unwrap(), &[0x61; 10]);
    }

    #[test]
    fn sign_hash_matches_sign() {
        let key = test_key();
        let mut rng = DefaultRand::default();
        let digest = compute_hash(b"attack at dawn", HashAlg::Sha256);
        let sig = sign_hash(&digest, &key, HashAlg::Sha256, &mut rng).unwrap();
        assert_eq!(
            verify(b"attack at dawn", &sig, key.public_key()).unwrap(),
            HashAlg::Sha256
        );
    }

    #[test]
    fn generated_key_round_trip() {
        let mut rng = DefaultRand::default();
        let cancel = CancelFlag::default();
        let (public, private) =
            crate::key::new_keys_with(512, true, 65537, &mut rng, &cancel).unwrap();

        let cipher = encrypt(b"hello", &public, &mut rng).unwrap();
        assert_eq!(decrypt(&cipher, &private, &mut rng).unwrap(), b"hello");
    }
}
