//! AES-256-GCM encryption and decryption of individual secrets.
//!
//! **Nonces:** every call to [`encrypt`] draws a fresh 96-bit nonce from the OS
//! CSPRNG. GCM nonce reuse under one key is catastrophic: it breaks both
//! confidentiality and authentication. So the nonce is never derived,
//! counted, or seeded.
//!
//! **Tags:** the 128-bit tag is kept detached from the ciphertext so the bundle
//! carries three independent fields. Tag comparison happens inside the AEAD
//! primitive in constant time, and no plaintext is released unless it passes.

use aes_gcm::{
    aead::{AeadCore, AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce, Tag,
};
use thiserror::Error;
use zeroize::Zeroizing;

use super::bundle::CiphertextBundle;
use crate::key::SecretKey;

/// No additional authenticated data is bound to a secret.
const ASSOCIATED_DATA: &[u8] = b"";

/// Errors produced by [`encrypt`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionError {
    /// Empty secrets are not stored.
    #[error("plaintext must not be empty")]
    EmptyPlaintext,

    /// The cipher primitive rejected the key.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// AES-GCM encryption failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// A bundle could not be decrypted.
///
/// Covers tag mismatch, a wrong key, and malformed bundles alike; the error
/// intentionally does not say which.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("secret unavailable")]
pub struct DecryptionError;

/// Encrypt a secret with AES-256-GCM.
///
/// # Errors
///
/// Returns [`EncryptionError::EmptyPlaintext`] for an empty `plaintext`.
/// Returns [`EncryptionError::InvalidKeyLength`] or [`EncryptionError::AeadFailure`]
/// if the primitive rejects the key or fails (unreachable with a loaded key).
pub fn encrypt(key: &SecretKey, plaintext: &str) -> Result<CiphertextBundle, EncryptionError> {
    if plaintext.is_empty() {
        return Err(EncryptionError::EmptyPlaintext);
    }
    let cipher = build_cipher(key).ok_or(EncryptionError::InvalidKeyLength)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Encrypted in place; the buffer is wiped if encryption bails out midway.
    let mut buffer = Zeroizing::new(plaintext.as_bytes().to_vec());
    let tag = cipher
        .encrypt_in_place_detached(&nonce, ASSOCIATED_DATA, buffer.as_mut_slice())
        .map_err(|_| EncryptionError::AeadFailure)?;

    Ok(CiphertextBundle::new(
        nonce.into(),
        std::mem::take(&mut *buffer),
        tag.into(),
    ))
}

/// Decrypt a bundle back to the original secret.
///
/// The returned string is zeroed when dropped.
///
/// # Errors
///
/// Returns [`DecryptionError`] if authentication fails (wrong key, tampered
/// or corrupted bundle) or the recovered bytes are not UTF-8.
pub fn decrypt(key: &SecretKey, bundle: &CiphertextBundle) -> Result<Zeroizing<String>, DecryptionError> {
    let cipher = build_cipher(key).ok_or(DecryptionError)?;

    let mut buffer = Zeroizing::new(bundle.ciphertext().to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(bundle.nonce()),
            ASSOCIATED_DATA,
            buffer.as_mut_slice(),
            Tag::from_slice(bundle.tag()),
        )
        .map_err(|_| DecryptionError)?;

    match String::from_utf8(std::mem::take(&mut *buffer)) {
        Ok(plaintext) => Ok(Zeroizing::new(plaintext)),
        Err(err) => {
            drop(Zeroizing::new(err.into_bytes()));
            Err(DecryptionError)
        }
    }
}

fn build_cipher(key: &SecretKey) -> Option<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::bundle::{NONCE_LEN, TAG_LEN};
    use std::sync::Arc;

    /// Rebuild `bundle` with one bit flipped at `bit` of the concatenated
    /// nonce ‖ ciphertext ‖ tag.
    fn flip_bit(bundle: &CiphertextBundle, bit: usize) -> CiphertextBundle {
        let mut nonce = bundle.nonce().to_vec();
        let mut ciphertext = bundle.ciphertext().to_vec();
        let mut tag = bundle.tag().to_vec();
        let (byte, mask) = (bit / 8, 1u8 << (bit % 8));
        if byte < nonce.len() {
            nonce[byte] ^= mask;
        } else if byte < nonce.len() + ciphertext.len() {
            ciphertext[byte - nonce.len()] ^= mask;
        } else {
            tag[byte - nonce.len() - ciphertext.len()] ^= mask;
        }
        CiphertextBundle::from_parts(&nonce, &ciphertext, &tag).unwrap()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = SecretKey::random();
        let long = "long".repeat(1000);
        for plaintext in ["x", "123-45-6789", "pässwörd 🔐", long.as_str()] {
            let bundle = encrypt(&key, plaintext).unwrap();
            assert_eq!(decrypt(&key, &bundle).unwrap().as_str(), plaintext);
        }
    }

    #[test]
    fn hunter2_scenario() {
        let key = SecretKey::random();
        let bundle = encrypt(&key, "hunter2-secret").unwrap();
        assert_eq!(bundle.nonce().len(), NONCE_LEN);
        assert_eq!(bundle.tag().len(), TAG_LEN);
        assert_eq!(bundle.ciphertext().len(), 14);
        assert_eq!(decrypt(&key, &bundle).unwrap().as_str(), "hunter2-secret");

        let mut tag = *bundle.tag();
        tag[TAG_LEN - 1] = tag[TAG_LEN - 1].wrapping_add(1);
        let tampered =
            CiphertextBundle::from_parts(bundle.nonce(), bundle.ciphertext(), &tag).unwrap();
        assert_eq!(decrypt(&key, &tampered).unwrap_err(), DecryptionError);
    }

    #[test]
    fn same_plaintext_yields_distinct_bundles() {
        let key = SecretKey::random();
        let a = encrypt(&key, "same secret").unwrap();
        let b = encrypt(&key, "same secret").unwrap();
        assert_ne!(a.nonce(), b.nonce());
        assert_ne!(a.ciphertext(), b.ciphertext());
        assert_ne!(a, b);
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let key = SecretKey::random();
        let bundle = encrypt(&key, "tamper me").unwrap();
        let total_bits = (NONCE_LEN + bundle.ciphertext().len() + TAG_LEN) * 8;
        for bit in 0..total_bits {
            let tampered = flip_bit(&bundle, bit);
            assert_eq!(
                decrypt(&key, &tampered).unwrap_err(),
                DecryptionError,
                "bit {bit} flip was not detected"
            );
        }
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let key1 = SecretKey::random();
        let key2 = SecretKey::random();
        let bundle = encrypt(&key1, "secret").unwrap();
        assert_eq!(decrypt(&key2, &bundle).unwrap_err(), DecryptionError);
    }

    #[test]
    fn substituted_field_fails_decryption() {
        let key = SecretKey::random();
        let a = encrypt(&key, "first secret").unwrap();
        let b = encrypt(&key, "other secret").unwrap();
        let swapped_nonce = CiphertextBundle::from_parts(b.nonce(), a.ciphertext(), a.tag()).unwrap();
        let swapped_tag = CiphertextBundle::from_parts(a.nonce(), a.ciphertext(), b.tag()).unwrap();
        assert!(decrypt(&key, &swapped_nonce).is_err());
        assert!(decrypt(&key, &swapped_tag).is_err());
    }

    #[test]
    fn truncated_ciphertext_fails_decryption() {
        let key = SecretKey::random();
        let bundle = encrypt(&key, "truncate me").unwrap();
        let ct = bundle.ciphertext();
        let short = CiphertextBundle::from_parts(bundle.nonce(), &ct[..ct.len() - 1], bundle.tag()).unwrap();
        assert!(decrypt(&key, &short).is_err());
    }

    #[test]
    fn empty_plaintext_rejected() {
        let key = SecretKey::random();
        assert_eq!(encrypt(&key, "").unwrap_err(), EncryptionError::EmptyPlaintext);
    }

    #[test]
    fn decryption_error_is_opaque() {
        assert_eq!(DecryptionError.to_string(), "secret unavailable");
    }

    #[test]
    fn concurrent_calls_share_one_key() {
        let key = Arc::new(SecretKey::random());
        std::thread::scope(|s| {
            for i in 0..8 {
                let key = Arc::clone(&key);
                s.spawn(move || {
                    let secret = format!("secret-{i}");
                    for _ in 0..50 {
                        let bundle = encrypt(&key, &secret).unwrap();
                        assert_eq!(decrypt(&key, &bundle).unwrap().as_str(), secret);
                    }
                });
            }
        });
    }
}
