//! [`SecretKey`]: the process-wide symmetric key, zeroed on drop.

use std::fmt;

use zeroize::Zeroize;

use super::ConfigurationError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// The bytes are only reachable from inside the crate, and only the codec
/// reads them. The buffer is boxed so moves never leave stray copies behind,
/// and it is overwritten with zeroes when the key is dropped.
pub struct SecretKey(Box<[u8; KEY_LEN]>);

impl SecretKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidLength`] unless `bytes` is exactly
    /// [`KEY_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigurationError> {
        if bytes.len() != KEY_LEN {
            return Err(ConfigurationError::InvalidLength(bytes.len()));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Generate a random key from the OS CSPRNG.
    ///
    /// Only used by tests; the service always loads its key from configuration.
    #[cfg(test)]
    pub fn random() -> Self {
        use aes_gcm::aead::{rand_core::RngCore, OsRng};
        let mut buf = Box::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut buf[..]);
        Self(buf)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0[..].zeroize();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_length() {
        let key = SecretKey::from_slice(&[0x42u8; KEY_LEN]).unwrap();
        assert_eq!(key.as_bytes(), &[0x42u8; KEY_LEN]);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            SecretKey::from_slice(&[0u8; 16]),
            Err(ConfigurationError::InvalidLength(16))
        ));
    }

    #[test]
    fn redacted_in_debug() {
        let key = SecretKey::from_slice(&[0xABu8; KEY_LEN]).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("171"));
    }

    #[test]
    fn random_keys_differ() {
        assert_ne!(SecretKey::random().as_bytes(), SecretKey::random().as_bytes());
    }
}
