//! [`CiphertextBundle`]: the nonce, ciphertext and tag of one encrypted secret.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use super::cipher::DecryptionError;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Prefix that appears at the start of every encoded bundle.
pub const VERSION_PREFIX: &str = "v1";

/// One encrypted secret.
///
/// Fields are private and length-checked on construction, so a bundle that
/// exists is always well-formed. It is never mutated: updating a secret means
/// encrypting into a new bundle.
///
/// The canonical text form is
/// `v1.<base64url(nonce)>.<base64url(ciphertext)>.<base64url(tag)>`, which is
/// also how the bundle serialises.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CiphertextBundle {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl CiphertextBundle {
    /// Assemble a bundle from its three parts.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionError`] if the nonce or tag has the wrong length or
    /// the ciphertext is empty.
    pub fn from_parts(nonce: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Self, DecryptionError> {
        let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| DecryptionError)?;
        let tag: [u8; TAG_LEN] = tag.try_into().map_err(|_| DecryptionError)?;
        if ciphertext.is_empty() {
            return Err(DecryptionError);
        }
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }

    pub(crate) fn new(nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>, tag: [u8; TAG_LEN]) -> Self {
        Self {
            nonce,
            ciphertext,
            tag,
        }
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }
}

impl fmt::Display for CiphertextBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
            URL_SAFE_NO_PAD.encode(self.tag),
        )
    }
}

impl fmt::Debug for CiphertextBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiphertextBundle")
            .field("nonce_len", &self.nonce.len())
            .field("ciphertext_len", &self.ciphertext.len())
            .field("tag_len", &self.tag.len())
            .finish()
    }
}

impl FromStr for CiphertextBundle {
    type Err = DecryptionError;

    /// Parse the canonical `v1.<nonce>.<ciphertext>.<tag>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(prefix), Some(nonce), Some(ciphertext), Some(tag), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(DecryptionError);
        };
        if prefix != VERSION_PREFIX {
            return Err(DecryptionError);
        }

        let decode = |part: &str| URL_SAFE_NO_PAD.decode(part).map_err(|_| DecryptionError);
        Self::from_parts(&decode(nonce)?, &decode(ciphertext)?, &decode(tag)?)
    }
}

impl TryFrom<String> for CiphertextBundle {
    type Error = DecryptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CiphertextBundle> for String {
    fn from(bundle: CiphertextBundle) -> Self {
        bundle.to_string()
    }
}
