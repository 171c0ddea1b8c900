//! Key provider: turns the configured key material into the process-wide [`SecretKey`].
//!
//! # Lifecycle
//!
//! 1. At startup, `main` calls [`load_key`] with the `ENCRYPTION_KEY` value.
//! 2. The decoded key lives only in memory, shared read-only as `Arc<SecretKey>`.
//! 3. On shutdown the last `Arc` is dropped and the key bytes are zeroed.
//!
//! # Security invariants
//!
//! - A missing or malformed key is fatal. There is no fallback to a freshly
//!   generated key: a key that changes across restarts would leave every
//!   stored bundle permanently undecryptable.
//! - Key material is never logged, and [`SecretKey`]'s `Debug` output is redacted.

pub mod secret;

pub use secret::{SecretKey, KEY_LEN};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

/// Errors produced while loading the key. All of them abort startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No key material was configured.
    #[error("ENCRYPTION_KEY is required and must not be empty")]
    Missing,

    /// The key material is not valid text for the configured encoding.
    #[error("ENCRYPTION_KEY is not valid {0}")]
    InvalidEncoding(KeyEncoding),

    /// The decoded key has the wrong length.
    #[error("ENCRYPTION_KEY has invalid length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// How the `ENCRYPTION_KEY` string is turned into raw key bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// 64 hexadecimal characters.
    #[default]
    Hex,
    /// Standard-alphabet, padded base64 (44 characters).
    Base64,
    /// The UTF-8 bytes of the string itself (32 ASCII characters).
    Raw,
}

impl std::fmt::Display for KeyEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeyEncoding::Hex => "hex",
            KeyEncoding::Base64 => "base64",
            KeyEncoding::Raw => "raw",
        })
    }
}

/// Decode `source` into the process key.
///
/// Surrounding whitespace is ignored for `hex` and `base64`. `raw` material is
/// used byte for byte, so spaces count towards its length.
///
/// # Errors
///
/// - [`ConfigurationError::Missing`] if `source` is absent or blank.
/// - [`ConfigurationError::InvalidEncoding`] if it does not decode.
/// - [`ConfigurationError::InvalidLength`] if it decodes to anything but [`KEY_LEN`] bytes.
pub fn load_key(source: Option<&str>, encoding: KeyEncoding) -> Result<SecretKey, ConfigurationError> {
    let text = match source {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(ConfigurationError::Missing),
    };

    let decoded = Zeroizing::new(match encoding {
        KeyEncoding::Hex => {
            hex::decode(text.trim()).map_err(|_| ConfigurationError::InvalidEncoding(encoding))?
        }
        KeyEncoding::Base64 => STANDARD
            .decode(text.trim())
            .map_err(|_| ConfigurationError::InvalidEncoding(encoding))?,
        KeyEncoding::Raw => text.as_bytes().to_vec(),
    });

    let key = SecretKey::from_slice(&decoded)?;
    info!(%encoding, "encryption key loaded");
    Ok(key)
}
