//! AES-256-GCM secret-field encryption.
//!
//! This module is intentionally free of storage and HTTP dependencies.
//! It provides the only encrypt/decrypt operations in the service.
//!
//! # Bundle format
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext)>.<base64url-no-pad(tag)>
//! ```
//!
//! The `v1` prefix leaves room for a future layout change without breaking
//! bundles already in storage.

pub mod bundle;
pub mod cipher;

pub use bundle::CiphertextBundle;
pub use cipher::{decrypt, encrypt, DecryptionError, EncryptionError};
