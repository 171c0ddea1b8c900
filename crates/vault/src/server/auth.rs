//! Request-scoped admin authentication.
//!
//! There is no process-wide "logged in" flag. Every request that touches
//! records must present `Authorization: Bearer <ADMIN_TOKEN>` (scheme matched
//! case-insensitively), and the
//! [`AdminSession`] extractor turns that into a value that lives exactly as
//! long as the request.

use std::fmt;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use anyhow::{anyhow, Result};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use common::ServiceError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{error::ApiError, state::AppState};

type HmacSha256 = Hmac<Sha256>;

/// Checks presented bearer tokens against the configured admin token.
///
/// The configured token is MACed once under a per-process random key and only
/// the resulting tag is kept. A presented token is MACed under the same key
/// and compared with [`Mac::verify_slice`], which runs in constant time and
/// does not depend on either token's length.
#[derive(Clone)]
pub struct AdminVerifier {
    keyed: HmacSha256,
    expected: [u8; 32],
}

impl AdminVerifier {
    /// Build a verifier for `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HMAC cannot be keyed (unreachable for HMAC-SHA256).
    pub fn new(token: &str) -> Result<Self> {
        let mut mac_key = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut mac_key[..]);
        let keyed = <HmacSha256 as Mac>::new_from_slice(&mac_key[..])
            .map_err(|e| anyhow!("failed to key admin token verifier: {e}"))?;

        let mut mac = keyed.clone();
        mac.update(token.as_bytes());
        let expected = mac.finalize().into_bytes().into();

        Ok(Self { keyed, expected })
    }

    /// Returns `true` if `presented` equals the configured token.
    pub fn verify(&self, presented: &str) -> bool {
        let mut mac = self.keyed.clone();
        mac.update(presented.as_bytes());
        mac.verify_slice(&self.expected).is_ok()
    }
}

impl fmt::Debug for AdminVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminVerifier([REDACTED])")
    }
}

/// Proof that the current request carried a valid admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    /// Random id correlating this request's log lines.
    pub session_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        match presented {
            Some(token) if state.admin.verify(token) => {
                let session = AdminSession {
                    session_id: Uuid::new_v4(),
                };
                debug!(session = %session.session_id, "admin session opened");
                Ok(session)
            }
            Some(_) => {
                warn!(path = %parts.uri.path(), "rejected invalid admin token");
                Err(ServiceError::Unauthorized.into())
            }
            None => Err(ServiceError::Unauthorized.into()),
        }
    }
}

/// Token from a `Bearer` credential; the scheme name is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_configured_token() {
        let verifier = AdminVerifier::new("s3cret-admin").unwrap();
        assert!(verifier.verify("s3cret-admin"));
    }

    #[test]
    fn rejects_other_tokens() {
        let verifier = AdminVerifier::new("s3cret-admin").unwrap();
        assert!(!verifier.verify(""));
        assert!(!verifier.verify("s3cret-admin "));
        assert!(!verifier.verify("s3cret-admiN"));
        assert!(!verifier.verify(&"s3cret-admin".repeat(10)));
    }

    #[test]
    fn independent_verifiers_agree() {
        let a = AdminVerifier::new("token").unwrap();
        let b = AdminVerifier::new("token").unwrap();
        assert_ne!(a.expected, b.expected);
        assert!(a.verify("token") && b.verify("token"));
    }

    #[test]
    fn bearer_scheme_ignores_case() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearerabc"), None);
    }

    #[test]
    fn debug_is_redacted() {
        let verifier = AdminVerifier::new("token").unwrap();
        assert_eq!(format!("{verifier:?}"), "AdminVerifier([REDACTED])");
    }
}
