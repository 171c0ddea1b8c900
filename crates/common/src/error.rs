//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Unauthorized`] → 401
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Conflict`] → 409
/// - [`ServiceError::Timeout`] → 408
/// - [`ServiceError::SecretUnavailable`] → 422
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: empty password, blank site, invalid JSON or
    /// a bad path parameter.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No valid admin session accompanied the request.
    #[error("unauthorized")]
    Unauthorized,

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write collides with an existing record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A stored secret failed authentication and cannot be shown.
    ///
    /// Deliberately carries no detail: callers learn only that the secret is
    /// unreadable, never which check rejected it.
    #[error("secret unavailable")]
    SecretUnavailable,

    /// Encryption failed inside the cipher layer.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// An unexpected failure outside the cipher layer, such as a middleware error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Unauthorized => 401,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Timeout => 408,
            ServiceError::SecretUnavailable => 422,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Returns the short machine-readable code used in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Timeout => "request_timeout",
            ServiceError::SecretUnavailable => "secret_unavailable",
            ServiceError::EncryptionFailure(_) | ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::Unauthorized.http_status(), 401);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::Conflict("x".into()).http_status(), 409);
        assert_eq!(ServiceError::Timeout.http_status(), 408);
        assert_eq!(ServiceError::SecretUnavailable.http_status(), 422);
        assert_eq!(
            ServiceError::EncryptionFailure("x".into()).http_status(),
            500
        );
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("password must not be empty".into());
        assert!(e.to_string().contains("password must not be empty"));
    }

    #[test]
    fn crypto_failures_share_internal_code() {
        assert_eq!(
            ServiceError::EncryptionFailure("aead".into()).code(),
            ServiceError::Internal("x".into()).code()
        );
        assert_eq!(ServiceError::SecretUnavailable.code(), "secret_unavailable");
    }
}
