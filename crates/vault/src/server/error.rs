//! Mapping of domain errors onto HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tracing::error;

use crate::crypto::{DecryptionError, EncryptionError};
use crate::records::StoreError;

/// Handler error: a [`ServiceError`] rendered as an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self.0 {
            // Internal detail stays in the logs.
            ServiceError::EncryptionFailure(_) | ServiceError::Internal(_) => {
                error!(error = %self.0, "request failed");
                "the request could not be processed".to_owned()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse::new(self.0.code(), message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<EncryptionError> for ApiError {
    fn from(err: EncryptionError) -> Self {
        Self(match err {
            EncryptionError::EmptyPlaintext => {
                ServiceError::BadRequest("password must not be empty".into())
            }
            other => ServiceError::EncryptionFailure(other.to_string()),
        })
    }
}

impl From<DecryptionError> for ApiError {
    fn from(_: DecryptionError) -> Self {
        Self(ServiceError::SecretUnavailable)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(match err {
            StoreError::NotFound(_) => ServiceError::NotFound(err.to_string()),
            StoreError::Conflict(_) => ServiceError::Conflict(err.to_string()),
        })
    }
}
