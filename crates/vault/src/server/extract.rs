//! Body and path extractors whose rejections render as [`ErrorResponse`] bodies.
//!
//! Axum's own [`axum::Json`] and [`axum::extract::Path`] answer malformed input
//! with plain-text bodies, and a JSON body that parses but does not match the
//! request type with `422`. These wrappers route every rejection through
//! [`ApiError`] instead, so clients always get `{"code", "message"}` and `422`
//! stays reserved for unreadable secrets.
//!
//! [`ErrorResponse`]: common::protocol::ErrorResponse

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use common::ServiceError;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::error::ApiError;

/// Longest rejection detail echoed back to the client.
const MAX_DETAIL_LEN: usize = 200;

/// JSON request body extractor and response wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path parameter extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), "rejected request body");
        if rejection.status().is_client_error() {
            let detail = truncate_detail(&rejection.body_text());
            ServiceError::BadRequest(format!("invalid JSON body: {detail}")).into()
        } else {
            ServiceError::Internal(rejection.body_text()).into()
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(status = %rejection.status(), "rejected path parameters");
        if rejection.status().is_client_error() {
            let detail = truncate_detail(&rejection.body_text());
            ServiceError::BadRequest(format!("invalid path: {detail}")).into()
        } else {
            ServiceError::Internal(rejection.body_text()).into()
        }
    }
}

/// First line of `detail`, capped at [`MAX_DETAIL_LEN`] characters.
fn truncate_detail(detail: &str) -> String {
    detail
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(MAX_DETAIL_LEN)
        .collect()
}
