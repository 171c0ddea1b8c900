//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.
//! Errors raised by the tower layers themselves are turned into
//! [`ErrorResponse`](common::protocol::ErrorResponse) bodies by [`handle_error`].

use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, Router};
use common::ServiceError;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    BoxError, ServiceBuilder,
};
use tracing::warn;

use super::error::ApiError;

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extension trait applying the request timeout to a [`Router`].
pub trait RouterTimeoutExt {
    /// Fail requests that run longer than `request_timeout` with
    /// `408 request_timeout`.
    fn with_request_timeout(self, request_timeout: Duration) -> Self;
}

impl<S> RouterTimeoutExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_request_timeout(self, request_timeout: Duration) -> Self {
        self.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
    }
}

/// Render a tower middleware failure as an [`ApiError`].
///
/// An elapsed timeout becomes `408 request_timeout`; anything else is a `500`.
pub async fn handle_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        warn!("request timeout exceeded");
        ServiceError::Timeout.into()
    } else {
        ServiceError::Internal(err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::get,
    };
    use common::protocol::ErrorResponse;
    use tower::ServiceExt;

    #[tokio::test]
    async fn elapsed_maps_to_request_timeout() {
        let resp = handle_error(Box::new(Elapsed::new())).await.into_response();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn other_layer_errors_are_internal() {
        let resp = handle_error("boom".into()).await.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn slow_request_gets_json_timeout_body() {
        let app: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .with_request_timeout(Duration::from_millis(20));

        let req = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "request_timeout");
    }
}
