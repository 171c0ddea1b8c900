//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::key::SecretKey;
use crate::records::RecordStore;

use super::auth::AdminVerifier;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying expensive data.
/// Nothing here is mutated per request; identity travels with the request as
/// an [`super::auth::AdminSession`].
#[derive(Clone)]
pub struct AppState {
    /// The process key, read-only after startup.
    pub key: Arc<SecretKey>,
    /// Credential record storage.
    pub records: Arc<dyn RecordStore>,
    /// Verifier for the admin bearer token.
    pub admin: AdminVerifier,
}

impl AppState {
    /// Create a new [`AppState`] from its parts.
    pub fn new(key: SecretKey, records: Arc<dyn RecordStore>, admin: AdminVerifier) -> Self {
        Self {
            key: Arc::new(key),
            records,
            admin,
        }
    }
}
