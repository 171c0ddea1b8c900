//! Request and response types exchanged over the public HTTP API.
//!
//! Types that carry a plaintext password implement [`std::fmt::Debug`] by hand
//! so the secret can never end up in a log line through `{:?}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const REDACTED: &str = "[REDACTED]";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Request body for `POST /records`.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    /// Site or service the credential belongs to.
    pub site: String,
    /// Account name on that site.
    pub username: String,
    /// Plaintext password; encrypted before it reaches the store.
    pub password: String,
}

impl fmt::Debug for CreateRecordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateRecordRequest")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Request body for `PUT /records/:id`.
///
/// Absent fields are left unchanged. A present `password` is encrypted into a
/// brand-new bundle.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for UpdateRecordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRecordRequest")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Record listing entry. Never contains secret material, not even ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: Uuid,
    pub site: String,
    pub username: String,
}

/// Response body for `GET /records/:id`: the record with its password decrypted.
#[derive(Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: Uuid,
    pub site: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RecordResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordResponse")
            .field("id", &self.id)
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// One entry of `GET /records/export`.
///
/// Records whose bundle fails authentication are reported with
/// `password: None` and `unreadable: true` instead of aborting the export.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExportEntry {
    pub id: Uuid,
    pub site: String,
    pub username: String,
    pub password: Option<String>,
    pub unreadable: bool,
}

impl fmt::Debug for ExportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportEntry")
            .field("id", &self.id)
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("unreadable", &self.unreadable)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; always `"ok"` once the process is serving.
    pub status: String,
    /// Number of credential records currently stored.
    pub records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_debug_redacts_password() {
        let req = CreateRecordRequest {
            site: "example.com".into(),
            username: "alice".into(),
            password: "hunter2-secret".into(),
        };
        let dbg = format!("{req:?}");
        assert!(dbg.contains("example.com"));
        assert!(!dbg.contains("hunter2-secret"));
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let req: UpdateRecordRequest = serde_json::from_value(json!({"site": "x"})).unwrap();
        assert_eq!(req.site.as_deref(), Some("x"));
        assert!(req.username.is_none());
        assert!(req.password.is_none());
        assert!(!format!("{:?}", UpdateRecordRequest {
            password: Some("pw-123".into()),
            ..Default::default()
        })
        .contains("pw-123"));
    }

    #[test]
    fn record_response_debug_redacts_password() {
        let resp = RecordResponse {
            id: Uuid::new_v4(),
            site: "example.com".into(),
            username: "alice".into(),
            password: "hunter2-secret".into(),
        };
        assert!(!format!("{resp:?}").contains("hunter2-secret"));
    }

    #[test]
    fn export_entry_serialises_unreadable_as_null_password() {
        let entry = ExportEntry {
            id: Uuid::nil(),
            site: "s".into(),
            username: "u".into(),
            password: None,
            unreadable: true,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value["password"].is_null());
        assert_eq!(value["unreadable"], true);
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "password must not be empty");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("password"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            records: 3,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.records, 3);
    }
}
