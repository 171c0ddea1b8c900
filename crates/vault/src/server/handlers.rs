//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::{
    protocol::{
        CreateRecordRequest, ErrorResponse, ExportEntry, HealthResponse, RecordResponse,
        RecordSummary, UpdateRecordRequest,
    },
    ServiceError,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{
    auth::AdminSession,
    error::ApiError,
    extract::{Json, Path},
    state::AppState,
};
use crate::crypto;
use crate::records::CredentialRecord;

/// Query string for `GET /records`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring the site must contain.
    pub site: Option<String>,
}

/// `POST /records`: encrypt the password and store a new record.
pub async fn create_record(
    State(state): State<AppState>,
    session: AdminSession,
    Json(req): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordSummary>), ApiError> {
    let site = validated_site(&req.site)?;
    let plaintext = Zeroizing::new(req.password);
    let password = crypto::encrypt(&state.key, &plaintext)?;

    let record = CredentialRecord::new(site, req.username, password);
    state.records.insert(record.clone())?;

    info!(session = %session.session_id, record_id = %record.id, "record created");
    Ok((StatusCode::CREATED, Json(record.summary())))
}

/// `GET /records`: list record summaries, optionally filtered by site.
pub async fn list_records(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<ListQuery>,
) -> Json<Vec<RecordSummary>> {
    let needle = query.site.map(|s| s.to_lowercase());
    let summaries = state
        .records
        .list()
        .iter()
        .filter(|r| match &needle {
            Some(n) => r.site.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .map(CredentialRecord::summary)
        .collect();
    Json(summaries)
}

/// `GET /records/:id`: return one record with its password decrypted.
///
/// A bundle that fails authentication yields `422 secret_unavailable`.
pub async fn get_record(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordResponse>, ApiError> {
    let record = find(&state, id)?;
    let password = crypto::decrypt(&state.key, &record.password).map_err(|err| {
        warn!(session = %session.session_id, record_id = %id, "stored secret failed authentication");
        err
    })?;

    Ok(Json(RecordResponse {
        id: record.id,
        site: record.site,
        username: record.username,
        password: password.as_str().to_owned(),
    }))
}

/// `PUT /records/:id`: update fields; a new password gets a brand-new bundle.
pub async fn update_record(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRecordRequest>,
) -> Result<Json<RecordSummary>, ApiError> {
    let mut record = find(&state, id)?;

    if let Some(site) = &req.site {
        record.site = validated_site(site)?;
    }
    if let Some(username) = req.username {
        record.username = username;
    }
    if let Some(password) = req.password {
        let plaintext = Zeroizing::new(password);
        record.password = crypto::encrypt(&state.key, &plaintext)?;
    }

    state.records.replace(record.clone())?;
    info!(session = %session.session_id, record_id = %id, "record updated");
    Ok(Json(record.summary()))
}

/// `DELETE /records/:id`: remove a record.
pub async fn delete_record(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.records.remove(id)?;
    info!(session = %session.session_id, record_id = %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /records/export`: every record with its password decrypted.
///
/// Unreadable records are reported individually and do not fail the export.
pub async fn export_records(
    State(state): State<AppState>,
    session: AdminSession,
) -> Json<Vec<ExportEntry>> {
    let mut unreadable = 0usize;
    let entries: Vec<ExportEntry> = state
        .records
        .list()
        .into_iter()
        .map(|record| {
            let password = crypto::decrypt(&state.key, &record.password)
                .ok()
                .map(|p| p.as_str().to_owned());
            if password.is_none() {
                unreadable += 1;
                warn!(record_id = %record.id, "skipping unreadable secret in export");
            }
            ExportEntry {
                id: record.id,
                site: record.site,
                username: record.username,
                unreadable: password.is_none(),
                password,
            }
        })
        .collect();

    info!(
        session = %session.session_id,
        total = entries.len(),
        unreadable,
        "records exported"
    );
    Json(entries)
}

/// `GET /health`: liveness check.
///
/// The key is loaded before the listener binds, so a serving process is healthy.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        records: state.records.len(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn find(state: &AppState, id: Uuid) -> Result<CredentialRecord, ApiError> {
    state
        .records
        .get(id)
        .ok_or_else(|| ServiceError::NotFound(format!("record {id} not found")).into())
}

fn validated_site(site: &str) -> Result<String, ApiError> {
    let site = site.trim();
    if site.is_empty() {
        return Err(ServiceError::BadRequest("site must not be empty".into()).into());
    }
    Ok(site.to_owned())
}
