//! Handlers for the product-import pipeline.
//!
//! Provides endpoints for starting an import session, polling its
//! status, listing a merchant's import history, deleting a session,
//! and describing the supported source connectors.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use outfred_core::connectors::{supported_connectors, ConnectorDescriptor};
use outfred_core::error::CoreError;
use outfred_core::session::{ImportOptions, ImportSession, SourceData, SourceType};
use outfred_core::types::SessionId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Most sessions a history request may return in one page.
const MAX_HISTORY_LIMIT: usize = 100;

/// Default history page size.
const DEFAULT_HISTORY_LIMIT: usize = 50;

// ── Start ────────────────────────────────────────────────────────────

/// Request body for starting an import.
#[derive(Debug, Deserialize)]
pub struct StartImportRequest {
    pub merchant_id: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub source_data: SourceData,
    #[serde(default)]
    pub options: ImportOptions,
}

/// Typed response for the start endpoint.
#[derive(Debug, Serialize)]
pub struct StartImportResult {
    pub session_id: SessionId,
    pub message: &'static str,
}

/// POST /api/v1/import/start
///
/// Validate the request, create a session in `pending`, and launch the
/// run. Invalid input is rejected before any session exists.
pub async fn start_import(
    State(state): State<AppState>,
    Json(body): Json<StartImportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StartImportResult>>)> {
    if body.merchant_id.trim().is_empty() {
        return Err(CoreError::Validation("merchant_id must not be empty".to_string()).into());
    }
    body.source_data.validate_for(body.source_type)?;

    let session = state
        .store
        .create(
            body.merchant_id,
            body.source_type,
            body.source_data,
            body.options,
        )
        .await;
    state.runner.spawn(session.id);

    tracing::info!(
        session_id = %session.id,
        merchant_id = %session.merchant_id,
        source_type = %session.source_type,
        "Import session created"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: StartImportResult {
                session_id: session.id,
                message: "Import started",
            },
        }),
    ))
}

// ── Status ───────────────────────────────────────────────────────────

/// GET /api/v1/import/status/{session_id}
///
/// Full session record for the polling client; 404 once the session is
/// deleted (or never existed).
pub async fn get_status(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> AppResult<Json<DataResponse<ImportSession>>> {
    let session = state.store.get(session_id).await?;
    Ok(Json(DataResponse { data: session }))
}

// ── History ──────────────────────────────────────────────────────────

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub merchant_id: String,
    pub limit: Option<usize>,
}

/// GET /api/v1/import/history?merchant_id=&limit=
///
/// A merchant's import sessions, newest first.
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<Vec<ImportSession>>>> {
    if params.merchant_id.trim().is_empty() {
        return Err(CoreError::Validation("merchant_id must not be empty".to_string()).into());
    }

    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let mut sessions = state.store.list_by_merchant(&params.merchant_id).await;
    sessions.truncate(limit);

    Ok(Json(DataResponse { data: sessions }))
}

// ── Delete ───────────────────────────────────────────────────────────

/// Typed response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub deleted: bool,
}

/// DELETE /api/v1/import/session/{session_id}
///
/// Remove a session record regardless of its status. Ownership checks
/// are the auth layer's concern.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> AppResult<Json<DataResponse<DeleteResult>>> {
    let deleted = state.store.delete(session_id).await;
    if deleted {
        tracing::info!(%session_id, "Import session deleted");
    }
    Ok(Json(DataResponse {
        data: DeleteResult { deleted },
    }))
}

// ── Connectors ───────────────────────────────────────────────────────

/// GET /api/v1/import/connectors
///
/// Static list of supported source types for the UI; no state.
pub async fn list_connectors() -> Json<DataResponse<Vec<ConnectorDescriptor>>> {
    Json(DataResponse {
        data: supported_connectors(),
    })
}
