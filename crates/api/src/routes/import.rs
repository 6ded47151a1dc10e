//! Route definitions for the product-import pipeline.
//!
//! Mounted at `/import`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
///
/// ```text
/// POST   /start                    -> start_import
/// GET    /status/{session_id}      -> get_status
/// GET    /history                  -> get_history
/// DELETE /session/{session_id}     -> delete_session
/// GET    /connectors               -> list_connectors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(import::start_import))
        .route("/status/{session_id}", get(import::get_status))
        .route("/history", get(import::get_history))
        .route("/session/{session_id}", delete(import::delete_session))
        .route("/connectors", get(import::list_connectors))
}
