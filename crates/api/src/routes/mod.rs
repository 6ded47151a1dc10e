pub mod health;
pub mod import;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /import/start                      start an import session (POST)
/// /import/status/{session_id}        poll session state (GET)
/// /import/history?merchant_id=       a merchant's sessions, newest first (GET)
/// /import/session/{session_id}       delete a session (DELETE)
/// /import/connectors                 supported source types (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/import", import::router())
}
