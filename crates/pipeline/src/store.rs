//! Import session store: the single source of truth for session state.
//!
//! A process-local concurrent map. Every mutation happens under the
//! write lock, so counter increments are atomic and the status state
//! machine cannot be raced even though candidates may be written from
//! concurrent tasks. This store is the only component permitted to
//! transition `status` or increment `stats`.

use std::collections::HashMap;

use outfred_core::error::CoreError;
use outfred_core::session::{
    ImportOptions, ImportSession, ImportStatus, LogEntry, Outcome, SourceData, SourceType,
};
use outfred_core::types::SessionId;
use tokio::sync::RwLock;

/// Thread-safe session store; wrap in `Arc` and share.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, ImportSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new session in `pending` and return a snapshot of it.
    pub async fn create(
        &self,
        merchant_id: String,
        source_type: SourceType,
        source_data: SourceData,
        options: ImportOptions,
    ) -> ImportSession {
        let session = ImportSession::new(merchant_id, source_type, source_data, options);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    /// Snapshot a session by id.
    pub async fn get(&self, id: SessionId) -> Result<ImportSession, CoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "ImportSession",
                id: id.to_string(),
            })
    }

    /// Remove a session regardless of its status. Returns whether a
    /// record existed. Authorization is the caller's concern.
    pub async fn delete(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// All sessions for a merchant, newest first.
    pub async fn list_by_merchant(&self, merchant_id: &str) -> Vec<ImportSession> {
        let mut sessions: Vec<ImportSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|session| session.merchant_id == merchant_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions
    }

    /// Append one log entry. Append-only; never blocks on size.
    pub async fn append_log(
        &self,
        id: SessionId,
        message: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.with_session(id, |session| {
            session.logs.push(LogEntry {
                time: chrono::Utc::now(),
                message: message.into(),
            });
        })
        .await
    }

    /// Atomically increment the counter matching `outcome`.
    pub async fn record_outcome(&self, id: SessionId, outcome: Outcome) -> Result<(), CoreError> {
        self.with_session(id, |session| session.stats.record(outcome))
            .await
    }

    /// Set the known-upfront candidate total (CSV row count).
    pub async fn set_total(&self, id: SessionId, total: u64) -> Result<(), CoreError> {
        self.with_session(id, |session| session.stats.total = total)
            .await
    }

    /// Bump the total by one for streamed sources.
    pub async fn increment_total(&self, id: SessionId) -> Result<(), CoreError> {
        self.with_session(id, |session| session.stats.total += 1)
            .await
    }

    /// Apply a status transition.
    ///
    /// Returns `Ok(true)` when the transition applied. Re-entering the
    /// current terminal state is an idempotent no-op (`Ok(false)`), as
    /// is any transition the state machine forbids. Entering a terminal
    /// state fixes the session duration, and a `failed` transition
    /// records the error message.
    pub async fn transition(
        &self,
        id: SessionId,
        next: ImportStatus,
        error: Option<String>,
    ) -> Result<bool, CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "ImportSession",
            id: id.to_string(),
        })?;

        if !session.status.can_transition_to(next) {
            if !(session.status == next && next.is_terminal()) {
                tracing::warn!(
                    session_id = %id,
                    from = %session.status,
                    to = %next,
                    "Rejected import status transition"
                );
            }
            return Ok(false);
        }

        session.status = next;
        if next.is_terminal() {
            let elapsed = chrono::Utc::now() - session.started_at;
            session.duration_ms = Some(elapsed.num_milliseconds());
        }
        if next == ImportStatus::Failed {
            session.error = error;
        }

        Ok(true)
    }

    async fn with_session<F>(&self, id: SessionId, mutate: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut ImportSession),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(CoreError::NotFound {
            entity: "ImportSession",
            id: id.to_string(),
        })?;
        mutate(session);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
