//! Import orchestrator: drives reader → matcher → catalog → store for
//! one session and decides when the session is done.
//!
//! At most one active run exists per session id; the
//! `pending → processing` transition doubles as the admission check, so
//! a second caller simply finds the transition rejected and backs off.
//! A source-level failure ends the whole session; a failure on a single
//! candidate is recorded and the run moves on.

use std::sync::Arc;

use outfred_core::candidate::CandidateProduct;
use outfred_core::catalog::{NewProduct, ProductPatch};
use outfred_core::error::CoreError;
use outfred_core::matcher::{classify, CatalogIndex, MatchDecision};
use outfred_core::session::{ImportSession, ImportStatus, Outcome, SourceType};
use outfred_core::types::SessionId;
use outfred_sources::client::SourceClient;
use outfred_sources::website::WebsiteReader;
use outfred_sources::{api, csv};

use crate::catalog::{CatalogError, ProductCatalog};
use crate::store::SessionStore;

/// Why a run stopped before completing normally.
enum RunError {
    /// Session-level failure; the session transitions to `failed` with
    /// this message.
    Fatal(String),
    /// The session was deleted mid-run; abandon silently.
    SessionGone,
}

impl From<CoreError> for RunError {
    fn from(_: CoreError) -> Self {
        // Store operations only fail when the record is gone.
        RunError::SessionGone
    }
}

/// Runs import sessions against the catalog.
pub struct ImportRunner {
    store: Arc<SessionStore>,
    catalog: Arc<dyn ProductCatalog>,
    client: SourceClient,
}

impl ImportRunner {
    pub fn new(
        store: Arc<SessionStore>,
        catalog: Arc<dyn ProductCatalog>,
        client: SourceClient,
    ) -> Self {
        Self {
            store,
            catalog,
            client,
        }
    }

    /// Launch the run as a detached task.
    pub fn spawn(self: &Arc<Self>, session_id: SessionId) {
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            runner.run(session_id).await;
        });
    }

    /// Execute one session to a terminal status.
    ///
    /// Safe to call on an already-running or finished session: the
    /// admission transition rejects and the call returns immediately.
    pub async fn run(&self, session_id: SessionId) {
        let session = match self.store.get(session_id).await {
            Ok(session) => session,
            Err(_) => {
                tracing::warn!(%session_id, "Import session vanished before run");
                return;
            }
        };

        match self
            .store
            .transition(session_id, ImportStatus::Processing, None)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    %session_id,
                    status = %session.status,
                    "Ignoring run request for a session that is not pending"
                );
                return;
            }
            Err(_) => return,
        }

        tracing::info!(
            %session_id,
            merchant_id = %session.merchant_id,
            source_type = %session.source_type,
            "Import run started"
        );
        if self
            .store
            .append_log(session_id, "Import started")
            .await
            .is_err()
        {
            return;
        }

        match self.execute(session_id, &session).await {
            Ok(()) => {
                let _ = self
                    .store
                    .transition(session_id, ImportStatus::Completed, None)
                    .await;
                if let Ok(finished) = self.store.get(session_id).await {
                    let stats = finished.stats;
                    let _ = self
                        .store
                        .append_log(
                            session_id,
                            format!(
                                "Import finished: {} added, {} updated, {} duplicates skipped, {} failed",
                                stats.added, stats.updated, stats.duplicates, stats.failed
                            ),
                        )
                        .await;
                    tracing::info!(
                        %session_id,
                        added = stats.added,
                        updated = stats.updated,
                        duplicates = stats.duplicates,
                        failed = stats.failed,
                        "Import run completed"
                    );
                }
            }
            Err(RunError::Fatal(message)) => {
                let _ = self
                    .store
                    .append_log(session_id, format!("Import failed: {message}"))
                    .await;
                let _ = self
                    .store
                    .transition(session_id, ImportStatus::Failed, Some(message.clone()))
                    .await;
                tracing::warn!(%session_id, error = %message, "Import run failed");
            }
            Err(RunError::SessionGone) => {
                tracing::warn!(%session_id, "Import session deleted mid-run; abandoning");
            }
        }
    }

    /// Read the source and process every candidate.
    async fn execute(&self, session_id: SessionId, session: &ImportSession) -> Result<(), RunError> {
        if session.options.auto_sync {
            self.store
                .append_log(
                    session_id,
                    "Auto-sync enabled; an external scheduler will re-run this source",
                )
                .await?;
        }

        // CSV totals are known upfront; streamed sources bump the total
        // per candidate as processing reaches it.
        let (candidates, streamed) = match session.source_type {
            SourceType::Csv => {
                let text = session.source_data.csv_content.as_deref().unwrap_or_default();
                let candidates =
                    csv::read_candidates(text).map_err(|e| RunError::Fatal(e.to_string()))?;
                self.store
                    .set_total(session_id, candidates.len() as u64)
                    .await?;
                (candidates, false)
            }
            SourceType::Website => {
                let url = session.source_data.url.as_deref().unwrap_or_default();
                let candidates = WebsiteReader::default()
                    .read(&self.client, url)
                    .await
                    .map_err(|e| RunError::Fatal(e.to_string()))?;
                (candidates, true)
            }
            SourceType::Api => {
                let url = session.source_data.url.as_deref().unwrap_or_default();
                let candidates = api::read_candidates(
                    &self.client,
                    url,
                    session.source_data.api_key.as_deref(),
                )
                .await
                .map_err(|e| RunError::Fatal(e.to_string()))?;
                (candidates, true)
            }
        };

        if candidates.is_empty() {
            self.store
                .append_log(session_id, "No products found in source")
                .await?;
            return Ok(());
        }

        let existing = self
            .catalog
            .list_for_merchant(&session.merchant_id)
            .await
            .map_err(|e| RunError::Fatal(e.to_string()))?;
        let mut index = CatalogIndex::build(&existing);

        for candidate in candidates {
            if streamed {
                self.store.increment_total(session_id).await?;
            }

            // A failure on one candidate must never sink the run; the
            // catalog write happens before the outcome is recorded.
            let (outcome, log_line) = match self
                .process_candidate(session, &candidate, &mut index)
                .await
            {
                Ok(result) => result,
                Err(e) => (
                    Outcome::Failed,
                    format!("Failed: {}: {e}", candidate.display_name()),
                ),
            };

            self.store.record_outcome(session_id, outcome).await?;
            self.store.append_log(session_id, log_line).await?;
        }

        Ok(())
    }

    /// Classify one candidate and perform the catalog write its outcome
    /// calls for.
    async fn process_candidate(
        &self,
        session: &ImportSession,
        candidate: &CandidateProduct,
        index: &mut CatalogIndex,
    ) -> Result<(Outcome, String), CatalogError> {
        match classify(candidate, index, session.options.update_existing) {
            MatchDecision::Invalid(reason) => Ok((Outcome::Failed, format!("Failed: {reason}"))),
            MatchDecision::Create => {
                let created = self
                    .catalog
                    .create(NewProduct::from_candidate(&session.merchant_id, candidate))
                    .await?;
                // Later rows naming the same product must match it.
                index.insert(&created);
                Ok((Outcome::Added, format!("Added: {}", candidate.display_name())))
            }
            MatchDecision::Update(existing) => {
                self.catalog
                    .update(existing, ProductPatch::from_candidate(candidate))
                    .await?;
                Ok((
                    Outcome::Updated,
                    format!("Updated: {}", candidate.display_name()),
                ))
            }
            MatchDecision::Duplicate(_) => Ok((
                Outcome::Duplicate,
                format!("Duplicate skipped: {}", candidate.display_name()),
            )),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
