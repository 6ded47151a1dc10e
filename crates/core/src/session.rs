//! Import session record: status state machine, counters, and log.
//!
//! One [`ImportSession`] exists per import run. The session store in
//! `outfred-pipeline` is the single writer; everything here is the pure
//! shape and the transition rules it enforces.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{SessionId, Timestamp};

// ── Status ───────────────────────────────────────────────────────────

/// Lifecycle status of an import session.
///
/// Transitions are monotonic: `pending → processing → (completed |
/// failed)`. Each terminal state is reached at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether this status ends the session lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    ///
    /// Re-entering the current terminal state is not a valid transition;
    /// the store treats it as an idempotent no-op instead.
    pub fn can_transition_to(&self, next: ImportStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Source description ───────────────────────────────────────────────

/// Where an import pulls its candidates from. Fixed at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Website,
    Api,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Website => "website",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific payload captured at session creation.
///
/// Which fields must be present depends on the session's [`SourceType`];
/// see [`SourceData::validate_for`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceData {
    /// Raw CSV text (already read client-side). Required for `csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_content: Option<String>,
    /// Collection/category URL or API endpoint. Required for `website`
    /// and `api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional bearer-style key sent with API reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl SourceData {
    /// Check that the payload carries what the given source type needs.
    pub fn validate_for(&self, source_type: SourceType) -> Result<(), CoreError> {
        match source_type {
            SourceType::Csv => {
                if self.csv_content.as_deref().map_or(true, str::is_empty) {
                    return Err(CoreError::Validation(
                        "csv_content is required for csv imports".to_string(),
                    ));
                }
            }
            SourceType::Website | SourceType::Api => {
                if self.url.as_deref().map_or(true, str::is_empty) {
                    return Err(CoreError::Validation(format!(
                        "url is required for {source_type} imports"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Policy flags read-only during a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImportOptions {
    /// When true, a matched existing product is overwritten instead of
    /// being counted as a duplicate.
    #[serde(default)]
    pub update_existing: bool,
    /// Recorded on the session for an external scheduler; the import
    /// core performs no recurring scheduling itself.
    #[serde(default)]
    pub auto_sync: bool,
}

// ── Outcomes and counters ────────────────────────────────────────────

/// Classification result for a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added,
    Updated,
    Duplicate,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Duplicate => "duplicate",
            Self::Failed => "failed",
        }
    }
}

/// Running counters for a session.
///
/// All counters are monotonically non-decreasing within a run, and
/// `added + updated + duplicates + failed <= total` holds throughout,
/// with equality once the session completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub total: u64,
    pub added: u64,
    pub updated: u64,
    pub duplicates: u64,
    pub failed: u64,
}

impl ImportStats {
    /// Sum of the per-outcome counters.
    pub fn recorded(&self) -> u64 {
        self.added + self.updated + self.duplicates + self.failed
    }

    /// Increment the counter matching `outcome`.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Added => self.added += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Duplicate => self.duplicates += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

// ── Log ──────────────────────────────────────────────────────────────

/// One entry in a session's append-only log.
///
/// The log is advisory progress reporting for the polling client, not a
/// strict audit trail; it is never truncated server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: Timestamp,
    pub message: String,
}

// ── Session record ───────────────────────────────────────────────────

/// The mutable record describing one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSession {
    /// Opaque identifier, generated at start, immutable.
    pub id: SessionId,
    /// Owning merchant; every product created under this session is
    /// attributed to this id.
    pub merchant_id: String,
    pub source_type: SourceType,
    pub source_data: SourceData,
    pub options: ImportOptions,
    pub status: ImportStatus,
    pub stats: ImportStats,
    pub logs: Vec<LogEntry>,
    pub started_at: Timestamp,
    /// Wall-clock duration in milliseconds, fixed once the session
    /// reaches a terminal status.
    pub duration_ms: Option<i64>,
    /// Populated only when `status == failed`.
    pub error: Option<String>,
}

impl ImportSession {
    /// Allocate a fresh session in `pending`.
    pub fn new(
        merchant_id: String,
        source_type: SourceType,
        source_data: SourceData,
        options: ImportOptions,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            merchant_id,
            source_type,
            source_data,
            options,
            status: ImportStatus::Pending,
            stats: ImportStats::default(),
            logs: Vec::new(),
            started_at: chrono::Utc::now(),
            duration_ms: None,
            error: None,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
