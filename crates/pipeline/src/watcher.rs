//! Session watcher: an explicit polling task with a caller-owned
//! cancellation handle.
//!
//! Replaces the ambient interval timer a browser client would use.
//! The watcher polls the store on a fixed interval, publishes each
//! snapshot through a `watch` channel, and exits on its own when the
//! session reaches a terminal status or disappears. Stopping the
//! watcher is a local action only: it never aborts the server-side run.

use std::sync::Arc;
use std::time::Duration;

use outfred_core::error::CoreError;
use outfred_core::session::ImportSession;
use outfred_core::types::SessionId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::SessionStore;

/// Default polling interval, matching the original 2-second client
/// cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Handle to a running poll task.
pub struct SessionWatcher {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    receiver: watch::Receiver<ImportSession>,
}

impl SessionWatcher {
    /// Start watching a session.
    ///
    /// Fails immediately if the session does not exist; afterwards the
    /// task runs until the session is terminal, deleted, or the
    /// watcher is stopped.
    pub async fn spawn(
        store: Arc<SessionStore>,
        session_id: SessionId,
        interval: Duration,
    ) -> Result<Self, CoreError> {
        let initial = store.get(session_id).await?;
        let (sender, receiver) = watch::channel(initial.clone());
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            if initial.status.is_terminal() {
                return;
            }
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                match store.get(session_id).await {
                    Ok(session) => {
                        let terminal = session.status.is_terminal();
                        // Receivers may all be gone; polling continues
                        // harmlessly until terminal either way.
                        let _ = sender.send(session);
                        if terminal {
                            break;
                        }
                    }
                    Err(_) => {
                        tracing::debug!(%session_id, "Watched session disappeared");
                        break;
                    }
                }
            }
        });

        Ok(Self {
            cancel,
            handle,
            receiver,
        })
    }

    /// Subscribe to session snapshots.
    pub fn subscribe(&self) -> watch::Receiver<ImportSession> {
        self.receiver.clone()
    }

    /// Stop watching. Local-only: the import run, if any, continues
    /// server-side.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Wait for the poll task to finish (terminal session, deletion, or
    /// a prior [`stop`](Self::stop)).
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

// ── Tests ────────────────────────────────────────────────────────────
