use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory liveness map of sessions currently producing EEG data.
///
/// Updated on every accepted ingestion; read by the status endpoint and
/// pruned by a background sweeper.
#[derive(Clone)]
pub struct SessionTracker {
    sessions: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record activity for a session at the current wall time.
    pub fn touch(&self, session_id: Uuid) {
        self.sessions.write().insert(session_id, Utc::now());
    }

    pub fn last_seen(&self, session_id: &Uuid) -> Option<DateTime<Utc>> {
        self.sessions.read().get(session_id).copied()
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Copy of the full liveness map for status reporting.
    pub fn snapshot(&self) -> HashMap<Uuid, DateTime<Utc>> {
        self.sessions.read().clone()
    }

    /// Remove sessions with no activity in the last N seconds.
    pub fn cleanup_stale(&self, timeout_seconds: i64) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        self.sessions.write().retain(|_, last_seen| {
            let is_stale = (now - *last_seen).num_seconds() >= timeout_seconds;
            if is_stale {
                removed += 1;
            }
            !is_stale
        });
        removed
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
