use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::subscriber::Subscriber;

/// Per-session fan-out of published EEG records.
///
/// Subscribers live behind a read-write lock keyed by session id, plus a
/// session-less monitor pool. Broadcasts iterate a snapshot taken under
/// the read guard, so concurrent attach/detach never invalidates a walk,
/// and no lock is held across a delivery await.
pub struct EegBus {
    sessions: RwLock<HashMap<Uuid, Vec<Arc<dyn Subscriber>>>>,
    monitors: RwLock<Vec<Arc<dyn Subscriber>>>,
}

/// Subscriber counts reported by the status endpoint.
#[derive(Debug, Clone)]
pub struct BusCounts {
    pub per_session: HashMap<Uuid, usize>,
    pub total: usize,
}

impl EegBus {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            monitors: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscriber for one session. Idempotent: re-attaching an
    /// already-registered subscriber is a no-op.
    pub fn attach(&self, session_id: Uuid, subscriber: Arc<dyn Subscriber>) {
        let mut sessions = self.sessions.write();
        let subs = sessions.entry(session_id).or_default();
        if subs.iter().any(|s| s.id() == subscriber.id()) {
            return;
        }
        subs.push(subscriber);
        debug!(%session_id, count = subs.len(), "subscriber attached");
    }

    /// Register a subscriber for the session-less monitor pool.
    pub fn attach_monitor(&self, subscriber: Arc<dyn Subscriber>) {
        let mut monitors = self.monitors.write();
        if monitors.iter().any(|s| s.id() == subscriber.id()) {
            return;
        }
        monitors.push(subscriber);
    }

    /// Remove a subscriber; the last removal drops the session entry.
    pub fn detach(&self, session_id: Uuid, subscriber_id: Uuid) {
        let mut sessions = self.sessions.write();
        if let Some(subs) = sessions.get_mut(&session_id) {
            subs.retain(|s| s.id() != subscriber_id);
            if subs.is_empty() {
                sessions.remove(&session_id);
            }
        }
    }

    pub fn detach_monitor(&self, subscriber_id: Uuid) {
        self.monitors.write().retain(|s| s.id() != subscriber_id);
    }

    /// Deliver a record to every subscriber of one session.
    ///
    /// Returns the number of successful deliveries. Subscribers observed
    /// to fail are detached before the method returns.
    pub async fn broadcast(&self, session_id: Uuid, record: &Value) -> usize {
        let snapshot: Vec<Arc<dyn Subscriber>> = {
            let sessions = self.sessions.read();
            match sessions.get(&session_id) {
                Some(subs) => subs.clone(),
                None => return 0,
            }
        };

        let (delivered, failed) = Self::deliver_to(&snapshot, record).await;
        for subscriber_id in failed {
            warn!(%session_id, %subscriber_id, "removing failed subscriber");
            self.detach(session_id, subscriber_id);
        }
        delivered
    }

    /// Deliver a record to every subscriber of every session plus the
    /// monitor pool.
    pub async fn broadcast_all(&self, record: &Value) -> usize {
        // Union the snapshots, deduplicating subscribers that appear in
        // several sessions
        let mut snapshot: Vec<(Option<Uuid>, Arc<dyn Subscriber>)> = Vec::new();
        {
            let sessions = self.sessions.read();
            for (session_id, subs) in sessions.iter() {
                for sub in subs {
                    if !snapshot.iter().any(|(_, s)| s.id() == sub.id()) {
                        snapshot.push((Some(*session_id), sub.clone()));
                    }
                }
            }
        }
        {
            let monitors = self.monitors.read();
            for sub in monitors.iter() {
                if !snapshot.iter().any(|(_, s)| s.id() == sub.id()) {
                    snapshot.push((None, sub.clone()));
                }
            }
        }

        let mut delivered = 0;
        for (origin, sub) in &snapshot {
            if !sub.is_alive() {
                self.remove_everywhere(*origin, sub.id());
                continue;
            }
            match sub.deliver(record).await {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(subscriber_id = %sub.id(), %err, "removing failed subscriber");
                    self.remove_everywhere(*origin, sub.id());
                }
            }
        }
        delivered
    }

    /// Per-session and total subscriber counts (monitors included in the
    /// total).
    pub fn counts(&self) -> BusCounts {
        let sessions = self.sessions.read();
        let per_session: HashMap<Uuid, usize> = sessions
            .iter()
            .map(|(id, subs)| (*id, subs.len()))
            .collect();
        let total =
            per_session.values().sum::<usize>() + self.monitors.read().len();
        BusCounts { per_session, total }
    }

    async fn deliver_to(
        snapshot: &[Arc<dyn Subscriber>],
        record: &Value,
    ) -> (usize, Vec<Uuid>) {
        let mut delivered = 0;
        let mut failed = Vec::new();
        for sub in snapshot {
            if !sub.is_alive() {
                failed.push(sub.id());
                continue;
            }
            match sub.deliver(record).await {
                Ok(()) => delivered += 1,
                Err(_) => failed.push(sub.id()),
            }
        }
        (delivered, failed)
    }

    fn remove_everywhere(&self, origin: Option<Uuid>, subscriber_id: Uuid) {
        match origin {
            Some(session_id) => self.detach(session_id, subscriber_id),
            None => self.detach_monitor(subscriber_id),
        }
    }
}

impl Default for EegBus {
    fn default() -> Self {
        Self::new()
    }
}
