use crate::error::{RegistryError, Result};
use crate::visitor::{ENGAGEMENT_CAP, INITIAL_ENGAGEMENT, VisitorRecord};
use chrono::{DateTime, Duration, Utc};
use orbweaver_detect::ClientProfile;
use rand::Rng;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Visitors inactive for longer than this are pruned
pub const DEFAULT_TTL_MINUTES: i64 = 30;

pub fn default_ttl() -> Duration {
    Duration::minutes(DEFAULT_TTL_MINUTES)
}

/// In-memory session store: one record per active session id.
///
/// Iteration order is insertion order, which the mesh graph depends on
/// for its forced neighbor chaining. Callers that share a registry
/// across request handlers must wrap it in a mutex; the registry itself
/// carries no locking.
#[derive(Debug, Default)]
pub struct VisitorRegistry {
    records: HashMap<String, VisitorRecord>,
    order: Vec<String>,
}

impl VisitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh opaque session token
    pub fn issue_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<&VisitorRecord> {
        self.records.get(session_id)
    }

    /// Create the record for a new session, or fold another tracked
    /// request into an existing one. The classifier closure is only
    /// invoked when the session is new.
    pub fn upsert<F, R>(
        &mut self,
        session_id: &str,
        now: DateTime<Utc>,
        profile_fn: F,
        rng: &mut R,
    ) -> &VisitorRecord
    where
        F: FnOnce() -> ClientProfile,
        R: Rng,
    {
        match self.records.entry(session_id.to_string()) {
            Entry::Occupied(entry) => {
                let record = entry.into_mut();
                record.revisit(now);
                debug!(
                    visitor = %record.name,
                    page_visits = record.page_visits,
                    engagement = record.engagement_score,
                    "visitor updated"
                );
                record
            }
            Entry::Vacant(entry) => {
                self.order.push(session_id.to_string());
                let record = entry.insert(VisitorRecord::new(
                    session_id.to_string(),
                    profile_fn(),
                    now,
                    rng,
                ));
                debug!(
                    visitor = %record.name,
                    browser = %record.client_info.summary.browser_full,
                    ip = %record.client_info.network.ip_address,
                    "new visitor"
                );
                record
            }
        }
    }

    /// Insert a prebuilt record (synthetic visitors, tests). Replaces
    /// any record already stored under the same id.
    pub fn insert(&mut self, record: VisitorRecord) {
        if !self.records.contains_key(&record.id) {
            self.order.push(record.id.clone());
        }
        self.records.insert(record.id.clone(), record);
    }

    /// Drop every record whose last activity is `ttl` or older. The map
    /// is rebuilt from the retained subset rather than deleted from in
    /// place. Returns the number of records removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.records.len();
        let retained: HashMap<String, VisitorRecord> = self
            .records
            .drain()
            .filter(|(_, record)| now.signed_duration_since(record.last_seen) < ttl)
            .collect();
        self.records = retained;
        self.order.retain(|id| self.records.contains_key(id));

        let removed = before - self.records.len();
        if removed > 0 {
            debug!(removed, active = self.records.len(), "pruned inactive visitors");
        }
        removed
    }

    /// Snapshot of all records in insertion order
    pub fn all(&self) -> Vec<&VisitorRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    /// Defensive invariant check; not expected to fail in normal
    /// operation.
    pub fn validate(&self) -> Result<()> {
        for record in self.records.values() {
            if record.page_visits < 1 {
                return Err(RegistryError::InvalidSessionState(format!(
                    "visitor {} has no tracked visits",
                    record.id
                )));
            }
            if record.engagement_score < INITIAL_ENGAGEMENT
                || record.engagement_score > ENGAGEMENT_CAP
            {
                return Err(RegistryError::InvalidSessionState(format!(
                    "visitor {} engagement {} out of range",
                    record.id, record.engagement_score
                )));
            }
            if record.last_seen < record.first_seen {
                return Err(RegistryError::InvalidSessionState(format!(
                    "visitor {} seen before first contact",
                    record.id
                )));
            }
        }
        if self.order.len() != self.records.len() {
            return Err(RegistryError::InvalidSessionState(
                "insertion-order index out of sync".to_string(),
            ));
        }
        Ok(())
    }
}
