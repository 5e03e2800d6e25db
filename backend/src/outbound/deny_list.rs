//! In-memory deny list with a time-to-live per entry.
//!
//! Entries are keyed by caller address (falling back to the request path).
//! A repeat offence refreshes the entry and bumps its hit count. Expired
//! entries are pruned whenever a new rejection is recorded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{DenyListError, DenyListRecorder};
use crate::domain::{DenyListEntry, DenyReason};

/// One active deny-list record as seen by operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedCaller {
    /// Peer address, or the request path when no peer was known.
    pub key: String,
    /// Reason of the most recent rejection.
    pub last_reason: DenyReason,
    /// Rejections recorded while the entry stayed active.
    pub hits: u32,
    /// When the entry was created.
    pub first_recorded_at: DateTime<Utc>,
    /// When the entry was last refreshed; the TTL runs from here.
    pub last_recorded_at: DateTime<Utc>,
}

impl DeniedCaller {
    fn is_active(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.last_recorded_at + ttl > now
    }
}

/// Deny-list recorder keeping recent rejections in memory.
#[derive(Clone)]
pub struct InMemoryDenyList {
    clock: Arc<dyn Clock + Send + Sync>,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, DeniedCaller>>>,
}

impl InMemoryDenyList {
    /// Create an empty deny list whose entries expire `ttl` after the last
    /// rejection.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chrono::Duration;
    /// use mockable::DefaultClock;
    /// use notification_pull::outbound::deny_list::InMemoryDenyList;
    ///
    /// let deny_list = InMemoryDenyList::new(Arc::new(DefaultClock), Duration::hours(1));
    /// assert!(deny_list.active_entries().is_empty());
    /// ```
    pub fn new(clock: Arc<dyn Clock + Send + Sync>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Entries still within their TTL, oldest first.
    pub fn active_entries(&self) -> Vec<DeniedCaller> {
        let now = self.clock.utc();
        let Ok(entries) = self.entries.lock() else {
            return Vec::new();
        };
        let mut active: Vec<DeniedCaller> = entries
            .values()
            .filter(|caller| caller.is_active(now, self.ttl))
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            a.first_recorded_at
                .cmp(&b.first_recorded_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        active
    }
}

#[async_trait]
impl DenyListRecorder for InMemoryDenyList {
    async fn record(&self, entry: &DenyListEntry) -> Result<(), DenyListError> {
        let now = self.clock.utc();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DenyListError::storage("deny list lock poisoned"))?;

        let before = entries.len();
        entries.retain(|_, caller| caller.is_active(now, self.ttl));
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!(pruned, "expired deny-list entries removed");
        }

        entries
            .entry(entry.key().to_owned())
            .and_modify(|caller| {
                caller.last_reason = entry.reason();
                caller.hits = caller.hits.saturating_add(1);
                caller.last_recorded_at = now;
            })
            .or_insert_with(|| DeniedCaller {
                key: entry.key().to_owned(),
                last_reason: entry.reason(),
                hits: 1,
                first_recorded_at: now,
                last_recorded_at: now,
            });
        Ok(())
    }
}
