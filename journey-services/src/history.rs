//! Per-user journey history storage.
//!
//! The services only see the [`JourneyHistoryStore`] trait. The in-memory
//! store suits a single process; multi-instance deployments implement the
//! trait over shared storage.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use liberation::{JourneyHistory, JourneyStage};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::types::Result;

/// Keyed store of bounded stage histories.
#[async_trait]
pub trait JourneyHistoryStore: Send + Sync {
    /// Stages recorded for a user, oldest first. Unknown users have none.
    async fn get(&self, user_id: &str) -> Result<Vec<JourneyStage>>;

    /// Record a stage for a user and return the resulting history.
    ///
    /// Repeating the latest stage is a no-op and the history never grows past
    /// its cap. Concurrent appends for one user must not interleave.
    async fn append_bounded(&self, user_id: &str, stage: JourneyStage) -> Result<Vec<JourneyStage>>;

    /// Drop histories idle past their expiry, returning how many were dropped.
    async fn evict_expired(&self) -> Result<usize>;
}

struct HistoryEntry {
    history: JourneyHistory,
    touched_at: DateTime<Utc>,
}

/// Process-local history store.
///
/// Appends hold the per-key entry lock so append-and-trim is atomic for a
/// user while different users proceed independently.
pub struct InMemoryHistoryStore {
    entries: DashMap<String, HistoryEntry>,
    cap: usize,
    expiry: Option<Duration>,
}

impl InMemoryHistoryStore {
    /// Create a store with the given cap and optional idle expiry.
    pub fn new(cap: usize, expiry: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            cap: cap.max(1),
            expiry,
        }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.cap, config.expiry_secs.map(Duration::from_secs))
    }

    /// Number of users with a stored history.
    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    fn is_expired(&self, entry: &HistoryEntry, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.expiry else {
            return false;
        };
        // A clock step backwards yields a negative age, which is never expired
        (now - entry.touched_at)
            .to_std()
            .map(|age| age > ttl)
            .unwrap_or(false)
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

#[async_trait]
impl JourneyHistoryStore for InMemoryHistoryStore {
    async fn get(&self, user_id: &str) -> Result<Vec<JourneyStage>> {
        let now = Utc::now();

        // The read guard must be released before removing the entry
        match self.entries.get(user_id) {
            None => return Ok(Vec::new()),
            Some(entry) if !self.is_expired(&entry, now) => return Ok(entry.history.to_vec()),
            Some(_) => {}
        }

        self.entries.remove_if(user_id, |_, entry| self.is_expired(entry, now));
        debug!(user_id = %user_id, "Expired journey history dropped on read");
        Ok(Vec::new())
    }

    async fn append_bounded(&self, user_id: &str, stage: JourneyStage) -> Result<Vec<JourneyStage>> {
        let now = Utc::now();

        let mut entry = self
            .entries
            .entry(user_id.to_string())
            .or_insert_with(|| HistoryEntry {
                history: JourneyHistory::new(),
                touched_at: now,
            });

        if self.is_expired(&entry, now) {
            entry.history = JourneyHistory::new();
        }

        let appended = entry.history.record(stage, self.cap);
        entry.touched_at = now;

        debug!(
            user_id = %user_id,
            stage = %stage,
            appended = appended,
            len = entry.history.len(),
            "Journey history updated"
        );

        Ok(entry.history.to_vec())
    }

    async fn evict_expired(&self) -> Result<usize> {
        if self.expiry.is_none() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut evicted = 0;
        self.entries.retain(|_, entry| {
            let keep = !self.is_expired(entry, now);
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            debug!(evicted = evicted, remaining = self.entries.len(), "Expired journey histories evicted");
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_unknown_user_has_empty_history() {
        let store = InMemoryHistoryStore::default();
        assert!(store.get("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_collapses_consecutive_repeats() {
        let store = InMemoryHistoryStore::default();
        store.append_bounded("u1", JourneyStage::Crisis).await.unwrap();
        store.append_bounded("u1", JourneyStage::Crisis).await.unwrap();
        store.append_bounded("u1", JourneyStage::Stabilization).await.unwrap();
        let history = store.append_bounded("u1", JourneyStage::Crisis).await.unwrap();

        assert_eq!(
            history,
            vec![JourneyStage::Crisis, JourneyStage::Stabilization, JourneyStage::Crisis]
        );
        assert_eq!(store.get("u1").await.unwrap(), history);
    }

    #[tokio::test]
    async fn test_append_trims_oldest() {
        let store = InMemoryHistoryStore::new(3, None);
        for stage in [
            JourneyStage::Crisis,
            JourneyStage::Stabilization,
            JourneyStage::Growth,
            JourneyStage::CommunityHealing,
        ] {
            store.append_bounded("u1", stage).await.unwrap();
        }

        assert_eq!(
            store.get("u1").await.unwrap(),
            vec![JourneyStage::Stabilization, JourneyStage::Growth, JourneyStage::CommunityHealing]
        );
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = InMemoryHistoryStore::default();
        store.append_bounded("a", JourneyStage::Growth).await.unwrap();
        store.append_bounded("b", JourneyStage::Crisis).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), vec![JourneyStage::Growth]);
        assert_eq!(store.get("b").await.unwrap(), vec![JourneyStage::Crisis]);
        assert_eq!(store.user_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_appends_respect_cap() {
        let store = Arc::new(InMemoryHistoryStore::new(5, None));
        let mut handles = Vec::new();
        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let stage = JourneyStage::all()[i % 5];
                store.append_bounded("shared", stage).await.unwrap()
            }));
        }
        for handle in handles {
            let history = handle.await.unwrap();
            assert!(history.len() <= 5);
        }
        let history = store.get("shared").await.unwrap();
        assert!(history.len() <= 5);
        assert!(history.windows(2).all(|w| w[0] != w[1]));
    }

    #[tokio::test]
    async fn test_expired_histories_are_evicted() {
        let store = InMemoryHistoryStore::new(20, Some(Duration::ZERO));
        store.append_bounded("u1", JourneyStage::Growth).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.evict_expired().await.unwrap(), 1);
        assert!(store.get("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_history_reads_empty() {
        let store = InMemoryHistoryStore::new(20, Some(Duration::ZERO));
        store.append_bounded("u1", JourneyStage::Growth).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(store.get("u1").await.unwrap().is_empty());
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_no_expiry_keeps_everything() {
        let store = InMemoryHistoryStore::default();
        store.append_bounded("u1", JourneyStage::Growth).await.unwrap();
        assert_eq!(store.evict_expired().await.unwrap(), 0);
        assert_eq!(store.user_count(), 1);
    }
}
