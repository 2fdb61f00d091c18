//! Tiered read coordinator for the people directory.
//!
//! A roster read resolves against three tiers - in-memory cache,
//! persistent store, remote service - in a fixed order decided by the
//! caller's freshness preference. Tier-local failures advance to the next
//! tier and never reach the caller; when every tier misses, the current
//! cache snapshot (possibly empty) is returned as-is.
//!
//! The memory cache accumulates: the store and remote tiers append their
//! rows rather than replacing the cache, and only a staleness miss clears
//! it. A forced refresh over a warm cache therefore grows the snapshot
//! with the newly fetched rows.

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::api::{RemoteSource, FULL_FETCH_COUNT};
use crate::freshness::FreshnessTracker;
use crate::models::Person;
use crate::store::{PersonStore, StoreError};

/// One long-lived instance backs all reads for an app session.
pub struct PersonRepository<S, R> {
    store: S,
    remote: R,
    freshness: FreshnessTracker,
    /// Most recently known-good full set. Guarded so concurrent reads
    /// cannot interleave a read-modify-write.
    cache: Mutex<Vec<Person>>,
}

impl<S: PersonStore, R: RemoteSource> PersonRepository<S, R> {
    pub fn new(store: S, remote: R, freshness: FreshnessTracker) -> Self {
        Self {
            store,
            remote,
            freshness,
            cache: Mutex::new(Vec::new()),
        }
    }

    /// Resolve a full roster read.
    ///
    /// `force_remote = false` tries memory, then store, then remote;
    /// `force_remote = true` tries remote, then memory, then store. Tiers
    /// run strictly in sequence, so a single call performs at most one
    /// remote fetch. Concurrent calls are not single-flighted; two forced
    /// refreshes may both reach the remote service.
    pub async fn get_all_people(&self, force_remote: bool) -> Vec<Person> {
        if force_remote {
            if let Some(people) = self.remote_tier().await {
                return people;
            }
            if let Some(people) = self.memory_tier().await {
                return people;
            }
            if let Some(people) = self.store_tier().await {
                return people;
            }
        } else {
            if let Some(people) = self.memory_tier().await {
                return people;
            }
            if let Some(people) = self.store_tier().await {
                return people;
            }
            if let Some(people) = self.remote_tier().await {
                return people;
            }
        }
        debug!("All tiers missed, returning cache snapshot");
        self.cache.lock().await.clone()
    }

    /// Single-record lookup straight from the persistent store. The memory
    /// and remote tiers are not consulted; a missing row surfaces as
    /// [`StoreError::NotFound`] so the UI can tell it apart from I/O
    /// failures.
    pub fn get_person(&self, id: i64) -> Result<Person, StoreError> {
        self.store.by_id(id)
    }

    /// Memory tier: misses when the cache is empty or the last fetch is
    /// outside the staleness window. A stale cache is dropped on the miss.
    async fn memory_tier(&self) -> Option<Vec<Person>> {
        let mut cache = self.cache.lock().await;
        if cache.is_empty() || self.freshness.is_stale(Utc::now()) {
            debug!("Memory tier miss: cache empty or stale");
            cache.clear();
            None
        } else {
            Some(cache.clone())
        }
    }

    /// Store tier: a non-empty row set hits and is appended into the
    /// memory cache. An empty store is a miss so the remote tier can run.
    async fn store_tier(&self) -> Option<Vec<Person>> {
        match self.store.all_ordered() {
            Ok(rows) if rows.is_empty() => {
                debug!("Store tier miss: no rows");
                None
            }
            Ok(rows) => {
                self.cache.lock().await.extend(rows.iter().cloned());
                Some(rows)
            }
            Err(e) => {
                warn!(error = %e, "Store tier failed");
                None
            }
        }
    }

    /// Remote tier: on success the store is cleared and rewritten with
    /// exactly the fetched set, the rows are appended into the memory
    /// cache, and the fetch marker is advanced. A store write failure
    /// fails the tier; a marker write failure is only logged.
    async fn remote_tier(&self) -> Option<Vec<Person>> {
        let people = match self.remote.fetch_people(FULL_FETCH_COUNT).await {
            Ok(people) => people,
            Err(e) => {
                debug!(error = %e, "Remote tier failed");
                return None;
            }
        };
        if let Err(e) = self.store.delete_all() {
            warn!(error = %e, "Failed to clear store before replace");
            return None;
        }
        if let Err(e) = self.store.save_people(&people) {
            warn!(error = %e, "Failed to write fetched people to store");
            return None;
        }
        self.cache.lock().await.extend(people.iter().cloned());
        if let Err(e) = self.freshness.record_fetch(Utc::now()) {
            warn!(error = %e, "Failed to record fetch marker");
        }
        Some(people)
    }
}

// ============================================================================
// Tests
// ============================================================================
