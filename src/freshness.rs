//! Durable record of the last successful remote fetch.
//!
//! The marker is a single timestamp slot in the data directory, written
//! after every successful fetch and read back across app restarts. An
//! absent marker means "never fetched" and is infinitely stale.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default staleness window in milliseconds. Overridable through
/// `Config::stale_window_ms` where a different freshness policy is wanted.
pub const DEFAULT_STALE_WINDOW_MS: i64 = 216_000;

/// Marker file name under the data directory
const MARKER_FILE: &str = "last_fetch.json";

#[derive(Debug, Serialize, Deserialize)]
struct FetchMarker {
    last_fetch: DateTime<Utc>,
}

pub struct FreshnessTracker {
    data_dir: PathBuf,
    window: Duration,
}

impl FreshnessTracker {
    pub fn new(data_dir: PathBuf, window: Duration) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir, window })
    }

    pub fn with_default_window(data_dir: PathBuf) -> Result<Self> {
        Self::new(data_dir, Duration::milliseconds(DEFAULT_STALE_WINDOW_MS))
    }

    fn marker_path(&self) -> PathBuf {
        self.data_dir.join(MARKER_FILE)
    }

    /// Instant of the last successful fetch, or the Unix epoch when the
    /// marker was never written or cannot be read. Never fails.
    pub fn last_fetch(&self) -> DateTime<Utc> {
        let path = self.marker_path();
        if !path.exists() {
            return DateTime::UNIX_EPOCH;
        }
        let marker = std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str::<FetchMarker>(&contents).ok());
        match marker {
            Some(marker) => marker.last_fetch,
            None => {
                debug!("Unreadable fetch marker, treating as never fetched");
                DateTime::UNIX_EPOCH
            }
        }
    }

    /// Durably record a successful fetch. Last write wins.
    pub fn record_fetch(&self, at: DateTime<Utc>) -> Result<()> {
        let contents = serde_json::to_string_pretty(&FetchMarker { last_fetch: at })?;
        std::fs::write(self.marker_path(), contents).context("Failed to write fetch marker")?;
        Ok(())
    }

    /// True when the marker is absent or older than the staleness window.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let last = self.last_fetch();
        last == DateTime::UNIX_EPOCH || now - last > self.window
    }
}

// ============================================================================
// Tests
// ============================================================================
