//! dircache - tiered cache for a people-directory app.
//!
//! People are fetched from a remote directory service, persisted locally
//! and served to the UI through a single repository with a three-tier
//! fallback chain (memory cache, persistent store, remote fetch). The
//! crate exposes the repository, the tier contracts it consumes and
//! file-backed default implementations of both.

pub mod api;
pub mod config;
pub mod freshness;
pub mod models;
pub mod repo;
pub mod store;

pub use api::{ApiError, RandomUserClient, RemoteSource};
pub use config::Config;
pub use freshness::FreshnessTracker;
pub use models::{decode_person, DecodeError, GeoPoint, Person};
pub use repo::PersonRepository;
pub use store::{JsonFileStore, PersonStore, StoreError};

use anyhow::Result;

/// Wire up a repository from configuration: JSON file store and fetch
/// marker under the app data directory, remote client against the
/// configured service URL.
pub fn open_repository(
    config: &Config,
) -> Result<PersonRepository<JsonFileStore, RandomUserClient>> {
    let data_dir = config.data_dir()?;
    let store = JsonFileStore::new(data_dir.clone())?;
    let remote = RandomUserClient::with_base_url(config.service_url_or_default())?;
    let freshness = FreshnessTracker::new(data_dir, config.stale_window())?;
    Ok(PersonRepository::new(store, remote, freshness))
}
