pub mod client;
pub mod error;

pub use client::{RandomUserClient, FULL_FETCH_COUNT, PAGE_FETCH_COUNT};
pub use error::ApiError;

use crate::models::Person;

/// Remote fetch tier contract: an ordered batch of people, or a failure.
///
/// Each call is a single blocking outcome from the caller's perspective;
/// there is no streaming and no partial delivery.
#[allow(async_fn_in_trait)]
pub trait RemoteSource: Send + Sync {
    /// Fetch up to `max_count` people in one unpaged request.
    async fn fetch_people(&self, max_count: u32) -> Result<Vec<Person>, ApiError>;

    /// Fetch one page of up to `max_count` people.
    async fn fetch_people_page(&self, max_count: u32, page: u32)
        -> Result<Vec<Person>, ApiError>;
}
