//! API client for the randomuser.me directory service.
//!
//! This module provides the `RandomUserClient` struct implementing
//! [`RemoteSource`], the remote tier consumed by the repository.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{decode_person, Person};

use super::{ApiError, RemoteSource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the public directory service
pub const DEFAULT_SERVICE_URL: &str = "https://randomuser.me";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Record count for an unpaged full fetch.
pub const FULL_FETCH_COUNT: u32 = 100;

/// Record count per page for paged fetches.
pub const PAGE_FETCH_COUNT: u32 = 10;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
/// 1 second is polite to the server while not making users wait too long.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Client for the randomuser.me API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RandomUserClient {
    client: Client,
    base_url: String,
}

impl RandomUserClient {
    /// Create a client against the public service.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_SERVICE_URL)
    }

    /// Create a client against a specific service URL (test servers, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn results_url(&self, max_count: u32, page: Option<u32>) -> String {
        match page {
            Some(page) => format!("{}/api/?results={}&page={}", self.base_url, max_count, page),
            None => format!("{}/api/?results={}", self.base_url, max_count),
        }
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit
    /// (should retry), or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            // Rate limited - signal to retry
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_people(&self, url: &str) -> Result<Vec<Person>, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self.client.get(url).send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let body: Value = response.json().await?;
                    return Self::decode_results(&body);
                }
                None => {
                    // Rate limited
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    /// Decode the `results` array of a service response. One malformed
    /// record fails the whole fetch.
    fn decode_results(body: &Value) -> Result<Vec<Person>, ApiError> {
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::InvalidResponse("missing results array".to_string()))?;

        let mut people = Vec::with_capacity(results.len());
        for record in results {
            people.push(decode_person(record)?);
        }
        debug!(count = people.len(), "Decoded people from remote response");
        Ok(people)
    }
}

impl RemoteSource for RandomUserClient {
    async fn fetch_people(&self, max_count: u32) -> Result<Vec<Person>, ApiError> {
        self.get_people(&self.results_url(max_count, None)).await
    }

    async fn fetch_people_page(&self, max_count: u32, page: u32) -> Result<Vec<Person>, ApiError> {
        self.get_people(&self.results_url(max_count, Some(page)))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
