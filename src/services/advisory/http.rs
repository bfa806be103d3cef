//! HTTP advisory client.
//!
//! `GET {base}/ratings/{asset}` answering
//! `{"direction":"LONG","strength":0.7,"as_of":"2024-01-01T00:00:00Z"}`.
//! 404 and 204 mean "no opinion". Transient failures are retried with
//! exponential backoff inside this client; the engine itself never retries.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::{AdvisoryProvider, AdvisoryRating};
use crate::models::prediction::Direction;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("invalid advisory url: {0}")]
    InvalidUrl(String),

    #[error("advisory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("advisory service returned status {0}")]
    Status(u16),

    #[error("advisory rating is stale (as of {0})")]
    Stale(DateTime<Utc>),
}

impl AdvisoryError {
    /// Connection problems and 5xx/429 responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AdvisoryError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AdvisoryError::Status(code) => *code >= 500 || *code == 429,
            AdvisoryError::InvalidUrl(_) | AdvisoryError::Stale(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingResponse {
    direction: Direction,
    strength: f64,
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
}

pub struct HttpAdvisoryClient {
    base_url: Url,
    client: reqwest::Client,
    max_retries: usize,
    min_backoff: Duration,
    max_age: Option<chrono::Duration>,
}

impl HttpAdvisoryClient {
    pub fn new(base_url: &str) -> Result<Self, AdvisoryError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, AdvisoryError> {
        let base_url = Url::parse(base_url).map_err(|e| AdvisoryError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(AdvisoryError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            client,
            max_retries: 2,
            min_backoff: Duration::from_millis(100),
            max_age: None,
        })
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_min_backoff(mut self, min_backoff: Duration) -> Self {
        self.min_backoff = min_backoff;
        self
    }

    /// Ratings older than `max_age` are treated as unavailable.
    pub fn with_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn rating_url(&self, asset_id: &str) -> Result<Url, AdvisoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AdvisoryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("ratings")
            .push(asset_id);
        Ok(url)
    }

    /// Fetch with retries. `Ok(None)` means the service has no opinion.
    pub async fn fetch(&self, asset_id: &str) -> Result<Option<AdvisoryRating>, AdvisoryError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_backoff)
            .with_max_times(self.max_retries);

        (|| async { self.fetch_once(asset_id).await })
            .retry(backoff)
            .when(|e: &AdvisoryError| e.is_retryable())
            .notify(|e: &AdvisoryError, wait: Duration| {
                debug!(
                    asset = asset_id,
                    error = %e,
                    wait_ms = wait.as_millis() as u64,
                    "Retrying advisory request"
                );
            })
            .await
    }

    async fn fetch_once(&self, asset_id: &str) -> Result<Option<AdvisoryRating>, AdvisoryError> {
        let url = self.rating_url(asset_id)?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
            status if !status.is_success() => return Err(AdvisoryError::Status(status.as_u16())),
            _ => {}
        }

        let body: RatingResponse = response.json().await?;
        if let (Some(as_of), Some(max_age)) = (body.as_of, self.max_age) {
            if Utc::now() - as_of > max_age {
                return Err(AdvisoryError::Stale(as_of));
            }
        }

        Ok(Some(AdvisoryRating::new(body.direction, body.strength)))
    }
}

#[async_trait]
impl AdvisoryProvider for HttpAdvisoryClient {
    async fn rate(&self, asset_id: &str) -> Option<AdvisoryRating> {
        match self.fetch(asset_id).await {
            Ok(rating) => rating,
            Err(e) => {
                warn!(asset = asset_id, error = %e, "Advisory request failed");
                None
            }
        }
    }
}
