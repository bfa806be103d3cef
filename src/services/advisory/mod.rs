//! Advisory provider interface and the timeout-bounded adapter around it.

pub mod http;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

pub use crate::signals::advisory::AdvisoryRating;
pub use http::{AdvisoryError, HttpAdvisoryClient};

/// Source of optional, non-authoritative opinions.
///
/// Implementations return `None` on any failure instead of erroring.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    async fn rate(&self, asset_id: &str) -> Option<AdvisoryRating>;
}

/// Wraps a provider with a hard deadline. Timeouts, cancellation and
/// out-of-range ratings all read as "unavailable".
#[derive(Clone)]
pub struct AdvisoryAdapter {
    provider: Arc<dyn AdvisoryProvider>,
    timeout: Duration,
}

impl AdvisoryAdapter {
    pub fn new(provider: Arc<dyn AdvisoryProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn rate(&self, asset_id: &str) -> Option<AdvisoryRating> {
        match timeout(self.timeout, self.provider.rate(asset_id)).await {
            Ok(Some(rating)) if rating.is_valid() => {
                debug!(
                    asset = asset_id,
                    direction = %rating.direction,
                    strength = rating.strength,
                    "Advisory rating received"
                );
                Some(rating)
            }
            Ok(Some(rating)) => {
                warn!(
                    asset = asset_id,
                    strength = rating.strength,
                    "Discarding advisory rating with out-of-range strength"
                );
                None
            }
            Ok(None) => {
                debug!(asset = asset_id, "Advisory unavailable");
                None
            }
            Err(_) => {
                warn!(
                    asset = asset_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Advisory timed out"
                );
                None
            }
        }
    }

    /// Like [`rate`](Self::rate) but gives up as soon as `cancel` completes.
    pub async fn rate_until<F>(&self, asset_id: &str, cancel: F) -> Option<AdvisoryRating>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            rating = self.rate(asset_id) => rating,
            _ = cancel => {
                warn!(asset = asset_id, "Advisory call cancelled");
                None
            }
        }
    }
}

/// Fixed answer, optionally after a delay. Useful for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisory {
    rating: Option<AdvisoryRating>,
    delay: Option<Duration>,
}

impl StaticAdvisory {
    pub fn new(rating: Option<AdvisoryRating>) -> Self {
        Self {
            rating,
            delay: None,
        }
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl AdvisoryProvider for StaticAdvisory {
    async fn rate(&self, _asset_id: &str) -> Option<AdvisoryRating> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        self.rating
    }
}
