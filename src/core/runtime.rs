//! Concurrent batch evaluation across assets.
//!
//! One engine invocation per asset on its own tokio task. Assets share no
//! state, so the only coordination is the concurrency limit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{error, info, warn};

use crate::error::BatchError;
use crate::metrics::Metrics;
use crate::models::indicators::PriceSample;
use crate::models::prediction::StrategyPrediction;
use crate::models::signal::AggregationResult;
use crate::services::advisory::AdvisoryAdapter;
use crate::signals::engine::AggregationEngine;

/// Inputs for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub asset_id: String,
    pub predictions: Vec<StrategyPrediction>,
    #[serde(default)]
    pub samples: Vec<PriceSample>,
}

/// Result for one asset. Every request yields exactly one outcome.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub asset_id: String,
    pub result: Result<AggregationResult, BatchError>,
}

pub struct BatchEvaluator {
    engine: Arc<AggregationEngine>,
    advisory: Option<Arc<AdvisoryAdapter>>,
    metrics: Option<Arc<Metrics>>,
    concurrency: Option<usize>,
}

impl BatchEvaluator {
    pub fn new(engine: Arc<AggregationEngine>) -> Self {
        Self {
            engine,
            advisory: None,
            metrics: None,
            concurrency: None,
        }
    }

    pub fn with_advisory(mut self, advisory: Arc<AdvisoryAdapter>) -> Self {
        self.advisory = Some(advisory);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set custom concurrency (default is number of assets)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency.max(1));
        self
    }

    /// Evaluate every request. Outcomes come back in request order.
    pub async fn evaluate_all(&self, requests: Vec<EvaluationRequest>) -> Vec<BatchOutcome> {
        let concurrency = self.concurrency.unwrap_or_else(|| requests.len().max(1));
        let permits = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        info!(
            assets = requests.len(),
            concurrency, "BatchEvaluator: evaluating {} assets", requests.len()
        );

        let asset_ids: Vec<String> = requests.iter().map(|r| r.asset_id.clone()).collect();
        let mut task_index: HashMap<task::Id, usize> = HashMap::with_capacity(asset_ids.len());

        for (index, request) in requests.into_iter().enumerate() {
            let engine = self.engine.clone();
            let advisory = self.advisory.clone();
            let metrics = self.metrics.clone();
            let permits = permits.clone();

            let handle = tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                evaluate_one(&engine, advisory.as_deref(), metrics.as_deref(), request).await
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<BatchOutcome>> = vec![None; asset_ids.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    if let Some(&index) = task_index.get(&id) {
                        slots[index] = Some(outcome);
                    }
                }
                Err(e) => {
                    let Some(&index) = task_index.get(&e.id()) else {
                        continue;
                    };
                    error!(
                        asset = %asset_ids[index],
                        error = %e,
                        "BatchEvaluator: evaluation task failed"
                    );
                    slots[index] = Some(BatchOutcome {
                        asset_id: asset_ids[index].clone(),
                        result: Err(BatchError::TaskFailed(e.to_string())),
                    });
                }
            }
        }

        slots
            .into_iter()
            .zip(asset_ids)
            .map(|(slot, asset_id)| {
                slot.unwrap_or_else(|| BatchOutcome {
                    asset_id,
                    result: Err(BatchError::TaskFailed("task did not complete".to_string())),
                })
            })
            .collect()
    }
}

async fn evaluate_one(
    engine: &AggregationEngine,
    advisory: Option<&AdvisoryAdapter>,
    metrics: Option<&Metrics>,
    request: EvaluationRequest,
) -> BatchOutcome {
    let started = Instant::now();

    let result = match advisory {
        Some(adapter) => {
            engine
                .evaluate_with_advisory(
                    &request.asset_id,
                    &request.predictions,
                    &request.samples,
                    adapter,
                )
                .await
        }
        None => engine.evaluate(&request.predictions, &request.samples),
    };

    if let Some(metrics) = metrics {
        metrics
            .evaluation_duration_seconds
            .observe(started.elapsed().as_secs_f64());
        match &result {
            Ok(result) => metrics.record_result(result),
            Err(_) => metrics.validation_failures_total.inc(),
        }
    }

    if let Err(e) = &result {
        warn!(asset = %request.asset_id, error = %e, "Rejected malformed predictions");
    }

    BatchOutcome {
        asset_id: request.asset_id,
        result: result.map_err(BatchError::from),
    }
}
