//! Consensus evaluator
//!
//! Reads an evaluation request (JSON) from the path given as the first
//! argument, or `EVAL_REQUEST_PATH`, and prints the aggregation result.

use dotenvy::dotenv;
use regime_consensus::config::{get_advisory_url, get_environment, EngineConfig};
use regime_consensus::core::runtime::EvaluationRequest;
use regime_consensus::error::EngineError;
use regime_consensus::logging;
use regime_consensus::services::advisory::{AdvisoryAdapter, HttpAdvisoryClient};
use regime_consensus::signals::engine::AggregationEngine;
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = get_environment();
    info!(environment = %env, "Starting consensus evaluator");

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("EVAL_REQUEST_PATH").ok())
        .ok_or("usage: evaluate <request.json> (or set EVAL_REQUEST_PATH)")?;

    let raw = std::fs::read_to_string(&path).map_err(EngineError::from)?;
    let request: EvaluationRequest = serde_json::from_str(&raw).map_err(EngineError::from)?;

    let config = EngineConfig::from_env();
    let engine = AggregationEngine::try_new(config).map_err(EngineError::from)?;

    let result = match get_advisory_url() {
        Some(url) => match HttpAdvisoryClient::new(&url) {
            Ok(client) => {
                info!(advisory_url = %url, "Advisory enabled");
                let timeout = engine.config().advisory.timeout();
                let adapter = AdvisoryAdapter::new(Arc::new(client), timeout);
                engine
                    .evaluate_with_advisory(
                        &request.asset_id,
                        &request.predictions,
                        &request.samples,
                        &adapter,
                    )
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Advisory disabled: invalid CONSENSUS_ADVISORY_URL");
                engine.evaluate(&request.predictions, &request.samples)
            }
        },
        None => engine.evaluate(&request.predictions, &request.samples),
    }
    .map_err(EngineError::from)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
