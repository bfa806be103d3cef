//! Regime-adaptive consensus engine.
//!
//! Turns independent per-asset strategy predictions into one adjudicated
//! recommendation with a calibrated confidence score.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod regime;
pub mod services;
pub mod signals;

pub use config::EngineConfig;
pub use error::{BatchError, ConfigError, EngineError, ValidationError};
pub use models::{
    AgentCategory, AggregationResult, AggregationStatus, Direction, PriceSample,
    RegimeClassification, RegimeType, StrategyPrediction,
};
pub use signals::engine::AggregationEngine;
