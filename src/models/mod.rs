//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod prediction;
pub mod regime;
pub mod signal;

pub use indicators::{AdxIndicator, AtrIndicator, PriceSample};
pub use prediction::{AgentCategory, Direction, StrategyPrediction};
pub use regime::{RegimeClassification, RegimeType};
pub use signal::{
    AdvisoryOutcome, AggregationResult, AggregationStatus, ConfidenceScale, SignalReason,
};
