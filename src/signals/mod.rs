//! Signal aggregation pipeline: gate, weights, consensus, amplification,
//! advisory adjustment and the engine that orchestrates them.

pub mod advisory;
pub mod aggregation;
pub mod amplification;
pub mod engine;
pub mod gate;
pub mod weights;

pub use advisory::{apply_advisory, AdvisoryRating};
pub use aggregation::{ConsensusAggregator, Tally};
pub use amplification::AmplificationPipeline;
pub use engine::AggregationEngine;
pub use gate::ConfidenceGate;
pub use weights::WeightTable;
