//! Market regime classification

pub mod classifier;

pub use classifier::RegimeClassifier;
