//! Trend indicators: ADX

pub mod adx;

pub use adx::*;
