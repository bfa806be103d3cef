//! Technical indicators feeding the regime classifier.

pub mod trend;
pub mod volatility;

pub use trend::*;
pub use volatility::*;
