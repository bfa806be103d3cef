//! External collaborators consulted by the engine.

pub mod advisory;

pub use advisory::{AdvisoryAdapter, AdvisoryProvider, HttpAdvisoryClient, StaticAdvisory};
