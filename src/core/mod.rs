//! Core application primitives (batch runtime)

pub mod runtime;

pub use runtime::*;
