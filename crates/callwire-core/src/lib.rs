//! callwire-core: shared foundation for the callwire analysis engine.
//!
//! Holds the pieces every other crate leans on: error enums, layered
//! configuration, tracing setup, and the collection aliases used by the engine.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::CallwireConfig;
pub use errors::{AnalysisError, AnalysisResult};
