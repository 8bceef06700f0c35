//! Configuration system for callwire.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod analysis_config;
pub mod callwire_config;
pub mod conventions_config;

pub use analysis_config::AnalysisConfig;
pub use callwire_config::{CallwireConfig, ConfigOverrides};
pub use conventions_config::ConventionsConfig;
