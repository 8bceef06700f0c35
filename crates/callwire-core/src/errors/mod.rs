//! Error handling for callwire.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod parse_error;

pub use analysis_error::{AnalysisError, AnalysisResult};
pub use config_error::ConfigError;
pub use error_code::CallwireErrorCode;
pub use parse_error::ParseError;
