//! Analysis-level errors and non-fatal error collection.

use super::error_code::{self, CallwireErrorCode};
use super::{ConfigError, ParseError};

/// Errors surfaced by an analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Path {path} was requested for analysis but is not part of the input")]
    UnknownScopePath { path: String },
}

impl CallwireErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::UnknownScopePath { .. } => error_code::UNKNOWN_SCOPE_PATH,
        }
    }
}

/// Result of an analysis run that accumulates non-fatal errors.
/// Partial results are always returned, even when some files fail.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<AnalysisError>,
}

impl<T: Default> AnalysisResult<T> {
    /// Create a new result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Create a result carrying previously collected errors.
    pub fn with_errors(data: T, errors: Vec<AnalysisError>) -> Self {
        Self { data, errors }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<AnalysisError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Discard the errors and keep the data.
    pub fn into_data(self) -> T {
        self.data
    }
}
