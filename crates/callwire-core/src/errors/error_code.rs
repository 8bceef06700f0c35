//! CallwireErrorCode trait for structured error reporting.

/// Every error enum implements this to provide a stable, machine-readable
/// code string alongside its human-readable message.
pub trait CallwireErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNKNOWN_SCOPE_PATH: &str = "UNKNOWN_SCOPE_PATH";
