//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound on the size of a single source file: 2 MiB.
pub const DEFAULT_MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

/// Configuration for the program model and resolution passes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory that file keys are made relative to. When unset, the common
    /// directory of all modeled files is used.
    pub project_root: Option<String>,
    /// Files above this size are skipped. Default: 2 MiB.
    pub max_file_bytes: Option<usize>,
    /// Keep files whose tree contains syntax errors. Default: false.
    pub tolerate_syntax_errors: Option<bool>,
    /// Directories that bare import specifiers are resolved against.
    #[serde(default)]
    pub module_roots: Vec<String>,
}

impl AnalysisConfig {
    /// Returns the effective file size limit, defaulting to 2 MiB.
    pub fn effective_max_file_bytes(&self) -> usize {
        self.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES)
    }

    /// Returns whether partially parsed files stay in the model, defaulting to false.
    pub fn effective_tolerate_syntax_errors(&self) -> bool {
        self.tolerate_syntax_errors.unwrap_or(false)
    }
}
