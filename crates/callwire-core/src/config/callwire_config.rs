//! Top-level callwire configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ConventionsConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const PROJECT_CONFIG_FILE: &str = "callwire.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CALLWIRE_*`)
/// 3. Project config (`callwire.toml` in project root)
/// 4. User config (`~/.callwire/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CallwireConfig {
    pub analysis: AnalysisConfig,
    pub conventions: ConventionsConfig,
}

/// Override values supplied by an embedding application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_root: Option<String>,
    pub max_file_bytes: Option<usize>,
    pub tolerate_syntax_errors: Option<bool>,
    /// Replaces every lower layer's module roots when set.
    pub module_roots: Option<Vec<String>>,
}

impl CallwireConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CallwireConfig) -> Result<(), ConfigError> {
        if config.analysis.max_file_bytes == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analysis.max_file_bytes".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let conventions = &config.conventions;
        for (field, values) in [
            ("conventions.module_decorators", &conventions.module_decorators),
            ("conventions.controller_decorators", &conventions.controller_decorators),
            ("conventions.injectable_decorators", &conventions.injectable_decorators),
            ("conventions.inject_decorators", &conventions.inject_decorators),
            ("conventions.module_file_markers", &conventions.module_file_markers),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "entries must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.callwire/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".callwire").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CallwireConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CallwireConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it is set.
    fn merge(base: &mut CallwireConfig, other: &CallwireConfig) {
        // Analysis
        if other.analysis.project_root.is_some() {
            base.analysis.project_root = other.analysis.project_root.clone();
        }
        if other.analysis.max_file_bytes.is_some() {
            base.analysis.max_file_bytes = other.analysis.max_file_bytes;
        }
        if other.analysis.tolerate_syntax_errors.is_some() {
            base.analysis.tolerate_syntax_errors = other.analysis.tolerate_syntax_errors;
        }
        if !other.analysis.module_roots.is_empty() {
            base.analysis.module_roots = other.analysis.module_roots.clone();
        }

        // Conventions
        let (b, o) = (&mut base.conventions, &other.conventions);
        if !o.module_decorators.is_empty() {
            b.module_decorators = o.module_decorators.clone();
        }
        if !o.controller_decorators.is_empty() {
            b.controller_decorators = o.controller_decorators.clone();
        }
        if !o.injectable_decorators.is_empty() {
            b.injectable_decorators = o.injectable_decorators.clone();
        }
        if !o.inject_decorators.is_empty() {
            b.inject_decorators = o.inject_decorators.clone();
        }
        if !o.module_file_markers.is_empty() {
            b.module_file_markers = o.module_file_markers.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CALLWIRE_PROJECT_ROOT`, `CALLWIRE_MAX_FILE_BYTES`, etc.
    fn apply_env_overrides(config: &mut CallwireConfig) {
        if let Ok(val) = std::env::var("CALLWIRE_PROJECT_ROOT") {
            if !val.is_empty() {
                config.analysis.project_root = Some(val);
            }
        }
        if let Ok(val) = std::env::var("CALLWIRE_MAX_FILE_BYTES") {
            if let Ok(v) = val.parse::<usize>() {
                config.analysis.max_file_bytes = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CALLWIRE_TOLERATE_SYNTAX_ERRORS") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.tolerate_syntax_errors = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CALLWIRE_MODULE_ROOTS") {
            let roots: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !roots.is_empty() {
                config.analysis.module_roots = roots;
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut CallwireConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.project_root {
            config.analysis.project_root = Some(v.clone());
        }
        if let Some(v) = overrides.max_file_bytes {
            config.analysis.max_file_bytes = Some(v);
        }
        if let Some(v) = overrides.tolerate_syntax_errors {
            config.analysis.tolerate_syntax_errors = Some(v);
        }
        if let Some(ref v) = overrides.module_roots {
            config.analysis.module_roots = v.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
