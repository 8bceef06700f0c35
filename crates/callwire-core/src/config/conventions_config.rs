//! Framework naming conventions used for role and wiring detection.

use serde::{Deserialize, Serialize};

/// Decorator and file-name conventions.
///
/// Empty lists fall back to the NestJS defaults, so a partial TOML table only
/// overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConventionsConfig {
    /// Decorators marking a module class. Default: `["Module"]`.
    pub module_decorators: Vec<String>,
    /// Decorators marking a controller class. Default: `["Controller"]`.
    pub controller_decorators: Vec<String>,
    /// Decorators marking an injectable class. Default: `["Injectable"]`.
    pub injectable_decorators: Vec<String>,
    /// Parameter decorators carrying an explicit injection token. Default: `["Inject"]`.
    pub inject_decorators: Vec<String>,
    /// File-name fragments marking a module file. Default: `[".module."]`.
    pub module_file_markers: Vec<String>,
}

fn or_default<'a>(values: &'a [String], default: &'static [&'static str]) -> Vec<&'a str> {
    if values.is_empty() {
        default.to_vec()
    } else {
        values.iter().map(String::as_str).collect()
    }
}

impl ConventionsConfig {
    pub fn effective_module_decorators(&self) -> Vec<&str> {
        or_default(&self.module_decorators, &["Module"])
    }

    pub fn effective_controller_decorators(&self) -> Vec<&str> {
        or_default(&self.controller_decorators, &["Controller"])
    }

    pub fn effective_injectable_decorators(&self) -> Vec<&str> {
        or_default(&self.injectable_decorators, &["Injectable"])
    }

    pub fn effective_inject_decorators(&self) -> Vec<&str> {
        or_default(&self.inject_decorators, &["Inject"])
    }

    pub fn effective_module_file_markers(&self) -> Vec<&str> {
        or_default(&self.module_file_markers, &[".module."])
    }
}
