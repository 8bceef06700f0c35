//! Parser errors.

use super::error_code::{self, CallwireErrorCode};

/// Errors that can occur while parsing a single source file.
///
/// None of these abort an analysis run: the offending file is left out of the
/// program model and the error is recorded alongside the result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar could not be loaded for {language}: {message}")]
    GrammarUnavailable { language: String, message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: String },

    #[error("Unsupported language for {path}: {extension}")]
    UnsupportedLanguage { path: String, extension: String },

    #[error("File {path} is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: String, size: usize, limit: usize },

    /// `line` and `column` (1-based) locate the first syntax error.
    #[error("Partial parse of {path}: {error_count} syntax error(s), first at {line}:{column}")]
    PartialParse {
        path: String,
        error_count: u32,
        line: u32,
        column: u32,
    },
}

impl ParseError {
    /// The file the error is about.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::GrammarUnavailable { .. } => None,
            Self::NoTree { path }
            | Self::UnsupportedLanguage { path, .. }
            | Self::FileTooLarge { path, .. }
            | Self::PartialParse { path, .. } => Some(path),
        }
    }
}

impl CallwireErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            Self::FileTooLarge { .. } => error_code::FILE_TOO_LARGE,
            _ => error_code::PARSE_ERROR,
        }
    }
}
