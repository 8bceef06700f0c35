//! Per-grammar parsers and the shared parse routine.

pub mod javascript;
pub mod typescript;

use std::path::Path;
use std::time::Instant;

use callwire_core::errors::ParseError;

use super::error_tolerant::count_errors;
use super::traits::LanguageParser;
use super::types::{Language, ParseOutput};

pub use javascript::JavaScriptParser;
pub use typescript::{TsxParser, TypeScriptParser};

/// Parse `source` with the given grammar, counting recovered syntax errors.
pub fn parse_with_language(
    source: &str,
    path: &str,
    language: Language,
    ts_language: tree_sitter::Language,
) -> Result<ParseOutput, ParseError> {
    let start = Instant::now();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&ts_language)
        .map_err(|e| ParseError::GrammarUnavailable {
            language: language.name().to_string(),
            message: e.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
        path: path.to_string(),
    })?;
    let (error_count, error_ranges) = count_errors(tree.root_node());

    Ok(ParseOutput {
        language,
        tree,
        error_count,
        error_ranges,
        parse_time_us: start.elapsed().as_micros() as u64,
    })
}

/// The set of parsers the program model dispatches to, picked by extension.
pub struct ParserSet {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl Default for ParserSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserSet {
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(TypeScriptParser::new()),
                Box::new(TsxParser::new()),
                Box::new(JavaScriptParser::new()),
            ],
        }
    }

    /// Find the parser responsible for `path`, if any.
    pub fn for_path(&self, path: &str) -> Option<&dyn LanguageParser> {
        let ext = extension_of(path)?;
        self.parsers
            .iter()
            .find(|p| p.extensions().contains(&ext))
            .map(|p| p.as_ref())
    }

    /// Parse `source`, choosing the grammar from the extension of `path`.
    pub fn parse(&self, source: &str, path: &str) -> Result<ParseOutput, ParseError> {
        match self.for_path(path) {
            Some(parser) => parser.parse(source, path),
            None => Err(ParseError::UnsupportedLanguage {
                path: path.to_string(),
                extension: extension_of(path).unwrap_or_default().to_string(),
            }),
        }
    }
}

fn extension_of(path: &str) -> Option<&str> {
    Path::new(path).extension().and_then(|e| e.to_str())
}
