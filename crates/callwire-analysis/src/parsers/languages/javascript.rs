//! JavaScript parser.

use callwire_core::errors::ParseError;

use super::parse_with_language;
use crate::parsers::traits::LanguageParser;
use crate::parsers::types::{Language, ParseOutput};

pub struct JavaScriptParser;

impl Default for JavaScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaScriptParser {
    pub fn new() -> Self { Self }
}

impl LanguageParser for JavaScriptParser {
    fn language(&self) -> Language { Language::JavaScript }
    fn extensions(&self) -> &[&str] { &["js", "jsx", "mjs", "cjs"] }

    fn parse(&self, source: &str, path: &str) -> Result<ParseOutput, ParseError> {
        parse_with_language(
            source,
            path,
            Language::JavaScript,
            tree_sitter_javascript::LANGUAGE.into(),
        )
    }
}
