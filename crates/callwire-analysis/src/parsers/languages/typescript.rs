//! TypeScript and TSX parsers.

use callwire_core::errors::ParseError;

use super::parse_with_language;
use crate::parsers::traits::LanguageParser;
use crate::parsers::types::{Language, ParseOutput};

pub struct TypeScriptParser;

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeScriptParser {
    pub fn new() -> Self { Self }
}

impl LanguageParser for TypeScriptParser {
    fn language(&self) -> Language { Language::TypeScript }
    fn extensions(&self) -> &[&str] { &["ts", "mts", "cts"] }

    fn parse(&self, source: &str, path: &str) -> Result<ParseOutput, ParseError> {
        parse_with_language(
            source,
            path,
            Language::TypeScript,
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        )
    }
}

pub struct TsxParser;

impl Default for TsxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TsxParser {
    pub fn new() -> Self { Self }
}

impl LanguageParser for TsxParser {
    fn language(&self) -> Language { Language::Tsx }
    fn extensions(&self) -> &[&str] { &["tsx"] }

    fn parse(&self, source: &str, path: &str) -> Result<ParseOutput, ParseError> {
        parse_with_language(source, path, Language::Tsx, tree_sitter_typescript::LANGUAGE_TSX.into())
    }
}
