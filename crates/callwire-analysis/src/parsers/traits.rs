//! LanguageParser trait: the contract every grammar wrapper implements.

use callwire_core::errors::ParseError;

use super::types::{Language, ParseOutput};

/// Trait that every language parser must implement.
pub trait LanguageParser: Send + Sync {
    /// The language this parser handles.
    fn language(&self) -> Language;

    /// File extensions this parser handles.
    fn extensions(&self) -> &[&str];

    /// Parse source code into a syntax tree.
    fn parse(&self, source: &str, path: &str) -> Result<ParseOutput, ParseError>;
}
