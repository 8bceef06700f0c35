//! Tree-sitter parser subsystem: TypeScript, TSX and JavaScript grammars.

pub mod error_tolerant;
pub mod languages;
pub mod traits;
pub mod types;

pub use languages::ParserSet;
pub use traits::LanguageParser;
pub use types::{Language, ParseOutput};
