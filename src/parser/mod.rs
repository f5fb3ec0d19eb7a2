//! Reader for declaration source text.
//!
//! Produces the syntax tree the synthesizers consume. Only the shapes they
//! inspect are modelled; everything else is kept as a span.

pub mod lexer;
pub mod grammar;

pub use grammar::SourceFile;

use crate::error::ParseError;

/// Parse declaration source text into a [`SourceFile`].
pub fn parse(source: &str) -> Result<SourceFile, ParseError> {
    grammar::parse_source(source)
}
