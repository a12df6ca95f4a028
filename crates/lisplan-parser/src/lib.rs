//! lisplan parser: converts a token stream into nested list forms.

mod parser;

pub use parser::Parser;

use lisplan_lexer::Lexer;
use lisplan_types::{Result, Value};

/// Lex and parse `source` into its top-level forms.
pub fn parse_source(source: &str) -> Result<Vec<Value>> {
    let tokens = Lexer::new(source).lex()?;
    Parser::new(tokens).parse()
}
