//! lisplan lexer: converts source text into a token stream.

pub mod lexer;
pub mod token;

pub use lexer::{classify_atom, AtomKind, Lexer};
pub use token::{is_blank, is_delimiter, Bracket, Token, TokenKind};
