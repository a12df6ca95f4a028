//! Token types for the lisplan lexer.

use lisplan_types::Span;
use std::fmt;

/// The three interchangeable bracket families.
///
/// All three build the same list value; the choice is purely for
/// readability (e.g. `{}` around declarations, `()` around calls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    Paren,
    Square,
    Curly,
}

impl Bracket {
    pub const ALL: [Bracket; 3] = [Bracket::Paren, Bracket::Square, Bracket::Curly];

    pub fn open(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }

    pub fn from_open(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.open() == ch)
    }

    pub fn from_close(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.close() == ch)
    }
}

/// Returns `true` for characters that end an atom without being part of it.
pub fn is_delimiter(ch: char) -> bool {
    Bracket::from_open(ch).is_some() || Bracket::from_close(ch).is_some()
}

/// Whitespace separating atoms: space, `\n`, `\r`, `\t` and `\v`.
pub fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t' | '\x0b')
}

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Open(Bracket),
    Close(Bracket),
    /// An atom that parsed as an integer.
    Int(i64),
    /// Any other atom, including float-looking text such as `0.01`.
    Symbol(String),
    /// End of input. Always the last token.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(b) => write!(f, "{}", b.open()),
            Self::Close(b) => write!(f, "{}", b.close()),
            Self::Int(n) => write!(f, "{n}"),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}
