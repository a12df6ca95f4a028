//! Core lexer: converts source text to a token stream.
//!
//! The lexer only knows three things: blanks separate atoms, brackets are
//! tokens of their own, and everything else is an atom. An atom that reads
//! as an integer becomes [`TokenKind::Int`]; anything else, including
//! float-looking text, stays a [`TokenKind::Symbol`].

use lisplan_types::{LisplanError, Result, Span};
use std::iter::Peekable;
use std::str::Chars;

use crate::token::{is_blank, is_delimiter, Bracket, Token, TokenKind};

/// The lisplan lexer.
pub struct Lexer<'src> {
    chars: Peekable<Chars<'src>>,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
}

/// How an atom's text classifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    Int(i64),
    /// Integer syntax, but does not fit in an `i64`.
    IntOutOfRange,
    Symbol,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream ending with [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Scan one token, skipping leading blanks.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks();

        let (start_line, start_col) = (self.line, self.col);
        let Some(&ch) = self.chars.peek() else {
            return Ok(Token::new(TokenKind::Eof, self.current_span()));
        };

        if let Some(bracket) = Bracket::from_open(ch) {
            self.advance();
            return Ok(Token::new(
                TokenKind::Open(bracket),
                Span::point(start_line, start_col),
            ));
        }
        if let Some(bracket) = Bracket::from_close(ch) {
            self.advance();
            return Ok(Token::new(
                TokenKind::Close(bracket),
                Span::point(start_line, start_col),
            ));
        }

        let text = self.read_atom();
        let span = self.span_from(start_line, start_col);
        let kind = match classify_atom(&text) {
            AtomKind::Int(n) => TokenKind::Int(n),
            AtomKind::Symbol => TokenKind::Symbol(text),
            AtomKind::IntOutOfRange => {
                return Err(LisplanError::IntegerOutOfRange {
                    literal: text,
                    span,
                })
            }
        };
        Ok(Token::new(kind, span))
    }

    /// Consume characters up to the next blank or delimiter.
    pub fn read_atom(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if is_blank(ch) || is_delimiter(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    // ── Character-level helpers ──────────────────────────────────────

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn skip_blanks(&mut self) {
        while self.chars.peek().is_some_and(|&ch| is_blank(ch)) {
            self.advance();
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }
}

/// Classify atom text: an optional sign followed by ASCII digits, with
/// single `_` separators allowed between digits, is an integer.
pub fn classify_atom(text: &str) -> AtomKind {
    let digits = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    let well_formed = !digits.is_empty()
        && digits.split('_').all(|group| {
            !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit())
        });
    if !well_formed {
        return AtomKind::Symbol;
    }

    let cleaned: String = text.chars().filter(|&ch| ch != '_').collect();
    match cleaned.parse::<i64>() {
        Ok(n) => AtomKind::Int(n),
        Err(_) => AtomKind::IntOutOfRange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integers() {
        assert_eq!(classify_atom("42"), AtomKind::Int(42));
        assert_eq!(classify_atom("-7"), AtomKind::Int(-7));
        assert_eq!(classify_atom("+7"), AtomKind::Int(7));
        assert_eq!(classify_atom("1_000"), AtomKind::Int(1000));
        assert_eq!(classify_atom("007"), AtomKind::Int(7));
    }

    #[test]
    fn test_classify_symbols() {
        for text in ["0.01", "1e3", "-", "+", "1_", "_1", "1__0", "x1", "True", "-x"] {
            assert_eq!(classify_atom(text), AtomKind::Symbol, "atom '{text}'");
        }
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(
            classify_atom("-9223372036854775808"),
            AtomKind::Int(i64::MIN)
        );
        assert_eq!(
            classify_atom("9223372036854775808"),
            AtomKind::IntOutOfRange
        );
    }

    #[test]
    fn test_read_atom_stops_at_delimiter() {
        let mut lexer = Lexer::new("the-cup]rest");
        assert_eq!(lexer.read_atom(), "the-cup");
        assert_eq!(lexer.chars.collect::<String>(), "]rest");
    }

    #[test]
    fn test_read_atom_stops_at_blank() {
        let mut lexer = Lexer::new("reachable?\tthe-cup");
        assert_eq!(lexer.read_atom(), "reachable?");
    }
}
