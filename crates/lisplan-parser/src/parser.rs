//! Recursive-descent parser: token stream to nested list forms.

use lisplan_lexer::{Bracket, Token, TokenKind};
use lisplan_types::{ensure_sufficient_stack, LisplanError, Result, Span, Value};

/// The lisplan parser.
///
/// Consumes the token stream produced by the lexer and builds the forest of
/// top-level forms. The three bracket families are interchangeable; each
/// opener only has to be closed by its own partner.
pub struct Parser {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
}

impl Parser {
    /// Create a parser over a token stream ending with [`TokenKind::Eof`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse every top-level form.
    pub fn parse(mut self) -> Result<Vec<Value>> {
        let forms = self.parse_sequence(None)?;
        tracing::debug!(forms = forms.len(), "parsed program");
        Ok(forms)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Span used when the stream ends without an explicit `Eof` token.
    fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    // ── Lists ─────────────────────────────────────────────────────────────────

    /// Collect elements until `expected` closes the current list, or until
    /// end of input at top level (`expected == None`).
    fn parse_sequence(&mut self, expected: Option<Bracket>) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Self::finish(expected, self.end_span(), items);
            };
            let span = token.span;
            match token.kind {
                TokenKind::Eof => return Self::finish(expected, span, items),
                TokenKind::Open(bracket) => {
                    let list = ensure_sufficient_stack(|| self.parse_sequence(Some(bracket)))?;
                    items.push(Value::List(list));
                }
                TokenKind::Close(found) if Some(found) == expected => return Ok(items),
                TokenKind::Close(found) => {
                    return Err(LisplanError::MismatchedDelimiter {
                        expected: expected.map(Bracket::close),
                        found: found.close(),
                        span,
                    })
                }
                TokenKind::Int(n) => items.push(Value::int(n)),
                TokenKind::Symbol(name) => items.push(Value::Symbol(name)),
            }
        }
    }

    fn finish(expected: Option<Bracket>, span: Span, items: Vec<Value>) -> Result<Vec<Value>> {
        match expected {
            Some(bracket) => Err(LisplanError::UnexpectedEof {
                expected: bracket.close(),
                span,
            }),
            None => Ok(items),
        }
    }
}
