//! Lexer tests: bracket families, atom classification, blanks, spans,
//! and the integer-range error.

use lisplan_lexer::{Bracket, Lexer, TokenKind};
use lisplan_types::{ErrorCode, Span};
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .lex()
        .expect("lexing should succeed")
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn sym(name: &str) -> TokenKind {
    TokenKind::Symbol(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Brackets
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_bracket_families() {
    assert_eq!(
        kinds("([{}])"),
        vec![
            TokenKind::Open(Bracket::Paren),
            TokenKind::Open(Bracket::Square),
            TokenKind::Open(Bracket::Curly),
            TokenKind::Close(Bracket::Curly),
            TokenKind::Close(Bracket::Square),
            TokenKind::Close(Bracket::Paren),
        ]
    );
}

#[test]
fn test_brackets_end_atoms_without_blanks() {
    assert_eq!(
        kinds("(a[b]c)"),
        vec![
            TokenKind::Open(Bracket::Paren),
            sym("a"),
            TokenKind::Open(Bracket::Square),
            sym("b"),
            TokenKind::Close(Bracket::Square),
            sym("c"),
            TokenKind::Close(Bracket::Paren),
        ]
    );
}

#[test]
fn test_lexer_does_not_check_balance() {
    // Matching is the parser's job.
    assert_eq!(
        kinds("(a]"),
        vec![
            TokenKind::Open(Bracket::Paren),
            sym("a"),
            TokenKind::Close(Bracket::Square),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Atoms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integers_and_symbols() {
    assert_eq!(
        kinds("+ 1 -2 x"),
        vec![sym("+"), TokenKind::Int(1), TokenKind::Int(-2), sym("x")]
    );
}

#[test]
fn test_floats_stay_symbols() {
    assert_eq!(kinds("(< V 0.01)")[3], sym("0.01"));
}

#[test]
fn test_boolean_words_stay_symbols() {
    assert_eq!(kinds("true False"), vec![sym("true"), sym("False")]);
}

#[test]
fn test_unicode_operator_atoms() {
    assert_eq!(
        kinds("× ¬ ∧ ∨ ≠ ≤ ≥ √"),
        ["×", "¬", "∧", "∨", "≠", "≤", "≥", "√"]
            .iter()
            .map(|s| sym(s))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_punctuated_symbols() {
    assert_eq!(
        kinds("reachable? the-kitchen random-point-inside-kitchen"),
        vec![
            sym("reachable?"),
            sym("the-kitchen"),
            sym("random-point-inside-kitchen")
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Blanks & spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_blank_characters() {
    assert_eq!(kinds(" a\tb\nc\rd\x0be "), vec![sym("a"), sym("b"), sym("c"), sym("d"), sym("e")]);
}

#[test]
fn test_empty_source_is_just_eof() {
    let tokens = Lexer::new("  \n ").lex().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].span, Span::point(2, 2));
}

#[test]
fn test_spans_track_lines_and_columns() {
    let tokens = Lexer::new("(plan\n  [steps])").lex().unwrap();
    assert_eq!(tokens[0].span, Span::point(1, 1));
    assert_eq!(tokens[1].span, Span::new(1, 2, 1, 5));
    assert_eq!(tokens[2].span, Span::point(2, 3));
    assert_eq!(tokens[3].span, Span::new(2, 4, 2, 8));
}

#[test]
fn test_columns_count_characters_not_bytes() {
    let tokens = Lexer::new("(× 2 3)").lex().unwrap();
    assert_eq!(tokens[2].span, Span::point(1, 4));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_out_of_range() {
    let err = Lexer::new("(+ 1 99999999999999999999)").lex().unwrap_err();
    assert_eq!(err.code(), ErrorCode::INTEGER_OUT_OF_RANGE);
    assert_eq!(err.span(), Some(Span::new(1, 6, 1, 25)));
}
