//! logos-based tokenizer for inline style declarations and scalar values.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#fff` as HexColor)
//! 2. For equal length matches, earlier-defined variants win
//!
//! Our ordering ensures:
//! - `17px` matches [`Token::Dimension`], not `Number` + `Ident`
//! - `-17px` matches [`Token::Dimension`], not `Minus` + `Dimension`

use std::ops::Range;

use logos::Logos;

/// Style token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // ── Compound tokens (longer matches, defined first) ──────────────

    /// `!important` flag. Accepted and ignored by the declaration parser.
    #[token("!important")]
    Important,

    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80` (3-8 hex digits).
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Dimension: number with unit suffix like `17px`, `50%`, `10vw`, `80vh`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?(px|%|vw|vh)")]
    Dimension,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Single-quoted string literal.
    #[regex(r"'[^']*'")]
    StringLiteralSingle,

    /// Number: integer or float, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: property names, keywords, color names, function names.
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    // ── Single-character punctuation ─────────────────────────────────

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `(`
    #[token("(")]
    ParenOpen,

    /// `)`
    #[token(")")]
    ParenClose,

    /// `+`
    #[token("+")]
    Plus,

    /// `/`
    #[token("/")]
    Slash,
}

/// Tokenize into `(Token, text)` pairs. Unlexable input is skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    tokenize_spanned(input)
        .into_iter()
        .map(|(token, span)| (token, input[span].to_string()))
        .collect()
}

/// Tokenize into `(Token, byte span)` pairs.
///
/// Unlexable input is reported as `Err(span)` so callers can produce a
/// positioned error instead of silently dropping it.
pub fn tokenize_spanned(input: &str) -> Vec<(Token, Range<usize>)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

/// Byte span of the first unlexable character, if any.
pub fn first_error(input: &str) -> Option<Range<usize>> {
    Token::lexer(input)
        .spanned()
        .find_map(|(result, span)| result.err().map(|_| span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_declaration_punctuation() {
        assert_eq!(
            tokens("width: 8px;"),
            vec![Token::Ident, Token::Colon, Token::Dimension, Token::Semicolon]
        );
    }

    #[test]
    fn test_dimensions() {
        let result = tokenize("17px 50% 100vw 80vh");
        assert_eq!(result[0], (Token::Dimension, "17px".into()));
        assert_eq!(result[1], (Token::Dimension, "50%".into()));
        assert_eq!(result[2], (Token::Dimension, "100vw".into()));
        assert_eq!(result[3], (Token::Dimension, "80vh".into()));
    }

    #[test]
    fn test_negative_dimension_is_one_token() {
        assert_eq!(tokenize("-17px"), vec![(Token::Dimension, "-17px".into())]);
    }

    #[test]
    fn test_numbers() {
        let result = tokenize("10 -5 3.14 0");
        assert_eq!(result[0], (Token::Number, "10".into()));
        assert_eq!(result[1], (Token::Number, "-5".into()));
        assert_eq!(result[2], (Token::Number, "3.14".into()));
        assert_eq!(result[3], (Token::Number, "0".into()));
    }

    #[test]
    fn test_idents_and_functions() {
        assert_eq!(
            tokens("calc(100% + 17px)"),
            vec![
                Token::Ident,
                Token::ParenOpen,
                Token::Dimension,
                Token::Plus,
                Token::Dimension,
                Token::ParenClose,
            ]
        );
        assert_eq!(tokenize("border-top-width")[0].1, "border-top-width");
    }

    #[test]
    fn test_hex_and_strings() {
        let result = tokenize("#ff00aa \"a b\" 'c'");
        assert_eq!(result[0].0, Token::HexColor);
        assert_eq!(result[1], (Token::StringLiteral, "\"a b\"".into()));
        assert_eq!(result[2], (Token::StringLiteralSingle, "'c'".into()));
    }

    #[test]
    fn test_important() {
        assert_eq!(tokens("red !important"), vec![Token::Ident, Token::Important]);
    }

    #[test]
    fn test_spans() {
        let spans = tokenize_spanned("top: 0");
        assert_eq!(spans[0], (Token::Ident, 0..3));
        assert_eq!(spans[2], (Token::Number, 5..6));
    }

    #[test]
    fn test_first_error() {
        assert_eq!(first_error("width: 8px"), None);
        assert_eq!(first_error("width: 8px @"), Some(11..12));
    }
}
