//! Inline declaration parser.
//!
//! Parses `prop: value; prop2: value2` into an [`InlineStyle`]. Values are kept
//! as their raw source text (whitespace-normalised); they are interpreted
//! lazily by whoever reads them (layout, painting, the scrollbar).

use crate::css::style::InlineStyle;
use crate::css::tokenizer::{first_error, tokenize_spanned, Token};

/// Errors from style parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected character `{found}` at position {position}")]
    UnexpectedChar { position: usize, found: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("invalid scalar value `{0}`")]
    InvalidScalar(String),
}

/// Parse an inline style declaration list.
///
/// Empty declarations (`;;`) are skipped. A trailing `!important` is accepted
/// and dropped: inline styles already win over everything here.
pub fn parse_inline_style(input: &str) -> Result<InlineStyle, ParseError> {
    if let Some(span) = first_error(input) {
        return Err(ParseError::UnexpectedChar {
            position: span.start,
            found: input[span].to_string(),
        });
    }

    let tokens = tokenize_spanned(input);
    let mut style = InlineStyle::new();
    let mut i = 0;

    while i < tokens.len() {
        let (token, span) = &tokens[i];
        match token {
            Token::Semicolon => {
                i += 1;
                continue;
            }
            Token::Ident => {}
            _ => {
                return Err(ParseError::UnexpectedToken {
                    position: span.start,
                    message: format!("expected property name, found `{}`", &input[span.clone()]),
                })
            }
        }
        let property = &input[span.clone()];
        i += 1;

        match tokens.get(i) {
            Some((Token::Colon, _)) => i += 1,
            Some((_, span)) => {
                return Err(ParseError::UnexpectedToken {
                    position: span.start,
                    message: format!("expected `:` after `{property}`"),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEof(format!(
                    "expected `:` after `{property}`"
                )))
            }
        }

        let value_start = i;
        let mut depth = 0usize;
        while i < tokens.len() {
            match tokens[i].0 {
                Token::ParenOpen => depth += 1,
                Token::ParenClose => depth = depth.saturating_sub(1),
                Token::Semicolon if depth == 0 => break,
                _ => {}
            }
            i += 1;
        }

        let value_tokens: Vec<_> = tokens[value_start..i]
            .iter()
            .filter(|(t, _)| *t != Token::Important)
            .collect();
        let (Some(first), Some(last)) = (value_tokens.first(), value_tokens.last()) else {
            return Err(ParseError::UnexpectedEof(format!(
                "expected a value for `{property}`"
            )));
        };
        let raw = &input[first.1.start..last.1.end];
        let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        style.set(property, value);
    }

    Ok(style)
}
