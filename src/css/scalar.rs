//! Scalar values: Scalar, Unit (px, %, vw, vh, auto).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::parser::ParseError;
use super::tokenizer::{first_error, tokenize_spanned, Token};

/// A length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    /// Device units. A bare number is read as `px`.
    Px,
    /// Percentage of the parent dimension.
    Percent,
    /// Viewport width percentage.
    Vw,
    /// Viewport height percentage.
    Vh,
    /// Auto-size (content-based).
    Auto,
}

/// A scalar value with a unit, e.g. `17px`, `50%`, `auto`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    pub value: f32,
    pub unit: Unit,
}

impl Scalar {
    /// Create a scalar in device units.
    pub fn px(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    /// Create a scalar as a percentage.
    pub fn percent(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    /// Create an auto scalar.
    pub fn auto() -> Self {
        Self {
            value: 0.0,
            unit: Unit::Auto,
        }
    }

    /// Returns `true` if this scalar is auto-sized.
    pub fn is_auto(&self) -> bool {
        self.unit == Unit::Auto
    }

    /// Parse a single scalar value: `17px`, `17`, `50%`, `10vw`, `80vh`, `auto`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if let Some(span) = first_error(input) {
            return Err(ParseError::UnexpectedChar {
                position: span.start,
                found: input[span].to_string(),
            });
        }

        let tokens = tokenize_spanned(input);
        let (token, span) = match tokens.as_slice() {
            [single] => single.clone(),
            [] => return Err(ParseError::UnexpectedEof("expected a scalar value".into())),
            [_, (_, extra), ..] => {
                return Err(ParseError::UnexpectedToken {
                    position: extra.start,
                    message: format!("trailing input `{}`", &input[extra.start..]),
                })
            }
        };
        let text = &input[span.clone()];

        match token {
            Token::Number => Ok(Scalar::px(parse_number(text, span.start)?)),
            Token::Dimension => {
                let (number, unit) = split_unit(text);
                let value = parse_number(number, span.start)?;
                Ok(Scalar { value, unit })
            }
            Token::Ident if text.eq_ignore_ascii_case("auto") => Ok(Scalar::auto()),
            _ => Err(ParseError::InvalidScalar(text.to_string())),
        }
    }

    /// Resolve to an absolute length.
    ///
    /// `parent` is the dimension percentages refer to; `viewport` is
    /// `(width, height)` for `vw`/`vh`. `Auto` resolves to `None`.
    pub fn resolve(&self, parent: f32, viewport: (f32, f32)) -> Option<f32> {
        match self.unit {
            Unit::Px => Some(self.value),
            Unit::Percent => Some(self.value / 100.0 * parent),
            Unit::Vw => Some(self.value / 100.0 * viewport.0),
            Unit::Vh => Some(self.value / 100.0 * viewport.1),
            Unit::Auto => None,
        }
    }

    /// The value in device units, for contexts where relative units make no sense
    /// (border widths, scrollbar thickness).
    pub fn to_px(&self) -> Result<f32, ParseError> {
        match self.unit {
            Unit::Px => Ok(self.value),
            _ => Err(ParseError::InvalidScalar(format!("{self} is not an absolute length"))),
        }
    }
}

fn split_unit(text: &str) -> (&str, Unit) {
    for (suffix, unit) in [
        ("px", Unit::Px),
        ("%", Unit::Percent),
        ("vw", Unit::Vw),
        ("vh", Unit::Vh),
    ] {
        if let Some(number) = text.strip_suffix(suffix) {
            return (number, unit);
        }
    }
    (text, Unit::Px)
}

fn parse_number(text: &str, position: usize) -> Result<f32, ParseError> {
    text.parse::<f32>().map_err(|_| ParseError::UnexpectedToken {
        position,
        message: format!("`{text}` is not a number"),
    })
}

impl FromStr for Scalar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scalar::parse(s)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Scalar::parse(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.unit {
            Unit::Auto => return write!(f, "auto"),
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
        };
        if self.value.fract() == 0.0 {
            write!(f, "{}{suffix}", self.value as i64)
        } else {
            write!(f, "{}{suffix}", self.value)
        }
    }
}
