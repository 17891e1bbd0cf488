//! Style strings: tokenizer, scalar values, inline declaration lists.

pub mod parser;
pub mod scalar;
pub mod style;
pub mod tokenizer;

pub use parser::{parse_inline_style, ParseError};
pub use scalar::{Scalar, Unit};
pub use style::InlineStyle;
