//! InlineStyle: an ordered property -> value map.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::parser::{parse_inline_style, ParseError};
use super::scalar::Scalar;

/// Inline style declarations, in source order.
///
/// Setting an existing property replaces its value in place, so the order of
/// first appearance is preserved. Property names are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `prop: value; ...`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_inline_style(input)
    }

    /// Set a property (builder).
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let property = property.to_ascii_lowercase();
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Get a property's raw value.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self
            .declarations
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(property))?;
        Some(self.declarations.remove(index).1)
    }

    /// Overlay `other` on top of `self`: its declarations win.
    pub fn merge(&mut self, other: &InlineStyle) {
        for (property, value) in &other.declarations {
            self.set(property, value.clone());
        }
    }

    /// Parse a property as a [`Scalar`]. `Ok(None)` if the property is unset.
    pub fn scalar(&self, property: &str) -> Result<Option<Scalar>, ParseError> {
        self.get(property).map(Scalar::parse).transpose()
    }

    /// Iterate `(property, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{property}: {value};")?;
        }
        Ok(())
    }
}

impl FromStr for InlineStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_inline_style(s)
    }
}

/// Accepts either a declaration string (`"color: red; width: 8px"`) or a map
/// of property names to values (`{"color": "red", "width": 8}`). Map keys may
/// be camelCase; numbers are read as device units.
impl<'de> Deserialize<'de> for InlineStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(InlineStyleVisitor)
    }
}

struct InlineStyleVisitor;

impl<'de> Visitor<'de> for InlineStyleVisitor {
    type Value = InlineStyle;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a style declaration string or a map of properties")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<InlineStyle, E> {
        parse_inline_style(text).map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<InlineStyle, A::Error> {
        let mut style = InlineStyle::new();
        while let Some((key, value)) = map.next_entry::<String, StyleValue>()? {
            let value = match value {
                StyleValue::Text(text) => text,
                StyleValue::Number(n) => Scalar::px(n as f32).to_string(),
            };
            style.set(&kebab_case(&key), value);
        }
        Ok(style)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleValue {
    Text(String),
    Number(f64),
}

/// `borderTopWidth` -> `border-top-width`.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
