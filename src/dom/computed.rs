//! Computed style: longhand values derived from a node's inline style.

use crate::css::{InlineStyle, Scalar};

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn name(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }

    /// Pick this edge's value out of a 1-4 value box shorthand (`margin`,
    /// `border-width`, ...), using the usual top/right/bottom/left expansion.
    pub fn pick<'a>(self, values: &[&'a str]) -> Option<&'a str> {
        let index = match (values.len(), self) {
            (0, _) => return None,
            (1, _) => 0,
            (2, Edge::Top | Edge::Bottom) => 0,
            (2, _) => 1,
            (3, Edge::Top) => 0,
            (3, Edge::Right | Edge::Left) => 1,
            (3, Edge::Bottom) => 2,
            (_, Edge::Top) => 0,
            (_, Edge::Right) => 1,
            (_, Edge::Bottom) => 2,
            (_, Edge::Left) => 3,
        };
        values.get(index).copied()
    }
}

/// The computed `border-<edge>-width` of an inline style, as a string.
///
/// Resolution order: the longhand, the `border-<edge>` shorthand, the
/// `border-width` shorthand, the `border` shorthand, then `0px`. The value is
/// returned verbatim; callers parse it and surface keywords such as `thin` as
/// errors.
pub fn border_width(style: &InlineStyle, edge: Edge) -> String {
    if let Some(value) = style.get(&format!("border-{}-width", edge.name())) {
        return value.to_string();
    }
    if let Some(width) = style
        .get(&format!("border-{}", edge.name()))
        .and_then(shorthand_width)
    {
        return width;
    }
    if let Some(values) = style.get("border-width") {
        let parts: Vec<&str> = values.split_whitespace().collect();
        if let Some(value) = edge.pick(&parts) {
            return value.to_string();
        }
    }
    if let Some(width) = style.get("border").and_then(shorthand_width) {
        return width;
    }
    "0px".to_string()
}

/// The four border width longhands as a style.
pub fn computed_borders(style: &InlineStyle) -> InlineStyle {
    Edge::ALL.iter().fold(InlineStyle::new(), |acc, &edge| {
        acc.with(&format!("border-{}-width", edge.name()), border_width(style, edge))
    })
}

/// `none` disables the border; otherwise the first length in the shorthand.
fn shorthand_width(value: &str) -> Option<String> {
    if value.split_whitespace().any(|part| part == "none") {
        return Some("0px".to_string());
    }
    value
        .split_whitespace()
        .find(|part| Scalar::parse(part).is_ok_and(|s| !s.is_auto()))
        .map(str::to_string)
}
