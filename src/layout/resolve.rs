//! Inline style -> taffy Style conversion.
//!
//! Maps the raw declarations of an [`InlineStyle`] to taffy's layout types.
//! Unparsable or unsupported values are skipped with a warning, the way a
//! browser drops an invalid declaration.

use log::warn;
use taffy::prelude::*;

use crate::css::{InlineStyle, Scalar, Unit};
use crate::dom::{border_width, Edge};

/// Convert a [`Scalar`] to a [`LengthPercentageAuto`], resolving viewport-relative
/// units against the given viewport size.
pub fn resolve_scalar(scalar: &Scalar, viewport: taffy::geometry::Size<f32>) -> LengthPercentageAuto {
    match scalar.unit {
        Unit::Px => LengthPercentageAuto::from_length(scalar.value),
        Unit::Percent => LengthPercentageAuto::from_percent(scalar.value / 100.0),
        Unit::Vw => LengthPercentageAuto::from_length(scalar.value / 100.0 * viewport.width),
        Unit::Vh => LengthPercentageAuto::from_length(scalar.value / 100.0 * viewport.height),
        Unit::Auto => LengthPercentageAuto::AUTO,
    }
}

/// Convert a [`Scalar`] to a [`LengthPercentage`] for contexts that do not allow
/// auto (padding, border). `Auto` maps to zero.
pub fn resolve_scalar_definite(
    scalar: &Scalar,
    viewport: taffy::geometry::Size<f32>,
) -> LengthPercentage {
    match scalar.unit {
        Unit::Px => LengthPercentage::from_length(scalar.value),
        Unit::Percent => LengthPercentage::from_percent(scalar.value / 100.0),
        Unit::Vw => LengthPercentage::from_length(scalar.value / 100.0 * viewport.width),
        Unit::Vh => LengthPercentage::from_length(scalar.value / 100.0 * viewport.height),
        Unit::Auto => LengthPercentage::ZERO,
    }
}

/// Convert a [`Scalar`] to a [`Dimension`] for sizing contexts (width, height, min/max).
fn resolve_scalar_dimension(scalar: &Scalar, viewport: taffy::geometry::Size<f32>) -> Dimension {
    match scalar.unit {
        Unit::Px => Dimension::from_length(scalar.value),
        Unit::Percent => Dimension::from_percent(scalar.value / 100.0),
        Unit::Vw => Dimension::from_length(scalar.value / 100.0 * viewport.width),
        Unit::Vh => Dimension::from_length(scalar.value / 100.0 * viewport.height),
        Unit::Auto => Dimension::AUTO,
    }
}

fn resolve_overflow(value: &str) -> Option<taffy::style::Overflow> {
    match value {
        "visible" => Some(taffy::style::Overflow::Visible),
        "hidden" => Some(taffy::style::Overflow::Hidden),
        "clip" => Some(taffy::style::Overflow::Clip),
        "scroll" | "auto" => Some(taffy::style::Overflow::Scroll),
        _ => None,
    }
}

/// Parse a property as a scalar, warning about and discarding bad values.
fn scalar(style: &InlineStyle, property: &str) -> Option<Scalar> {
    match style.scalar(property) {
        Ok(value) => value,
        Err(err) => {
            warn!("ignoring `{property}: {}`: {err}", style.get(property).unwrap_or_default());
            None
        }
    }
}

/// One edge of a box property: the `<prop>-<edge>` longhand, else the
/// 1-4 value `<prop>` shorthand.
fn box_edge(style: &InlineStyle, property: &str, edge: Edge) -> Option<Scalar> {
    let longhand = format!("{property}-{}", edge.name());
    if style.get(&longhand).is_some() {
        return scalar(style, &longhand);
    }
    let shorthand = style.get(property)?;
    let parts: Vec<&str> = shorthand.split_whitespace().collect();
    let part = edge.pick(&parts)?;
    match Scalar::parse(part) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("ignoring `{property}: {shorthand}`: {err}");
            None
        }
    }
}

fn edges<T: Copy>(
    style: &InlineStyle,
    property: &str,
    default: T,
    convert: impl Fn(Scalar) -> T,
) -> taffy::geometry::Rect<T> {
    let side = |edge| box_edge(style, property, edge).map(&convert).unwrap_or(default);
    taffy::geometry::Rect {
        top: side(Edge::Top),
        right: side(Edge::Right),
        bottom: side(Edge::Bottom),
        left: side(Edge::Left),
    }
}

/// Convert an inline style into a [`taffy::Style`].
///
/// Sizes are border-box. Mapping summary:
/// - `display: none` -> `Display::None`, `display: flex` -> flex row, anything
///   else -> block
/// - `flex-direction` -> `flex_direction`
/// - `position: absolute` -> `Position::Absolute`; `top/right/bottom/left` -> `inset`
/// - `width/height`, `min-*`, `max-*` -> sizes
/// - `margin`, `padding` (shorthand or longhands)
/// - border widths as computed by [`border_width`]
/// - `overflow`, `overflow-x`, `overflow-y`; `scroll` and `auto` reserve
///   `scrollbar_width` for the native scrollbar
pub fn resolve_styles(style: &InlineStyle, viewport_size: (u16, u16), scrollbar_width: f32) -> taffy::Style {
    let viewport = taffy::geometry::Size {
        width: viewport_size.0 as f32,
        height: viewport_size.1 as f32,
    };

    let mut out = taffy::Style {
        display: Display::Block,
        scrollbar_width,
        ..Default::default()
    };

    match style.get("display") {
        Some("none") => out.display = Display::None,
        Some("flex") => {
            out.display = Display::Flex;
            out.flex_direction = FlexDirection::Row;
        }
        _ => {}
    }
    match style.get("flex-direction") {
        Some("row") => out.flex_direction = FlexDirection::Row,
        Some("column") => out.flex_direction = FlexDirection::Column,
        _ => {}
    }

    if style.get("position") == Some("absolute") {
        out.position = Position::Absolute;
    }
    out.inset = taffy::geometry::Rect {
        top: scalar(style, "top").map_or(LengthPercentageAuto::AUTO, |s| resolve_scalar(&s, viewport)),
        right: scalar(style, "right").map_or(LengthPercentageAuto::AUTO, |s| resolve_scalar(&s, viewport)),
        bottom: scalar(style, "bottom")
            .map_or(LengthPercentageAuto::AUTO, |s| resolve_scalar(&s, viewport)),
        left: scalar(style, "left").map_or(LengthPercentageAuto::AUTO, |s| resolve_scalar(&s, viewport)),
    };

    let dimension = |property: &str| scalar(style, property).map(|s| resolve_scalar_dimension(&s, viewport));
    if let Some(width) = dimension("width") {
        out.size.width = width;
    }
    if let Some(height) = dimension("height") {
        out.size.height = height;
    }
    if let Some(width) = dimension("min-width") {
        out.min_size.width = width;
    }
    if let Some(height) = dimension("min-height") {
        out.min_size.height = height;
    }
    if let Some(width) = dimension("max-width") {
        out.max_size.width = width;
    }
    if let Some(height) = dimension("max-height") {
        out.max_size.height = height;
    }

    out.margin = edges(style, "margin", LengthPercentageAuto::ZERO, |s| resolve_scalar(&s, viewport));
    out.padding = edges(style, "padding", LengthPercentage::ZERO, |s| {
        resolve_scalar_definite(&s, viewport)
    });

    let border = |edge| match Scalar::parse(&border_width(style, edge)) {
        Ok(s) => resolve_scalar_definite(&s, viewport),
        Err(err) => {
            warn!("ignoring border-{}-width: {err}", edge.name());
            LengthPercentage::ZERO
        }
    };
    out.border = taffy::geometry::Rect {
        top: border(Edge::Top),
        right: border(Edge::Right),
        bottom: border(Edge::Bottom),
        left: border(Edge::Left),
    };

    let overflow = style.get("overflow").and_then(resolve_overflow);
    let axis = |property: &str| {
        style
            .get(property)
            .and_then(resolve_overflow)
            .or(overflow)
            .unwrap_or(taffy::style::Overflow::Visible)
    };
    out.overflow = taffy::geometry::Point {
        x: axis("overflow-x"),
        y: axis("overflow-y"),
    };

    out
}

/// Whether a style clips its descendants (any overflow other than visible).
pub fn clips_overflow(style: &InlineStyle) -> (bool, bool) {
    let overflow = style.get("overflow");
    let clips = |property: &str| {
        style
            .get(property)
            .or(overflow)
            .is_some_and(|value| value != "visible")
    };
    (clips("overflow-x"), clips("overflow-y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: taffy::geometry::Size<f32> = taffy::geometry::Size {
        width: 80.0,
        height: 24.0,
    };
    const VP: (u16, u16) = (80, 24);

    fn resolve(css: &str) -> taffy::Style {
        resolve_styles(&InlineStyle::parse(css).unwrap(), VP, 17.0)
    }

    #[test]
    fn resolve_units() {
        assert_eq!(
            resolve_scalar(&Scalar::px(10.0), VIEWPORT),
            LengthPercentageAuto::from_length(10.0)
        );
        assert_eq!(
            resolve_scalar(&Scalar::percent(50.0), VIEWPORT),
            LengthPercentageAuto::from_percent(0.5)
        );
        assert_eq!(
            resolve_scalar(&Scalar::parse("50vw").unwrap(), VIEWPORT),
            LengthPercentageAuto::from_length(40.0)
        );
        assert_eq!(
            resolve_scalar(&Scalar::parse("100vh").unwrap(), VIEWPORT),
            LengthPercentageAuto::from_length(24.0)
        );
        assert_eq!(resolve_scalar(&Scalar::auto(), VIEWPORT), LengthPercentageAuto::AUTO);
        assert_eq!(
            resolve_scalar_definite(&Scalar::auto(), VIEWPORT),
            LengthPercentage::ZERO
        );
    }

    #[test]
    fn default_is_block_visible() {
        let style = resolve("");
        assert_eq!(style.display, Display::Block);
        assert_eq!(style.position, Position::Relative);
        assert_eq!(style.overflow.x, taffy::style::Overflow::Visible);
        assert_eq!(style.scrollbar_width, 17.0);
    }

    #[test]
    fn display_and_direction() {
        assert_eq!(resolve("display: none").display, Display::None);
        let flex = resolve("display: flex");
        assert_eq!(flex.display, Display::Flex);
        assert_eq!(flex.flex_direction, FlexDirection::Row);
        assert_eq!(
            resolve("display: flex; flex-direction: column").flex_direction,
            FlexDirection::Column
        );
    }

    #[test]
    fn absolute_with_negative_insets() {
        let style = resolve("position: absolute; top: 0; left: 0; right: -17px; bottom: -17px");
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.inset.top, LengthPercentageAuto::from_length(0.0));
        assert_eq!(style.inset.right, LengthPercentageAuto::from_length(-17.0));
        assert_eq!(style.inset.bottom, LengthPercentageAuto::from_length(-17.0));
    }

    #[test]
    fn sizes() {
        let style = resolve("width: 500px; height: 50%; max-width: 10vw");
        assert_eq!(style.size.width, Dimension::from_length(500.0));
        assert_eq!(style.size.height, Dimension::from_percent(0.5));
        assert_eq!(style.max_size.width, Dimension::from_length(8.0));
        assert_eq!(style.min_size.width, Dimension::AUTO);
    }

    #[test]
    fn padding_shorthand_and_longhand() {
        let style = resolve("padding: 1px 2px; padding-left: 5px");
        assert_eq!(style.padding.top, LengthPercentage::from_length(1.0));
        assert_eq!(style.padding.right, LengthPercentage::from_length(2.0));
        assert_eq!(style.padding.left, LengthPercentage::from_length(5.0));
    }

    #[test]
    fn borders_from_shorthand() {
        let style = resolve("border: 1px solid red");
        assert_eq!(style.border.top, LengthPercentage::from_length(1.0));
        assert_eq!(style.border.left, LengthPercentage::from_length(1.0));
    }

    #[test]
    fn overflow_axes() {
        let style = resolve("overflow: hidden; overflow-y: scroll");
        assert_eq!(style.overflow.x, taffy::style::Overflow::Hidden);
        assert_eq!(style.overflow.y, taffy::style::Overflow::Scroll);
        assert_eq!(
            clips_overflow(&InlineStyle::parse("overflow: hidden").unwrap()),
            (true, true)
        );
        assert_eq!(clips_overflow(&InlineStyle::new()), (false, false));
    }

    #[test]
    fn invalid_values_are_skipped() {
        let style = resolve("width: calc(100% + 17px); height: 3px");
        assert_eq!(style.size.width, Dimension::AUTO);
        assert_eq!(style.size.height, Dimension::from_length(3.0));
    }
}
