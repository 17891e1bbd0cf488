//! Geometry of a scroll wrapper's content container.
//!
//! The native scrollbar gutter is not reported directly; it is what remains of
//! the offset box after removing the client box and the borders. A zero
//! reading is indistinguishable from a reflow glitch, so it keeps the
//! previously known width.

use crate::css::{InlineStyle, Scalar};
use crate::dom::{BoxMetrics, Edge, NodeId};
use crate::error::{Error, Result};
use crate::geometry::{Offset, Size};
use crate::host::Host;

/// Native scrollbar thickness on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gutter {
    pub right: i32,
    pub bottom: i32,
}

impl Gutter {
    /// Assumed before the first measurement.
    pub const INITIAL: Gutter = Gutter {
        right: 20,
        bottom: 20,
    };

    pub const fn new(right: i32, bottom: i32) -> Self {
        Self { right, bottom }
    }
}

impl Default for Gutter {
    fn default() -> Self {
        Gutter::INITIAL
    }
}

/// Everything the wrapper stores about its content container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Client box of the content container.
    pub visible: Size,
    /// Scrollable extent.
    pub content: Size,
    pub gutter: Gutter,
    pub scroll: Offset,
}

impl Geometry {
    /// Whether the measured parts (visible, content, gutter) differ.
    /// Scroll offsets are tracked by scroll events, not by measurement.
    pub fn differs_from(&self, other: &Geometry) -> bool {
        self.visible != other.visible || self.content != other.content || self.gutter != other.gutter
    }
}

/// `offset − client − borders` per axis; a zero result keeps `previous`.
///
/// `borders` holds the computed `border-*-width` longhands.
pub fn gutter_widths(metrics: &BoxMetrics, borders: &InlineStyle, previous: Gutter) -> Result<Gutter> {
    let width = |edge: Edge| -> Result<i32> {
        let raw = borders.get(&format!("border-{}-width", edge.name())).unwrap_or("0px");
        Ok(Scalar::parse(raw)?.to_px()?.trunc() as i32)
    };
    let right = metrics.offset.width - metrics.client.width - width(Edge::Left)? - width(Edge::Right)?;
    let bottom = metrics.offset.height - metrics.client.height - width(Edge::Top)? - width(Edge::Bottom)?;
    Ok(Gutter {
        right: if right == 0 { previous.right } else { right },
        bottom: if bottom == 0 { previous.bottom } else { bottom },
    })
}

/// Measure `content` after forcing layout. `previous` supplies the gutter
/// fallback and the scroll offsets, which measurement does not touch.
pub fn measure(host: &mut Host, content: NodeId, previous: &Geometry) -> Result<Geometry> {
    let metrics = host.metrics(content)?;
    let borders = host
        .dom
        .computed_style(content)
        .ok_or(Error::MissingNode(content))?;
    Ok(Geometry {
        visible: metrics.client,
        content: metrics.scroll,
        gutter: gutter_widths(&metrics, &borders, previous.gutter)?,
        scroll: previous.scroll,
    })
}
