//! Scroll geometry and thumb math.
//!
//! [`ScrollMetrics`] is what a scrollbar knows about the content it controls:
//! how much is visible, how much exists, and where the viewport sits. Thumb
//! length is proportional to `visible / content` (floored at a minimum) and
//! thumb position to `scroll / (content - visible)`.

use crate::geometry::{Offset, Size};

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The extent of `size` along this axis.
    pub fn of_size(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    /// The coordinate of `offset` along this axis.
    pub fn of_offset(self, offset: Offset) -> i32 {
        match self {
            Axis::Horizontal => offset.x,
            Axis::Vertical => offset.y,
        }
    }
}

/// Thumb placement within a track, in track-relative units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub start: i32,
    pub length: i32,
}

impl Thumb {
    pub fn end(&self) -> i32 {
        self.start + self.length
    }

    /// Whether track position `pos` falls on the thumb.
    pub fn contains(&self, pos: i32) -> bool {
        pos >= self.start && pos < self.end()
    }
}

/// Visible vs content extent and the current scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub visible: Size,
    pub content: Size,
    pub offset: Offset,
}

impl ScrollMetrics {
    pub fn new(visible: Size, content: Size, offset: Offset) -> Self {
        Self {
            visible,
            content,
            offset,
        }
    }

    /// `max(0, content - visible)` on each axis.
    pub fn max_scroll(&self) -> Offset {
        Offset::new(
            (self.content.width - self.visible.width).max(0),
            (self.content.height - self.visible.height).max(0),
        )
    }

    pub fn is_scrollable_x(&self) -> bool {
        self.content.width > self.visible.width
    }

    pub fn is_scrollable_y(&self) -> bool {
        self.content.height > self.visible.height
    }

    pub fn is_scrollable(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.is_scrollable_x(),
            Axis::Vertical => self.is_scrollable_y(),
        }
    }

    /// Scroll progress along `axis` in `[0.0, 1.0]`; 0.0 if not scrollable.
    pub fn scroll_ratio(&self, axis: Axis) -> f32 {
        let max = axis.of_offset(self.max_scroll());
        if max <= 0 {
            0.0
        } else {
            (axis.of_offset(self.offset) as f32 / max as f32).clamp(0.0, 1.0)
        }
    }

    /// Thumb placement on a track of length `track`.
    pub fn thumb(&self, axis: Axis, track: i32, min_length: i32) -> Thumb {
        let track = track.max(0);
        let visible = axis.of_size(self.visible);
        let content = axis.of_size(self.content);
        if content <= 0 || visible >= content {
            return Thumb {
                start: 0,
                length: track,
            };
        }
        let proportional = (track as f32 * visible as f32 / content as f32).round() as i32;
        let length = proportional.max(min_length).min(track);
        let travel = track - length;
        let start = (self.scroll_ratio(axis) * travel as f32).round() as i32;
        Thumb {
            start: start.clamp(0, travel),
            length,
        }
    }

    /// Scroll offset that puts the thumb at `start`; the inverse of
    /// [`thumb`](Self::thumb), clamped to `[0, max_scroll]`.
    pub fn offset_for_thumb(&self, axis: Axis, start: i32, track: i32, min_length: i32) -> i32 {
        let thumb = self.thumb(axis, track, min_length);
        let travel = track - thumb.length;
        let max = axis.of_offset(self.max_scroll());
        if travel <= 0 || max <= 0 {
            return 0;
        }
        let ratio = (start as f32 / travel as f32).clamp(0.0, 1.0);
        ((ratio * max as f32).round() as i32).clamp(0, max)
    }
}
