//! Integer cell geometry shared by the DOM, layout and compositor.
//!
//! A unit is one terminal cell. Style strings still spell lengths with a `px`
//! suffix; `1px` is one cell.

use std::ops::{Add, Sub};

/// A point, a displacement, or a scroll position (`x` = left, `y` = top).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Keeps a scroll position inside `[0, max]` on both axes. A negative
    /// maximum (content smaller than its box) pins the axis to zero.
    #[inline]
    pub fn clamp_to(self, max: Offset) -> Offset {
        Offset::new(self.x.clamp(0, max.x.max(0)), self.y.clamp(0, max.y.max(0)))
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in cells. Box metrics (`offset`, `client`, `scroll`)
/// are all expressed as sizes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Larger of the two on each axis.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// The rectangle of this size anchored at the origin, e.g. the window.
    #[inline]
    pub const fn to_region(self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }
}

/// An axis-aligned rectangle in screen cells. Right and bottom edges are
/// exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn offset(self) -> Offset {
        Offset::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when nothing can be drawn into the region.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Hit test for the cell at (`x`, `y`).
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        self.x <= x && x < self.right() && self.y <= y && y < self.bottom()
    }

    /// The overlap of two regions, or [`Region::EMPTY`] when they are
    /// disjoint. Used to clip scrolled content to its container.
    pub fn intersection(self, other: Region) -> Region {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Region::EMPTY;
        }
        Region::new(left, top, right - left, bottom - top)
    }
}
