//! Strip: a horizontal run of styled terminal cells.
//!
//! Painters and widgets produce `Vec<Strip>` in screen coordinates; the
//! compositor places them into its buffer. Strips are clipped against the
//! scroll containers of the node that produced them before placement.

use crate::css::InlineStyle;
use crate::geometry::Region;

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Visual style of a single terminal cell.
///
/// Colours are kept as the raw strings from inline styles (named colours or
/// `#rrggbb`); the driver parses them when drawing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `color`, `background` (or `background-color`) and `font-weight`
    /// from an inline style.
    pub fn from_inline(style: &InlineStyle) -> Self {
        let background = style
            .get("background")
            .or_else(|| style.get("background-color"))
            .map(str::to_owned);
        CellStyle {
            fg: style.get("color").map(str::to_owned),
            bg: background,
            bold: matches!(style.get("font-weight"), Some("bold" | "700" | "800" | "900")),
            dim: false,
            reverse: false,
        }
    }

    /// The same style, faded.
    pub fn dimmed(mut self) -> Self {
        self.dim = true;
        self
    }

    /// Fill unset colours from `base`.
    pub fn or(mut self, base: &CellStyle) -> Self {
        if self.fg.is_none() {
            self.fg = base.fg.clone();
        }
        if self.bg.is_none() {
            self.bg = base.bg.clone();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// One character with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A space with default style.
    pub fn blank() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }

    pub fn blank_styled(style: CellStyle) -> Self {
        Self { ch: ' ', style }
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// One row of cells at screen row `y`, starting at column `x_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self {
            y,
            x_offset,
            cells: Vec::new(),
        }
    }

    /// A run of `width` copies of `ch`.
    pub fn repeat(y: i32, x_offset: i32, ch: char, width: i32, style: CellStyle) -> Self {
        let mut strip = Strip::new(y, x_offset);
        for _ in 0..width.max(0) {
            strip.push(ch, style.clone());
        }
        strip
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        self.cells.push(StyledCell::new(ch, style));
    }

    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            self.cells.push(StyledCell::new(ch, style.clone()));
        }
    }

    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }

    /// Keep only cells with absolute column in `[x_start, x_end)`.
    pub fn crop(&self, x_start: i32, x_end: i32) -> Strip {
        let mut result = Strip::new(self.y, x_start);
        for (i, cell) in self.cells.iter().enumerate() {
            let cell_x = self.x_offset + i as i32;
            if cell_x >= x_start && cell_x < x_end {
                if result.cells.is_empty() {
                    result.x_offset = cell_x;
                }
                result.cells.push(cell.clone());
            }
        }
        result
    }

    /// The part of this strip inside `clip`, or `None` if nothing remains.
    pub fn clip(&self, clip: Region) -> Option<Strip> {
        if self.y < clip.y || self.y >= clip.bottom() {
            return None;
        }
        let cropped = self.crop(clip.x, clip.right());
        (!cropped.cells.is_empty()).then_some(cropped)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> CellStyle {
        CellStyle {
            fg: Some("red".into()),
            ..CellStyle::default()
        }
    }

    #[test]
    fn cell_style_from_inline() {
        let style = InlineStyle::parse("color: white; background-color: #336699; font-weight: bold").unwrap();
        let cs = CellStyle::from_inline(&style);
        assert_eq!(cs.fg.as_deref(), Some("white"));
        assert_eq!(cs.bg.as_deref(), Some("#336699"));
        assert!(cs.bold);
        assert_eq!(CellStyle::from_inline(&InlineStyle::new()), CellStyle::default());
    }

    #[test]
    fn background_shorthand_wins() {
        let style = InlineStyle::parse("background: blue; background-color: red").unwrap();
        assert_eq!(CellStyle::from_inline(&style).bg.as_deref(), Some("blue"));
    }

    #[test]
    fn or_fills_missing_colours() {
        let base = CellStyle {
            bg: Some("gray".into()),
            ..CellStyle::default()
        };
        let merged = red().or(&base);
        assert_eq!(merged.fg.as_deref(), Some("red"));
        assert_eq!(merged.bg.as_deref(), Some("gray"));
        assert!(red().dimmed().dim);
    }

    #[test]
    fn repeat_and_right() {
        let s = Strip::repeat(2, 10, '█', 3, red());
        assert_eq!(s.width(), 3);
        assert_eq!(s.right(), 13);
        assert!(s.cells.iter().all(|c| c.ch == '█'));
        assert_eq!(Strip::repeat(0, 0, 'x', -4, red()).width(), 0);
    }

    #[test]
    fn crop_with_offset() {
        let mut s = Strip::new(0, 5);
        s.push_str("World", red());
        let cropped = s.crop(6, 9);
        assert_eq!(cropped.x_offset, 6);
        let text: String = cropped.cells.iter().map(|c| c.ch).collect();
        assert_eq!(text, "orl");
        assert_eq!(s.crop(10, 20).width(), 0);
    }

    #[test]
    fn clip_to_region() {
        let mut s = Strip::new(3, 0);
        s.push_str("Hello", CellStyle::default());
        let clip = Region::new(2, 0, 2, 10);
        let clipped = s.clip(clip).unwrap();
        assert_eq!(clipped.x_offset, 2);
        assert_eq!(clipped.width(), 2);
        assert!(s.clip(Region::new(0, 4, 10, 10)).is_none(), "row outside clip");
        assert!(s.clip(Region::new(8, 0, 10, 10)).is_none(), "columns outside clip");
    }
}
