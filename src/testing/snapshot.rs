//! Snapshot rendering helpers.
//!
//! Functions for converting rendered output (strips, compositor screens)
//! into plain-text strings suitable for snapshot testing and assertions.

use crate::geometry::Region;
use crate::render::compositor::Compositor;
use crate::render::strip::Strip;
use crate::widget::Widget;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a widget into a `width` x `height` region at the origin and return
/// it as text, one trimmed line per row.
pub fn render_to_string(widget: &dyn Widget, width: i32, height: i32) -> String {
    let strips = widget.render(Region::new(0, 0, width, height));
    strips_to_string(&strips, width, height)
}

/// Convert raw strips to a plain text string.
///
/// Builds a `width` x `height` grid of spaces, then overlays each strip's cells
/// at the appropriate (x, y) positions. Each row is right-trimmed of spaces, and
/// rows are joined with `'\n'`.
pub fn strips_to_string(strips: &[Strip], width: i32, height: i32) -> String {
    if width <= 0 || height <= 0 {
        return String::new();
    }

    let mut grid: Vec<Vec<char>> = vec![vec![' '; width as usize]; height as usize];
    for strip in strips {
        if strip.y < 0 || strip.y >= height {
            continue;
        }
        let row = &mut grid[strip.y as usize];
        for (i, cell) in strip.cells.iter().enumerate() {
            let x = strip.x_offset + i as i32;
            if (0..width).contains(&x) {
                row[x as usize] = cell.ch;
            }
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a full compositor screen to a plain text string, one trimmed line
/// per row.
pub fn compositor_to_string(compositor: &Compositor) -> String {
    if compositor.width == 0 || compositor.height == 0 {
        return String::new();
    }
    (0..compositor.height)
        .map(|y| compositor.row_text(y).trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;
    use crate::widgets::{ScrollBar, ScrollBarProps, ScrollOptions};
    use crate::geometry::{Offset, Size};
    use std::time::Duration;

    #[test]
    fn strips_to_string_with_offset() {
        let mut strip = Strip::new(0, 5);
        strip.push_str("XY", CellStyle::default());
        assert_eq!(strips_to_string(&[strip], 10, 1), "     XY");
    }

    #[test]
    fn strips_to_string_multirow() {
        let mut s0 = Strip::new(0, 0);
        s0.push_str("Row0", CellStyle::default());
        let mut s1 = Strip::new(1, 0);
        s1.push_str("Row1", CellStyle::default());
        assert_eq!(strips_to_string(&[s0, s1], 10, 3), "Row0\nRow1\n");
    }

    #[test]
    fn strips_to_string_clips_out_of_bounds() {
        let mut ghost = Strip::new(5, 0);
        ghost.push_str("Ghost", CellStyle::default());
        let mut wide = Strip::new(0, -2);
        wide.push_str("abcdef", CellStyle::default());
        assert_eq!(strips_to_string(&[ghost, wide], 3, 2), "cde\n");
        assert!(strips_to_string(&[], 0, 0).is_empty());
    }

    #[test]
    fn compositor_to_string_with_content() {
        let mut compositor = Compositor::new(10, 3);
        let mut strip = Strip::new(1, 2);
        strip.push_str("Hi", CellStyle::default());
        compositor.place_strips(&[strip], compositor.bounds());
        assert_eq!(compositor_to_string(&compositor), "\n  Hi\n");
        assert!(compositor_to_string(&Compositor::new(0, 0)).is_empty());
    }

    #[test]
    fn scrollbar_renders_to_text() {
        let mut bar = ScrollBar::new(&ScrollOptions::new().with_min_lengths(1, 1));
        let props = ScrollBarProps {
            visible: Size::new(4, 4),
            content: Size::new(4, 8),
            scroll: Offset::new(0, 4),
            show: true,
        };
        bar.set_props(props, Duration::ZERO);
        assert_eq!(render_to_string(&bar, 4, 4), "   │\n   │\n   █\n   █");
    }
}
