//! Screen buffer assembly and frame diffing.
//!
//! The `Compositor` holds one full frame of `StyledCell`s. Painted strips are
//! placed into it clipped to a region; `diff` against the previous frame
//! yields only the cells the driver has to redraw.

use super::strip::{CellStyle, Strip, StyledCell};
use crate::geometry::{Region, Size};

/// A single cell that changed between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

/// One frame of terminal cells.
#[derive(Debug, Clone)]
pub struct Compositor {
    /// `screen[y][x]` is the cell at column x, row y.
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Compositor {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Self::blank_screen(width, height),
            width,
            height,
        }
    }

    /// A compositor matching a window size; negative extents become zero.
    pub fn for_size(size: Size) -> Self {
        Self::new(
            size.width.clamp(0, u16::MAX as i32) as u16,
            size.height.clamp(0, u16::MAX as i32) as u16,
        )
    }

    /// Resize and blank the buffer.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen = Self::blank_screen(width, height);
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.fill(CellStyle::default());
    }

    pub fn fill(&mut self, style: CellStyle) {
        for row in &mut self.screen {
            for cell in row.iter_mut() {
                *cell = StyledCell::blank_styled(style.clone());
            }
        }
    }

    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Write strips into the buffer, keeping only cells inside `clip` and the screen.
    pub fn place_strips(&mut self, strips: &[Strip], clip: Region) {
        let clip = clip.intersection(self.bounds());
        if clip.is_empty() {
            return;
        }
        for strip in strips {
            let Some(visible) = strip.clip(clip) else {
                continue;
            };
            let row = &mut self.screen[visible.y as usize];
            for (i, cell) in visible.cells.into_iter().enumerate() {
                let col = (visible.x_offset + i as i32) as usize;
                if let Some(slot) = row.get_mut(col) {
                    *slot = cell;
                }
            }
        }
    }

    /// Cells that differ from `previous`; every cell outside the previous frame counts.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let mut updates = Vec::new();
        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let before = previous.screen.get(y).and_then(|r| r.get(x));
                if before != Some(cell) {
                    updates.push(CellUpdate {
                        x: x as u16,
                        y: y as u16,
                        cell: cell.clone(),
                    });
                }
            }
        }
        updates
    }

    /// Every cell, for a full redraw.
    pub fn all_cells(&self) -> Vec<CellUpdate> {
        self.diff(&Compositor::new(0, 0))
    }

    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Characters of row `y`.
    pub fn row_text(&self, y: u16) -> String {
        self.screen
            .get(y as usize)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
        (0..height as usize)
            .map(|_| vec![StyledCell::blank(); width as usize])
            .collect()
    }
}
