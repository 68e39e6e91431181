//! Occupancy grid.
//!
//! Derives, for a grid size plus the current frames and tiles, which entity
//! owns each cell. Frames are always written before tiles. A tile written over
//! an already claimed cell takes the cell and the cell is counted as contested;
//! nothing here decides whether that is allowed, the placement validator does.
//!
//! Cells of a rectangle that fall outside the grid are ignored.

use std::fmt;

use super::blueprint::{CellRect, Frame, GridSize, Tile};

/// The owner of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellOwner<'a> {
    Empty,
    Frame(&'a str),
    Tile(&'a str),
}

impl CellOwner<'_> {
    /// Returns `true` if a frame or tile claims the cell.
    #[must_use]
    pub const fn is_claimed(&self) -> bool { !matches!(self, Self::Empty) }
}

impl fmt::Display for CellOwner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Frame(id) => write!(f, "frame '{id}'"),
            Self::Tile(id) => write!(f, "tile '{id}'"),
        }
    }
}

/// Row-major matrix of cell owners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid<'a> {
    size: GridSize,
    cells: Vec<CellOwner<'a>>,
    contested: usize,
}

impl<'a> OccupancyGrid<'a> {
    /// Builds the occupancy for all frames and tiles.
    #[must_use]
    pub fn build(size: GridSize, frames: &'a [Frame], tiles: &'a [Tile]) -> Self {
        Self::build_excluding(size, frames, tiles, None)
    }

    /// Builds the occupancy, leaving out every tile whose id equals `excluded`.
    ///
    /// Used by the validator so that a tile never collides with its own
    /// current footprint.
    #[must_use]
    pub fn build_excluding(
        size: GridSize,
        frames: &'a [Frame],
        tiles: &'a [Tile],
        excluded: Option<&str>,
    ) -> Self {
        let mut grid = Self {
            size,
            cells: vec![CellOwner::Empty; size.cell_count()],
            contested: 0,
        };

        for frame in frames {
            grid.fill(&frame.rect, CellOwner::Frame(&frame.id));
        }

        for tile in tiles.iter().filter(|t| Some(t.id.as_str()) != excluded) {
            grid.fill(&tile.rect, CellOwner::Tile(&tile.id));
        }

        grid
    }

    #[allow(clippy::cast_sign_loss)]
    const fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.size.contains_cell(row, col) {
            Some(((row - 1) * self.size.cols + (col - 1)) as usize)
        } else {
            None
        }
    }

    fn fill(&mut self, rect: &CellRect, owner: CellOwner<'a>) {
        for (row, col) in rect.cells_within(self.size) {
            let Some(idx) = self.index(row, col) else {
                continue;
            };
            if self.cells[idx].is_claimed() {
                self.contested += 1;
            }
            self.cells[idx] = owner;
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn size(&self) -> GridSize { self.size }

    /// Owner of a 1-based cell, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: i32, col: i32) -> Option<CellOwner<'a>> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Finds the first claimed cell inside `rect`, scanning row-major.
    #[must_use]
    pub fn first_claim_in(&self, rect: &CellRect) -> Option<(i32, i32, CellOwner<'a>)> {
        rect.cells_within(self.size).find_map(|(row, col)| {
            self.get(row, col).filter(CellOwner::is_claimed).map(|owner| (row, col, owner))
        })
    }

    /// Number of cell writes that landed on an already claimed cell.
    ///
    /// Zero means every cell has at most one owner.
    #[must_use]
    pub const fn contested_cells(&self) -> usize { self.contested }

    /// Number of cells with no owner.
    #[must_use]
    pub fn empty_cells(&self) -> usize { self.cells.iter().filter(|c| !c.is_claimed()).count() }

    /// Iterates over rows of owners, top to bottom.
    #[allow(clippy::cast_sign_loss)]
    pub fn rows(&self) -> impl Iterator<Item = &[CellOwner<'a>]> {
        self.cells.chunks(self.size.cols.max(1) as usize)
    }
}
