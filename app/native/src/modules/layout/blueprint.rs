//! Blueprint data model.
//!
//! A blueprint is an immutable template: a grid size, permanently blocked
//! regions ("frames"), the initial tile arrangement, and the placement gates
//! applied when tiles are moved or resized. Sessions deep-copy the frames and
//! tiles out of a blueprint and never write back into it.
//!
//! All coordinates are 1-based grid cells, matching the blueprint file format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::occupancy::OccupancyGrid;
use super::placement::{PlacementViolation, check_placement};
use crate::constants::MAX_GRID_DIMENSION;

/// Identifier of a tile, stable across moves and resizes.
pub type TileId = String;

// ============================================================================
// Geometry
// ============================================================================

/// Grid dimensions of a blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GridSize {
    /// Number of rows.
    pub rows: i32,
    /// Number of columns.
    pub cols: i32,
}

impl GridSize {
    /// Creates a new grid size.
    #[must_use]
    pub const fn new(rows: i32, cols: i32) -> Self { Self { rows, cols } }

    /// Total number of cells, or zero for a degenerate grid.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn cell_count(&self) -> usize {
        if self.rows <= 0 || self.cols <= 0 {
            0
        } else {
            (self.rows as usize) * (self.cols as usize)
        }
    }

    /// Returns `true` if the 1-based cell lies inside the grid.
    #[must_use]
    pub const fn contains_cell(&self, row: i32, col: i32) -> bool {
        row >= 1 && col >= 1 && row <= self.rows && col <= self.cols
    }

    /// The rectangle covering the whole grid.
    #[must_use]
    pub const fn full_rect(&self) -> CellRect { CellRect::new(1, 1, self.rows, self.cols) }
}

/// A rectangle of grid cells: top-left cell plus row/column spans.
///
/// Candidate rectangles may lie partly outside the grid; only the placement
/// validator decides whether one is acceptable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct CellRect {
    pub row: i32,
    pub col: i32,
    pub row_span: i32,
    pub col_span: i32,
}

impl CellRect {
    /// Creates a new cell rectangle.
    #[must_use]
    pub const fn new(row: i32, col: i32, row_span: i32, col_span: i32) -> Self {
        Self { row, col, row_span, col_span }
    }

    /// Last row covered (inclusive). Saturates instead of overflowing, so an
    /// oversized span always lands past the grid edge.
    #[must_use]
    pub const fn last_row(&self) -> i32 {
        self.row.saturating_add(self.row_span).saturating_sub(1)
    }

    /// Last column covered (inclusive).
    #[must_use]
    pub const fn last_col(&self) -> i32 {
        self.col.saturating_add(self.col_span).saturating_sub(1)
    }

    /// The same rectangle shifted by whole cells.
    #[must_use]
    pub const fn translated(&self, d_row: i32, d_col: i32) -> Self {
        Self::new(
            self.row.saturating_add(d_row),
            self.col.saturating_add(d_col),
            self.row_span,
            self.col_span,
        )
    }

    /// The same origin with spans grown or shrunk, each clamped to `[min, max]`.
    #[must_use]
    pub fn resized(&self, d_row_span: i32, d_col_span: i32, min: i32, max: i32) -> Self {
        Self::new(
            self.row,
            self.col,
            self.row_span.saturating_add(d_row_span).clamp(min, max),
            self.col_span.saturating_add(d_col_span).clamp(min, max),
        )
    }

    /// Center in grid-unit space as `(row, col)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.row) + f64::from(self.row_span) / 2.0,
            f64::from(self.col) + f64::from(self.col_span) / 2.0,
        )
    }

    /// Iterates over every `(row, col)` covered by the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (first_col, last_col) = (self.col, self.last_col());
        (self.row..=self.last_row()).flat_map(move |r| (first_col..=last_col).map(move |c| (r, c)))
    }

    /// Iterates over the covered cells that lie inside `grid`, row-major.
    pub fn cells_within(&self, grid: GridSize) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (first_row, first_col) = (self.row.max(1), self.col.max(1));
        let (last_row, last_col) = (self.last_row().min(grid.rows), self.last_col().min(grid.cols));
        (first_row..=last_row).flat_map(move |r| (first_col..=last_col).map(move |c| (r, c)))
    }

    /// Returns `true` if the rectangle fits entirely inside `grid`.
    #[must_use]
    pub const fn fits_within(&self, grid: GridSize) -> bool {
        self.row >= 1
            && self.col >= 1
            && self.row_span >= 1
            && self.col_span >= 1
            && self.last_row() <= grid.rows
            && self.last_col() <= grid.cols
    }
}

/// Minimum or maximum span along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpanLimit {
    pub rows: i32,
    pub cols: i32,
}

impl SpanLimit {
    /// Creates a new span limit.
    #[must_use]
    pub const fn new(rows: i32, cols: i32) -> Self { Self { rows, cols } }
}

impl Default for SpanLimit {
    fn default() -> Self { Self::new(1, 1) }
}

// ============================================================================
// Frames, Tiles and Gates
// ============================================================================

/// A permanently blocked region. Frames never move during a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Frame {
    pub id: String,
    #[serde(flatten)]
    pub rect: CellRect,
}

impl Frame {
    /// Creates a new frame.
    #[must_use]
    pub fn new(id: impl Into<String>, rect: CellRect) -> Self { Self { id: id.into(), rect } }
}

/// A user-movable, resizable region with a stable identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tile {
    pub id: TileId,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub rect: CellRect,
    /// CSS-style color used by renderers for the tile accent.
    #[serde(default)]
    pub color: String,
}

impl Tile {
    /// Creates a new tile.
    #[must_use]
    pub fn new(
        id: impl Into<TileId>,
        title: impl Into<String>,
        rect: CellRect,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            rect,
            color: color.into(),
        }
    }
}

/// Placement constraints applied by the validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Gates {
    /// Smallest allowed span per axis (inclusive).
    pub min_span: SpanLimit,

    /// Largest allowed span per axis (inclusive). Defaults to the grid size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_span: Option<SpanLimit>,

    /// Whether tiles may share cells with frames or other tiles.
    pub allow_overlap: bool,

    /// Kept for blueprint-file compatibility. Tiles are always kept inside
    /// the grid regardless of this flag.
    pub restrict_to_grid: bool,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            min_span: SpanLimit::default(),
            max_span: None,
            allow_overlap: false,
            restrict_to_grid: true,
        }
    }
}

impl Gates {
    /// The effective maximum span for a grid.
    #[must_use]
    pub fn max_span_for(&self, grid: GridSize) -> SpanLimit {
        self.max_span.unwrap_or(SpanLimit::new(grid.rows, grid.cols))
    }
}

// ============================================================================
// Blueprint
// ============================================================================

/// Errors found when checking a blueprint's own initial arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlueprintError {
    #[error("blueprint '{0}' has an empty grid")]
    EmptyGrid(String),

    #[error("blueprint '{0}' exceeds the largest supported grid")]
    GridTooLarge(String),

    #[error("blueprint '{0}' has span gates below 1 or a maximum under the minimum")]
    InvalidGates(String),

    #[error("frame '{frame}' lies outside the grid of blueprint '{blueprint}'")]
    FrameOutOfBounds { blueprint: String, frame: String },

    #[error("frame '{frame}' overlaps another frame in blueprint '{blueprint}'")]
    OverlappingFrames { blueprint: String, frame: String },

    #[error("tile id '{tile}' appears more than once in blueprint '{blueprint}'")]
    DuplicateTile { blueprint: String, tile: String },

    #[error("tile '{tile}' in blueprint '{blueprint}' is not placeable: {violation}")]
    InvalidTile {
        blueprint: String,
        tile: String,
        violation: PlacementViolation,
    },
}

/// Immutable layout template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    pub grid: GridSize,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub gates: Gates,
}

impl Blueprint {
    /// Looks up an initial tile by id.
    #[must_use]
    pub fn tile(&self, id: &str) -> Option<&Tile> { self.tiles.iter().find(|t| t.id == id) }

    /// Checks that the template's own arrangement satisfies the layout invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found: an empty or oversized grid,
    /// inconsistent span gates, a frame outside the grid or overlapping another
    /// frame, a duplicated tile id, or a tile the placement validator rejects.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        if self.grid.rows < 1 || self.grid.cols < 1 {
            return Err(BlueprintError::EmptyGrid(self.id.clone()));
        }

        if self.grid.rows > MAX_GRID_DIMENSION || self.grid.cols > MAX_GRID_DIMENSION {
            return Err(BlueprintError::GridTooLarge(self.id.clone()));
        }

        let (min, max) = (self.gates.min_span, self.gates.max_span_for(self.grid));
        if min.rows < 1 || min.cols < 1 || max.rows < min.rows || max.cols < min.cols {
            return Err(BlueprintError::InvalidGates(self.id.clone()));
        }

        if let Some(frame) = self.frames.iter().find(|f| !f.rect.fits_within(self.grid)) {
            return Err(BlueprintError::FrameOutOfBounds {
                blueprint: self.id.clone(),
                frame: frame.id.clone(),
            });
        }

        if !self.gates.allow_overlap {
            for (index, frame) in self.frames.iter().enumerate() {
                let earlier = OccupancyGrid::build(self.grid, &self.frames[..index], &[]);
                if earlier.first_claim_in(&frame.rect).is_some() {
                    return Err(BlueprintError::OverlappingFrames {
                        blueprint: self.id.clone(),
                        frame: frame.id.clone(),
                    });
                }
            }
        }

        for (index, tile) in self.tiles.iter().enumerate() {
            if self.tiles[..index].iter().any(|t| t.id == tile.id) {
                return Err(BlueprintError::DuplicateTile {
                    blueprint: self.id.clone(),
                    tile: tile.id.clone(),
                });
            }

            check_placement(&tile.id, &tile.rect, self, &self.tiles).map_err(|violation| {
                BlueprintError::InvalidTile {
                    blueprint: self.id.clone(),
                    tile: tile.id.clone(),
                    violation,
                }
            })?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
