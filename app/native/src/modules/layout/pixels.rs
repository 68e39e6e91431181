//! Cell-to-pixel conversion for the window apply interface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::blueprint::{CellRect, GridSize};

/// Size of the area tiles are laid out on, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

/// A rectangle in whole pixels, origin at the viewport's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl PixelRect {
    /// Creates a new pixel rectangle.
    #[must_use]
    pub const fn new(x: i64, y: i64, w: i64, h: i64) -> Self { Self { x, y, w, h } }

    /// Converts a cell rectangle to pixels.
    ///
    /// Each cell is `viewport / grid` wide and tall; every edge is rounded to
    /// the nearest pixel independently.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_cells(rect: &CellRect, grid: GridSize, viewport: Viewport) -> Self {
        let cell_w = viewport.width / f64::from(grid.cols.max(1));
        let cell_h = viewport.height / f64::from(grid.rows.max(1));

        Self {
            x: (f64::from(rect.col - 1) * cell_w).round() as i64,
            y: (f64::from(rect.row - 1) * cell_h).round() as i64,
            w: (f64::from(rect.col_span) * cell_w).round() as i64,
            h: (f64::from(rect.row_span) * cell_h).round() as i64,
        }
    }
}
