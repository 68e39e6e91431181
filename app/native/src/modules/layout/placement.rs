//! Placement validation.
//!
//! A pure decision function: may a tile occupy a candidate rectangle under a
//! blueprint's grid and gates, given the other current tiles? Nothing is
//! mutated here; callers decide whether to commit.

use thiserror::Error;

use super::blueprint::{Blueprint, CellRect, Tile};
use super::occupancy::{CellOwner, OccupancyGrid};

/// What a claimed cell is claimed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claimant {
    Frame(String),
    Tile(String),
}

impl std::fmt::Display for Claimant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frame(id) => write!(f, "frame '{id}'"),
            Self::Tile(id) => write!(f, "tile '{id}'"),
        }
    }
}

/// Reason a candidate rectangle was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementViolation {
    /// The rectangle starts before row 1 or column 1.
    #[error("rectangle starts before the first row or column")]
    BeforeOrigin,

    /// The rectangle extends past the last row or column.
    #[error("rectangle extends past the grid edge")]
    OutOfBounds,

    /// A span is below the gate minimum.
    #[error("span {row_span}x{col_span} is below the minimum")]
    SpanTooSmall { row_span: i32, col_span: i32 },

    /// A span is above the gate maximum.
    #[error("span {row_span}x{col_span} is above the maximum")]
    SpanTooLarge { row_span: i32, col_span: i32 },

    /// A cell is already claimed by a frame or another tile.
    #[error("cell ({row}, {col}) is occupied by {claimant}")]
    Collision { row: i32, col: i32, claimant: Claimant },
}

/// Checks whether `tile_id` may occupy `candidate`.
///
/// Steps, in order: origin, grid bounds, span gates, then (unless the gates
/// allow overlap) collision against frames and every other tile. The tile's
/// own current footprint never counts as a collision.
///
/// # Errors
///
/// Returns the first [`PlacementViolation`] encountered.
pub fn check_placement(
    tile_id: &str,
    candidate: &CellRect,
    blueprint: &Blueprint,
    tiles: &[Tile],
) -> Result<(), PlacementViolation> {
    let grid = blueprint.grid;
    let gates = &blueprint.gates;

    if candidate.row < 1 || candidate.col < 1 {
        return Err(PlacementViolation::BeforeOrigin);
    }

    if candidate.last_row() > grid.rows || candidate.last_col() > grid.cols {
        return Err(PlacementViolation::OutOfBounds);
    }

    let min = gates.min_span;
    let max = gates.max_span_for(grid);
    let (min_rows, min_cols) = (min.rows.max(1), min.cols.max(1));
    let (row_span, col_span) = (candidate.row_span, candidate.col_span);

    if row_span < min_rows || col_span < min_cols {
        return Err(PlacementViolation::SpanTooSmall { row_span, col_span });
    }

    if row_span > max.rows || col_span > max.cols {
        return Err(PlacementViolation::SpanTooLarge { row_span, col_span });
    }

    if gates.allow_overlap {
        return Ok(());
    }

    let occupancy =
        OccupancyGrid::build_excluding(grid, &blueprint.frames, tiles, Some(tile_id));

    match occupancy.first_claim_in(candidate) {
        Some((row, col, owner)) => {
            let claimant = match owner {
                CellOwner::Frame(id) => Claimant::Frame(id.to_string()),
                CellOwner::Tile(id) => Claimant::Tile(id.to_string()),
                CellOwner::Empty => return Ok(()),
            };
            Err(PlacementViolation::Collision { row, col, claimant })
        }
        None => Ok(()),
    }
}

/// Boolean form of [`check_placement`].
#[must_use]
pub fn can_place(tile_id: &str, candidate: &CellRect, blueprint: &Blueprint, tiles: &[Tile]) -> bool {
    check_placement(tile_id, candidate, blueprint, tiles).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::layout::blueprint::{GridSize, SpanLimit};
    use crate::modules::layout::presets::builtin_blueprints;

    fn dashboard() -> Blueprint { builtin_blueprints().remove(0) }

    #[test]
    fn test_current_positions_are_valid() {
        let bp = dashboard();
        for tile in &bp.tiles {
            assert!(can_place(&tile.id, &tile.rect, &bp, &bp.tiles), "{}", tile.id);
        }
    }

    #[test]
    fn test_rejects_before_origin() {
        let bp = dashboard();
        let result = check_placement("sys", &CellRect::new(0, 2, 1, 2), &bp, &bp.tiles);
        assert_eq!(result, Err(PlacementViolation::BeforeOrigin));
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let bp = dashboard();
        let result = check_placement("sys", &CellRect::new(1, 3, 1, 2), &bp, &bp.tiles);
        assert_eq!(result, Err(PlacementViolation::OutOfBounds));
    }

    #[test]
    fn test_rejects_frame_collision() {
        let bp = dashboard();
        let result = check_placement("tasks", &CellRect::new(1, 1, 1, 1), &bp, &bp.tiles);
        assert_eq!(
            result,
            Err(PlacementViolation::Collision {
                row: 1,
                col: 1,
                claimant: Claimant::Frame("frame-hero".to_string()),
            })
        );
    }

    #[test]
    fn test_rejects_tile_collision() {
        let bp = dashboard();
        let result = check_placement("tasks", &CellRect::new(2, 3, 1, 1), &bp, &bp.tiles);
        assert!(matches!(
            result,
            Err(PlacementViolation::Collision { claimant: Claimant::Tile(ref id), .. }) if id == "notes"
        ));
    }

    #[test]
    fn test_own_footprint_is_ignored() {
        let bp = dashboard();
        // feed shrinking inside its own footprint
        assert!(can_place("feed", &CellRect::new(2, 1, 1, 2), &bp, &bp.tiles));
    }

    #[test]
    fn test_span_gates() {
        let mut bp = dashboard();
        bp.gates.min_span = SpanLimit::new(1, 2);
        bp.gates.max_span = Some(SpanLimit::new(2, 2));
        let tiles: Vec<Tile> = Vec::new();

        assert_eq!(
            check_placement("x", &CellRect::new(2, 2, 1, 1), &bp, &tiles),
            Err(PlacementViolation::SpanTooSmall { row_span: 1, col_span: 1 })
        );
        assert_eq!(
            check_placement("x", &CellRect::new(1, 2, 3, 2), &bp, &tiles),
            Err(PlacementViolation::SpanTooLarge { row_span: 3, col_span: 2 })
        );
        assert!(can_place("x", &CellRect::new(2, 2, 2, 2), &bp, &tiles));
    }

    #[test]
    fn test_oversized_span_is_out_of_bounds() {
        let bp = dashboard();
        assert_eq!(
            check_placement("tasks", &CellRect::new(2, 1, i32::MAX, 1), &bp, &bp.tiles),
            Err(PlacementViolation::OutOfBounds)
        );
        assert_eq!(
            check_placement("tasks", &CellRect::new(i32::MAX, i32::MAX, 1, 1), &bp, &bp.tiles),
            Err(PlacementViolation::OutOfBounds)
        );
    }

    #[test]
    fn test_non_positive_span_is_too_small_even_with_zero_gate() {
        let mut bp = dashboard();
        bp.gates.min_span = SpanLimit::new(0, 0);
        assert_eq!(
            check_placement("x", &CellRect::new(2, 2, -3, 1), &bp, &[]),
            Err(PlacementViolation::SpanTooSmall { row_span: -3, col_span: 1 })
        );
    }

    #[test]
    fn test_allow_overlap_skips_collision() {
        let mut bp = dashboard();
        bp.gates.allow_overlap = true;
        assert!(can_place("tasks", &CellRect::new(1, 1, 1, 1), &bp, &bp.tiles));
        // bounds still apply
        assert!(!can_place("tasks", &CellRect::new(3, 3, 1, 2), &bp, &bp.tiles));
    }

    #[test]
    fn test_scenario_adjacent_free_cell() {
        let bp = Blueprint {
            id: "plain".to_string(),
            name: "Plain".to_string(),
            grid: GridSize::new(3, 3),
            frames: Vec::new(),
            tiles: vec![Tile::new("a", "A", CellRect::new(1, 1, 1, 1), "#fff")],
            gates: Default::default(),
        };
        assert!(can_place("a", &CellRect::new(1, 2, 1, 1), &bp, &bp.tiles));
        assert!(can_place("a", &CellRect::new(1, 1, 3, 3), &bp, &bp.tiles));
    }
}
