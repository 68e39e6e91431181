//! Directional focus navigation.
//!
//! Picks the tile to focus next when moving from a source tile in a compass
//! direction. Candidates must lie strictly on the requested side of the
//! source center (with a small tolerance), and are scored by distance plus a
//! penalty for drifting off the movement axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::blueprint::Tile;

/// Minimum center offset along the movement axis for a candidate to count.
pub const DIRECTION_TOLERANCE: f64 = 0.1;

/// Weight of the perpendicular offset in the candidate score.
pub const PERPENDICULAR_WEIGHT: f64 = 0.5;

/// A compass direction in grid space (rows grow downwards).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Unit step as `(d_row, d_col)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
        }
    }

    /// Returns `true` for left and right.
    #[must_use]
    pub const fn is_horizontal(self) -> bool { matches!(self, Self::Left | Self::Right) }

    /// The name used in logs and key scripts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(format!(
                "Invalid direction '{s}'. Expected 'left', 'right', 'up', or 'down'."
            )),
        }
    }
}

/// Finds the best tile to focus when moving from `from_id` towards `direction`.
///
/// Returns `None` if the source tile does not exist or no tile lies strictly
/// on the requested side. Equal scores keep the earliest tile in `tiles`.
#[must_use]
pub fn nearest_in_direction<'a>(
    from_id: &str,
    direction: Direction,
    tiles: &'a [Tile],
) -> Option<&'a str> {
    let source = tiles.iter().find(|t| t.id == from_id)?;
    let (source_y, source_x) = source.rect.center();

    let mut best: Option<(&'a str, f64)> = None;

    for tile in tiles.iter().filter(|t| t.id != from_id) {
        let (y, x) = tile.rect.center();
        let dx = x - source_x;
        let dy = y - source_y;

        let on_side = match direction {
            Direction::Left => dx <= -DIRECTION_TOLERANCE,
            Direction::Right => dx >= DIRECTION_TOLERANCE,
            Direction::Up => dy <= -DIRECTION_TOLERANCE,
            Direction::Down => dy >= DIRECTION_TOLERANCE,
        };
        if !on_side {
            continue;
        }

        let perpendicular = if direction.is_horizontal() { dy.abs() } else { dx.abs() };
        let score = dx.hypot(dy) + perpendicular * PERPENDICULAR_WEIGHT;

        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((tile.id.as_str(), score));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::layout::blueprint::CellRect;
    use crate::modules::layout::presets::builtin_blueprints;

    fn tile(id: &str, row: i32, col: i32, row_span: i32, col_span: i32) -> Tile {
        Tile::new(id, id, CellRect::new(row, col, row_span, col_span), "#fff")
    }

    #[test]
    fn test_right_neighbor() {
        let tiles = vec![tile("a", 1, 1, 1, 1), tile("b", 1, 2, 1, 1)];
        assert_eq!(nearest_in_direction("a", Direction::Right, &tiles), Some("b"));
        assert_eq!(nearest_in_direction("b", Direction::Left, &tiles), Some("a"));
    }

    #[test]
    fn test_none_when_nothing_on_that_side() {
        let tiles = vec![tile("a", 1, 1, 1, 1), tile("b", 1, 2, 1, 1)];
        assert_eq!(nearest_in_direction("a", Direction::Left, &tiles), None);
        assert_eq!(nearest_in_direction("a", Direction::Up, &tiles), None);
        assert_eq!(nearest_in_direction("a", Direction::Down, &tiles), None);
    }

    #[test]
    fn test_unknown_source() {
        let tiles = vec![tile("a", 1, 1, 1, 1)];
        assert_eq!(nearest_in_direction("zzz", Direction::Right, &tiles), None);
    }

    #[test]
    fn test_never_returns_source() {
        let blueprints = builtin_blueprints();
        for bp in &blueprints {
            for t in &bp.tiles {
                for dir in Direction::ALL {
                    assert_ne!(nearest_in_direction(&t.id, dir, &bp.tiles), Some(t.id.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_within_tolerance_is_not_on_side() {
        // centers share the same column: not "right" of each other
        let tiles = vec![tile("a", 1, 1, 1, 2), tile("b", 2, 1, 1, 2)];
        assert_eq!(nearest_in_direction("a", Direction::Right, &tiles), None);
        assert_eq!(nearest_in_direction("a", Direction::Down, &tiles), Some("b"));
    }

    #[test]
    fn test_prefers_aligned_over_diagonal() {
        // c is diagonal but closer; b is aligned but further away
        let tiles = vec![
            tile("a", 2, 1, 1, 1),
            tile("c", 1, 2, 1, 1),
            tile("b", 2, 3, 1, 1),
        ];
        // c: dist sqrt(2)=1.414 + 0.5 = 1.914; b: 2.0 + 0 = 2.0
        assert_eq!(nearest_in_direction("a", Direction::Right, &tiles), Some("c"));

        let tiles = vec![
            tile("a", 2, 1, 1, 1),
            tile("c", 1, 3, 1, 1),
            tile("b", 2, 3, 1, 1),
        ];
        assert_eq!(nearest_in_direction("a", Direction::Right, &tiles), Some("b"));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tiles = vec![
            tile("a", 2, 1, 1, 1),
            tile("up", 1, 2, 1, 1),
            tile("down", 3, 2, 1, 1),
        ];
        assert_eq!(nearest_in_direction("a", Direction::Right, &tiles), Some("up"));
    }

    #[test]
    fn test_dashboard_navigation() {
        let bp = builtin_blueprints().remove(0);
        assert_eq!(nearest_in_direction("sys", Direction::Down, &bp.tiles), Some("notes"));
        assert_eq!(nearest_in_direction("notes", Direction::Down, &bp.tiles), Some("tasks"));
        assert_eq!(nearest_in_direction("tasks", Direction::Left, &bp.tiles), Some("feed"));
        assert_eq!(nearest_in_direction("feed", Direction::Up, &bp.tiles), Some("sys"));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
