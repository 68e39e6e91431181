//! Built-in blueprints.
//!
//! Used whenever the configuration file does not define its own blueprints.

use super::blueprint::{Blueprint, CellRect, Frame, Gates, GridSize, SpanLimit, Tile};

/// Identifier of the default blueprint.
pub const DASHBOARD_ID: &str = "dashboard-3x3";

/// Returns the built-in blueprint catalog, in cycling order.
#[must_use]
pub fn builtin_blueprints() -> Vec<Blueprint> { vec![dashboard(), wide(), kanban()] }

/// Gates that allow any span up to the full grid without overlap.
const fn full_grid_gates(grid: GridSize) -> Gates {
    Gates {
        min_span: SpanLimit::new(1, 1),
        max_span: Some(SpanLimit::new(grid.rows, grid.cols)),
        allow_overlap: false,
        restrict_to_grid: true,
    }
}

fn dashboard() -> Blueprint {
    let grid = GridSize::new(3, 3);
    Blueprint {
        id: DASHBOARD_ID.to_string(),
        name: "Dashboard 3x3".to_string(),
        grid,
        frames: vec![Frame::new("frame-hero", CellRect::new(1, 1, 1, 1))],
        tiles: vec![
            Tile::new("sys", "System", CellRect::new(1, 2, 1, 2), "#4aa8ff"),
            Tile::new("feed", "Feed", CellRect::new(2, 1, 2, 2), "#8a5cff"),
            Tile::new("notes", "Notes", CellRect::new(2, 3, 1, 1), "#35c56f"),
            Tile::new("tasks", "Tasks", CellRect::new(3, 3, 1, 1), "#f2a65a"),
        ],
        gates: full_grid_gates(grid),
    }
}

fn wide() -> Blueprint {
    let grid = GridSize::new(2, 4);
    Blueprint {
        id: "wide-2x4".to_string(),
        name: "Wide 2x4".to_string(),
        grid,
        frames: vec![
            Frame::new("frame-banner", CellRect::new(1, 1, 1, 1)),
            Frame::new("frame-side", CellRect::new(2, 4, 1, 1)),
        ],
        tiles: vec![
            Tile::new("main", "Main", CellRect::new(1, 2, 2, 2), "#4aa8ff"),
            Tile::new("aux", "Aux", CellRect::new(1, 4, 1, 1), "#f2a65a"),
            Tile::new("log", "Log", CellRect::new(2, 1, 1, 1), "#35c56f"),
        ],
        gates: full_grid_gates(grid),
    }
}

fn kanban() -> Blueprint {
    let grid = GridSize::new(3, 4);
    Blueprint {
        id: "kanban-3x4".to_string(),
        name: "Kanban 3x4".to_string(),
        grid,
        frames: Vec::new(),
        tiles: vec![
            Tile::new("todo", "To Do", CellRect::new(1, 1, 3, 1), "#8a5cff"),
            Tile::new("doing", "Doing", CellRect::new(1, 2, 3, 2), "#4aa8ff"),
            Tile::new("done", "Done", CellRect::new(1, 4, 3, 1), "#35c56f"),
        ],
        gates: full_grid_gates(grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let ids: Vec<_> = builtin_blueprints().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["dashboard-3x3", "wide-2x4", "kanban-3x4"]);
    }

    #[test]
    fn test_dashboard_has_hero_frame() {
        let dashboard = dashboard();
        assert_eq!(dashboard.frames[0].id, "frame-hero");
        assert_eq!(dashboard.frames[0].rect, CellRect::new(1, 1, 1, 1));
        assert_eq!(dashboard.tile("tasks").map(|t| t.rect), Some(CellRect::new(3, 3, 1, 1)));
    }
}
