//! Immutable render snapshots.
//!
//! Renderers only ever see these values. Whatever they draw, they never hand
//! anything back into the session.

use serde::Serialize;

use super::blueprint::{CellRect, Frame, GridSize, TileId};

/// Render state of a single tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub id: TileId,
    pub title: String,
    pub color: String,
    /// Stored position, unaffected by maximize.
    #[serde(flatten)]
    pub rect: CellRect,
    /// Where the tile should be drawn: the full grid while maximized.
    pub display: CellRect,
    pub focused: bool,
    pub maximized: bool,
    pub hidden: bool,
}

/// Everything a renderer needs to draw the current layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub blueprint_id: String,
    pub blueprint_name: String,
    pub grid: GridSize,
    pub frames: Vec<Frame>,
    pub tiles: Vec<TileView>,
    pub focused_id: Option<TileId>,
    pub maximized_id: Option<TileId>,
}

impl LayoutSnapshot {
    /// Looks up a tile view by id.
    #[must_use]
    pub fn tile(&self, id: &str) -> Option<&TileView> { self.tiles.iter().find(|t| t.id == id) }

    /// Tiles that should currently be drawn.
    pub fn visible_tiles(&self) -> impl Iterator<Item = &TileView> {
        self.tiles.iter().filter(|t| !t.hidden)
    }
}

#[cfg(test)]
mod tests {
    use crate::modules::layout::presets::builtin_blueprints;
    use crate::modules::layout::session::LayoutSession;

    #[test]
    fn test_visible_tiles_while_maximized() {
        let mut session = LayoutSession::new(builtin_blueprints()).unwrap();
        assert_eq!(session.snapshot().visible_tiles().count(), 4);

        session.focus("feed");
        session.toggle_maximize();
        let snapshot = session.snapshot();
        let visible: Vec<_> = snapshot.visible_tiles().map(|t| t.id.as_str()).collect();

        assert_eq!(visible, vec!["feed"]);
        assert_eq!(snapshot.tile("feed").unwrap().display, snapshot.grid.full_rect());
    }

    #[test]
    fn test_snapshot_serializes_flat_camel_case() {
        let session = LayoutSession::new(builtin_blueprints()).unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["blueprintId"], "dashboard-3x3");
        assert_eq!(json["focusedId"], "sys");
        assert_eq!(json["tiles"][0]["rowSpan"], 1);
        assert_eq!(json["tiles"][0]["colSpan"], 2);
        assert_eq!(json["tiles"][0]["focused"], true);
    }
}
