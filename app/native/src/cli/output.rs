//! CLI output formatting utilities.
//!
//! - Occupancy maps for layout snapshots
//! - Boolean markers for tables
//! - Pretty-printed JSON

use colored::Colorize;
use serde::Serialize;

use crate::error::GridtileError;
use crate::modules::layout::LayoutSnapshot;

/// Glyph for frame cells.
const FRAME_GLYPH: char = '#';

/// Glyph for empty cells.
const EMPTY_GLYPH: char = '.';

/// Letter used for the tile at `index` in maps and tables.
#[must_use]
pub fn tile_label(index: usize) -> char {
    #[allow(clippy::cast_possible_truncation)]
    let offset = (index % 26) as u8;
    char::from(b'a' + offset)
}

/// Renders a snapshot as one string per grid row.
///
/// Frames are `#`, empty cells `.`, and each visible tile is drawn with its
/// letter at its displayed position. The focused tile's letter is uppercase.
#[must_use]
pub fn occupancy_map(snapshot: &LayoutSnapshot) -> Vec<String> {
    let rows = usize::try_from(snapshot.grid.rows).unwrap_or(0);
    let cols = usize::try_from(snapshot.grid.cols).unwrap_or(0);
    let mut cells = vec![vec![EMPTY_GLYPH; cols]; rows];

    let mut paint = |row: i32, col: i32, glyph: char| {
        let (Ok(r), Ok(c)) = (usize::try_from(row - 1), usize::try_from(col - 1)) else {
            return;
        };
        if let Some(cell) = cells.get_mut(r).and_then(|line| line.get_mut(c)) {
            *cell = glyph;
        }
    };

    for frame in &snapshot.frames {
        for (row, col) in frame.rect.cells_within(snapshot.grid) {
            paint(row, col, FRAME_GLYPH);
        }
    }

    for (index, tile) in snapshot.tiles.iter().enumerate().filter(|(_, t)| !t.hidden) {
        let label = tile_label(index);
        let glyph = if tile.focused { label.to_ascii_uppercase() } else { label };
        for (row, col) in tile.display.cells_within(snapshot.grid) {
            paint(row, col, glyph);
        }
    }

    cells
        .into_iter()
        .map(|line| line.iter().map(char::to_string).collect::<Vec<_>>().join(" "))
        .collect()
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Prints a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), GridtileError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::layout::{LayoutSession, builtin_blueprints};

    fn session() -> LayoutSession { LayoutSession::new(builtin_blueprints()).unwrap() }

    #[test]
    fn test_tile_label_wraps() {
        assert_eq!(tile_label(0), 'a');
        assert_eq!(tile_label(25), 'z');
        assert_eq!(tile_label(26), 'a');
    }

    #[test]
    fn test_dashboard_map() {
        let map = occupancy_map(&session().snapshot());
        assert_eq!(map, vec!["# A A", "b b c", "b b d"]);
    }

    #[test]
    fn test_maximized_map_shows_only_maximized_tile() {
        let mut session = session();
        session.focus("notes");
        session.toggle_maximize();

        // the maximized tile is drawn over the frame as well
        let map = occupancy_map(&session.snapshot());
        assert_eq!(map, vec!["C C C", "C C C", "C C C"]);
    }

    #[test]
    fn test_format_bool() {
        assert!(format_bool(true).contains('✓'));
        assert!(format_bool(false).contains('✗'));
    }
}
