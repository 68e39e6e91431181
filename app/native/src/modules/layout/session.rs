//! The layout session state machine.
//!
//! Owns every piece of mutable layout state: the active blueprint, the
//! runtime copies of its frames and tiles, focus, and maximize. Tiles are only
//! ever changed through the command methods here. Each command either commits
//! completely (and publishes a new [`LayoutSnapshot`]) or leaves the session
//! untouched.
//!
//! # States
//!
//! ```text
//!   Idle ──(blueprint with tiles)──▶ Focused(id) ──toggle──▶ Maximized(id)
//!                                       ▲  │ focus/navigate       │
//!                                       │  ▼                      │
//!                                   Focused(other) ◀──focus other─┘
//! ```
//!
//! Switching or resetting the blueprint always drops maximize before the
//! tiles are rebuilt.

use eyeball::{Observable, Subscriber};
use thiserror::Error;

use super::blueprint::{Blueprint, CellRect, Frame, Tile, TileId};
use super::navigation::{Direction, nearest_in_direction};
use super::occupancy::OccupancyGrid;
use super::pixels::{PixelRect, Viewport};
use super::placement::{PlacementViolation, check_placement};
use super::snapshot::{LayoutSnapshot, TileView};
use crate::constants::MAX_SPAN_CLAMP;

// ============================================================================
// Outcome Types
// ============================================================================

/// Derived state of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No tile is focused.
    Idle,
    /// A tile is focused and all tiles are visible.
    Focused(TileId),
    /// The focused tile covers the grid and every other tile is hidden.
    Maximized(TileId),
}

/// Direction to cycle through the blueprint catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Why a command was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("no tile is focused")]
    NoFocus,

    #[error("no tile to the {0}")]
    NoCandidate(Direction),

    #[error("tile is maximized")]
    Maximized,

    #[error("restored tiles do not match the blueprint's tiles")]
    TileSetMismatch,

    #[error(transparent)]
    Placement(#[from] PlacementViolation),
}

/// A refused command, for the caller to present as transient feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The tile the command targeted, if any was focused.
    pub tile_id: Option<TileId>,
    pub reason: RejectReason,
}

impl Rejection {
    fn new(tile_id: Option<&str>, reason: impl Into<RejectReason>) -> Self {
        Self {
            tile_id: tile_id.map(ToString::to_string),
            reason: reason.into(),
        }
    }
}

/// Result of a session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command changed the session and a new snapshot was published.
    Committed,
    /// The command was valid but had nothing to change.
    Unchanged,
    /// The command was refused; the session is exactly as before.
    Rejected(Rejection),
}

impl CommandOutcome {
    /// Returns `true` if the command changed the session.
    #[must_use]
    pub const fn is_committed(&self) -> bool { matches!(self, Self::Committed) }

    /// Returns the rejection, if the command was refused.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Errors creating a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no blueprints available")]
    EmptyCatalog,

    #[error("blueprint '{0}' not found")]
    BlueprintNotFound(String),
}

// ============================================================================
// Layout Session
// ============================================================================

/// Mutable runtime layout state for one blueprint catalog.
pub struct LayoutSession {
    catalog: Vec<Blueprint>,
    blueprint_index: usize,
    frames: Vec<Frame>,
    tiles: Vec<Tile>,
    focused_id: Option<TileId>,
    maximized_id: Option<TileId>,
    snapshot: Observable<LayoutSnapshot>,
}

impl LayoutSession {
    /// Creates a session over `catalog` with the first blueprint selected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyCatalog`] if `catalog` is empty.
    pub fn new(catalog: Vec<Blueprint>) -> Result<Self, SessionError> {
        let first = catalog.first().ok_or(SessionError::EmptyCatalog)?;
        let frames = first.frames.clone();
        let tiles = first.tiles.clone();
        let focused_id = tiles.first().map(|t| t.id.clone());
        let snapshot = compose_snapshot(first, &frames, &tiles, focused_id.as_deref(), None);

        tracing::debug!(blueprint = %first.id, tiles = tiles.len(), "layout session created");

        Ok(Self {
            catalog,
            blueprint_index: 0,
            frames,
            tiles,
            focused_id,
            maximized_id: None,
            snapshot: Observable::new(snapshot),
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The active blueprint.
    #[must_use]
    pub fn blueprint(&self) -> &Blueprint { &self.catalog[self.blueprint_index] }

    /// All blueprints, in cycling order.
    #[must_use]
    pub fn catalog(&self) -> &[Blueprint] { &self.catalog }

    /// Index of the active blueprint in the catalog.
    #[must_use]
    pub const fn blueprint_index(&self) -> usize { self.blueprint_index }

    /// Runtime frames.
    #[must_use]
    pub fn frames(&self) -> &[Frame] { &self.frames }

    /// Runtime tiles, in blueprint order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] { &self.tiles }

    /// Looks up a runtime tile by id.
    #[must_use]
    pub fn tile(&self, id: &str) -> Option<&Tile> { self.tiles.iter().find(|t| t.id == id) }

    #[must_use]
    pub fn focused_id(&self) -> Option<&str> { self.focused_id.as_deref() }

    #[must_use]
    pub fn maximized_id(&self) -> Option<&str> { self.maximized_id.as_deref() }

    /// The focused tile.
    #[must_use]
    pub fn focused_tile(&self) -> Option<&Tile> { self.focused_id().and_then(|id| self.tile(id)) }

    /// Current state-machine state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match (&self.focused_id, &self.maximized_id) {
            (Some(focused), Some(maximized)) if focused == maximized => {
                SessionState::Maximized(focused.clone())
            }
            (Some(focused), _) => SessionState::Focused(focused.clone()),
            (None, _) => SessionState::Idle,
        }
    }

    /// Occupancy of the current frames and tiles.
    #[must_use]
    pub fn occupancy(&self) -> OccupancyGrid<'_> {
        OccupancyGrid::build(self.blueprint().grid, &self.frames, &self.tiles)
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot { Observable::get(&self.snapshot).clone() }

    /// Subscribes to snapshots published after each committed command.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<LayoutSnapshot> { Observable::subscribe(&self.snapshot) }

    /// Rectangle the tile is displayed at: the whole grid while maximized.
    #[must_use]
    pub fn display_rect(&self, id: &str) -> Option<CellRect> {
        let tile = self.tile(id)?;
        if self.maximized_id() == Some(id) {
            Some(self.blueprint().grid.full_rect())
        } else {
            Some(tile.rect)
        }
    }

    /// Pixel rectangle of the focused tile's displayed area within `viewport`.
    #[must_use]
    pub fn focused_pixel_rect(&self, viewport: Viewport) -> Option<PixelRect> {
        let rect = self.display_rect(self.focused_id()?)?;
        Some(PixelRect::from_cells(&rect, self.blueprint().grid, viewport))
    }

    // ========================================================================
    // Blueprint Commands
    // ========================================================================

    /// Selects the blueprint at `index` and rebuilds the session from it.
    ///
    /// Out-of-range indices leave the session unchanged.
    pub fn select_blueprint(&mut self, index: usize) -> CommandOutcome {
        if index >= self.catalog.len() {
            tracing::debug!(index, "select_blueprint: index out of range");
            return CommandOutcome::Unchanged;
        }
        self.render_blueprint(index);
        CommandOutcome::Committed
    }

    /// Selects a blueprint by id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::BlueprintNotFound`] if no blueprint has that id.
    pub fn select_blueprint_by_id(&mut self, id: &str) -> Result<CommandOutcome, SessionError> {
        let index = self
            .catalog
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| SessionError::BlueprintNotFound(id.to_string()))?;
        Ok(self.select_blueprint(index))
    }

    /// Moves to the next or previous blueprint, wrapping around.
    pub fn switch_blueprint(&mut self, direction: CycleDirection) -> CommandOutcome {
        let len = self.catalog.len();
        let index = match direction {
            CycleDirection::Next => (self.blueprint_index + 1) % len,
            CycleDirection::Previous => (self.blueprint_index + len - 1) % len,
        };
        self.render_blueprint(index);
        CommandOutcome::Committed
    }

    /// Rebuilds the active blueprint from its template.
    pub fn reset(&mut self) -> CommandOutcome {
        self.render_blueprint(self.blueprint_index);
        CommandOutcome::Committed
    }

    fn render_blueprint(&mut self, index: usize) {
        self.maximized_id = None;
        self.blueprint_index = index;

        let blueprint = &self.catalog[index];
        self.frames = blueprint.frames.clone();
        self.tiles = blueprint.tiles.clone();
        self.focused_id = self.tiles.first().map(|t| t.id.clone());

        tracing::info!(
            blueprint = %blueprint.id,
            tiles = self.tiles.len(),
            frames = self.frames.len(),
            "rendered blueprint"
        );

        self.publish();
    }

    // ========================================================================
    // Focus Commands
    // ========================================================================

    /// Focuses a tile by id. Unknown ids are ignored.
    ///
    /// Focusing a different tile while one is maximized restores the layout
    /// first.
    pub fn focus(&mut self, id: &str) -> CommandOutcome {
        if self.tile(id).is_none() {
            tracing::debug!(tile = id, "focus: tile not found");
            return CommandOutcome::Unchanged;
        }

        let maximized_other = self.maximized_id().is_some_and(|m| m != id);
        if self.focused_id() == Some(id) && !maximized_other {
            return CommandOutcome::Unchanged;
        }

        if maximized_other {
            self.maximized_id = None;
        }
        self.focused_id = Some(id.to_string());

        tracing::debug!(tile = id, "focused tile");
        self.publish();
        CommandOutcome::Committed
    }

    /// Focuses the nearest tile in `direction` from the focused tile.
    pub fn navigate(&mut self, direction: Direction) -> CommandOutcome {
        let Some(from) = self.focused_id.clone() else {
            return CommandOutcome::Rejected(Rejection::new(None, RejectReason::NoFocus));
        };

        let next = nearest_in_direction(&from, direction, &self.tiles).map(ToString::to_string);
        match next {
            Some(next) => self.focus(&next),
            None => {
                tracing::debug!(tile = %from, %direction, "navigate: no candidate");
                CommandOutcome::Rejected(Rejection::new(
                    Some(&from),
                    RejectReason::NoCandidate(direction),
                ))
            }
        }
    }

    // ========================================================================
    // Geometry Commands
    // ========================================================================

    /// Translates the focused tile by whole cells.
    pub fn move_focused(&mut self, d_row: i32, d_col: i32) -> CommandOutcome {
        self.reposition("move", |rect| rect.translated(d_row, d_col))
    }

    /// Grows or shrinks the focused tile's spans. Spans are clamped to at
    /// least one cell before validation.
    pub fn resize_focused(&mut self, d_row_span: i32, d_col_span: i32) -> CommandOutcome {
        self.reposition("resize", |rect| rect.resized(d_row_span, d_col_span, 1, MAX_SPAN_CLAMP))
    }

    fn reposition(
        &mut self,
        operation: &'static str,
        transform: impl FnOnce(&CellRect) -> CellRect,
    ) -> CommandOutcome {
        let Some(id) = self.focused_id.clone() else {
            return CommandOutcome::Rejected(Rejection::new(None, RejectReason::NoFocus));
        };

        if self.maximized_id.is_some() {
            return CommandOutcome::Rejected(Rejection::new(Some(&id), RejectReason::Maximized));
        }

        let Some(current) = self.tile(&id).map(|t| t.rect) else {
            return CommandOutcome::Rejected(Rejection::new(None, RejectReason::NoFocus));
        };

        let candidate = transform(&current);
        if candidate == current {
            return CommandOutcome::Unchanged;
        }

        if let Err(violation) = check_placement(&id, &candidate, self.blueprint(), &self.tiles) {
            tracing::debug!(tile = %id, operation, %violation, "placement rejected");
            return CommandOutcome::Rejected(Rejection::new(Some(&id), violation));
        }

        if let Some(tile) = self.tiles.iter_mut().find(|t| t.id == id) {
            tile.rect = candidate;
        }

        tracing::debug!(
            tile = %id,
            operation,
            row = candidate.row,
            col = candidate.col,
            row_span = candidate.row_span,
            col_span = candidate.col_span,
            "placement committed"
        );

        self.publish();
        CommandOutcome::Committed
    }

    // ========================================================================
    // Maximize
    // ========================================================================

    /// Maximizes the focused tile, or restores it if it is already maximized.
    ///
    /// Maximize is presentation only: stored rows, columns and spans are never
    /// touched.
    pub fn toggle_maximize(&mut self) -> CommandOutcome {
        let Some(id) = self.focused_id.clone() else {
            return CommandOutcome::Rejected(Rejection::new(None, RejectReason::NoFocus));
        };

        if self.maximized_id.as_deref() == Some(id.as_str()) {
            self.maximized_id = None;
            tracing::debug!(tile = %id, "restored tile");
        } else {
            tracing::debug!(tile = %id, "maximized tile");
            self.maximized_id = Some(id);
        }

        self.publish();
        CommandOutcome::Committed
    }

    // ========================================================================
    // Restore
    // ========================================================================

    /// Replaces the runtime tiles with a previously saved arrangement.
    ///
    /// The arrangement must hold exactly the current tile ids, and every tile
    /// must pass placement against the active blueprint; otherwise nothing
    /// changes. Focus moves to the saved maximized tile (which is maximized
    /// again), or to the first tile.
    pub fn restore_tiles(
        &mut self,
        tiles: Vec<Tile>,
        maximized_id: Option<&str>,
    ) -> CommandOutcome {
        let same_ids = tiles.len() == self.tiles.len()
            && tiles.iter().enumerate().all(|(index, tile)| {
                self.tile(&tile.id).is_some() && !tiles[..index].iter().any(|t| t.id == tile.id)
            });
        if !same_ids {
            tracing::warn!(blueprint = %self.blueprint().id, "restore refused: tile set mismatch");
            return CommandOutcome::Rejected(Rejection::new(None, RejectReason::TileSetMismatch));
        }

        for tile in &tiles {
            let placement = check_placement(&tile.id, &tile.rect, self.blueprint(), &tiles);
            if let Err(violation) = placement {
                tracing::warn!(tile = %tile.id, %violation, "restore refused: invalid placement");
                return CommandOutcome::Rejected(Rejection::new(Some(&tile.id), violation));
            }
        }

        self.tiles = tiles;
        self.maximized_id = None;

        match maximized_id.filter(|id| self.tile(id).is_some()) {
            Some(id) => {
                self.focused_id = Some(id.to_string());
                self.maximized_id = Some(id.to_string());
            }
            None => self.focused_id = self.tiles.first().map(|t| t.id.clone()),
        }

        tracing::info!(
            blueprint = %self.blueprint().id,
            tiles = self.tiles.len(),
            maximized = ?self.maximized_id,
            "restored saved layout"
        );

        self.publish();
        CommandOutcome::Committed
    }

    fn publish(&mut self) {
        let snapshot = compose_snapshot(
            self.blueprint(),
            &self.frames,
            &self.tiles,
            self.focused_id.as_deref(),
            self.maximized_id.as_deref(),
        );
        Observable::set(&mut self.snapshot, snapshot);
    }
}

fn compose_snapshot(
    blueprint: &Blueprint,
    frames: &[Frame],
    tiles: &[Tile],
    focused_id: Option<&str>,
    maximized_id: Option<&str>,
) -> LayoutSnapshot {
    let views = tiles
        .iter()
        .map(|tile| {
            let maximized = maximized_id == Some(tile.id.as_str());
            TileView {
                id: tile.id.clone(),
                title: tile.title.clone(),
                color: tile.color.clone(),
                rect: tile.rect,
                display: if maximized { blueprint.grid.full_rect() } else { tile.rect },
                focused: focused_id == Some(tile.id.as_str()),
                maximized,
                hidden: maximized_id.is_some() && !maximized,
            }
        })
        .collect();

    LayoutSnapshot {
        blueprint_id: blueprint.id.clone(),
        blueprint_name: blueprint.name.clone(),
        grid: blueprint.grid,
        frames: frames.to_vec(),
        tiles: views,
        focused_id: focused_id.map(ToString::to_string),
        maximized_id: maximized_id.map(ToString::to_string),
    }
}

// ============================================================================
// Tests
// ============================================================================
