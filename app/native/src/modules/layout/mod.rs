//! Grid layout engine.
//!
//! Blueprints describe a grid with fixed frames and movable tiles. The session
//! owns the runtime copy of one blueprint and changes it only through
//! validated commands.
//!
//! # Architecture
//!
//! ```text
//!   Blueprint ──▶ LayoutSession ──▶ Observable<LayoutSnapshot> ──▶ renderers
//!                    │    ▲
//!        placement ◀─┘    └── navigation
//!        (occupancy)
//! ```

pub mod blueprint;
pub mod navigation;
pub mod occupancy;
pub mod pixels;
pub mod placement;
pub mod presets;
pub mod session;
pub mod snapshot;

pub use blueprint::{
    Blueprint, BlueprintError, CellRect, Frame, Gates, GridSize, SpanLimit, Tile, TileId,
};
pub use navigation::{Direction, nearest_in_direction};
pub use occupancy::{CellOwner, OccupancyGrid};
pub use pixels::{PixelRect, Viewport};
pub use placement::{Claimant, PlacementViolation, can_place, check_placement};
pub use presets::builtin_blueprints;
pub use session::{
    CommandOutcome, CycleDirection, LayoutSession, RejectReason, Rejection, SessionError,
    SessionState,
};
pub use snapshot::{LayoutSnapshot, TileView};
