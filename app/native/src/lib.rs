//! Gridtile - a grid-based tile layout engine with keyboard and gamepad navigation.
//!
//! A blueprint partitions a viewport into a grid with fixed frames and movable
//! tiles. A [`LayoutSession`] owns the runtime arrangement and accepts
//! navigate, move, resize and maximize commands, each of which either commits
//! fully or is rejected without side effects. Arrangements can be saved per
//! blueprint and restored after re-validation.
//!
//! ```
//! use gridtile_lib::{CommandOutcome, Direction, LayoutSession, builtin_blueprints};
//!
//! let mut session = LayoutSession::new(builtin_blueprints()).unwrap();
//! assert_eq!(session.focused_id(), Some("sys"));
//!
//! assert_eq!(session.navigate(Direction::Down), CommandOutcome::Committed);
//! assert_eq!(session.focused_id(), Some("notes"));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod modules;
pub mod schema;

pub use error::GridtileError;
pub use modules::controller::{Feedback, LayoutController};
pub use modules::input::{Command, GamepadSample, InputTranslator, KeyInput};
pub use modules::layout::{
    Blueprint, CellRect, CommandOutcome, CycleDirection, Direction, LayoutSession,
    LayoutSnapshot, builtin_blueprints,
};
pub use modules::persistence::{FileStore, LoadOutcome, MemoryStore, PersistenceAdapter};

/// Installs the global tracing subscriber.
///
/// The filter is read from `GRIDTILE_LOG` (e.g. `gridtile=debug`) and
/// defaults to `warn`. Logs go to stderr so stdout stays clean for command
/// output.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(constants::LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
