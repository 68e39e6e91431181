//! Application-wide constants.

/// Application name, used for config and data directories.
pub const APP_NAME: &str = "gridtile";

/// Default prefix for persisted layout keys (`"<namespace>:<blueprintId>"`).
pub const DEFAULT_STORAGE_NAMESPACE: &str = "gridtile";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "GRIDTILE_LOG";

/// Analog stick magnitude at or below which input is ignored.
pub const DEFAULT_DEADZONE: f64 = 0.3;

/// Minimum time between repeated stick commands while a stick is held (ms).
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 220;

/// Upper bound applied to spans while resizing, before validation.
pub const MAX_SPAN_CLAMP: i32 = 100;

/// Largest accepted row or column count of a blueprint grid.
pub const MAX_GRID_DIMENSION: i32 = 100;

/// Default viewport used for pixel rectangles.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1920.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 1080.0;
