//! Tick-driven glue between input, the layout session and its collaborators.
//!
//! The controller is driven by an external scheduler: it is handed key
//! presses as they happen and a gamepad sample once per tick. Every command is
//! applied synchronously to the session; only window apply runs in the
//! background, and its result is collected on a later tick as feedback. That
//! result never changes layout state.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::modules::effects::{ApplyResult, PendingApply, WindowApplier, spawn_apply};
use crate::modules::input::{Command, GamepadSample, InputTranslator, KeyInput};
use crate::modules::layout::{CommandOutcome, LayoutSession, RejectReason, Rejection, Viewport};
use crate::modules::persistence::{LayoutStore, LoadOutcome, PersistenceAdapter};

// ============================================================================
// Feedback
// ============================================================================

/// Transient feedback for the user. Renderers typically show these as toasts
/// or, for rejections, briefly highlight the tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Feedback {
    Rejected {
        #[serde(rename = "tileId", skip_serializing_if = "Option::is_none")]
        tile_id: Option<String>,
        reason: String,
    },
    Saved,
    Loaded,
    NoSavedLayout,
    Applied,
    ApplyFailed {
        error: String,
    },
    BridgeUnavailable,
    ApplyInProgress,
    PersistenceFailed {
        error: String,
    },
}

impl Feedback {
    fn rejected(rejection: &Rejection) -> Self {
        Self::Rejected {
            tile_id: rejection.tile_id.clone(),
            reason: rejection.reason.to_string(),
        }
    }

    /// Returns `true` for feedback that reports a refused or failed action.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. }
                | Self::NoSavedLayout
                | Self::ApplyFailed { .. }
                | Self::BridgeUnavailable
                | Self::ApplyInProgress
                | Self::PersistenceFailed { .. }
        )
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { tile_id: Some(id), reason } => write!(f, "Rejected ({id}): {reason}"),
            Self::Rejected { tile_id: None, reason } => write!(f, "Rejected: {reason}"),
            Self::Saved => f.write_str("Layout saved"),
            Self::Loaded => f.write_str("Layout loaded"),
            Self::NoSavedLayout => f.write_str("No saved layout"),
            Self::Applied => f.write_str("Applied"),
            Self::ApplyFailed { .. } => f.write_str("Failed"),
            Self::BridgeUnavailable => f.write_str("Native bridge unavailable"),
            Self::ApplyInProgress => f.write_str("Apply in progress"),
            Self::PersistenceFailed { error } => write!(f, "Storage error: {error}"),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Owns a session and routes commands to it and to persistence and window
/// apply.
pub struct LayoutController<S> {
    session: LayoutSession,
    persistence: PersistenceAdapter<S>,
    input: InputTranslator,
    applier: Option<Arc<dyn WindowApplier>>,
    viewport: Viewport,
    pending_apply: Option<PendingApply>,
}

impl<S: LayoutStore> LayoutController<S> {
    #[must_use]
    pub fn new(
        session: LayoutSession,
        persistence: PersistenceAdapter<S>,
        input: InputTranslator,
        viewport: Viewport,
    ) -> Self {
        Self {
            session,
            persistence,
            input,
            applier: None,
            viewport,
            pending_apply: None,
        }
    }

    /// Sets the helper used for [`Command::ApplyToWindow`].
    #[must_use]
    pub fn with_applier(mut self, applier: Arc<dyn WindowApplier>) -> Self {
        self.applier = Some(applier);
        self
    }

    #[must_use]
    pub const fn session(&self) -> &LayoutSession { &self.session }

    #[must_use]
    pub const fn persistence(&self) -> &PersistenceAdapter<S> { &self.persistence }

    #[must_use]
    pub const fn viewport(&self) -> Viewport { self.viewport }

    /// Returns `true` while a window apply is in flight.
    #[must_use]
    pub const fn apply_pending(&self) -> bool { self.pending_apply.is_some() }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handles a key press. Unbound keys are ignored.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<Feedback> {
        let command = self.input.key(input)?;
        self.dispatch(command)
    }

    /// Runs one scheduler tick: collects a finished window apply, then
    /// processes the gamepad sample if one was read.
    pub fn tick(&mut self, now: Duration, gamepad: Option<&GamepadSample>) -> Vec<Feedback> {
        let mut feedback: Vec<Feedback> = self.collect_apply().into_iter().collect();

        match gamepad {
            Some(sample) => {
                for command in self.input.gamepad(sample, now) {
                    feedback.extend(self.dispatch(command));
                }
            }
            None => self.input.gamepad_disconnected(),
        }

        feedback
    }

    /// Applies one command.
    pub fn dispatch(&mut self, command: Command) -> Option<Feedback> {
        tracing::debug!(%command, "dispatch");

        let outcome = match command {
            Command::Navigate(direction) => self.session.navigate(direction),
            Command::Move(direction) => {
                let (d_row, d_col) = direction.delta();
                self.session.move_focused(d_row, d_col)
            }
            Command::Resize(direction) => {
                let (d_row_span, d_col_span) = direction.delta();
                self.session.resize_focused(d_row_span, d_col_span)
            }
            Command::ToggleMaximize => self.session.toggle_maximize(),
            Command::SwitchBlueprint(direction) => self.session.switch_blueprint(direction),
            Command::Reset => self.session.reset(),
            Command::Save => return Some(self.save()),
            Command::Load => return Some(self.load()),
            Command::ApplyToWindow => return self.apply_focused(),
        };

        match outcome {
            CommandOutcome::Rejected(rejection) => Some(Feedback::rejected(&rejection)),
            CommandOutcome::Committed | CommandOutcome::Unchanged => None,
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    fn save(&mut self) -> Feedback {
        let blueprint_id = self.session.blueprint().id.clone();
        match self.persistence.save(
            &blueprint_id,
            self.session.tiles(),
            self.session.maximized_id(),
        ) {
            Ok(()) => Feedback::Saved,
            Err(err) => {
                tracing::error!(blueprint = %blueprint_id, error = %err, "failed to save layout");
                Feedback::PersistenceFailed { error: err.to_string() }
            }
        }
    }

    fn load(&mut self) -> Feedback {
        match self.persistence.load_validated(self.session.blueprint()) {
            Ok(LoadOutcome::Loaded(record)) => {
                match self.session.restore_tiles(record.tiles, record.maximized_id.as_deref()) {
                    CommandOutcome::Rejected(_) => Feedback::NoSavedLayout,
                    CommandOutcome::Committed | CommandOutcome::Unchanged => Feedback::Loaded,
                }
            }
            Ok(LoadOutcome::NotFound | LoadOutcome::Discarded(_)) => Feedback::NoSavedLayout,
            Err(err) => {
                tracing::error!(error = %err, "failed to load layout");
                Feedback::PersistenceFailed { error: err.to_string() }
            }
        }
    }

    // ========================================================================
    // Window Apply
    // ========================================================================

    fn apply_focused(&mut self) -> Option<Feedback> {
        let Some(applier) = self.applier.clone() else {
            return Some(Feedback::BridgeUnavailable);
        };

        // The earlier result is collected on a later tick
        if self.pending_apply.is_some() {
            tracing::debug!("window apply already in flight");
            return Some(Feedback::ApplyInProgress);
        }

        let Some(rect) = self.session.focused_pixel_rect(self.viewport) else {
            return Some(Feedback::rejected(&Rejection {
                tile_id: None,
                reason: RejectReason::NoFocus,
            }));
        };

        match spawn_apply(applier, rect) {
            Ok(pending) => {
                tracing::debug!(x = rect.x, y = rect.y, w = rect.w, h = rect.h, "window apply started");
                self.pending_apply = Some(pending);
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "window apply unavailable");
                Some(Feedback::BridgeUnavailable)
            }
        }
    }

    fn collect_apply(&mut self) -> Option<Feedback> {
        let result = self.pending_apply.as_mut()?.try_take()?;
        self.pending_apply = None;
        Some(apply_feedback(&result))
    }

    /// Waits for an in-flight window apply, if any.
    pub async fn wait_for_apply(&mut self) -> Option<Feedback> {
        let pending = self.pending_apply.take()?;
        Some(apply_feedback(&pending.wait().await))
    }
}

fn apply_feedback(result: &ApplyResult) -> Feedback {
    if result.ok {
        tracing::info!(result = ?result.result, "window apply succeeded");
        Feedback::Applied
    } else {
        let error = result.error.clone().unwrap_or_default();
        tracing::warn!(error = %error, "window apply failed");
        Feedback::ApplyFailed { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::input::{GamepadSettings, gamepad};
    use crate::modules::layout::{CellRect, Direction, PixelRect, builtin_blueprints};
    use crate::modules::persistence::{FileStore, MemoryStore};

    struct FixedApplier(ApplyResult);

    impl WindowApplier for FixedApplier {
        fn apply(&self, _rect: PixelRect) -> ApplyResult { self.0.clone() }
    }

    fn controller() -> LayoutController<MemoryStore> {
        LayoutController::new(
            LayoutSession::new(builtin_blueprints()).unwrap(),
            PersistenceAdapter::new(MemoryStore::new(), "gridtile"),
            InputTranslator::new(GamepadSettings::default()),
            Viewport::new(900.0, 900.0),
        )
    }

    fn key(token: &str) -> KeyInput { token.parse().unwrap() }

    #[test]
    fn test_rejection_feedback_names_focused_tile() {
        let mut controller = controller();
        let feedback = controller.handle_key(&key("up")).unwrap();
        assert!(matches!(
            &feedback,
            Feedback::Rejected { tile_id: Some(id), .. } if id == "sys"
        ));
        assert!(feedback.is_negative());
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut controller = controller();
        assert_eq!(controller.handle_key(&key("x")), None);
    }

    #[test]
    fn test_load_without_save_reports_no_layout() {
        let mut controller = controller();
        let feedback = controller.dispatch(Command::Load).unwrap();
        assert_eq!(feedback, Feedback::NoSavedLayout);
        assert_eq!(feedback.to_string(), "No saved layout");
    }

    #[test]
    fn test_save_then_load_restores_geometry_and_maximize() {
        let mut controller = controller();
        controller.dispatch(Command::Resize(Direction::Left));
        controller.dispatch(Command::Navigate(Direction::Right));
        controller.dispatch(Command::ToggleMaximize);
        assert_eq!(controller.dispatch(Command::Save), Some(Feedback::Saved));

        controller.dispatch(Command::Reset);
        assert_eq!(controller.session().maximized_id(), None);

        assert_eq!(controller.dispatch(Command::Load), Some(Feedback::Loaded));
        let session = controller.session();
        assert_eq!(session.tile("sys").unwrap().rect, CellRect::new(1, 2, 1, 1));
        assert_eq!(session.maximized_id(), Some("notes"));
        assert_eq!(session.focused_id(), Some("notes"));
    }

    #[test]
    fn test_corrupt_store_file_reads_as_absent_and_recovers_on_save() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("layouts.json");
        std::fs::write(&path, "{garbage").unwrap();

        let mut controller = LayoutController::new(
            LayoutSession::new(builtin_blueprints()).unwrap(),
            PersistenceAdapter::new(FileStore::new(&path), "gridtile"),
            InputTranslator::new(GamepadSettings::default()),
            Viewport::new(900.0, 900.0),
        );

        assert_eq!(controller.dispatch(Command::Load), Some(Feedback::NoSavedLayout));
        assert_eq!(controller.dispatch(Command::Save), Some(Feedback::Saved));
        assert_eq!(controller.dispatch(Command::Save), Some(Feedback::Saved));
        assert_eq!(controller.dispatch(Command::Load), Some(Feedback::Loaded));
    }

    #[test]
    fn test_apply_without_helper_is_unavailable() {
        let mut controller = controller();
        let feedback = controller.dispatch(Command::ApplyToWindow).unwrap();
        assert_eq!(feedback.to_string(), "Native bridge unavailable");
    }

    #[test]
    fn test_apply_outside_runtime_is_unavailable() {
        let mut controller =
            controller().with_applier(Arc::new(FixedApplier(ApplyResult::success("ok"))));
        assert_eq!(controller.dispatch(Command::ApplyToWindow), Some(Feedback::BridgeUnavailable));
    }

    #[tokio::test]
    async fn test_apply_result_is_reported_later() {
        let mut controller =
            controller().with_applier(Arc::new(FixedApplier(ApplyResult::success("ok"))));

        assert_eq!(controller.dispatch(Command::ApplyToWindow), None);
        assert!(controller.apply_pending());
        assert_eq!(controller.wait_for_apply().await, Some(Feedback::Applied));
        assert!(!controller.apply_pending());
    }

    #[tokio::test]
    async fn test_second_apply_waits_for_the_first_result() {
        let mut controller =
            controller().with_applier(Arc::new(FixedApplier(ApplyResult::success("ok"))));

        assert_eq!(controller.dispatch(Command::ApplyToWindow), None);
        assert_eq!(controller.dispatch(Command::ApplyToWindow), Some(Feedback::ApplyInProgress));
        assert_eq!(controller.wait_for_apply().await, Some(Feedback::Applied));

        assert_eq!(controller.dispatch(Command::ApplyToWindow), None);
        assert_eq!(controller.wait_for_apply().await, Some(Feedback::Applied));
    }

    #[tokio::test]
    async fn test_apply_failure_leaves_layout_untouched() {
        let mut controller =
            controller().with_applier(Arc::new(FixedApplier(ApplyResult::failure("denied"))));
        let before = controller.session().snapshot();

        controller.dispatch(Command::ApplyToWindow);
        let feedback = controller.wait_for_apply().await.unwrap();
        assert_eq!(feedback.to_string(), "Failed");
        assert_eq!(controller.session().snapshot(), before);
    }

    #[test]
    fn test_tick_routes_gamepad_commands() {
        let mut controller = controller();
        let sample = GamepadSample::neutral().with_button(gamepad::BUTTON_DPAD_DOWN);

        assert!(controller.tick(Duration::ZERO, Some(&sample)).is_empty());
        assert_eq!(controller.session().focused_id(), Some("notes"));

        // held button does not repeat
        controller.tick(Duration::from_millis(16), Some(&sample));
        assert_eq!(controller.session().focused_id(), Some("notes"));
    }

    #[test]
    fn test_feedback_serializes_with_kind_tag() {
        let json = serde_json::to_value(Feedback::ApplyFailed { error: "x".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "applyFailed", "error": "x" }));
    }
}
