//! Applying a pixel rectangle to a real OS window.
//!
//! The work is done by an external helper program invoked as
//! `<program> set-frame <x> <y> <w> <h>`. Exit status 0 means success and the
//! trimmed stdout becomes the result text. Requests run on the blocking pool
//! and report back through a oneshot channel, so input handling never waits
//! on the helper.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::modules::layout::PixelRect;

/// Outcome reported by a window helper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyResult {
    #[must_use]
    pub fn success(result: impl Into<String>) -> Self {
        Self { ok: true, result: Some(result.into()), error: None }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, result: None, error: Some(error.into()) }
    }
}

/// Something that can move and resize the frontmost window.
///
/// Implementations may block; they are always called off the input path.
pub trait WindowApplier: Send + Sync + 'static {
    fn apply(&self, rect: PixelRect) -> ApplyResult;
}

/// Runs an external helper program for each request.
#[derive(Clone, Debug)]
pub struct CommandApplier {
    program: PathBuf,
}

impl CommandApplier {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self { Self { program: program.into() } }

    #[must_use]
    pub fn program(&self) -> &std::path::Path { &self.program }
}

impl WindowApplier for CommandApplier {
    fn apply(&self, rect: PixelRect) -> ApplyResult {
        let args = [
            "set-frame".to_string(),
            rect.x.to_string(),
            rect.y.to_string(),
            rect.w.to_string(),
            rect.h.to_string(),
        ];

        tracing::debug!(program = %self.program.display(), ?args, "invoking window helper");

        let output = match Command::new(&self.program).args(&args).output() {
            Ok(output) => output,
            Err(err) => {
                return ApplyResult::failure(format!(
                    "failed to run '{}': {err}",
                    self.program.display()
                ));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() {
            return ApplyResult::success(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() { stdout } else { stderr };
        ApplyResult::failure(format!(
            "'{}' exited with {}: {detail}",
            self.program.display(),
            output.status
        ))
    }
}

// ============================================================================
// Background Requests
// ============================================================================

/// Errors starting a background apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("no async runtime available for window apply")]
    NoRuntime,
}

/// An apply request in flight.
#[derive(Debug)]
pub struct PendingApply {
    rect: PixelRect,
    receiver: oneshot::Receiver<ApplyResult>,
}

impl PendingApply {
    /// The rectangle that was requested.
    #[must_use]
    pub const fn rect(&self) -> PixelRect { self.rect }

    /// Returns the result if it has arrived, without waiting.
    pub fn try_take(&mut self) -> Option<ApplyResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(ApplyResult::failure("window apply task ended without a result"))
            }
        }
    }

    /// Waits for the result.
    pub async fn wait(self) -> ApplyResult {
        self.receiver
            .await
            .unwrap_or_else(|_| ApplyResult::failure("window apply task ended without a result"))
    }
}

/// Starts `applier` on the current runtime's blocking pool.
///
/// # Errors
///
/// Returns [`ApplyError::NoRuntime`] if called outside a tokio runtime.
pub fn spawn_apply(
    applier: Arc<dyn WindowApplier>,
    rect: PixelRect,
) -> Result<PendingApply, ApplyError> {
    let handle = tokio::runtime::Handle::try_current().map_err(|_| ApplyError::NoRuntime)?;
    let (tx, rx) = oneshot::channel();

    handle.spawn_blocking(move || {
        let result = applier.apply(rect);
        if tx.send(result).is_err() {
            tracing::debug!("window apply result dropped");
        }
    });

    Ok(PendingApply { rect, receiver: rx })
}
