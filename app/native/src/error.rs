//! Error types for Gridtile.
//!
//! Module errors convert into [`GridtileError`], which serializes as a
//! `{"kind", "message"}` object for JSON output.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::modules::effects::ApplyError;
use crate::modules::layout::{BlueprintError, SessionError};
use crate::modules::persistence::{PersistenceError, StoreError};

/// Errors surfaced by the CLI and library entry points.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum GridtileError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A blueprint failed validation.
    #[error("Blueprint error: {0}")]
    BlueprintError(String),
    /// Session could not be created or a blueprint was not found.
    #[error("Layout error: {0}")]
    LayoutError(String),
    /// Saving or loading a layout failed.
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    /// Window apply failed to start.
    #[error("Window apply error: {0}")]
    ApplyError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for GridtileError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for GridtileError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for GridtileError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<BlueprintError> for GridtileError {
    fn from(err: BlueprintError) -> Self { Self::BlueprintError(err.to_string()) }
}

impl From<SessionError> for GridtileError {
    fn from(err: SessionError) -> Self { Self::LayoutError(err.to_string()) }
}

impl From<PersistenceError> for GridtileError {
    fn from(err: PersistenceError) -> Self { Self::PersistenceError(err.to_string()) }
}

impl From<StoreError> for GridtileError {
    fn from(err: StoreError) -> Self { Self::PersistenceError(err.to_string()) }
}

impl From<ApplyError> for GridtileError {
    fn from(err: ApplyError) -> Self { Self::ApplyError(err.to_string()) }
}

impl From<String> for GridtileError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for GridtileError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
