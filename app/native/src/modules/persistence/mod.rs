//! Saving and restoring tile arrangements per blueprint.
//!
//! Records are stored as JSON (`{"tiles": [...], "maximizedId": ...}`) under
//! the key `"<namespace>:<blueprintId>"`. Restored records are checked
//! against the current blueprint before use and are discarded whole when any
//! part of them no longer fits.

pub mod store;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::store::{FileStore, LayoutStore, MemoryStore, StoreError};
use crate::modules::layout::{Blueprint, PlacementViolation, Tile, TileId, check_placement};

/// A persisted tile arrangement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub maximized_id: Option<TileId>,
}

/// Why a stored record was not restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscardReason {
    #[error("record is not valid JSON: {0}")]
    Corrupt(String),

    #[error("tile '{0}' appears more than once")]
    DuplicateTile(TileId),

    #[error("tile set does not match blueprint")]
    TileSetMismatch,

    #[error("tile '{tile}' no longer fits: {violation}")]
    InvalidPlacement {
        tile: TileId,
        violation: PlacementViolation,
    },

    #[error("maximized tile '{0}' does not exist")]
    UnknownMaximized(TileId),
}

/// Result of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(SavedLayout),
    NotFound,
    /// A record existed but was rejected. Callers treat this as "no saved layout".
    Discarded(DiscardReason),
}

/// Errors from the persistence layer. Validation failures are not errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Saves and restores [`SavedLayout`] records through a [`LayoutStore`].
pub struct PersistenceAdapter<S> {
    store: S,
    namespace: String,
}

impl<S: LayoutStore> PersistenceAdapter<S> {
    /// Creates an adapter writing keys under `namespace`.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self { store, namespace: namespace.into() }
    }

    /// Storage key for a blueprint.
    #[must_use]
    pub fn key_for(&self, blueprint_id: &str) -> String {
        format!("{}:{blueprint_id}", self.namespace)
    }

    #[must_use]
    pub const fn store(&self) -> &S { &self.store }

    /// Persists `tiles` and the maximized tile for `blueprint_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(
        &mut self,
        blueprint_id: &str,
        tiles: &[Tile],
        maximized_id: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let record = SavedLayout {
            tiles: tiles.to_vec(),
            maximized_id: maximized_id.map(ToString::to_string),
        };
        let key = self.key_for(blueprint_id);
        let json = serde_json::to_string(&record)?;
        self.store.write(&key, json)?;

        tracing::info!(key = %key, tiles = tiles.len(), "saved layout");
        Ok(())
    }

    /// Loads the raw record for `blueprint_id` without checking it against a
    /// blueprint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self, blueprint_id: &str) -> Result<LoadOutcome, PersistenceError> {
        let key = self.key_for(blueprint_id);
        let Some(raw) = self.store.read(&key)? else {
            tracing::debug!(key = %key, "no saved layout");
            return Ok(LoadOutcome::NotFound);
        };

        match serde_json::from_str::<SavedLayout>(&raw) {
            Ok(record) => Ok(LoadOutcome::Loaded(record)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "discarding corrupt saved layout");
                Ok(LoadOutcome::Discarded(DiscardReason::Corrupt(err.to_string())))
            }
        }
    }

    /// Loads the record for `blueprint` and checks it against the blueprint's
    /// current bounds, gates, frames and tile set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load_validated(&self, blueprint: &Blueprint) -> Result<LoadOutcome, PersistenceError> {
        let outcome = match self.load(&blueprint.id)? {
            LoadOutcome::Loaded(record) => match validate_record(&record, blueprint) {
                Ok(()) => LoadOutcome::Loaded(record),
                Err(reason) => {
                    tracing::warn!(
                        blueprint = %blueprint.id,
                        reason = %reason,
                        "discarding stale saved layout"
                    );
                    LoadOutcome::Discarded(reason)
                }
            },
            other => other,
        };
        Ok(outcome)
    }
}

/// Checks a saved record against `blueprint`.
///
/// # Errors
///
/// Returns the first [`DiscardReason`] found.
pub fn validate_record(record: &SavedLayout, blueprint: &Blueprint) -> Result<(), DiscardReason> {
    let mut seen = HashSet::with_capacity(record.tiles.len());
    for tile in &record.tiles {
        if !seen.insert(tile.id.as_str()) {
            return Err(DiscardReason::DuplicateTile(tile.id.clone()));
        }
    }

    let expected: HashSet<&str> = blueprint.tiles.iter().map(|t| t.id.as_str()).collect();
    if seen != expected {
        return Err(DiscardReason::TileSetMismatch);
    }

    for tile in &record.tiles {
        check_placement(&tile.id, &tile.rect, blueprint, &record.tiles).map_err(|violation| {
            DiscardReason::InvalidPlacement { tile: tile.id.clone(), violation }
        })?;
    }

    if let Some(id) = &record.maximized_id
        && !seen.contains(id.as_str())
    {
        return Err(DiscardReason::UnknownMaximized(id.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::layout::{CellRect, GridSize, builtin_blueprints};

    fn dashboard() -> Blueprint { builtin_blueprints().remove(0) }

    fn adapter() -> PersistenceAdapter<MemoryStore> {
        PersistenceAdapter::new(MemoryStore::new(), "gridtile")
    }

    #[test]
    fn test_key_is_namespaced() {
        assert_eq!(adapter().key_for("dashboard-3x3"), "gridtile:dashboard-3x3");
    }

    #[test]
    fn test_load_missing_is_not_found() {
        assert_eq!(adapter().load("dashboard-3x3").unwrap(), LoadOutcome::NotFound);
    }

    #[test]
    fn test_save_load_round_trip() {
        let bp = dashboard();
        let mut adapter = adapter();
        let mut tiles = bp.tiles.clone();
        tiles[0].rect = CellRect::new(1, 2, 1, 1);

        adapter.save(&bp.id, &tiles, Some("notes")).unwrap();

        let expected = SavedLayout { tiles, maximized_id: Some("notes".to_string()) };
        assert_eq!(adapter.load(&bp.id).unwrap(), LoadOutcome::Loaded(expected.clone()));
        assert_eq!(adapter.load_validated(&bp).unwrap(), LoadOutcome::Loaded(expected));
    }

    #[test]
    fn test_record_uses_camel_case() {
        let bp = dashboard();
        let mut adapter = adapter();
        adapter.save(&bp.id, &bp.tiles, None).unwrap();

        let raw = adapter.store().read("gridtile:dashboard-3x3").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["maximizedId"].is_null());
        assert_eq!(value["tiles"][0]["rowSpan"], 1);
        assert_eq!(value["tiles"][0]["colSpan"], 2);
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let mut store = MemoryStore::new();
        store.write("gridtile:dashboard-3x3", "{not json".to_string()).unwrap();
        let adapter = PersistenceAdapter::new(store, "gridtile");

        assert!(matches!(
            adapter.load("dashboard-3x3").unwrap(),
            LoadOutcome::Discarded(DiscardReason::Corrupt(_))
        ));
    }

    #[test]
    fn test_record_outside_shrunk_grid_is_discarded() {
        let bp = dashboard();
        let mut adapter = adapter();
        adapter.save(&bp.id, &bp.tiles, None).unwrap();

        let mut shrunk = bp;
        shrunk.grid = GridSize::new(2, 3);
        shrunk.gates.max_span = None;

        assert!(matches!(
            adapter.load_validated(&shrunk).unwrap(),
            LoadOutcome::Discarded(DiscardReason::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_record_overlapping_frame_is_discarded() {
        let bp = dashboard();
        let mut tiles = bp.tiles.clone();
        tiles[0].rect = CellRect::new(1, 1, 1, 1);
        let record = SavedLayout { tiles, maximized_id: None };

        assert!(matches!(
            validate_record(&record, &bp),
            Err(DiscardReason::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn test_record_with_missing_tile_is_discarded() {
        let bp = dashboard();
        let record = SavedLayout { tiles: bp.tiles[1..].to_vec(), maximized_id: None };
        assert_eq!(validate_record(&record, &bp), Err(DiscardReason::TileSetMismatch));
    }

    #[test]
    fn test_record_with_duplicate_tile_is_discarded() {
        let bp = dashboard();
        let mut tiles = bp.tiles.clone();
        tiles.push(tiles[0].clone());
        let record = SavedLayout { tiles, maximized_id: None };
        assert_eq!(
            validate_record(&record, &bp),
            Err(DiscardReason::DuplicateTile("sys".to_string()))
        );
    }

    #[test]
    fn test_record_with_unknown_maximized_is_discarded() {
        let bp = dashboard();
        let record = SavedLayout { tiles: bp.tiles.clone(), maximized_id: Some("ghost".into()) };
        assert_eq!(
            validate_record(&record, &bp),
            Err(DiscardReason::UnknownMaximized("ghost".to_string()))
        );
    }

    #[test]
    fn test_file_backed_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let bp = dashboard();
        let path = temp.path().join("layouts.json");

        let mut writer = PersistenceAdapter::new(FileStore::new(&path), "gridtile");
        writer.save(&bp.id, &bp.tiles, Some("feed")).unwrap();

        let reader = PersistenceAdapter::new(FileStore::new(&path), "gridtile");
        match reader.load_validated(&bp).unwrap() {
            LoadOutcome::Loaded(record) => {
                assert_eq!(record.tiles, bp.tiles);
                assert_eq!(record.maximized_id.as_deref(), Some("feed"));
            }
            other => panic!("expected loaded record, got {other:?}"),
        }
    }
}
