//! JSON Schema for the configuration file.

use schemars::schema_for;

use crate::config::GridtileConfig;

/// Returns the configuration JSON Schema as pretty-printed JSON.
#[must_use]
pub fn print_schema() -> String {
    let schema = schema_for!(GridtileConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}
