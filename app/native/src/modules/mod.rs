//! Feature modules for Gridtile.
//!
//! - [`layout`] - Blueprints, placement validation, navigation and the layout session
//! - [`persistence`] - Saving and restoring tile arrangements
//! - [`input`] - Keyboard and gamepad translation into commands
//! - [`effects`] - Applying tiles to real windows through an external helper
//! - [`controller`] - Tick-driven glue between the above

pub mod controller;
pub mod effects;
pub mod input;
pub mod layout;
pub mod persistence;
