//! Input translation.
//!
//! Turns keyboard presses and polled gamepad samples into [`Command`]s. No
//! layout state lives here, so every translator can be driven by synthetic
//! input in tests.

pub mod commands;
pub mod gamepad;
pub mod keyboard;

use std::time::Duration;

pub use self::commands::Command;
pub use self::gamepad::{
    EdgeDetector, GamepadCommands, GamepadSample, GamepadSettings, GamepadTranslator, RepeatGate,
};
pub use self::keyboard::{Key, KeyInput, Modifiers, translate_key};

/// Keyboard and gamepad translation behind one interface.
#[derive(Clone, Debug, Default)]
pub struct InputTranslator {
    gamepad: GamepadTranslator,
}

impl InputTranslator {
    #[must_use]
    pub fn new(settings: GamepadSettings) -> Self {
        Self { gamepad: GamepadTranslator::new(settings) }
    }

    /// Maps a key press to a command.
    #[must_use]
    pub fn key(&self, input: &KeyInput) -> Option<Command> { translate_key(input) }

    /// Feeds one gamepad sample taken at `now`.
    pub fn gamepad(&mut self, sample: &GamepadSample, now: Duration) -> GamepadCommands {
        self.gamepad.poll(sample, now)
    }

    /// Clears gamepad edge and repeat state.
    pub fn gamepad_disconnected(&mut self) { self.gamepad.reset(); }

    #[must_use]
    pub const fn settings(&self) -> GamepadSettings { self.gamepad.settings() }
}
