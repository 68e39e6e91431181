//! Gamepad polling.
//!
//! A gamepad is read once per scheduler tick as a [`GamepadSample`]. Digital
//! buttons fire on the released-to-pressed transition between consecutive
//! samples ([`EdgeDetector`]). Analog sticks fire when they leave the
//! deadzone and then repeat at a fixed cadence while held ([`RepeatGate`]).
//!
//! Button and axis indices follow the standard (XInput style) mapping.

use std::time::Duration;

use smallvec::SmallVec;

use super::commands::Command;
use crate::constants::{DEFAULT_DEADZONE, DEFAULT_REPEAT_INTERVAL_MS};
use crate::modules::layout::{CycleDirection, Direction};

// ============================================================================
// Standard Mapping
// ============================================================================

pub const BUTTON_A: usize = 0;
pub const BUTTON_Y: usize = 3;
pub const BUTTON_LB: usize = 4;
pub const BUTTON_RB: usize = 5;
pub const BUTTON_LT: usize = 6;
pub const BUTTON_RT: usize = 7;
pub const BUTTON_BACK: usize = 8;
pub const BUTTON_START: usize = 9;
pub const BUTTON_DPAD_UP: usize = 12;
pub const BUTTON_DPAD_DOWN: usize = 13;
pub const BUTTON_DPAD_LEFT: usize = 14;
pub const BUTTON_DPAD_RIGHT: usize = 15;

pub const AXIS_LEFT_X: usize = 0;
pub const AXIS_LEFT_Y: usize = 1;
pub const AXIS_RIGHT_X: usize = 2;
pub const AXIS_RIGHT_Y: usize = 3;

/// Edge-triggered buttons in the order their commands are emitted.
const BUTTON_BINDINGS: [(usize, Command); 10] = [
    (BUTTON_DPAD_UP, Command::Navigate(Direction::Up)),
    (BUTTON_DPAD_DOWN, Command::Navigate(Direction::Down)),
    (BUTTON_DPAD_LEFT, Command::Navigate(Direction::Left)),
    (BUTTON_DPAD_RIGHT, Command::Navigate(Direction::Right)),
    (BUTTON_A, Command::ToggleMaximize),
    (BUTTON_LB, Command::SwitchBlueprint(CycleDirection::Previous)),
    (BUTTON_RB, Command::SwitchBlueprint(CycleDirection::Next)),
    (BUTTON_START, Command::Save),
    (BUTTON_BACK, Command::Load),
    (BUTTON_Y, Command::ApplyToWindow),
];

/// Commands produced by one poll.
pub type GamepadCommands = SmallVec<[Command; 8]>;

// ============================================================================
// Samples
// ============================================================================

/// Raw state of one gamepad at a poll.
///
/// Axes are in `[-1.0, 1.0]`; missing axes and buttons read as neutral.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamepadSample {
    pub axes: SmallVec<[f64; 4]>,
    pub buttons: SmallVec<[bool; 17]>,
}

impl GamepadSample {
    /// A sample with every axis centered and no button pressed.
    #[must_use]
    pub fn neutral() -> Self { Self::default() }

    /// Returns the sample with axis `index` set to `value`.
    #[must_use]
    pub fn with_axis(mut self, index: usize, value: f64) -> Self {
        if self.axes.len() <= index {
            self.axes.resize(index + 1, 0.0);
        }
        self.axes[index] = value;
        self
    }

    /// Returns the sample with button `index` held.
    #[must_use]
    pub fn with_button(mut self, index: usize) -> Self {
        if self.buttons.len() <= index {
            self.buttons.resize(index + 1, false);
        }
        self.buttons[index] = true;
        self
    }

    #[must_use]
    pub fn axis(&self, index: usize) -> f64 { self.axes.get(index).copied().unwrap_or(0.0) }

    #[must_use]
    pub fn pressed(&self, index: usize) -> bool { self.buttons.get(index).copied().unwrap_or(false) }
}

// ============================================================================
// Edge Detection
// ============================================================================

/// Tracks the previous poll's buttons to report fresh presses.
#[derive(Clone, Debug, Default)]
pub struct EdgeDetector {
    previous: SmallVec<[bool; 17]>,
}

impl EdgeDetector {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns `true` if `button` is pressed in `current` but was not in the
    /// previous sample.
    #[must_use]
    pub fn rising(&self, current: &GamepadSample, button: usize) -> bool {
        current.pressed(button) && !self.previous.get(button).copied().unwrap_or(false)
    }

    /// Records `current` as the previous sample for the next poll.
    pub fn advance(&mut self, current: &GamepadSample) {
        self.previous.clone_from(&current.buttons);
    }

    /// Forgets the previous sample, so held buttons fire again.
    pub fn clear(&mut self) { self.previous.clear(); }
}

// ============================================================================
// Repeat Gate
// ============================================================================

/// Lets a held input fire once, then again each time `interval` has elapsed.
#[derive(Clone, Debug)]
pub struct RepeatGate {
    interval: Duration,
    last_fired: Option<Duration>,
}

impl RepeatGate {
    #[must_use]
    pub const fn new(interval: Duration) -> Self { Self { interval, last_fired: None } }

    /// Advances the gate. `now` is any monotonic timestamp.
    ///
    /// Returns `true` when the input should fire. Releasing the input re-arms
    /// the gate immediately.
    pub fn poll(&mut self, active: bool, now: Duration) -> bool {
        if !active {
            self.last_fired = None;
            return false;
        }

        let ready = self.last_fired.is_none_or(|last| now.saturating_sub(last) > self.interval);
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }

    #[must_use]
    pub const fn interval(&self) -> Duration { self.interval }
}

// ============================================================================
// Translator
// ============================================================================

/// Stick deadzone and repeat cadence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GamepadSettings {
    pub deadzone: f64,
    pub repeat_interval: Duration,
}

impl Default for GamepadSettings {
    fn default() -> Self {
        Self {
            deadzone: DEFAULT_DEADZONE,
            repeat_interval: Duration::from_millis(DEFAULT_REPEAT_INTERVAL_MS),
        }
    }
}

/// Converts successive gamepad samples into commands.
#[derive(Clone, Debug)]
pub struct GamepadTranslator {
    settings: GamepadSettings,
    edges: EdgeDetector,
    left_stick: RepeatGate,
    right_stick: RepeatGate,
}

impl GamepadTranslator {
    #[must_use]
    pub fn new(settings: GamepadSettings) -> Self {
        Self {
            settings,
            edges: EdgeDetector::new(),
            left_stick: RepeatGate::new(settings.repeat_interval),
            right_stick: RepeatGate::new(settings.repeat_interval),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> GamepadSettings { self.settings }

    /// Processes one sample taken at `now`.
    ///
    /// The left stick navigates, or resizes while LT or RT is held. The right
    /// stick moves the focused tile. Horizontal and vertical deflection can
    /// both fire in the same poll.
    pub fn poll(&mut self, sample: &GamepadSample, now: Duration) -> GamepadCommands {
        let mut commands = GamepadCommands::new();
        let dz = self.settings.deadzone;

        let (lx, ly) = (sample.axis(AXIS_LEFT_X), sample.axis(AXIS_LEFT_Y));
        if self.left_stick.poll(stick_active(lx, ly, dz), now) {
            let resizing = sample.pressed(BUTTON_LT) || sample.pressed(BUTTON_RT);
            let to_command = if resizing { Command::Resize } else { Command::Navigate };
            commands.extend(stick_directions(lx, ly, dz).map(to_command));
        }

        let (rx, ry) = (sample.axis(AXIS_RIGHT_X), sample.axis(AXIS_RIGHT_Y));
        if self.right_stick.poll(stick_active(rx, ry, dz), now) {
            commands.extend(stick_directions(rx, ry, dz).map(Command::Move));
        }

        for (button, command) in BUTTON_BINDINGS {
            if self.edges.rising(sample, button) {
                commands.push(command);
            }
        }

        self.edges.advance(sample);

        if !commands.is_empty() {
            tracing::trace!(count = commands.len(), "gamepad commands");
        }
        commands
    }

    /// Drops all timing and edge state, e.g. after the pad disconnects.
    pub fn reset(&mut self) {
        self.edges.clear();
        self.left_stick = RepeatGate::new(self.settings.repeat_interval);
        self.right_stick = RepeatGate::new(self.settings.repeat_interval);
    }
}

impl Default for GamepadTranslator {
    fn default() -> Self { Self::new(GamepadSettings::default()) }
}

fn stick_active(x: f64, y: f64, deadzone: f64) -> bool { x.abs() > deadzone || y.abs() > deadzone }

/// Horizontal then vertical direction of a deflected stick.
fn stick_directions(x: f64, y: f64, deadzone: f64) -> impl Iterator<Item = Direction> {
    let horizontal = if x < -deadzone {
        Some(Direction::Left)
    } else if x > deadzone {
        Some(Direction::Right)
    } else {
        None
    };
    let vertical = if y < -deadzone {
        Some(Direction::Up)
    } else if y > deadzone {
        Some(Direction::Down)
    } else {
        None
    };
    horizontal.into_iter().chain(vertical)
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(value: u64) -> Duration { Duration::from_millis(value) }

    fn commands(translator: &mut GamepadTranslator, sample: &GamepadSample, at: u64) -> Vec<Command> {
        translator.poll(sample, ms(at)).into_vec()
    }

    #[test]
    fn test_edge_detector_fires_once_per_press() {
        let mut edges = EdgeDetector::new();
        let pressed = GamepadSample::neutral().with_button(BUTTON_A);

        assert!(edges.rising(&pressed, BUTTON_A));
        edges.advance(&pressed);
        assert!(!edges.rising(&pressed, BUTTON_A));

        edges.advance(&GamepadSample::neutral());
        assert!(edges.rising(&pressed, BUTTON_A));
    }

    #[test]
    fn test_repeat_gate_cadence() {
        let mut gate = RepeatGate::new(ms(220));
        assert!(gate.poll(true, ms(1000)));
        assert!(!gate.poll(true, ms(1100)));
        assert!(!gate.poll(true, ms(1220)));
        assert!(gate.poll(true, ms(1221)));
    }

    #[test]
    fn test_repeat_gate_rearms_on_release() {
        let mut gate = RepeatGate::new(ms(220));
        assert!(gate.poll(true, ms(0)));
        assert!(!gate.poll(false, ms(10)));
        assert!(gate.poll(true, ms(20)));
    }

    #[test]
    fn test_stick_inside_deadzone_is_ignored() {
        let mut translator = GamepadTranslator::default();
        let sample = GamepadSample::neutral().with_axis(AXIS_LEFT_X, 0.3);
        assert!(commands(&mut translator, &sample, 0).is_empty());
    }

    #[test]
    fn test_held_stick_repeats() {
        let mut translator = GamepadTranslator::default();
        let right = GamepadSample::neutral().with_axis(AXIS_LEFT_X, 0.9);

        let fired: usize = (0..=50)
            .map(|tick| commands(&mut translator, &right, tick * 16).len())
            .sum();

        // 0..=800ms at 16ms ticks fires at 0, 224, 448 and 672
        assert_eq!(fired, 4);
    }

    #[test]
    fn test_diagonal_stick_fires_both_axes() {
        let mut translator = GamepadTranslator::default();
        let sample = GamepadSample::neutral().with_axis(AXIS_LEFT_X, -0.8).with_axis(AXIS_LEFT_Y, 0.8);
        assert_eq!(
            commands(&mut translator, &sample, 0),
            vec![Command::Navigate(Direction::Left), Command::Navigate(Direction::Down)]
        );
    }

    #[test]
    fn test_trigger_turns_stick_into_resize() {
        let mut translator = GamepadTranslator::default();
        let sample = GamepadSample::neutral().with_axis(AXIS_LEFT_Y, -1.0).with_button(BUTTON_RT);
        assert_eq!(commands(&mut translator, &sample, 0), vec![Command::Resize(Direction::Up)]);
    }

    #[test]
    fn test_right_stick_moves() {
        let mut translator = GamepadTranslator::default();
        let sample = GamepadSample::neutral().with_axis(AXIS_RIGHT_X, 1.0);
        assert_eq!(commands(&mut translator, &sample, 0), vec![Command::Move(Direction::Right)]);
    }

    #[test]
    fn test_buttons_are_edge_triggered() {
        let mut translator = GamepadTranslator::default();
        let held = GamepadSample::neutral().with_button(BUTTON_DPAD_RIGHT).with_button(BUTTON_START);

        assert_eq!(
            commands(&mut translator, &held, 0),
            vec![Command::Navigate(Direction::Right), Command::Save]
        );
        assert!(commands(&mut translator, &held, 16).is_empty());
        assert!(commands(&mut translator, &GamepadSample::neutral(), 32).is_empty());
        assert_eq!(commands(&mut translator, &held, 48).len(), 2);
    }

    #[test]
    fn test_button_bindings() {
        let cases = [
            (BUTTON_A, Command::ToggleMaximize),
            (BUTTON_Y, Command::ApplyToWindow),
            (BUTTON_LB, Command::SwitchBlueprint(CycleDirection::Previous)),
            (BUTTON_RB, Command::SwitchBlueprint(CycleDirection::Next)),
            (BUTTON_BACK, Command::Load),
            (BUTTON_DPAD_UP, Command::Navigate(Direction::Up)),
        ];
        for (button, expected) in cases {
            let mut translator = GamepadTranslator::default();
            let sample = GamepadSample::neutral().with_button(button);
            assert_eq!(commands(&mut translator, &sample, 0), vec![expected]);
        }
    }

    #[test]
    fn test_triggers_alone_emit_nothing() {
        let mut translator = GamepadTranslator::default();
        let sample = GamepadSample::neutral().with_button(BUTTON_LT).with_button(BUTTON_RT);
        assert!(commands(&mut translator, &sample, 0).is_empty());
    }

    #[test]
    fn test_reset_refires_held_button() {
        let mut translator = GamepadTranslator::default();
        let held = GamepadSample::neutral().with_button(BUTTON_A);
        commands(&mut translator, &held, 0);
        translator.reset();
        assert_eq!(commands(&mut translator, &held, 16), vec![Command::ToggleMaximize]);
    }
}
