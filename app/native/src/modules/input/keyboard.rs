//! Keyboard mapping.
//!
//! | Key            | Command                 |
//! |----------------|-------------------------|
//! | Arrow          | navigate                |
//! | Shift+Arrow    | resize                  |
//! | Alt+Arrow      | move                    |
//! | Enter          | toggle maximize         |
//! | `a`            | apply to window         |
//! | `[` / `]`      | previous / next blueprint |
//! | `r` `s` `l`    | reset, save, load       |

use std::fmt;
use std::str::FromStr;

use super::commands::Command;
use crate::modules::layout::{CycleDirection, Direction};

/// A key without modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Arrow(Direction),
    Enter,
    Char(char),
}

/// Modifier keys held with a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub const fn plain(key: Key) -> Self { Self { key, modifiers: Modifiers { shift: false, alt: false } } }

    #[must_use]
    pub const fn shift(key: Key) -> Self { Self { key, modifiers: Modifiers { shift: true, alt: false } } }

    #[must_use]
    pub const fn alt(key: Key) -> Self { Self { key, modifiers: Modifiers { shift: false, alt: true } } }
}

/// Parses tokens such as `right`, `shift+left`, `alt+down`, `enter` or `]`.
///
/// Modifier and key names are case-insensitive; `ArrowLeft` style names are
/// accepted as well.
impl FromStr for KeyInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err("Empty key token.".to_string());
        }

        // "+" alone, or a trailing "++", names the plus key itself
        let (mod_part, key_part) = match token.rsplit_once('+') {
            _ if token == "+" => ("", "+"),
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", token),
        };

        let mut modifiers = Modifiers::default();
        for part in mod_part.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "alt" | "opt" | "option" => modifiers.alt = true,
                _ => return Err(format!("Unknown modifier '{part}' in '{s}'.")),
            }
        }

        Ok(Self { key: parse_key(key_part)?, modifiers })
    }
}

fn parse_key(name: &str) -> Result<Key, String> {
    let lower = name.to_lowercase();
    let lower = lower.strip_prefix("arrow").unwrap_or(lower.as_str());

    if let Ok(direction) = lower.parse::<Direction>() {
        return Ok(Key::Arrow(direction));
    }

    match lower {
        "enter" | "return" => Ok(Key::Enter),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Key::Char(c)),
                _ => Err(format!("Unknown key '{name}'.")),
            }
        }
    }
}

impl fmt::Display for KeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        match self.key {
            Key::Arrow(direction) => write!(f, "{direction}"),
            Key::Enter => f.write_str("enter"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Maps a key press to a command. Unbound keys yield `None`.
#[must_use]
pub fn translate_key(input: &KeyInput) -> Option<Command> {
    match input.key {
        Key::Arrow(direction) if input.modifiers.shift => Some(Command::Resize(direction)),
        Key::Arrow(direction) if input.modifiers.alt => Some(Command::Move(direction)),
        Key::Arrow(direction) => Some(Command::Navigate(direction)),
        Key::Enter => Some(Command::ToggleMaximize),
        Key::Char(c) => match c.to_ascii_lowercase() {
            '[' => Some(Command::SwitchBlueprint(CycleDirection::Previous)),
            ']' => Some(Command::SwitchBlueprint(CycleDirection::Next)),
            'r' => Some(Command::Reset),
            's' => Some(Command::Save),
            'l' => Some(Command::Load),
            'a' => Some(Command::ApplyToWindow),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(token: &str) -> Option<Command> { translate_key(&token.parse().unwrap()) }

    #[test]
    fn test_parse_plain_and_modified() {
        assert_eq!("right".parse(), Ok(KeyInput::plain(Key::Arrow(Direction::Right))));
        assert_eq!("Shift+Left".parse(), Ok(KeyInput::shift(Key::Arrow(Direction::Left))));
        assert_eq!("alt+ArrowDown".parse(), Ok(KeyInput::alt(Key::Arrow(Direction::Down))));
        assert_eq!("enter".parse(), Ok(KeyInput::plain(Key::Enter)));
        assert_eq!("]".parse(), Ok(KeyInput::plain(Key::Char(']'))));
        assert_eq!("+".parse(), Ok(KeyInput::plain(Key::Char('+'))));
        assert_eq!("shift++".parse(), Ok(KeyInput::shift(Key::Char('+'))));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<KeyInput>().is_err());
        assert!("ctrl+left".parse::<KeyInput>().is_err());
        assert!("pagedown".parse::<KeyInput>().is_err());
    }

    #[test]
    fn test_display_round_trips_tokens() {
        for token in ["left", "shift+up", "alt+right", "enter", "s"] {
            assert_eq!(token.parse::<KeyInput>().unwrap().to_string(), token);
        }
    }

    #[test]
    fn test_arrow_bindings() {
        assert_eq!(command("up"), Some(Command::Navigate(Direction::Up)));
        assert_eq!(command("shift+up"), Some(Command::Resize(Direction::Up)));
        assert_eq!(command("alt+up"), Some(Command::Move(Direction::Up)));
    }

    #[test]
    fn test_shift_wins_over_alt() {
        assert_eq!(command("shift+alt+left"), Some(Command::Resize(Direction::Left)));
    }

    #[test]
    fn test_letter_bindings_are_case_insensitive() {
        assert_eq!(command("S"), Some(Command::Save));
        assert_eq!(command("l"), Some(Command::Load));
        assert_eq!(command("R"), Some(Command::Reset));
        assert_eq!(command("a"), Some(Command::ApplyToWindow));
        assert_eq!(command("enter"), Some(Command::ToggleMaximize));
        assert_eq!(command("["), Some(Command::SwitchBlueprint(CycleDirection::Previous)));
        assert_eq!(command("x"), None);
    }
}
