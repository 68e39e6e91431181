//! Command vocabulary shared by every input source.

use std::fmt;

use crate::modules::layout::{CycleDirection, Direction};

/// A discrete request produced by input translation.
///
/// Geometry and focus commands go to the layout session. `Save`, `Load` and
/// `ApplyToWindow` are handled by the controller's collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move focus to the nearest tile in a direction.
    Navigate(Direction),
    /// Translate the focused tile one cell.
    Move(Direction),
    /// Grow (right/down) or shrink (left/up) the focused tile by one cell.
    Resize(Direction),
    ToggleMaximize,
    /// Send the focused tile's pixel rectangle to the window helper.
    ApplyToWindow,
    SwitchBlueprint(CycleDirection),
    Reset,
    Save,
    Load,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(dir) => write!(f, "navigate {dir}"),
            Self::Move(dir) => write!(f, "move {dir}"),
            Self::Resize(dir) => write!(f, "resize {dir}"),
            Self::ToggleMaximize => f.write_str("toggle maximize"),
            Self::ApplyToWindow => f.write_str("apply to window"),
            Self::SwitchBlueprint(CycleDirection::Next) => f.write_str("next blueprint"),
            Self::SwitchBlueprint(CycleDirection::Previous) => f.write_str("previous blueprint"),
            Self::Reset => f.write_str("reset"),
            Self::Save => f.write_str("save"),
            Self::Load => f.write_str("load"),
        }
    }
}
