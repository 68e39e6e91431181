//! Side effects outside the layout engine.

pub mod window_apply;

pub use self::window_apply::{
    ApplyError, ApplyResult, CommandApplier, PendingApply, WindowApplier, spawn_apply,
};
