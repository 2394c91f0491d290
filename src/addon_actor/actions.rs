//! Custom actions for the AddOn actor.

/// Enablement toggles. Both return `true` when the flag actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOnAction {
    Enable,
    Disable,
}
