//! Custom actions for the Plan actor.
//!
//! Handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! on [`Plan`](crate::model::Plan).

use crate::model::PlanStatus;

/// Custom actions for Plan entities.
#[derive(Debug, Clone)]
pub enum PlanAction {
    /// Moves the plan to a new status. `Deleted` is terminal.
    ///
    /// Returns the updated plan.
    SetStatus(PlanStatus),
}
