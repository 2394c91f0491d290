//! Custom actions for the Order actor.

/// Status transitions. Both return the updated order and require it to be
/// pending.
#[derive(Debug, Clone)]
pub enum OrderAction {
    Approve,
    Reject(String),
}
