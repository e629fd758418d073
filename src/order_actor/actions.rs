use crate::domain::{OrderUpdate, TransitionPolicy};

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Applies a status and/or payment change in one step.
    Update {
        update: OrderUpdate,
        policy: TransitionPolicy,
    },
}
