//! Placement state machine.

/// How far an order placement has progressed.
///
/// State transitions:
/// ```text
/// Pending ──► ProductsValidated ──► Persisted ──► PaymentCharged ──► DeliveryEstimated ──► Complete
///    │               │                  │               │                    │
///    └───────────────┴──────────────────┴───────────────┴────────────────────┴──► Failed
/// ```
///
/// Transitions only move forward; nothing done before a failure is undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementState {
    /// Nothing has run yet.
    #[default]
    Pending,

    /// Every product in the order exists.
    ProductsValidated,

    /// The order has been saved and has an ID.
    Persisted,

    /// Payment went through.
    PaymentCharged,

    /// Shipping returned a delivery estimate.
    DeliveryEstimated,

    /// The estimate is recorded on the order (terminal state).
    Complete,

    /// A step failed (terminal state).
    Failed,
}

impl PlacementState {
    /// Returns the state that follows on success, if any.
    pub fn next(&self) -> Option<PlacementState> {
        match self {
            PlacementState::Pending => Some(PlacementState::ProductsValidated),
            PlacementState::ProductsValidated => Some(PlacementState::Persisted),
            PlacementState::Persisted => Some(PlacementState::PaymentCharged),
            PlacementState::PaymentCharged => Some(PlacementState::DeliveryEstimated),
            PlacementState::DeliveryEstimated => Some(PlacementState::Complete),
            PlacementState::Complete | PlacementState::Failed => None,
        }
    }

    /// Returns true if moving to `to` is a legal transition.
    pub fn can_transition_to(&self, to: PlacementState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == PlacementState::Failed || self.next() == Some(to)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlacementState::Complete | PlacementState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementState::Pending => "Pending",
            PlacementState::ProductsValidated => "ProductsValidated",
            PlacementState::Persisted => "Persisted",
            PlacementState::PaymentCharged => "PaymentCharged",
            PlacementState::DeliveryEstimated => "DeliveryEstimated",
            PlacementState::Complete => "Complete",
            PlacementState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for PlacementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PlacementState; 7] = [
        PlacementState::Pending,
        PlacementState::ProductsValidated,
        PlacementState::Persisted,
        PlacementState::PaymentCharged,
        PlacementState::DeliveryEstimated,
        PlacementState::Complete,
        PlacementState::Failed,
    ];

    #[test]
    fn test_default_state_is_pending() {
        assert_eq!(PlacementState::default(), PlacementState::Pending);
    }

    #[test]
    fn test_happy_path_sequence() {
        let mut state = PlacementState::Pending;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            assert!(state.can_transition_to(next));
            state = next;
            visited.push(state);
        }

        assert_eq!(&visited[..], &ALL[..6]);
        assert_eq!(state, PlacementState::Complete);
    }

    #[test]
    fn test_failed_reachable_from_every_non_terminal_state() {
        for state in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(state.can_transition_to(PlacementState::Failed), "{state}");
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!PlacementState::Persisted.can_transition_to(PlacementState::ProductsValidated));
        assert!(!PlacementState::PaymentCharged.can_transition_to(PlacementState::Pending));
        assert!(!PlacementState::Pending.can_transition_to(PlacementState::Persisted));
    }

    #[test]
    fn test_terminal_states() {
        assert!(PlacementState::Complete.is_terminal());
        assert!(PlacementState::Failed.is_terminal());
        assert!(!PlacementState::Complete.can_transition_to(PlacementState::Failed));
        assert!(!PlacementState::Failed.can_transition_to(PlacementState::Pending));
        assert_eq!(PlacementState::Complete.next(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PlacementState::Pending.to_string(), "Pending");
        assert_eq!(PlacementState::PaymentCharged.to_string(), "PaymentCharged");
        assert_eq!(PlacementState::Failed.to_string(), "Failed");
    }
}
