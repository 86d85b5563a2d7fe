/// Lifecycle of one thumbnail.
///
/// `Pending → Loaded | Failed`; both end states are final for the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed,
}

impl LoadState {
    pub fn is_settled(self) -> bool {
        self != LoadState::Pending
    }

    pub fn can_transition_to(self, next: LoadState) -> bool {
        self == LoadState::Pending && next.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::LoadState;

    #[test]
    fn transitions_are_monotonic() {
        assert!(LoadState::Pending.can_transition_to(LoadState::Loaded));
        assert!(LoadState::Pending.can_transition_to(LoadState::Failed));
        assert!(!LoadState::Pending.can_transition_to(LoadState::Pending));
        assert!(!LoadState::Loaded.can_transition_to(LoadState::Failed));
        assert!(!LoadState::Failed.can_transition_to(LoadState::Loaded));
    }
}
