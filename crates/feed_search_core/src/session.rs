use thiserror::Error;

/// Lifecycle of one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    FeedsLoaded,
    Dispatching,
    Draining,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid session transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub to: SessionState,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, FeedsLoaded)
                | (FeedsLoaded, Dispatching)
                | (Dispatching, Draining)
                | (Draining, Done)
                | (Idle, Failed)
                | (FeedsLoaded, Failed)
        )
    }

    pub fn advance(self, next: SessionState) -> Result<SessionState, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }
}
