use crate::constants::messages;
use crate::motion::{Motion, MotionParseError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing acquired yet.
    Starting,
    AwaitingInput,
    Validating,
    Confirmed,
    Cancelled,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Confirmed | SessionState::Cancelled | SessionState::Aborted
        )
    }
}

/// Why a session stopped before asking for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NoActiveEditor,
    SelectionNotEmpty,
}

impl AbortReason {
    pub fn message(&self) -> &'static str {
        match self {
            AbortReason::NoActiveEditor => messages::NO_ACTIVE_EDITOR,
            AbortReason::SelectionNotEmpty => messages::SELECTION_NOT_EMPTY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Confirmed(Motion),
    Cancelled,
    Aborted(AbortReason),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Text that passed live validation failed to parse on submit.
    #[error("Internal error, input validation is not working properly: {source}")]
    Invariant {
        input: String,
        #[source]
        source: MotionParseError,
    },
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}
