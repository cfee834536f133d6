//! Effects produced by state transitions

use crate::state_machine::state::Turn;

/// Effects to be applied after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a turn to the transcript
    AppendTurn(Turn),

    /// Send a free-text question to the completion service
    RequestCompletion { question: String },
}

impl Effect {
    pub fn user_turn(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::user(text))
    }

    pub fn assistant_turn(text: impl Into<String>) -> Self {
        Effect::AppendTurn(Turn::assistant(text))
    }

    pub fn as_turn(&self) -> Option<&Turn> {
        match self {
            Effect::AppendTurn(turn) => Some(turn),
            Effect::RequestCompletion { .. } => None,
        }
    }
}
