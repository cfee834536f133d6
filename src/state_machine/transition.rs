//! Pure state transition function

use super::{AnswerStyle, ConvContext, ConvState, Effect, Event};
use thiserror::Error;

/// Lead-in for answers in the explained style
pub const ANSWER_PREFIX: &str = "Here is what I found for that question:\n\n";

/// Closing turn after an explained answer
pub const ANSWER_ACK: &str = "Hope that helps! Pick another subject if you have more questions.";

/// Reply recorded when the completion service could not answer
pub const COMPLETION_FAILED: &str =
    "Sorry, I couldn't come up with an answer right now. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// Keep the current state and do nothing
    pub fn unchanged(state: &ConvState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn is_noop(&self, previous: &ConvState) -> bool {
        self.effects.is_empty() && &self.new_state == previous
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("The FAQ data is unavailable")]
    DataUnavailable,
    #[error("Still waiting for the previous answer")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs
/// no I/O. Unrecognized menu labels leave the state untouched.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let Some(catalog) = context.catalog.as_deref() else {
        return Err(TransitionError::DataUnavailable);
    };

    match (state, event) {
        (ConvState::Unavailable, _) => Err(TransitionError::DataUnavailable),

        // ============================================================
        // Menu walk
        // ============================================================

        // Main + known subject -> Subject
        (ConvState::Main, Event::Select { label }) if catalog.menu().has_subject(&label) => {
            Ok(TransitionResult::new(ConvState::Subject { subject: label }))
        }

        // Subject + listed question -> answer, back to Main
        (ConvState::Subject { subject }, Event::Select { label })
            if catalog.menu().has_question(subject, &label) =>
        {
            let answer = catalog.knowledge().lookup_answer(&label).to_string();
            Ok(TransitionResult::new(ConvState::Main)
                .with_effect(Effect::user_turn(label))
                .with_effects(answer_effects(&answer, context.answer_style)))
        }

        // Anything the menus did not offer
        (ConvState::Main | ConvState::Subject { .. }, Event::Select { .. })
        | (ConvState::Main, Event::Back) => Ok(TransitionResult::unchanged(state)),

        (ConvState::Subject { .. }, Event::Back) => Ok(TransitionResult::new(ConvState::Main)),

        // ============================================================
        // Free-text questions
        // ============================================================
        (ConvState::Main | ConvState::Subject { .. }, Event::Ask { text }) => {
            let question = text.trim();
            if question.is_empty() {
                return Ok(TransitionResult::unchanged(state));
            }
            Ok(TransitionResult::new(ConvState::AwaitingCompletion {
                question: question.to_string(),
            })
            .with_effect(Effect::RequestCompletion {
                question: question.to_string(),
            }))
        }

        (ConvState::AwaitingCompletion { question }, Event::CompletionReady { text }) => {
            Ok(TransitionResult::new(ConvState::Main)
                .with_effect(Effect::user_turn(question.clone()))
                .with_effect(Effect::assistant_turn(text)))
        }

        (ConvState::AwaitingCompletion { question }, Event::CompletionFailed { .. }) => {
            Ok(TransitionResult::new(ConvState::Main)
                .with_effect(Effect::user_turn(question.clone()))
                .with_effect(Effect::assistant_turn(COMPLETION_FAILED)))
        }

        (
            ConvState::AwaitingCompletion { .. },
            Event::Select { .. } | Event::Back | Event::Ask { .. },
        ) => Err(TransitionError::Busy),

        (
            ConvState::Main | ConvState::Subject { .. },
            event @ (Event::CompletionReady { .. } | Event::CompletionFailed { .. }),
        ) => Err(TransitionError::InvalidTransition(format!(
            "{} without a pending question",
            event.kind()
        ))),
    }
}

fn answer_effects(answer: &str, style: AnswerStyle) -> Vec<Effect> {
    match style {
        AnswerStyle::Plain => vec![Effect::assistant_turn(answer)],
        AnswerStyle::Explained => vec![
            Effect::assistant_turn(format!("{ANSWER_PREFIX}{answer}")),
            Effect::assistant_turn(ANSWER_ACK),
        ],
    }
}
