//! Per-session conversation state
//!
//! A `Conversation` owns its transcript and state-machine cursor. It is the
//! boundary the presenter talks to: menu views, `on_select`, `on_back` and
//! the transcript view all live here.

use crate::catalog::DATA_UNAVAILABLE;
use crate::menu::MenuEntry;
use crate::state_machine::{
    transition, ConvContext, ConvState, Effect, Event, MenuCursor, TransitionError, Turn,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// First assistant turn of every session
pub const GREETING: &str = "Hello! Pick a subject below and I'll show you the questions I can answer.";

/// What applying an event asked the caller to do next
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Number of turns appended to the transcript
    pub appended: usize,
    /// Free-text question that must be sent to the completion service
    pub completion: Option<String>,
}

#[derive(Debug)]
pub struct Conversation {
    id: String,
    context: ConvContext,
    state: ConvState,
    transcript: Vec<Turn>,
    created_at: DateTime<Utc>,
}

/// Serializable view of a conversation for the presenter
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub state: ConvState,
    pub cursor: MenuCursor,
    /// Entries of the menu the cursor points at
    pub menu: Vec<MenuEntry>,
    pub transcript: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, context: ConvContext) -> Self {
        let state = context.initial_state();
        let first_turn = if state.is_terminal() {
            Turn::assistant(DATA_UNAVAILABLE)
        } else {
            Turn::assistant(GREETING)
        };

        Self {
            id: id.into(),
            context,
            state,
            transcript: vec![first_turn],
            created_at: Utc::now(),
        }
    }

    pub fn state(&self) -> &ConvState {
        &self.state
    }

    pub fn cursor(&self) -> MenuCursor {
        self.state.cursor()
    }

    /// Subjects, in menu order. Empty when the data is unavailable.
    pub fn main_menu_view(&self) -> Vec<MenuEntry> {
        self.context
            .catalog
            .as_ref()
            .map(|c| c.menu().main_menu().to_vec())
            .unwrap_or_default()
    }

    /// Questions of `subject`, in menu order
    pub fn sub_menu_view(&self, subject: &str) -> Vec<MenuEntry> {
        self.context
            .catalog
            .as_ref()
            .map(|c| c.menu().sub_menu(subject).to_vec())
            .unwrap_or_default()
    }

    /// Entries of whichever menu is currently displayed
    pub fn current_menu_view(&self) -> Vec<MenuEntry> {
        match self.cursor() {
            MenuCursor::Main => self.main_menu_view(),
            MenuCursor::Subject { subject } => self.sub_menu_view(&subject),
        }
    }

    pub fn transcript_view(&self) -> &[Turn] {
        &self.transcript
    }

    /// The fixed diagnostic shown in place of a menu, if any
    pub fn diagnostic(&self) -> Option<&'static str> {
        self.state.is_terminal().then_some(DATA_UNAVAILABLE)
    }

    pub fn on_select(&mut self, label: &str) -> Result<Outcome, TransitionError> {
        self.apply(Event::select(label))
    }

    pub fn on_back(&mut self) -> Result<Outcome, TransitionError> {
        self.apply(Event::Back)
    }

    pub fn on_ask(&mut self, text: &str) -> Result<Outcome, TransitionError> {
        self.apply(Event::ask(text))
    }

    /// Run one event through the state machine and apply its effects
    pub fn apply(&mut self, event: Event) -> Result<Outcome, TransitionError> {
        let kind = event.kind();
        let result = transition(&self.state, &self.context, event)?;

        if result.is_noop(&self.state) {
            tracing::debug!(session = %self.id, event = kind, "Ignored input not offered by the current menu");
            return Ok(Outcome::default());
        }

        let mut outcome = Outcome::default();
        for effect in result.effects {
            match effect {
                Effect::AppendTurn(turn) => {
                    self.transcript.push(turn);
                    outcome.appended += 1;
                }
                Effect::RequestCompletion { question } => outcome.completion = Some(question),
            }
        }

        tracing::debug!(
            session = %self.id,
            event = kind,
            from = ?self.state,
            to = ?result.new_state,
            "Conversation transition"
        );
        self.state = result.new_state;
        Ok(outcome)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            state: self.state.clone(),
            cursor: self.cursor(),
            menu: self.current_menu_view(),
            transcript: self.transcript.clone(),
            diagnostic: self.diagnostic().map(str::to_string),
            created_at: self.created_at,
        }
    }
}
