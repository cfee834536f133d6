//! Conversation state types

use crate::catalog::Catalog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used when replaying history into a prompt
    pub fn speaker(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Which menu the presenter should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuCursor {
    Main,
    Subject { subject: String },
}

/// Conversation state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Showing the list of subjects
    #[default]
    Main,

    /// Showing the questions of one subject
    Subject { subject: String },

    /// A free-text question is out with the completion service
    AwaitingCompletion { question: String },

    /// The data file failed to load; nothing can be answered
    Unavailable,
}

impl ConvState {
    /// Menu cursor for this state. Pending completions present as the main menu.
    pub fn cursor(&self) -> MenuCursor {
        match self {
            ConvState::Subject { subject } => MenuCursor::Subject {
                subject: subject.clone(),
            },
            ConvState::Main | ConvState::AwaitingCompletion { .. } | ConvState::Unavailable => {
                MenuCursor::Main
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ConvState::AwaitingCompletion { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConvState::Unavailable)
    }
}

/// How a menu answer is worded in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStyle {
    /// The stored answer, verbatim
    #[default]
    Plain,
    /// Answer with an explanatory lead-in, followed by an acknowledgement turn
    Explained,
}

impl AnswerStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(AnswerStyle::Plain),
            "explained" => Some(AnswerStyle::Explained),
            _ => None,
        }
    }
}

/// Read-only inputs to every transition
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub catalog: Option<Arc<Catalog>>,
    pub answer_style: AnswerStyle,
}

impl ConvContext {
    pub fn new(catalog: Option<Arc<Catalog>>, answer_style: AnswerStyle) -> Self {
        Self {
            catalog,
            answer_style,
        }
    }

    /// State a fresh session starts in
    pub fn initial_state(&self) -> ConvState {
        if self.catalog.is_some() {
            ConvState::Main
        } else {
            ConvState::Unavailable
        }
    }
}
