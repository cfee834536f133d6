//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Menu events
    Select { label: String },
    Back,

    // Free-text events
    Ask { text: String },
    CompletionReady { text: String },
    CompletionFailed { message: String },
}

impl Event {
    pub fn select(label: impl Into<String>) -> Self {
        Event::Select {
            label: label.into(),
        }
    }

    pub fn ask(text: impl Into<String>) -> Self {
        Event::Ask { text: text.into() }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Select { .. } => "select",
            Event::Back => "back",
            Event::Ask { .. } => "ask",
            Event::CompletionReady { .. } => "completion_ready",
            Event::CompletionFailed { .. } => "completion_failed",
        }
    }
}
