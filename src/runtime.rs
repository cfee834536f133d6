//! Session management
//!
//! Owns every live conversation. Sessions are in-memory only and vanish on
//! restart or when ended.

#[cfg(test)]
pub mod testing;

use crate::assistant;
use crate::catalog::CatalogStatus;
use crate::llm::{LlmService, Sampling};
use crate::session::{Conversation, SessionSnapshot};
use crate::state_machine::{AnswerStyle, ConvContext, Event, TransitionError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Free-text questions are not enabled on this server")]
    AssistantDisabled,
    #[error("Completion task failed: {0}")]
    Completion(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Free-text answering collaborator and its call settings
#[derive(Clone)]
pub struct AssistantSettings {
    pub llm: Arc<dyn LlmService>,
    pub sampling: Sampling,
    pub deadline: Duration,
}

/// Manager for all conversations
pub struct SessionManager {
    catalog: CatalogStatus,
    context: ConvContext,
    assistant: Option<AssistantSettings>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Conversation>>>>,
}

impl SessionManager {
    pub fn new(
        catalog: CatalogStatus,
        answer_style: AnswerStyle,
        assistant: Option<AssistantSettings>,
    ) -> Self {
        let context = ConvContext::new(catalog.catalog().cloned(), answer_style);
        Self {
            catalog,
            context,
            assistant,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &CatalogStatus {
        &self.catalog
    }

    pub fn assistant_enabled(&self) -> bool {
        self.assistant.is_some()
    }

    /// Start a new conversation
    pub async fn create_session(&self) -> SessionSnapshot {
        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation::new(&id, self.context.clone());
        let snapshot = conversation.snapshot();

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(conversation)));
        tracing::info!(session = %id, state = ?snapshot.state, "Session created");
        snapshot
    }

    async fn get(&self, id: &str) -> SessionResult<Arc<Mutex<Conversation>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    pub async fn snapshot(&self, id: &str) -> SessionResult<SessionSnapshot> {
        let session = self.get(id).await?;
        let conversation = session.lock().await;
        Ok(conversation.snapshot())
    }

    pub async fn select(&self, id: &str, label: &str) -> SessionResult<SessionSnapshot> {
        let session = self.get(id).await?;
        let mut conversation = session.lock().await;
        conversation.on_select(label)?;
        Ok(conversation.snapshot())
    }

    pub async fn back(&self, id: &str) -> SessionResult<SessionSnapshot> {
        let session = self.get(id).await?;
        let mut conversation = session.lock().await;
        conversation.on_back()?;
        Ok(conversation.snapshot())
    }

    /// Answer a free-text question with the completion service.
    ///
    /// The session lock is released while the model runs; the session stays
    /// busy and refuses other input until the answer lands. The model call
    /// and the follow-up event run on their own task, so a caller that goes
    /// away mid-request still leaves the session back on the main menu.
    pub async fn ask(&self, id: &str, text: &str) -> SessionResult<SessionSnapshot> {
        let session = self.get(id).await?;
        let Some(assistant) = self.assistant.clone() else {
            return Err(SessionError::AssistantDisabled);
        };

        let prompt = {
            let mut conversation = session.lock().await;
            let outcome = conversation.on_ask(text)?;
            let Some(question) = outcome.completion else {
                return Ok(conversation.snapshot());
            };
            let csv_text = self
                .context
                .catalog
                .as_ref()
                .map(|c| c.prompt_text())
                .unwrap_or_default();
            assistant::build_prompt(csv_text, conversation.transcript_view(), &question)
        };

        let id = id.to_string();
        let task = tokio::spawn(async move {
            let event = match assistant::answer(
                assistant.llm.as_ref(),
                prompt,
                assistant.sampling,
                assistant.deadline,
            )
            .await
            {
                Ok(text) => Event::CompletionReady { text },
                Err(e) => {
                    tracing::warn!(session = %id, error = %e, "Free-text answer failed");
                    Event::CompletionFailed { message: e.message }
                }
            };

            let mut conversation = session.lock().await;
            conversation.apply(event)?;
            Ok::<_, TransitionError>(conversation.snapshot())
        });

        task.await
            .map_err(|e| SessionError::Completion(e.to_string()))?
            .map_err(SessionError::from)
    }

    /// Discard a conversation
    pub async fn end_session(&self, id: &str) -> SessionResult<()> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        let remaining = self.session_count().await;
        tracing::info!(session = %id, remaining, "Session ended");
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
