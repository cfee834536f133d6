//! API request and response types

use crate::knowledge::QaRecord;
use crate::menu::MenuEntry;
use crate::state_machine::Turn;
use serde::{Deserialize, Serialize};

/// Request to pick a menu entry by its label
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub label: String,
}

/// Request to ask a free-text question
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub text: String,
}

/// Query for a subject's question menu
#[derive(Debug, Deserialize)]
pub struct SubjectQuery {
    pub name: String,
}

/// Loaded data and server capabilities
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub records: Vec<QaRecord>,
    /// The data file as loaded, every column included
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub assistant_enabled: bool,
}

/// A list of menu entries
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub entries: Vec<MenuEntry>,
}

/// Transcript of a session
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub turns: Vec<Turn>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
