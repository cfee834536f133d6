//! Common types for completion requests

use serde::{Deserialize, Serialize};

/// Sampling parameters for a completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.4,
            top_p: 0.9,
        }
    }
}

/// Raw-prompt completion request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub sampling: Sampling,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>, sampling: Sampling) -> Self {
        Self {
            prompt: prompt.into(),
            sampling,
        }
    }
}

/// Completion response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
}

impl LlmResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: Usage::default(),
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
