//! Text-completion provider abstraction
//!
//! The model itself runs elsewhere; this module only speaks to it over HTTP.

mod completions;
mod error;
mod types;

pub use completions::CompletionsService;
pub use error::{LlmError, LlmErrorKind};
pub use types::*;

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default model served behind the completion endpoint
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-0.5B-Instruct";

/// Configuration for the completion service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible server; `None` disables free-text questions
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub sampling: Sampling,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            sampling: Sampling::default(),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |name: &str| lookup(name).map(|v| v.trim().to_string());

        Self {
            base_url: parse("FAQ_LLM_BASE_URL").filter(|v| !v.is_empty()),
            api_key: lookup("FAQ_LLM_API_KEY").filter(|v| !v.is_empty()),
            model: lookup("FAQ_LLM_MODEL").unwrap_or(defaults.model),
            timeout: parse_var(parse("FAQ_LLM_TIMEOUT_SECS"))
                .map_or(defaults.timeout, Duration::from_secs),
            sampling: Sampling {
                max_tokens: parse_var(parse("FAQ_LLM_MAX_TOKENS"))
                    .unwrap_or(defaults.sampling.max_tokens),
                temperature: parse_var(parse("FAQ_LLM_TEMPERATURE"))
                    .unwrap_or(defaults.sampling.temperature),
                top_p: parse_var(parse("FAQ_LLM_TOP_P")).unwrap_or(defaults.sampling.top_p),
            },
        }
    }

    /// Build the configured service wrapped with logging, if any
    pub fn build_service(&self) -> Option<Arc<dyn LlmService>> {
        let base_url = self.base_url.as_deref()?;
        match CompletionsService::new(base_url, self.api_key.clone(), &self.model) {
            Ok(service) => Some(Arc::new(LoggingService::new(Arc::new(service)))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create completion client");
                None
            }
        }
    }
}

fn parse_var<T: FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.parse().ok())
}

/// Common interface for completion providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = request.prompt.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
