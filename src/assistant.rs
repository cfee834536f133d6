//! Free-text answering over the whole data file
//!
//! The records are flattened into the prompt, followed by the conversation
//! so far. The model's continuation is cut at the last `Assistant:` marker.

use crate::llm::{LlmError, LlmRequest, LlmService, Sampling};
use crate::state_machine::Turn;
use std::time::Duration;
use tokio::time::timeout;

const PROMPT_HEADER: &str =
    "You are a helpful assistant. Only answer using the following CSV data:\n\n";

/// Marker after which the model's reply starts
pub const REPLY_DELIMITER: &str = "Assistant:";

/// Build the completion prompt for `question`
pub fn build_prompt(csv_text: &str, history: &[Turn], question: &str) -> String {
    let mut prompt = format!("{PROMPT_HEADER}{csv_text}\n\nConversation:\n");
    for turn in history {
        prompt.push_str(turn.role.speaker());
        prompt.push_str(": ");
        prompt.push_str(&turn.text);
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(question);
    prompt.push('\n');
    prompt.push_str(REPLY_DELIMITER);
    prompt
}

/// Text after the last reply delimiter, trimmed
pub fn extract_reply(completion: &str) -> &str {
    completion
        .rsplit_once(REPLY_DELIMITER)
        .map_or(completion, |(_, reply)| reply)
        .trim()
}

/// Ask the model and return the extracted reply
pub async fn answer(
    llm: &dyn LlmService,
    prompt: String,
    sampling: Sampling,
    deadline: Duration,
) -> Result<String, LlmError> {
    let request = LlmRequest::new(prompt, sampling);
    let response = timeout(deadline, llm.complete(&request))
        .await
        .map_err(|_| LlmError::timeout(deadline))??;

    let reply = extract_reply(&response.text);
    if reply.is_empty() {
        return Err(LlmError::unknown("Model returned an empty reply"));
    }
    Ok(reply.to_string())
}
