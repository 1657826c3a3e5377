use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::rag::models::{ChatMessage, SearchResult};

const DEFAULT_TOP_K: u64 = 10;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub search_index: String,
    #[serde(default = "default_top_k")]
    pub top_k: u64,
    #[serde(default)]
    pub stream: bool,
}

fn default_top_k() -> u64 {
    DEFAULT_TOP_K
}

/// Body of a non-streaming reply.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: ChatMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_result: Option<SearchResult>,
}

/// The latest message is the question. It must carry visible text.
pub fn latest_question(messages: &[ChatMessage]) -> Result<&str, RelayError> {
    let Some(latest) = messages.last() else {
        return Err(RelayError::Validation("Message content cannot be empty".to_string()));
    };
    if latest.content.trim().is_empty() {
        return Err(RelayError::Validation("Please enter a valid text".to_string()));
    }
    Ok(&latest.content)
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), RelayError> {
        latest_question(&self.messages).map(|_| ())
    }
}

impl RagChatRequest {
    /// Returns the question to retrieve context for.
    pub fn validate(&self) -> Result<&str, RelayError> {
        let question = latest_question(&self.messages)?;
        if self.search_index.trim().is_empty() {
            return Err(RelayError::Validation("searchIndex must name a collection".to_string()));
        }
        if self.top_k == 0 {
            return Err(RelayError::Validation("topK must be at least 1".to_string()));
        }
        Ok(question)
    }
}
