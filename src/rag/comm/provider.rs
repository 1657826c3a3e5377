// src/rag/comm/provider.rs
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::rag::models::{ChatMessage, GenerationParams};
use crate::sse::{SseDecoder, DONE};

use super::{
    embedding::{normalize_input, EmbeddingVector},
    ChatModel, Embedder, TokenStream,
};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(flatten)]
    params: &'a GenerationParams,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize, Debug)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    /// Failure reported in-band after the stream opened.
    error: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Debug, Default)]
struct ChunkDelta {
    content: Option<String>,
}

/// Client for an OpenAI-compatible provider: OpenAI itself, or Ollama's `/v1`.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    embedding_model: String,
}

impl ProviderClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            api_key: config.llm_api_key.clone(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
        }
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.client.post(format!("{}/{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send_completion(&self, messages: &[ChatMessage], params: &GenerationParams, stream: bool) -> Result<Response> {
        let response = self
            .post("chat/completions")
            .json(&CompletionRequest {
                model: &self.chat_model,
                messages,
                params,
                stream,
            })
            .send()
            .await
            .map_err(|e| anyhow!("Completion request failed: {}", e))?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("Provider returned {}: {}", status, body)
}

fn is_done_line(line: &str) -> bool {
    line.strip_prefix("data:").map(str::trim) == Some(DONE)
}

/// Reads one upstream SSE line. `Ok(None)` means the line carries no text.
fn parse_completion_line(line: &str) -> Result<Option<String>> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();
    if data.is_empty() {
        return Ok(None);
    }

    let chunk: CompletionChunk =
        serde_json::from_str(data).map_err(|e| anyhow!("Unreadable completion chunk: {}", e))?;
    if let Some(error) = chunk.error {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        bail!("Provider stream error: {}", message);
    }
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

#[async_trait]
impl Embedder for ProviderClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let input = normalize_input(text);
        if input.is_empty() {
            return Ok(EmbeddingVector(Vec::new()));
        }

        let response = self
            .post("embeddings")
            .json(&EmbeddingRequest {
                model: &self.embedding_model,
                input: &input,
            })
            .send()
            .await
            .map_err(|e| anyhow!("Embedding request failed: {}", e))?;
        let response = ensure_success(response)
            .await?
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| anyhow!("Embedding response deserialization failed: {}", e))?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| EmbeddingVector(data.embedding))
            .ok_or_else(|| anyhow!("Embedding response contained no vectors"))
    }
}

#[async_trait]
impl ChatModel for ProviderClient {
    async fn complete(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<ChatMessage> {
        let response = self
            .send_completion(messages, params, false)
            .await?
            .json::<CompletionResponse>()
            .await
            .map_err(|e| anyhow!("Completion response deserialization failed: {}", e))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Completion response contained no choices"))?;
        Ok(ChatMessage::assistant(choice.message.content.unwrap_or_default()))
    }

    async fn stream(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<TokenStream> {
        let response = self.send_completion(messages, params, true).await?;
        let mut bytes = response.bytes_stream();

        let tokens: TokenStream = Box::pin(async_stream::stream! {
            let mut decoder = SseDecoder::new();
            let mut ended = false;
            'read: while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(anyhow!("Completion stream failed: {}", e));
                        ended = true;
                        break 'read;
                    }
                };
                for line in decoder.feed(&chunk) {
                    if is_done_line(&line) {
                        ended = true;
                        break 'read;
                    }
                    match parse_completion_line(&line) {
                        Ok(Some(content)) => {
                            yield Ok(content);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            ended = true;
                            break 'read;
                        }
                    }
                }
            }

            // body closed without a trailing newline
            if !ended {
                if let Some(line) = decoder.finish().filter(|line| !is_done_line(line)) {
                    match parse_completion_line(&line) {
                        Ok(Some(content)) => {
                            yield Ok(content);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                        }
                    }
                }
            }
        });
        Ok(tokens)
    }
}
