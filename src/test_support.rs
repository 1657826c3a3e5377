//! In-process fakes for the provider seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::stream;
use serde_json::{json, Map};

use crate::rag::comm::{ChatModel, Embedder, EmbeddingVector, IndexHealth, TokenStream, VectorIndex};
use crate::rag::models::{ChatMessage, GenerationParams, MatchPayload, ScoredMatch, SearchResult};

#[derive(Debug, Default)]
pub struct FakeEmbedder {
    calls: AtomicUsize,
    failure: Option<String>,
}

impl FakeEmbedder {
    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(EmbeddingVector(vec![0.1, 0.2, 0.3])),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeIndex {
    passages: Vec<String>,
    collections: Vec<String>,
    unreachable: bool,
    searched: Mutex<Vec<String>>,
}

impl FakeIndex {
    pub fn with_passages(passages: &[&str]) -> Self {
        Self {
            passages: passages.iter().map(|p| p.to_string()).collect(),
            collections: vec!["docs".to_string(), "faq".to_string()],
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn searched_collections(&self) -> Vec<String> {
        self.searched.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn search(&self, collection: &str, _embedding: EmbeddingVector, top_k: u64) -> Result<SearchResult> {
        if self.unreachable {
            return Err(anyhow!("transport error: connection refused"));
        }
        if let Ok(mut searched) = self.searched.lock() {
            searched.push(collection.to_string());
        }

        let points = self
            .passages
            .iter()
            .take(top_k as usize)
            .enumerate()
            .map(|(idx, passage)| ScoredMatch {
                id: json!(idx + 1),
                score: 1.0 - idx as f32 * 0.1,
                payload: MatchPayload {
                    page_content: passage.clone(),
                    extra: Map::new(),
                },
            })
            .collect();
        Ok(SearchResult { points })
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        if self.unreachable {
            return Err(anyhow!("transport error: connection refused"));
        }
        Ok(self.collections.clone())
    }

    async fn health(&self) -> Result<IndexHealth> {
        if self.unreachable {
            return Err(anyhow!("transport error: connection refused"));
        }
        Ok(IndexHealth {
            title: "qdrant - vector search engine".to_string(),
            version: "1.15.0".to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct FakeChat {
    tokens: Vec<String>,
    open_failure: Option<String>,
    mid_stream_failure: Option<String>,
    calls: AtomicUsize,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeChat {
    pub fn replying(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing_to_open(message: &str) -> Self {
        Self {
            open_failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Streams `tokens`, then fails instead of finishing.
    pub fn failing_mid_stream(tokens: &[&str], message: &str) -> Self {
        Self {
            mid_stream_failure: Some(message.to_string()),
            ..Self::replying(tokens)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, messages: &[ChatMessage]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(messages.to_vec());
        }
        match &self.open_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, messages: &[ChatMessage], _params: &GenerationParams) -> Result<ChatMessage> {
        self.record(messages)?;
        Ok(ChatMessage::assistant(self.tokens.concat()))
    }

    async fn stream(&self, messages: &[ChatMessage], _params: &GenerationParams) -> Result<TokenStream> {
        self.record(messages)?;
        let mut items: Vec<Result<String>> = self.tokens.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.mid_stream_failure {
            items.push(Err(anyhow!(message.clone())));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}
