use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::rag::models::{ChatMessage, GenerationParams, SearchResult};

pub mod embedding;
pub mod provider;
pub mod qdrant;
pub mod question;

pub use embedding::EmbeddingVector;
pub use provider::ProviderClient;
pub use qdrant::{IndexHealth, QdrantIndex};
pub use question::Question;

/// Text deltas of one streaming completion, in arrival order.
pub type TokenStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, collection: &str, embedding: EmbeddingVector, top_k: u64) -> Result<SearchResult>;
    async fn list_collections(&self) -> Result<Vec<String>>;
    async fn health(&self) -> Result<IndexHealth>;
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<ChatMessage>;

    /// Opens the upstream stream. Errors returned here happen before any
    /// token exists; errors inside the stream happen mid-generation.
    async fn stream(&self, messages: &[ChatMessage], params: &GenerationParams) -> Result<TokenStream>;
}
