use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::rag::{
    comm::{ChatModel, Embedder, ProviderClient, QdrantIndex, VectorIndex},
    models::{GenerationParams, GENERATION_POLICY},
    Rag,
};

/// Shared by every handler. Holds clients and fixed policy only; nothing in
/// here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatModel>,
    pub rag: Rag,
    pub params: GenerationParams,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatModel>, embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            chat,
            rag: Rag::new(embedder, index),
            params: GENERATION_POLICY,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Arc::new(ProviderClient::new(config));
        tracing::info!(
            base_url = %config.llm_base_url,
            chat_model = %config.chat_model,
            embedding_model = %config.embedding_model,
            "provider configured"
        );

        let index = Arc::new(QdrantIndex::new(config)?);
        tracing::info!(endpoint = %config.qdrant_endpoint, "qdrant client configured");

        Ok(Self::new(provider.clone(), provider, index))
    }
}
