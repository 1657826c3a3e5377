use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use qdrant_client::{qdrant::SearchPointsBuilder, Qdrant};
use serde::Serialize;

use crate::config::Config;
use crate::rag::models::SearchResult;

use super::{embedding::EmbeddingVector, VectorIndex};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexHealth {
    pub title: String,
    pub version: String,
}

#[derive(Clone)]
pub struct QdrantIndex {
    client: Arc<Qdrant>,
    endpoint: String,
}

impl fmt::Debug for QdrantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QdrantIndex")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl QdrantIndex {
    /// Builds the gRPC client. The connection itself is opened lazily on the
    /// first call, so a stopped Qdrant does not keep the relay from starting.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.qdrant_endpoint);
        if let Some(api_key) = &config.qdrant_api_key {
            builder = builder.api_key(api_key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| anyhow!("Can't build Qdrant client for {}: {}", config.qdrant_endpoint, e))?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: config.qdrant_endpoint.clone(),
        })
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(&self, collection: &str, embedding: EmbeddingVector, top_k: u64) -> Result<SearchResult> {
        let request = SearchPointsBuilder::new(collection, embedding.0, top_k).with_payload(true);
        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| anyhow!("Qdrant search in '{}' failed: {}", collection, e))?;

        tracing::debug!(
            collection,
            top_k,
            hits = response.result.len(),
            "vector search finished"
        );
        Ok(response.result.into())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .list_collections()
            .await
            .map_err(|e| anyhow!("Failed to list Qdrant collections: {}", e))?;

        Ok(response
            .collections
            .into_iter()
            .map(|collection| collection.name)
            .collect())
    }

    async fn health(&self) -> Result<IndexHealth> {
        let reply = self
            .client
            .health_check()
            .await
            .map_err(|e| anyhow!("Qdrant at {} is not reachable: {}", self.endpoint, e))?;

        Ok(IndexHealth {
            title: reply.title,
            version: reply.version,
        })
    }
}
