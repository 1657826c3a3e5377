use std::sync::Arc;

use anyhow::Result;
use comm::{Embedder, Question, VectorIndex};
use models::SearchResult;

pub mod comm;
pub mod models;

#[derive(Debug, Clone)]
pub struct PromptWithContext {
    pub prompt: String,
    pub search_result: SearchResult,
}

/// Retrieval step of the RAG relay: embed, search, assemble the prompt.
#[derive(Clone)]
pub struct Rag {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl Rag {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub async fn search_k(&self, question: &str, collection: &str, k: u64) -> Result<SearchResult> {
        let embedding = self.embedder.embed(question).await?;
        self.index.search(collection, embedding, k).await
    }

    pub async fn prompt_with_context(&self, question: &str, collection: &str, k: u64) -> Result<PromptWithContext> {
        let search_result = self.search_k(question, collection, k).await?;
        let prompt = Question::from(question)
            .set_context(search_result.passages())
            .render();

        tracing::debug!(
            collection,
            passages = search_result.points.len(),
            prompt_chars = prompt.len(),
            "assembled RAG prompt"
        );
        Ok(PromptWithContext { prompt, search_result })
    }
}
