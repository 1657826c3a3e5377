// src/config.rs
use dotenv::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
    pub qdrant_endpoint: String,
    pub qdrant_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            llm_base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            llm_api_key: optional_var("LLM_API_KEY"),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-3-large".to_string()),
            qdrant_endpoint: env::var("QDRANT_ENDPOINT").unwrap_or_else(|_| "http://localhost:6334".to_string()),
            qdrant_api_key: optional_var("QDRANT_API_KEY"),
        })
    }
}

/// Settings for the `playground-chat` terminal client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub collection: Option<String>,
    pub top_k: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();
        Ok(Self {
            base_url: env::var("PLAYGROUND_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string()),
            collection: optional_var("PLAYGROUND_COLLECTION"),
            top_k: env::var("PLAYGROUND_TOP_K")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()?,
        })
    }
}

// Unset and blank are treated the same.
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
