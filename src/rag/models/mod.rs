mod chat;
mod search;

pub use chat::{ChatMessage, GenerationParams, Role, GENERATION_POLICY};
pub use search::{MatchPayload, ScoredMatch, SearchResult};
