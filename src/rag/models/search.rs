use qdrant_client::qdrant::{point_id::PointIdOptions, ScoredPoint};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PAGE_CONTENT: &str = "pageContent";

/// Matches returned by one vector search, closest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub points: Vec<ScoredMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub id: Value,
    pub score: f32,
    pub payload: MatchPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    #[serde(rename = "pageContent", default)]
    pub page_content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// Passage texts in retrieval order.
    pub fn passages(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|point| point.payload.page_content.clone())
            .collect()
    }
}

impl From<Vec<ScoredPoint>> for SearchResult {
    fn from(value: Vec<ScoredPoint>) -> Self {
        Self {
            points: value.into_iter().map(ScoredMatch::from).collect(),
        }
    }
}

impl From<ScoredPoint> for ScoredMatch {
    fn from(value: ScoredPoint) -> Self {
        let id = match value.id.and_then(|id| id.point_id_options) {
            Some(PointIdOptions::Uuid(uuid)) => Value::String(uuid),
            Some(PointIdOptions::Num(num)) => Value::from(num),
            None => Value::Null,
        };

        let payload: Map<String, Value> = value
            .payload
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect();

        Self {
            id,
            score: value.score,
            payload: payload.into(),
        }
    }
}

impl From<Map<String, Value>> for MatchPayload {
    fn from(mut value: Map<String, Value>) -> Self {
        let page_content = match value.remove(PAGE_CONTENT) {
            Some(Value::String(text)) => text,
            Some(other) => {
                // not text, keep it visible to the debug view
                value.insert(PAGE_CONTENT.to_string(), other);
                String::new()
            }
            None => String::new(),
        };

        Self {
            page_content,
            extra: value,
        }
    }
}
