use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::rag::models::SearchResult;

pub const DATA_PREFIX: &str = "data: ";

/// End-of-stream sentinel. Sent as a bare `data:` payload, never as JSON.
pub const DONE: &str = "[DONE]";

/// One JSON-bearing event of a relay stream.
///
/// A RAG stream carries at most one `SearchResult`, always before the first
/// `Content`. `Error` is terminal: nothing, not even the sentinel, follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamEvent {
    SearchResult { data: SearchResult },
    Content { content: String },
    Error { message: String },
}

/// A decoded `data:` line.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Event(StreamEvent),
    Done,
}

/// How events are written on the wire.
///
/// The chat relay uses the untagged `{"content": ...}` shape, the RAG relay
/// tags every event with `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Plain,
    Tagged,
}

impl Framing {
    pub fn encode(self, event: &StreamEvent) -> String {
        match (self, event) {
            (Framing::Plain, StreamEvent::Content { content }) => json!({ "content": content }).to_string(),
            (Framing::Plain, StreamEvent::Error { message }) => json!({ "error": message }).to_string(),
            _ => serde_json::to_string(event).unwrap_or_else(|e| {
                json!({ "type": "error", "message": format!("Failed to encode event: {}", e) }).to_string()
            }),
        }
    }
}

#[derive(Deserialize)]
struct PlainFrame {
    #[serde(rename = "type")]
    tag: Option<serde_json::Value>,
    content: Option<String>,
    error: Option<String>,
}

/// Parses one line of a relay stream. Returns `None` for anything that is
/// not a well-formed `data:` line, so a single bad line never ends a stream.
pub fn parse_frame(line: &str) -> Option<Frame> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    if data.trim() == DONE {
        return Some(Frame::Done);
    }

    if let Ok(event) = serde_json::from_str::<StreamEvent>(data) {
        return Some(Frame::Event(event));
    }

    // a tagged line that failed to parse is not retried as a plain one
    match serde_json::from_str::<PlainFrame>(data).ok()? {
        PlainFrame { tag: Some(_), .. } => None,
        PlainFrame { content: Some(content), .. } => Some(Frame::Event(StreamEvent::Content { content })),
        PlainFrame { error: Some(message), .. } => Some(Frame::Event(StreamEvent::Error { message })),
        _ => None,
    }
}
