//! Client side of the relay: a turn state machine fed with decoded frames.

use thiserror::Error;

use crate::rag::models::{ChatMessage, SearchResult};
use crate::sse::{Frame, StreamEvent};

pub mod client;

pub use client::{RelayClient, Target, TurnOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
    Streaming,
}

/// What is sent on each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// The whole conversation, as the plain chat page does.
    Full,
    /// Only the new question; the conversation restarts every turn, as the
    /// RAG page does.
    SingleTurn,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("nothing to send")]
    EmptyInput,
    #[error("a reply is still in progress")]
    Busy,
}

/// Result of applying one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    SearchResult,
    Content(String),
    Finished(ChatMessage),
    Failed(String),
    /// Frame arrived outside of a stream, e.g. after the sentinel.
    Ignored,
}

#[derive(Debug)]
pub struct ChatSession {
    mode: HistoryMode,
    phase: Phase,
    history: Vec<ChatMessage>,
    live: String,
    search_result: Option<SearchResult>,
}

impl ChatSession {
    pub fn new(mode: HistoryMode) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
            history: Vec::new(),
            live: String::new(),
            search_result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Text received so far for the reply in flight.
    pub fn live_text(&self) -> &str {
        &self.live
    }

    pub fn search_result(&self) -> Option<&SearchResult> {
        self.search_result.as_ref()
    }

    /// `Idle -> Sending`. Returns the messages to post.
    pub fn submit(&mut self, input: &str) -> Result<Vec<ChatMessage>, SubmitError> {
        if self.phase != Phase::Idle {
            return Err(SubmitError::Busy);
        }
        if input.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }

        let message = ChatMessage::user(input);
        if self.mode == HistoryMode::SingleTurn {
            self.history.clear();
        }
        self.history.push(message);
        self.live.clear();
        self.phase = Phase::Sending;
        Ok(self.history.clone())
    }

    /// `Sending -> Streaming`, once the response body is readable.
    pub fn begin_streaming(&mut self) -> bool {
        if self.phase != Phase::Sending {
            return false;
        }
        self.phase = Phase::Streaming;
        true
    }

    pub fn apply(&mut self, frame: Frame) -> Progress {
        if self.phase != Phase::Streaming {
            return Progress::Ignored;
        }

        match frame {
            Frame::Done => {
                let reply = ChatMessage::assistant(std::mem::take(&mut self.live));
                self.history.push(reply.clone());
                self.phase = Phase::Idle;
                Progress::Finished(reply)
            }
            Frame::Event(StreamEvent::SearchResult { data }) => {
                self.search_result = Some(data);
                Progress::SearchResult
            }
            Frame::Event(StreamEvent::Content { content }) => {
                self.live.push_str(&content);
                Progress::Content(content)
            }
            Frame::Event(StreamEvent::Error { message }) => {
                self.abort(&message);
                Progress::Failed(message)
            }
        }
    }

    /// Ends the turn without a reply. Text received so far is dropped; the
    /// user's message stays in the history.
    pub fn abort(&mut self, reason: &str) {
        if self.phase == Phase::Idle {
            return;
        }
        tracing::warn!(reason, discarded_chars = self.live.len(), "turn ended without a reply");
        self.live.clear();
        self.phase = Phase::Idle;
    }
}
