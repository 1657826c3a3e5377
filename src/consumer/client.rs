use futures::StreamExt;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::rag::models::ChatMessage;
use crate::sse::{parse_frame, SseDecoder};

use super::{ChatSession, Progress, SubmitError};

/// Which relay a turn goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Chat,
    Rag { collection: String, top_k: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed(ChatMessage),
    /// The turn ended without a reply; the session is idle again.
    Failed(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    output: String,
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    client: HttpClient,
    base_url: String,
    target: Target,
}

impl RelayClient {
    pub fn new(base_url: &str, target: Target) -> Self {
        Self {
            client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            target,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Runs one streamed turn. `on_fragment` sees every content fragment as
    /// it arrives.
    pub async fn send(
        &self,
        session: &mut ChatSession,
        input: &str,
        mut on_fragment: impl FnMut(&str),
    ) -> Result<TurnOutcome, SubmitError> {
        let messages = session.submit(input)?;

        let (path, body) = match &self.target {
            Target::Chat => ("api/runChat", json!({ "messages": messages, "stream": true })),
            Target::Rag { collection, top_k } => (
                "api/ragChat",
                json!({
                    "messages": messages,
                    "searchIndex": collection,
                    "topK": top_k,
                    "stream": true,
                }),
            ),
        };

        let response = match self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(fail(session, format!("Relay unreachable: {}", e))),
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.output)
                .unwrap_or_else(|_| format!("Relay returned {}", status));
            return Ok(fail(session, reason));
        }

        session.begin_streaming();
        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => return Ok(fail(session, format!("Stream interrupted: {}", e))),
            };
            for line in decoder.feed(&chunk) {
                if let Some(outcome) = apply_line(session, &line, &mut on_fragment) {
                    return Ok(outcome);
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if let Some(outcome) = apply_line(session, &line, &mut on_fragment) {
                return Ok(outcome);
            }
        }

        Ok(fail(session, "Stream ended before the reply was complete".to_string()))
    }
}

fn apply_line(session: &mut ChatSession, line: &str, on_fragment: &mut impl FnMut(&str)) -> Option<TurnOutcome> {
    let frame = parse_frame(line)?;
    match session.apply(frame) {
        Progress::Content(fragment) => {
            on_fragment(&fragment);
            None
        }
        Progress::Finished(reply) => Some(TurnOutcome::Completed(reply)),
        Progress::Failed(reason) => Some(TurnOutcome::Failed(reason)),
        Progress::SearchResult | Progress::Ignored => None,
    }
}

fn fail(session: &mut ChatSession, reason: String) -> TurnOutcome {
    session.abort(&reason);
    TurnOutcome::Failed(reason)
}
