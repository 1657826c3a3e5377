use std::convert::Infallible;

use axum::response::sse::Event;
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::rag::comm::TokenStream;
use crate::rag::models::SearchResult;
use crate::sse::{Framing, StreamEvent, DONE};

fn frame(framing: Framing, event: &StreamEvent) -> Result<Event, Infallible> {
    Ok(Event::default().data(framing.encode(event)))
}

fn done() -> Result<Event, Infallible> {
    Ok(Event::default().data(DONE))
}

/// Re-frames upstream deltas as SSE events, one event per non-empty delta.
///
/// The search result, when present, goes out before the first token is
/// awaited. A successful stream ends with `[DONE]`; an upstream failure ends
/// it with a single error event instead. Dropping the returned stream (the
/// caller went away) drops `tokens` and with it the upstream connection.
pub fn relay_events(
    request_id: Uuid,
    framing: Framing,
    search_result: Option<SearchResult>,
    mut tokens: TokenStream,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        if let Some(data) = search_result {
            yield frame(framing, &StreamEvent::SearchResult { data });
        }

        let mut fragments = 0usize;
        let mut failure = None;
        while let Some(token) = tokens.next().await {
            match token {
                Ok(content) if content.is_empty() => continue,
                Ok(content) => {
                    fragments += 1;
                    yield frame(framing, &StreamEvent::Content { content });
                }
                Err(e) => {
                    failure = Some(format!("{:#}", e));
                    break;
                }
            }
        }

        match failure {
            Some(message) => {
                tracing::error!(%request_id, fragments, error = %message, "upstream failed mid-stream");
                yield frame(framing, &StreamEvent::Error { message });
            }
            None => {
                tracing::info!(%request_id, fragments, "stream complete");
                yield done();
            }
        }
    }
}
