use axum::{
    extract::{rejection::JsonRejection, State},
    response::{sse::Sse, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::RelayError;
use crate::rag::{models::ChatMessage, PromptWithContext};
use crate::sse::Framing;
use crate::state::AppState;

use super::{
    requests::{ChatReply, ChatRequest, RagChatRequest},
    stream::relay_events,
};

pub async fn run_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(request) = payload?;
    request.validate()?;

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, messages = request.messages.len(), stream = request.stream, "chat relay request");

    if request.stream {
        let tokens = state.chat.stream(&request.messages, &state.params).await?;
        let events = relay_events(request_id, Framing::Plain, None, tokens);
        return Ok(Sse::new(events).into_response());
    }

    let message = state.chat.complete(&request.messages, &state.params).await?;
    Ok(Json(ChatReply {
        message,
        prompt: None,
        search_result: None,
    })
    .into_response())
}

pub async fn rag_chat(
    State(state): State<AppState>,
    payload: Result<Json<RagChatRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(request) = payload?;
    let question = request.validate()?;

    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        collection = %request.search_index,
        top_k = request.top_k,
        stream = request.stream,
        "rag relay request"
    );

    let PromptWithContext { prompt, search_result } = state
        .rag
        .prompt_with_context(question, &request.search_index, request.top_k)
        .await?;
    let messages = [ChatMessage::user(prompt.clone())];

    if request.stream {
        let tokens = state.chat.stream(&messages, &state.params).await?;
        let events = relay_events(request_id, Framing::Tagged, Some(search_result), tokens);
        return Ok(Sse::new(events).into_response());
    }

    let message = state.chat.complete(&messages, &state.params).await?;
    Ok(Json(ChatReply {
        message,
        prompt: Some(prompt),
        search_result: Some(search_result),
    })
    .into_response())
}

#[derive(Debug, Serialize)]
pub struct CollectionsBody {
    data: CollectionsData,
}

#[derive(Debug, Serialize)]
struct CollectionsData {
    collections: Vec<CollectionName>,
}

#[derive(Debug, Serialize)]
struct CollectionName {
    name: String,
}

pub async fn list_collections(State(state): State<AppState>) -> Result<Json<CollectionsBody>, RelayError> {
    let names = state.rag.index().list_collections().await?;
    let collections = names.into_iter().map(|name| CollectionName { name }).collect();
    Ok(Json(CollectionsBody {
        data: CollectionsData { collections },
    }))
}

pub async fn index_health(State(state): State<AppState>) -> Result<Json<Value>, RelayError> {
    let health = state.rag.index().health().await?;
    Ok(Json(json!({
        "status": "OK",
        "title": health.title,
        "version": health.version,
    })))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
