// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::sse_stream;
use crate::api::{AppState, Auth};
use crate::error::Result;
use crate::models::NewMessage;

#[derive(Debug, Deserialize)]
pub struct OpenConversationRequest {
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TextMessageRequest {
    pub text: String,
}

pub async fn conversations(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> Result<impl IntoResponse> {
    let conversations = state.stores.messaging.conversations(&viewer.id).await?;
    Ok(Json(conversations))
}

pub async fn conversations_live(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> impl IntoResponse {
    sse_stream(
        state
            .stores
            .messaging
            .watch_conversations(&viewer.id)
            .into_stream(),
    )
}

pub async fn open_conversation(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Json(req): Json<OpenConversationRequest>,
) -> Result<impl IntoResponse> {
    let conversation = state
        .stores
        .messaging
        .get_or_create_conversation(&viewer, &req.account_id)
        .await?;
    Ok(Json(conversation))
}

/// Reading a thread resets the caller's unread counter.
pub async fn messages(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let messages = state.stores.messaging.messages(&id, &viewer.id).await?;
    Ok(Json(messages))
}

pub async fn messages_live(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let live = state
        .stores
        .messaging
        .watch_messages(&id, &viewer.id)
        .await?;
    Ok(sse_stream(live.into_stream()))
}

pub async fn send_text(
    State(state): State<AppState>,
    Auth(sender): Auth,
    Path(id): Path<String>,
    Json(req): Json<TextMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state
        .stores
        .messaging
        .send(&id, &sender, NewMessage::Text(req.text))
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Raw image bytes in the request body.
pub async fn send_image(
    State(state): State<AppState>,
    Auth(sender): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let message = state
        .stores
        .messaging
        .send(&id, &sender, NewMessage::Image(body.to_vec()))
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn unread_total(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> Result<impl IntoResponse> {
    let total = state.stores.messaging.unread_total(&viewer.id).await?;
    Ok(Json(json!({ "unread": total })))
}
