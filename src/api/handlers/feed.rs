// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::sse_stream;
use crate::api::{AppState, Auth};
use crate::error::Result;
use crate::models::{NewComment, NewPost};

#[derive(Debug, Deserialize)]
pub struct CreatePostParams {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub announcement: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

pub async fn feed(State(state): State<AppState>, Auth(_viewer): Auth) -> Result<impl IntoResponse> {
    let posts = state.stores.feed.feed().await?;
    Ok(Json(posts))
}

pub async fn feed_live(State(state): State<AppState>, Auth(_viewer): Auth) -> impl IntoResponse {
    sse_stream(state.stores.feed.watch_feed().into_stream())
}

/// Text and flags come in as query parameters; an optional image rides in
/// the raw request body.
pub async fn create_post(
    State(state): State<AppState>,
    Auth(author): Auth,
    Query(params): Query<CreatePostParams>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let image = if body.is_empty() {
        None
    } else {
        Some(body.to_vec())
    };
    let post = state
        .stores
        .feed
        .create_post(
            &author,
            NewPost {
                text: params.text,
                image,
                is_announcement: params.announcement,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn post(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let post = state.stores.feed.post(&id).await?;
    Ok(Json(post))
}

pub async fn post_live(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    sse_stream(state.stores.feed.watch_post(&id).into_stream())
}

pub async fn delete_post(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.stores.feed.delete_post(&viewer, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let liked = state.stores.feed.toggle_like(&viewer.id, &id).await?;
    Ok(Json(json!({ "liked": liked })))
}

pub async fn comments(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let comments = state.stores.feed.comments(&id).await?;
    Ok(Json(comments))
}

pub async fn comments_live(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    sse_stream(state.stores.feed.watch_comments(&id).into_stream())
}

pub async fn add_comment(
    State(state): State<AppState>,
    Auth(author): Auth,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse> {
    let comment = state
        .stores
        .feed
        .add_comment(
            &author,
            NewComment {
                post_id: id,
                text: req.text,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
