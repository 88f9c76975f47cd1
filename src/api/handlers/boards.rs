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
use crate::board::Formation;
use crate::error::Result;
use crate::models::BoardSummary;

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub value: bool,
}

pub async fn my_boards(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> Result<impl IntoResponse> {
    let boards = state.stores.tactics.my_boards(&viewer.id).await?;
    Ok(Json(boards))
}

pub async fn my_boards_live(State(state): State<AppState>, Auth(viewer): Auth) -> impl IntoResponse {
    sse_stream(state.stores.tactics.watch_my_boards(&viewer.id).into_stream())
}

pub async fn shared_boards(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
) -> Result<impl IntoResponse> {
    let boards = state.stores.tactics.shared_boards().await?;
    Ok(Json(boards))
}

pub async fn shared_boards_live(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
) -> impl IntoResponse {
    sse_stream(state.stores.tactics.watch_shared_boards().into_stream())
}

pub async fn save_board(
    State(state): State<AppState>,
    Auth(owner): Auth,
    Json(summary): Json<BoardSummary>,
) -> Result<impl IntoResponse> {
    let created = summary.id.is_none();
    let board = state.stores.tactics.save_board(&owner, summary).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(board)))
}

pub async fn board(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let board = state.stores.tactics.board_for(&viewer, &id).await?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.stores.tactics.delete_board(&viewer, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_shared(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
    Json(req): Json<ShareRequest>,
) -> Result<impl IntoResponse> {
    state.stores.tactics.set_shared(&viewer, &id, req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Raw image bytes in the request body.
pub async fn upload_snapshot(
    State(state): State<AppState>,
    Auth(owner): Auth,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let reference = state
        .stores
        .tactics
        .upload_snapshot(&owner, &id, body.to_vec())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "image": reference }))))
}

/// Starting player layout for a named formation. Unknown names fall back
/// to the default 6-0 setup.
pub async fn template(Auth(_viewer): Auth, Path(name): Path<String>) -> impl IntoResponse {
    let formation = Formation::from_name(&name);
    Json(json!({
        "formation": formation.name(),
        "players": formation.players(),
    }))
}
