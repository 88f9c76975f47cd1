// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::api::{AppState, Auth};
use crate::error::Result;
use crate::models::ProfileUpdate;

pub async fn me(Auth(account): Auth) -> impl IntoResponse {
    Json(account)
}

pub async fn account(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let account = state.stores.directory.account(&id).await?;
    Ok(Json(account))
}

pub async fn account_live(
    State(state): State<AppState>,
    Auth(_viewer): Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    super::sse_stream(state.stores.directory.watch_account(&id).into_stream())
}

pub async fn update_me(
    State(state): State<AppState>,
    Auth(account): Auth,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    state.stores.directory.update_profile(&account.id, update).await?;
    let refreshed = state.stores.directory.account(&account.id).await?;
    Ok(Json(refreshed))
}

/// Raw image bytes in the request body; responds with the stored reference.
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Auth(account): Auth,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let reference = state
        .stores
        .directory
        .upload_profile_image(&account.id, body.to_vec())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "image": reference }))))
}
