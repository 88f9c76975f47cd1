// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::{AppState, Auth};
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub value: bool,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Auth(viewer): Auth,
) -> Result<impl IntoResponse> {
    let accounts = state.stores.admin.list_accounts(&viewer).await?;
    Ok(Json(accounts))
}

pub async fn set_admin(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
    Json(req): Json<FlagRequest>,
) -> Result<impl IntoResponse> {
    state.stores.admin.set_admin(&viewer, &id, req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_disabled(
    State(state): State<AppState>,
    Auth(viewer): Auth,
    Path(id): Path<String>,
    Json(req): Json<FlagRequest>,
) -> Result<impl IntoResponse> {
    state.stores.admin.set_disabled(&viewer, &id, req.value).await?;
    Ok(StatusCode::NO_CONTENT)
}
