// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::error::Result;
use crate::models::NewAccount;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(new): Json<NewAccount>,
) -> Result<impl IntoResponse> {
    let (account, token) = state.stores.directory.register(new).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "account": account, "token": token })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (account, token) = state.stores.directory.login(&req.email, &req.password).await?;
    Ok(Json(json!({ "account": account, "token": token })))
}

/// Always answers 202, whether or not the email is known.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Result<impl IntoResponse> {
    state.stores.directory.request_password_reset(&req.email).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<ResetConfirmRequest>,
) -> Result<impl IntoResponse> {
    state
        .stores
        .directory
        .confirm_password_reset(&req.token, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
