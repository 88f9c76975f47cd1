// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AppState;
use crate::error::Error;
use crate::models::Account;

/// The authenticated caller, resolved from a bearer token.
pub struct Auth(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(Error::NotAuthenticated)?;

        let account = state.stores.directory.authenticate(token).await?;
        Ok(Auth(account))
    }
}
