// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::api::AppState;
use crate::error::{Error, Result};
use crate::images::{ResolvedImage, LOCAL_PREFIX};

/// Serve a stored local image; anything unresolvable is a 404. Remote
/// references never land here, clients load those URLs directly.
pub async fn serve(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<impl IntoResponse> {
    match state.images.resolve(&format!("{LOCAL_PREFIX}{reference}")) {
        ResolvedImage::Local(path) => {
            let bytes = tokio::fs::read(&path).await.map_err(Error::backend)?;
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "image/jpeg")],
                bytes,
            ))
        }
        _ => Err(Error::NotFound("image", reference)),
    }
}
