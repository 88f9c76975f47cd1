// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod boards;
pub mod feed;
pub mod health;
pub mod images;
pub mod messages;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde::Serialize;

/// Wrap a live-state stream as server-sent events; each emission is one
/// JSON-encoded event.
pub(super) fn sse_stream<S, T>(stream: S) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize,
{
    let events = stream.map(|state| Event::default().json_data(&state));
    Sse::new(events).keep_alive(KeepAlive::default())
}
