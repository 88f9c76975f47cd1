// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface over the stores: REST endpoints plus server-sent event
//! streams for the live subscriptions.

mod auth;
mod handlers;

pub use auth::Auth;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::images::ImageStore;
use crate::stores::Stores;

#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<Stores>,
    pub images: Arc<ImageStore>,
}

/// Build the full route table.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Identity
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/password-reset",
            post(handlers::auth::request_password_reset),
        )
        .route(
            "/api/auth/password-reset/confirm",
            post(handlers::auth::confirm_password_reset),
        )
        // Accounts and admin
        .route(
            "/api/accounts/me",
            get(handlers::accounts::me).patch(handlers::accounts::update_me),
        )
        .route(
            "/api/accounts/me/image",
            post(handlers::accounts::upload_profile_image),
        )
        .route("/api/accounts", get(handlers::admin::list_accounts))
        .route("/api/accounts/:id", get(handlers::accounts::account))
        .route(
            "/api/accounts/:id/live",
            get(handlers::accounts::account_live),
        )
        .route("/api/admin/accounts/:id/admin", put(handlers::admin::set_admin))
        .route(
            "/api/admin/accounts/:id/disabled",
            put(handlers::admin::set_disabled),
        )
        // Feed
        .route("/api/feed", get(handlers::feed::feed))
        .route("/api/feed/live", get(handlers::feed::feed_live))
        .route("/api/posts", post(handlers::feed::create_post))
        .route(
            "/api/posts/:id",
            get(handlers::feed::post).delete(handlers::feed::delete_post),
        )
        .route("/api/posts/:id/live", get(handlers::feed::post_live))
        .route("/api/posts/:id/like", post(handlers::feed::toggle_like))
        .route(
            "/api/posts/:id/comments",
            get(handlers::feed::comments).post(handlers::feed::add_comment),
        )
        .route(
            "/api/posts/:id/comments/live",
            get(handlers::feed::comments_live),
        )
        // Messaging
        .route(
            "/api/conversations",
            get(handlers::messages::conversations).post(handlers::messages::open_conversation),
        )
        .route(
            "/api/conversations/live",
            get(handlers::messages::conversations_live),
        )
        .route(
            "/api/conversations/:id/messages",
            get(handlers::messages::messages).post(handlers::messages::send_text),
        )
        .route(
            "/api/conversations/:id/messages/live",
            get(handlers::messages::messages_live),
        )
        .route(
            "/api/conversations/:id/messages/image",
            post(handlers::messages::send_image),
        )
        .route("/api/unread", get(handlers::messages::unread_total))
        // Tactics boards
        .route(
            "/api/boards",
            get(handlers::boards::my_boards).post(handlers::boards::save_board),
        )
        .route("/api/boards/live", get(handlers::boards::my_boards_live))
        .route("/api/boards/shared", get(handlers::boards::shared_boards))
        .route(
            "/api/boards/shared/live",
            get(handlers::boards::shared_boards_live),
        )
        .route(
            "/api/boards/templates/:name",
            get(handlers::boards::template),
        )
        .route(
            "/api/boards/:id",
            get(handlers::boards::board).delete(handlers::boards::delete_board),
        )
        .route("/api/boards/:id/share", put(handlers::boards::set_shared))
        .route(
            "/api/boards/:id/snapshot",
            post(handlers::boards::upload_snapshot),
        )
        // Images
        .route("/api/images/*reference", get(handlers::images::serve))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve until shutdown.
pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::NotAuthorized(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_, _) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Backend(err) => {
                tracing::error!(%err, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
