// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handball_connect::api::{self, AppState};
use handball_connect::auth::TokenIssuer;
use handball_connect::config::{BackendKind, Config};
use handball_connect::db::Database;
use handball_connect::images::ImageStore;
use handball_connect::repo::memory::MemoryRepo;
use handball_connect::repo::postgres::PostgresRepo;
use handball_connect::stores::Stores;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,handball_connect=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(backend = ?config.database.backend, "configuration loaded");

    let images = Arc::new(ImageStore::new(config.images.root.clone()));
    let tokens = Arc::new(TokenIssuer::new(&config.auth));

    let stores = match config.database.backend {
        BackendKind::Postgres => {
            let db = Database::connect(&config.database).await?;
            Stores::new(Arc::new(PostgresRepo::new(db.pool())), images.clone(), tokens)
        }
        BackendKind::Memory => {
            info!("running against the in-memory repository; data is not persisted");
            Stores::new(Arc::new(MemoryRepo::new()), images.clone(), tokens)
        }
    };

    let state = AppState {
        stores: Arc::new(stores),
        images,
    };
    api::serve(&config, state).await
}
