// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use diesel::{Connection, PgConnection};
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::config::DatabaseConfig;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection = Object<AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connection-pool owner for the Postgres adapter.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create the pool, verify connectivity, and run pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .build()?;

        let db = Self { pool };
        let _ = db.get_connection().await?;
        info!("successfully connected to the database");

        db.run_migrations(&config.url).await?;
        Ok(db)
    }

    /// Migrations run over a blocking sync connection; diesel_migrations has
    /// no async harness.
    async fn run_migrations(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = PgConnection::establish(&url)?;
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(|e| anyhow::anyhow!("migration failure: {e}"))?;
            Ok(())
        })
        .await??;
        info!("database migrations applied");
        Ok(())
    }

    pub async fn get_connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get().await?)
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
