// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Postgres adapter over diesel-async. Counter updates are single
//! `SET n = n + 1` statements so concurrent writers cannot lose increments.

mod directory;
mod feed;
mod messaging;
mod tactics;

use crate::db::{DbConnection, DbPool};
use crate::error::{Error, Result};

pub struct PostgresRepo {
    pool: DbPool,
}

impl PostgresRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .await
            .map_err(|e| Error::Backend(anyhow::anyhow!("connection pool: {e}")))
    }
}

/// Wrap a diesel error, keeping `NotFound` distinct.
fn db_err<'a>(entity: &'static str, id: &'a str) -> impl FnOnce(diesel::result::Error) -> Error + 'a {
    move |err| match err {
        diesel::result::Error::NotFound => Error::NotFound(entity, id.to_string()),
        other => Error::backend(other),
    }
}
