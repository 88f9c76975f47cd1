// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::{Error, Result};
use crate::models::{Account, ProfileUpdate};
use crate::repo::DirectoryRepo;
use crate::schema::accounts;

use super::PostgresRepo;

#[async_trait]
impl DirectoryRepo for PostgresRepo {
    async fn insert_account(&self, account: Account) -> Result<()> {
        let mut conn = self.conn().await?;
        diesel::insert_into(accounts::table)
            .values(&account)
            .execute(&mut conn)
            .await
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => Error::Validation("email already registered".into()),
                other => Error::backend(other),
            })?;
        Ok(())
    }

    async fn account_by_id(&self, id: &str) -> Result<Option<Account>> {
        let mut conn = self.conn().await?;
        accounts::table
            .find(id)
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::backend)
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let mut conn = self.conn().await?;
        accounts::table
            .filter(accounts::email.eq(email))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::backend)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut conn = self.conn().await?;
        accounts::table
            .order(accounts::created_at.desc())
            .select(Account::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(accounts::table.find(id))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("account", id.to_string()));
        }
        Ok(())
    }

    async fn set_profile_image(&self, id: &str, reference: Option<String>) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(accounts::table.find(id))
            .set(accounts::profile_image.eq(reference))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("account", id.to_string()));
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, hash: String) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(accounts::table.find(id))
            .set(accounts::password_hash.eq(hash))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("account", id.to_string()));
        }
        Ok(())
    }

    async fn set_admin(&self, id: &str, value: bool) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(accounts::table.find(id))
            .set(accounts::is_admin.eq(value))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("account", id.to_string()));
        }
        Ok(())
    }

    async fn set_disabled(&self, id: &str, value: bool) -> Result<()> {
        let mut conn = self.conn().await?;
        let updated = diesel::update(accounts::table.find(id))
            .set(accounts::is_disabled.eq(value))
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;
        if updated == 0 {
            return Err(Error::NotFound("account", id.to_string()));
        }
        Ok(())
    }
}
