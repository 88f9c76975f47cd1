// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::live::{spawn_list, Change, ChangeHub, ListState, Live};
use crate::models::Account;
use crate::repo::DirectoryRepo;

/// Admin-only operations over the user directory.
pub struct AdminStore {
    repo: Arc<dyn DirectoryRepo>,
    hub: Arc<ChangeHub>,
}

impl AdminStore {
    pub fn new(repo: Arc<dyn DirectoryRepo>, hub: Arc<ChangeHub>) -> Self {
        Self { repo, hub }
    }

    fn require_admin(viewer: &Account) -> Result<()> {
        if viewer.is_admin {
            Ok(())
        } else {
            Err(Error::NotAuthorized("admin access required".into()))
        }
    }

    pub async fn list_accounts(&self, viewer: &Account) -> Result<Vec<Account>> {
        Self::require_admin(viewer)?;
        self.repo.list_accounts().await
    }

    /// Live account listing for the admin panel.
    pub fn watch_accounts(&self, viewer: &Account) -> Result<Live<ListState<Account>>> {
        Self::require_admin(viewer)?;
        let repo = self.repo.clone();
        Ok(spawn_list(
            &self.hub,
            |change| matches!(change, Change::Accounts | Change::Account(_)),
            move || {
                let repo = repo.clone();
                async move { repo.list_accounts().await }
            },
        ))
    }

    pub async fn set_admin(&self, viewer: &Account, account_id: &str, value: bool) -> Result<()> {
        Self::require_admin(viewer)?;
        self.repo.set_admin(account_id, value).await?;
        info!(%account_id, value, by = %viewer.id, "admin flag changed");
        self.hub.publish(Change::Account(account_id.to_string()));
        self.hub.publish(Change::Accounts);
        Ok(())
    }

    pub async fn set_disabled(&self, viewer: &Account, account_id: &str, value: bool) -> Result<()> {
        Self::require_admin(viewer)?;
        if viewer.id == account_id {
            return Err(Error::Validation("cannot disable your own account".into()));
        }
        self.repo.set_disabled(account_id, value).await?;
        info!(%account_id, value, by = %viewer.id, "disabled flag changed");
        self.hub.publish(Change::Account(account_id.to_string()));
        self.hub.publish(Change::Accounts);
        Ok(())
    }
}
