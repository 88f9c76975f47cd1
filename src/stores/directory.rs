// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{self, TokenIssuer};
use crate::error::{Error, Result};
use crate::images::{ImageKind, ImageStore, LOCAL_PREFIX};
use crate::live::{spawn_doc, Change, ChangeHub, DocState, Live};
use crate::models::{Account, NewAccount, ProfileUpdate};
use crate::repo::DirectoryRepo;

/// Identity and profile operations. Role and disable toggles live in
/// [`crate::stores::AdminStore`].
pub struct DirectoryStore {
    repo: Arc<dyn DirectoryRepo>,
    images: Arc<ImageStore>,
    tokens: Arc<TokenIssuer>,
    hub: Arc<ChangeHub>,
}

impl DirectoryStore {
    pub fn new(
        repo: Arc<dyn DirectoryRepo>,
        images: Arc<ImageStore>,
        tokens: Arc<TokenIssuer>,
        hub: Arc<ChangeHub>,
    ) -> Self {
        Self {
            repo,
            images,
            tokens,
            hub,
        }
    }

    /// Create the identity and its profile record, returning the account
    /// together with a fresh session token.
    pub async fn register(&self, new: NewAccount) -> Result<(Account, String)> {
        if new.username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }
        if !new.email.contains('@') {
            return Err(Error::Validation("invalid email address".into()));
        }
        if new.password.len() < 8 {
            return Err(Error::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            username: new.username,
            email: new.email,
            password_hash: auth::hash_password(&new.password)?,
            profile_image: None,
            position: None,
            experience: None,
            is_admin: false,
            is_disabled: false,
            created_at: Utc::now(),
        };
        self.repo.insert_account(account.clone()).await?;
        info!(account_id = %account.id, "account registered");
        self.hub.publish(Change::Accounts);
        let token = self.tokens.issue_session(&account.id)?;
        Ok((account, token))
    }

    /// Check credentials and issue a session token. Disabled accounts
    /// cannot log in.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Account, String)> {
        let account = self
            .repo
            .account_by_email(email)
            .await?
            .filter(|account| auth::verify_password(password, &account.password_hash))
            .ok_or(Error::NotAuthenticated)?;
        if account.is_disabled {
            return Err(Error::NotAuthorized("account is disabled".into()));
        }
        let token = self.tokens.issue_session(&account.id)?;
        Ok((account, token))
    }

    /// Resolve a session token to its account. Fails without touching the
    /// repository when the token itself is invalid.
    pub async fn authenticate(&self, token: &str) -> Result<Account> {
        let account_id = self.tokens.verify_session(token)?;
        let account = self
            .repo
            .account_by_id(&account_id)
            .await?
            .ok_or(Error::NotAuthenticated)?;
        if account.is_disabled {
            return Err(Error::NotAuthorized("account is disabled".into()));
        }
        Ok(account)
    }

    /// Issue a password-reset token. Token delivery is outside this
    /// service; the token is only logged. Unknown emails succeed silently
    /// so the endpoint cannot be used to enumerate accounts.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        match self.repo.account_by_email(email).await? {
            Some(account) => {
                let token = self.tokens.issue_reset(&account.id)?;
                info!(account_id = %account.id, token, "password reset token issued");
            }
            None => {
                info!(email, "password reset requested for unknown email");
            }
        }
        Ok(())
    }

    /// Complete a reset: swap in a new password hash for the token's account.
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> Result<()> {
        if new_password.len() < 8 {
            return Err(Error::Validation(
                "password must be at least 8 characters".into(),
            ));
        }
        let account_id = self.tokens.verify_reset(token)?;
        let hash = auth::hash_password(new_password)?;
        self.repo.set_password_hash(&account_id, hash).await?;
        info!(%account_id, "password reset completed");
        Ok(())
    }

    pub async fn account(&self, id: &str) -> Result<Account> {
        self.repo
            .account_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("account", id.to_string()))
    }

    /// Live view of one profile.
    pub fn watch_account(&self, id: &str) -> Live<DocState<Account>> {
        let repo = self.repo.clone();
        let id = id.to_string();
        let topic = id.clone();
        spawn_doc(
            &self.hub,
            move |change| {
                matches!(change, Change::Account(changed) if *changed == topic)
                    || matches!(change, Change::Accounts)
            },
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.account_by_id(&id).await }
            },
        )
    }

    /// Partial update; only supplied fields are written.
    pub async fn update_profile(&self, account_id: &str, update: ProfileUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        if let Some(username) = &update.username {
            if username.trim().is_empty() {
                return Err(Error::Validation("username must not be empty".into()));
            }
        }
        self.repo.update_profile(account_id, update).await?;
        self.hub.publish(Change::Account(account_id.to_string()));
        self.hub.publish(Change::Accounts);
        Ok(())
    }

    /// Store a new profile image and drop the previous local one.
    /// Deleting the old file is best-effort cleanup: a failure is logged
    /// and never rolls the update back.
    pub async fn upload_profile_image(&self, account_id: &str, data: Vec<u8>) -> Result<String> {
        let account = self.account(account_id).await?;
        let reference = self.images.save(ImageKind::Profile, account_id, data).await?;
        self.repo
            .set_profile_image(account_id, Some(reference.clone()))
            .await?;

        if let Some(old) = account.profile_image {
            if old.starts_with(LOCAL_PREFIX) {
                if let Err(err) = self.images.delete(&old).await {
                    warn!(%account_id, %err, "failed to delete previous profile image");
                }
            }
        }

        self.hub.publish(Change::Account(account_id.to_string()));
        self.hub.publish(Change::Accounts);
        Ok(reference)
    }
}
