// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::images::{ImageKind, ImageStore, LOCAL_PREFIX};
use crate::live::{spawn_list, Change, ChangeHub, ListState, Live};
use crate::models::{Account, Board, BoardSummary};
use crate::repo::TacticsRepo;

/// Saved tactics boards. Boards are private to their owner unless shared;
/// shared boards are readable by everyone but stay writable only by the
/// owner.
pub struct TacticsStore {
    repo: Arc<dyn TacticsRepo>,
    images: Arc<ImageStore>,
    hub: Arc<ChangeHub>,
}

impl TacticsStore {
    pub fn new(repo: Arc<dyn TacticsRepo>, images: Arc<ImageStore>, hub: Arc<ChangeHub>) -> Self {
        Self { repo, images, hub }
    }

    /// Save an editor snapshot. A summary without an id creates a new
    /// board; with an id it updates the existing one, which must belong to
    /// the caller. A replaced preview image is cleaned up best-effort.
    pub async fn save_board(&self, owner: &Account, summary: BoardSummary) -> Result<Board> {
        if summary.title.trim().is_empty() {
            return Err(Error::Validation("board title must not be empty".into()));
        }

        let existing = match &summary.id {
            Some(id) => {
                let board = self
                    .repo
                    .board(id)
                    .await?
                    .ok_or_else(|| Error::NotFound("board", id.clone()))?;
                if board.owner_id != owner.id {
                    return Err(Error::NotAuthorized(
                        "only the owner can edit a board".into(),
                    ));
                }
                Some(board)
            }
            None => None,
        };

        let id = match &existing {
            Some(board) => board.id.clone(),
            None => Uuid::new_v4().to_string(),
        };

        let (image, replaced) = match summary.snapshot {
            Some(data) => {
                let reference = self
                    .images
                    .save(ImageKind::BoardSnapshot, &id, data)
                    .await?;
                let old = existing.as_ref().and_then(|b| b.image.clone());
                (Some(reference), old)
            }
            None => (existing.as_ref().and_then(|b| b.image.clone()), None),
        };

        let board = Board {
            id,
            owner_id: owner.id.clone(),
            title: summary.title,
            description: summary.description,
            players: summary.players,
            movements: summary.movements,
            image,
            is_shared: summary.is_shared,
            created_at: existing
                .as_ref()
                .map(|b| b.created_at)
                .unwrap_or_else(Utc::now),
        };
        self.repo.upsert_board(board.clone()).await?;

        if let Some(old) = replaced {
            if old.starts_with(LOCAL_PREFIX) {
                if let Err(err) = self.images.delete(&old).await {
                    warn!(board_id = %board.id, %err, "failed to delete replaced board image");
                }
            }
        }

        self.hub.publish(Change::Boards);
        Ok(board)
    }

    /// Attach a freshly rendered preview image to an existing board,
    /// replacing and cleaning up the previous one.
    pub async fn upload_snapshot(&self, owner: &Account, id: &str, data: Vec<u8>) -> Result<String> {
        let board = self
            .repo
            .board(id)
            .await?
            .ok_or_else(|| Error::NotFound("board", id.to_string()))?;
        if board.owner_id != owner.id {
            return Err(Error::NotAuthorized(
                "only the owner can edit a board".into(),
            ));
        }

        let reference = self.images.save(ImageKind::BoardSnapshot, id, data).await?;
        let old = board.image.clone();
        self.repo
            .upsert_board(Board {
                image: Some(reference.clone()),
                ..board
            })
            .await?;

        if let Some(old) = old {
            if old.starts_with(LOCAL_PREFIX) {
                if let Err(err) = self.images.delete(&old).await {
                    warn!(board_id = %id, %err, "failed to delete replaced board image");
                }
            }
        }

        self.hub.publish(Change::Boards);
        Ok(reference)
    }

    /// Fetch one board, enforcing visibility: owner, admin, or shared.
    pub async fn board_for(&self, viewer: &Account, id: &str) -> Result<Board> {
        let board = self
            .repo
            .board(id)
            .await?
            .ok_or_else(|| Error::NotFound("board", id.to_string()))?;
        if board.owner_id != viewer.id && !board.is_shared && !viewer.is_admin {
            return Err(Error::NotAuthorized("board is not shared".into()));
        }
        Ok(board)
    }

    pub async fn my_boards(&self, owner_id: &str) -> Result<Vec<Board>> {
        self.repo.boards_by_owner(owner_id).await
    }

    pub async fn shared_boards(&self) -> Result<Vec<Board>> {
        self.repo.shared_boards().await
    }

    pub fn watch_my_boards(&self, owner_id: &str) -> Live<ListState<Board>> {
        let repo = self.repo.clone();
        let owner_id = owner_id.to_string();
        spawn_list(
            &self.hub,
            |change| matches!(change, Change::Boards),
            move || {
                let repo = repo.clone();
                let owner_id = owner_id.clone();
                async move { repo.boards_by_owner(&owner_id).await }
            },
        )
    }

    pub fn watch_shared_boards(&self) -> Live<ListState<Board>> {
        let repo = self.repo.clone();
        spawn_list(
            &self.hub,
            |change| matches!(change, Change::Boards),
            move || {
                let repo = repo.clone();
                async move { repo.shared_boards().await }
            },
        )
    }

    /// Sharing is an owner-only switch; admins moderate through deletion.
    pub async fn set_shared(&self, viewer: &Account, id: &str, value: bool) -> Result<()> {
        let board = self
            .repo
            .board(id)
            .await?
            .ok_or_else(|| Error::NotFound("board", id.to_string()))?;
        if board.owner_id != viewer.id {
            return Err(Error::NotAuthorized(
                "only the owner can share a board".into(),
            ));
        }
        self.repo.set_shared(id, value).await?;
        self.hub.publish(Change::Boards);
        Ok(())
    }

    /// Delete a board. Allowed for the owner and for admins. The preview
    /// image is removed best-effort after the record is gone.
    pub async fn delete_board(&self, viewer: &Account, id: &str) -> Result<()> {
        let board = self
            .repo
            .board(id)
            .await?
            .ok_or_else(|| Error::NotFound("board", id.to_string()))?;
        if board.owner_id != viewer.id && !viewer.is_admin {
            return Err(Error::NotAuthorized(
                "only the owner or an admin can delete a board".into(),
            ));
        }
        self.repo.delete_board(id).await?;

        if let Some(reference) = board.image {
            if reference.starts_with(LOCAL_PREFIX) {
                if let Err(err) = self.images.delete(&reference).await {
                    warn!(board_id = %id, %err, "failed to delete board image");
                }
            }
        }

        self.hub.publish(Change::Boards);
        Ok(())
    }
}
