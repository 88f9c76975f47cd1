// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::images::{ImageKind, ImageStore, LOCAL_PREFIX};
use crate::live::{spawn_doc, spawn_list, Change, ChangeHub, DocState, ListState, Live};
use crate::models::{Account, Comment, Like, NewComment, NewPost, Post};
use crate::repo::{DirectoryRepo, FeedRepo};

/// How long a post or comment waits for the author profile before falling
/// back to a placeholder snapshot.
const AUTHOR_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

const UNKNOWN_AUTHOR: &str = "Unknown User";

/// Posts, likes, and comments. Author identity on posts and comments is a
/// denormalized snapshot taken at write time.
pub struct FeedStore {
    repo: Arc<dyn FeedRepo>,
    directory: Arc<dyn DirectoryRepo>,
    images: Arc<ImageStore>,
    hub: Arc<ChangeHub>,
}

impl FeedStore {
    pub fn new(
        repo: Arc<dyn FeedRepo>,
        directory: Arc<dyn DirectoryRepo>,
        images: Arc<ImageStore>,
        hub: Arc<ChangeHub>,
    ) -> Self {
        Self {
            repo,
            directory,
            images,
            hub,
        }
    }

    /// Snapshot the author's current username and image, with a bounded
    /// lookup so a slow directory cannot stall the write. Timeouts and
    /// lookup failures degrade to a placeholder author.
    async fn author_snapshot(&self, author_id: &str) -> (String, Option<String>) {
        let lookup = self.directory.account_by_id(author_id);
        match tokio::time::timeout(AUTHOR_LOOKUP_TIMEOUT, lookup).await {
            Ok(Ok(Some(account))) => (account.username, account.profile_image),
            Ok(Ok(None)) => {
                warn!(%author_id, "post author not found, using placeholder");
                (UNKNOWN_AUTHOR.to_string(), None)
            }
            Ok(Err(err)) => {
                warn!(%author_id, %err, "author lookup failed, using placeholder");
                (UNKNOWN_AUTHOR.to_string(), None)
            }
            Err(_) => {
                warn!(%author_id, "author lookup timed out, using placeholder");
                (UNKNOWN_AUTHOR.to_string(), None)
            }
        }
    }

    /// Create a post. An attached image that fails to store does not block
    /// the post; it goes out without one.
    pub async fn create_post(&self, author: &Account, new: NewPost) -> Result<Post> {
        if new.text.trim().is_empty() {
            return Err(Error::Validation("post text must not be empty".into()));
        }
        if new.is_announcement && !author.is_admin {
            return Err(Error::NotAuthorized(
                "only admins can post announcements".into(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let image = match new.image {
            Some(data) => match self.images.save(ImageKind::Post, &id, data).await {
                Ok(reference) => Some(reference),
                Err(err) => {
                    warn!(post_id = %id, %err, "post image rejected, publishing without it");
                    None
                }
            },
            None => None,
        };

        let (author_username, author_image) = self.author_snapshot(&author.id).await;
        let post = Post {
            id,
            author_id: author.id.clone(),
            author_username,
            author_image,
            text: new.text,
            image,
            is_announcement: new.is_announcement,
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        };
        if let Err(err) = self.repo.insert_post(post.clone()).await {
            // The image went to disk first; do not leave it orphaned.
            if let Some(reference) = &post.image {
                if let Err(cleanup) = self.images.delete(reference).await {
                    warn!(post_id = %post.id, %cleanup, "failed to delete image of unsaved post");
                }
            }
            return Err(err);
        }
        self.hub.publish(Change::Feed);
        Ok(post)
    }

    pub async fn feed(&self) -> Result<Vec<Post>> {
        self.repo.feed().await
    }

    pub async fn post(&self, id: &str) -> Result<Post> {
        self.repo
            .post(id)
            .await?
            .ok_or_else(|| Error::NotFound("post", id.to_string()))
    }

    pub fn watch_feed(&self) -> Live<ListState<Post>> {
        let repo = self.repo.clone();
        spawn_list(
            &self.hub,
            |change| matches!(change, Change::Feed),
            move || {
                let repo = repo.clone();
                async move { repo.feed().await }
            },
        )
    }

    pub fn watch_post(&self, id: &str) -> Live<DocState<Post>> {
        let repo = self.repo.clone();
        let id = id.to_string();
        let topic = id.clone();
        spawn_doc(
            &self.hub,
            move |change| matches!(change, Change::Post(p) if *p == topic),
            move || {
                let repo = repo.clone();
                let id = id.clone();
                async move { repo.post(&id).await }
            },
        )
    }

    /// Flip the caller's like on a post; returns the new liked state.
    pub async fn toggle_like(&self, account_id: &str, post_id: &str) -> Result<bool> {
        // Ensure the post exists before touching the like set.
        self.post(post_id).await?;

        let liked = if self.repo.like_exists(post_id, account_id).await? {
            self.repo.remove_like(post_id, account_id).await?;
            false
        } else {
            self.repo
                .add_like(Like {
                    post_id: post_id.to_string(),
                    account_id: account_id.to_string(),
                    created_at: Utc::now(),
                })
                .await?;
            true
        };

        self.hub.publish(Change::Post(post_id.to_string()));
        self.hub.publish(Change::Feed);
        Ok(liked)
    }

    pub async fn has_liked(&self, account_id: &str, post_id: &str) -> Result<bool> {
        self.repo.like_exists(post_id, account_id).await
    }

    pub async fn add_comment(&self, author: &Account, new: NewComment) -> Result<Comment> {
        if new.text.trim().is_empty() {
            return Err(Error::Validation("comment must not be empty".into()));
        }
        self.post(&new.post_id).await?;

        let (author_username, author_image) = self.author_snapshot(&author.id).await;
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            post_id: new.post_id.clone(),
            author_id: author.id.clone(),
            author_username,
            author_image,
            text: new.text,
            created_at: Utc::now(),
        };
        self.repo.add_comment(comment.clone()).await?;

        self.hub.publish(Change::Comments(new.post_id.clone()));
        self.hub.publish(Change::Post(new.post_id));
        self.hub.publish(Change::Feed);
        Ok(comment)
    }

    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.repo.comments(post_id).await
    }

    pub fn watch_comments(&self, post_id: &str) -> Live<ListState<Comment>> {
        let repo = self.repo.clone();
        let post_id = post_id.to_string();
        let topic = post_id.clone();
        spawn_list(
            &self.hub,
            move |change| matches!(change, Change::Comments(p) if *p == topic),
            move || {
                let repo = repo.clone();
                let post_id = post_id.clone();
                async move { repo.comments(&post_id).await }
            },
        )
    }

    /// Delete a post together with its likes and comments. Allowed for the
    /// post's author and for admins. The attached image file is removed
    /// best-effort after the record is gone.
    pub async fn delete_post(&self, viewer: &Account, post_id: &str) -> Result<()> {
        let post = self.post(post_id).await?;
        if post.author_id != viewer.id && !viewer.is_admin {
            return Err(Error::NotAuthorized(
                "only the author or an admin can delete a post".into(),
            ));
        }
        self.repo.delete_post(post_id).await?;

        if let Some(reference) = post.image {
            if reference.starts_with(LOCAL_PREFIX) {
                if let Err(err) = self.images.delete(&reference).await {
                    warn!(%post_id, %err, "failed to delete post image");
                }
            }
        }

        self.hub.publish(Change::Feed);
        self.hub.publish(Change::Post(post_id.to_string()));
        self.hub.publish(Change::Comments(post_id.to_string()));
        Ok(())
    }
}
