// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Repository ports. Stores talk to persistence exclusively through these
//! traits; adapters live in `memory` and `postgres`.
//!
//! Counter maintenance (like/comment counts, unread counters) is part of the
//! contract: adapters must apply those updates atomically with the write
//! that causes them, never as a separate read-modify-write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, Board, Comment, Conversation, Like, Message, Post, ProfileUpdate};

#[async_trait]
pub trait DirectoryRepo: Send + Sync {
    async fn insert_account(&self, account: Account) -> Result<()>;
    async fn account_by_id(&self, id: &str) -> Result<Option<Account>>;
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn list_accounts(&self) -> Result<Vec<Account>>;
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<()>;
    async fn set_profile_image(&self, id: &str, reference: Option<String>) -> Result<()>;
    async fn set_password_hash(&self, id: &str, hash: String) -> Result<()>;
    async fn set_admin(&self, id: &str, value: bool) -> Result<()>;
    async fn set_disabled(&self, id: &str, value: bool) -> Result<()>;
}

#[async_trait]
pub trait FeedRepo: Send + Sync {
    async fn insert_post(&self, post: Post) -> Result<()>;
    /// All posts, newest first.
    async fn feed(&self) -> Result<Vec<Post>>;
    async fn post(&self, id: &str) -> Result<Option<Post>>;
    /// Deletes the post together with its comments and likes.
    async fn delete_post(&self, id: &str) -> Result<()>;
    async fn like_exists(&self, post_id: &str, account_id: &str) -> Result<bool>;
    /// Records the like and increments the post counter in one step.
    async fn add_like(&self, like: Like) -> Result<()>;
    /// Removes the like and decrements the post counter (floored at zero).
    async fn remove_like(&self, post_id: &str, account_id: &str) -> Result<()>;
    /// Appends the comment and increments the post counter in one step.
    async fn add_comment(&self, comment: Comment) -> Result<()>;
    /// Comments for a post, newest first.
    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>>;
}

#[async_trait]
pub trait MessagingRepo: Send + Sync {
    /// Conversations involving the account, most recent message first.
    async fn conversations_for(&self, account_id: &str) -> Result<Vec<Conversation>>;
    async fn conversation(&self, id: &str) -> Result<Option<Conversation>>;
    /// Creates the conversation unless one with the same id already exists;
    /// returns the stored row either way.
    async fn get_or_create_conversation(&self, conversation: Conversation) -> Result<Conversation>;
    /// Messages in a conversation, oldest first.
    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>>;
    /// Inserts the message, refreshes the conversation preview, and bumps
    /// the recipient's unread counter, all in one step.
    async fn append_message(&self, message: Message, recipient: &str) -> Result<()>;
    /// Zeroes the reader's unread counter and flags messages from the other
    /// participant as read. Must not touch the other counter.
    async fn mark_read(&self, conversation_id: &str, reader: &str) -> Result<()>;
}

#[async_trait]
pub trait TacticsRepo: Send + Sync {
    async fn upsert_board(&self, board: Board) -> Result<()>;
    async fn board(&self, id: &str) -> Result<Option<Board>>;
    /// Boards owned by the account, newest first.
    async fn boards_by_owner(&self, owner_id: &str) -> Result<Vec<Board>>;
    /// Boards with the shared flag set, newest first.
    async fn shared_boards(&self) -> Result<Vec<Board>>;
    async fn delete_board(&self, id: &str) -> Result<()>;
    async fn set_shared(&self, id: &str, value: bool) -> Result<()>;
}
