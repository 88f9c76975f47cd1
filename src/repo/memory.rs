// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! In-process adapter backed by plain maps behind one `RwLock`. Used by the
//! test suite and selectable for local development; every mutation runs
//! under the write lock, which is what makes the counter updates atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::{Account, Board, Comment, Conversation, Like, Message, Post, ProfileUpdate};

use super::{DirectoryRepo, FeedRepo, MessagingRepo, TacticsRepo};

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    posts: HashMap<String, Post>,
    likes: HashMap<(String, String), Like>,
    comments: HashMap<String, Comment>,
    conversations: HashMap<String, Conversation>,
    messages: HashMap<String, Message>,
    boards: HashMap<String, Board>,
}

#[derive(Default)]
pub struct MemoryRepo {
    state: RwLock<State>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryRepo for MemoryRepo {
    async fn insert_account(&self, account: Account) -> Result<()> {
        let mut state = self.state.write().await;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(Error::Validation("email already registered".into()));
        }
        state.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn account_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.state.read().await.accounts.get(id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let state = self.state.read().await;
        let mut accounts: Vec<_> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("account", id.to_string()))?;
        if let Some(username) = update.username {
            account.username = username;
        }
        if let Some(position) = update.position {
            account.position = Some(position);
        }
        if let Some(experience) = update.experience {
            account.experience = Some(experience);
        }
        Ok(())
    }

    async fn set_profile_image(&self, id: &str, reference: Option<String>) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("account", id.to_string()))?;
        account.profile_image = reference;
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, hash: String) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("account", id.to_string()))?;
        account.password_hash = hash;
        Ok(())
    }

    async fn set_admin(&self, id: &str, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("account", id.to_string()))?;
        account.is_admin = value;
        Ok(())
    }

    async fn set_disabled(&self, id: &str, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("account", id.to_string()))?;
        account.is_disabled = value;
        Ok(())
    }
}

#[async_trait]
impl FeedRepo for MemoryRepo {
    async fn insert_post(&self, post: Post) -> Result<()> {
        let mut state = self.state.write().await;
        state.posts.insert(post.id.clone(), post);
        Ok(())
    }

    async fn feed(&self) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let mut posts: Vec<_> = state.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.state.read().await.posts.get(id).cloned())
    }

    async fn delete_post(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.posts.remove(id);
        state.comments.retain(|_, c| c.post_id != id);
        state.likes.retain(|(post_id, _), _| post_id != id);
        Ok(())
    }

    async fn like_exists(&self, post_id: &str, account_id: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .likes
            .contains_key(&(post_id.to_string(), account_id.to_string())))
    }

    async fn add_like(&self, like: Like) -> Result<()> {
        let mut state = self.state.write().await;
        let key = (like.post_id.clone(), like.account_id.clone());
        if state.likes.insert(key, like.clone()).is_none() {
            if let Some(post) = state.posts.get_mut(&like.post_id) {
                post.like_count += 1;
            }
        }
        Ok(())
    }

    async fn remove_like(&self, post_id: &str, account_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let key = (post_id.to_string(), account_id.to_string());
        if state.likes.remove(&key).is_some() {
            if let Some(post) = state.posts.get_mut(post_id) {
                post.like_count = (post.like_count - 1).max(0);
            }
        }
        Ok(())
    }

    async fn add_comment(&self, comment: Comment) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(post) = state.posts.get_mut(&comment.post_id) {
            post.comment_count += 1;
        } else {
            return Err(Error::NotFound("post", comment.post_id.clone()));
        }
        state.comments.insert(comment.id.clone(), comment);
        Ok(())
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<_> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl MessagingRepo for MemoryRepo {
    async fn conversations_for(&self, account_id: &str) -> Result<Vec<Conversation>> {
        let state = self.state.read().await;
        let mut conversations: Vec<_> = state
            .conversations
            .values()
            .filter(|c| c.involves(account_id))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(conversations)
    }

    async fn conversation(&self, id: &str) -> Result<Option<Conversation>> {
        Ok(self.state.read().await.conversations.get(id).cloned())
    }

    async fn get_or_create_conversation(&self, conversation: Conversation) -> Result<Conversation> {
        let mut state = self.state.write().await;
        let existing = state
            .conversations
            .entry(conversation.id.clone())
            .or_insert(conversation);
        Ok(existing.clone())
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let state = self.state.read().await;
        let mut messages: Vec<_> = state
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn append_message(&self, message: Message, recipient: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let conversation = state
            .conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(|| Error::NotFound("conversation", message.conversation_id.clone()))?;

        conversation.last_message = message.text.clone();
        conversation.last_message_at = message.created_at;
        conversation.last_sender_id = Some(message.sender_id.clone());
        if conversation.participant_one == recipient {
            conversation.unread_one += 1;
        } else {
            conversation.unread_two += 1;
        }

        state.messages.insert(message.id.clone(), message);
        Ok(())
    }

    async fn mark_read(&self, conversation_id: &str, reader: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let conversation = state
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Error::NotFound("conversation", conversation_id.to_string()))?;

        if conversation.participant_one == reader {
            conversation.unread_one = 0;
        } else {
            conversation.unread_two = 0;
        }

        for message in state.messages.values_mut() {
            if message.conversation_id == conversation_id && message.sender_id != reader {
                message.is_read = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TacticsRepo for MemoryRepo {
    async fn upsert_board(&self, board: Board) -> Result<()> {
        let mut state = self.state.write().await;
        state.boards.insert(board.id.clone(), board);
        Ok(())
    }

    async fn board(&self, id: &str) -> Result<Option<Board>> {
        Ok(self.state.read().await.boards.get(id).cloned())
    }

    async fn boards_by_owner(&self, owner_id: &str) -> Result<Vec<Board>> {
        let state = self.state.read().await;
        let mut boards: Vec<_> = state
            .boards
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn shared_boards(&self) -> Result<Vec<Board>> {
        let state = self.state.read().await;
        let mut boards: Vec<_> = state
            .boards
            .values()
            .filter(|b| b.is_shared)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn delete_board(&self, id: &str) -> Result<()> {
        self.state.write().await.boards.remove(id);
        Ok(())
    }

    async fn set_shared(&self, id: &str, value: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let board = state
            .boards
            .get_mut(id)
            .ok_or_else(|| Error::NotFound("board", id.to_string()))?;
        board.is_shared = value;
        Ok(())
    }
}
