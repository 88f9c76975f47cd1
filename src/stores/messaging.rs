// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::images::{ImageKind, ImageStore};
use crate::live::{spawn_list, Change, ChangeHub, ListState, Live};
use crate::models::{Account, Conversation, Message, NewMessage};
use crate::repo::{DirectoryRepo, MessagingRepo};

/// Preview text shown in the conversation list for image messages.
const IMAGE_PREVIEW: &str = "[Image]";

/// Two-party conversations with per-participant unread counters.
pub struct MessagingStore {
    repo: Arc<dyn MessagingRepo>,
    directory: Arc<dyn DirectoryRepo>,
    images: Arc<ImageStore>,
    hub: Arc<ChangeHub>,
}

impl MessagingStore {
    pub fn new(
        repo: Arc<dyn MessagingRepo>,
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

    pub async fn conversations(&self, account_id: &str) -> Result<Vec<Conversation>> {
        self.repo.conversations_for(account_id).await
    }

    pub fn watch_conversations(&self, account_id: &str) -> Live<ListState<Conversation>> {
        let repo = self.repo.clone();
        let account_id = account_id.to_string();
        let topic = account_id.clone();
        spawn_list(
            &self.hub,
            move |change| matches!(change, Change::Conversations(a) if *a == topic),
            move || {
                let repo = repo.clone();
                let account_id = account_id.clone();
                async move { repo.conversations_for(&account_id).await }
            },
        )
    }

    /// Open the thread between the caller and another account, creating it
    /// on first contact. The id is derived from the sorted participant pair,
    /// so two sides racing to open the same thread converge on one record.
    pub async fn get_or_create_conversation(
        &self,
        me: &Account,
        other_id: &str,
    ) -> Result<Conversation> {
        if me.id == other_id {
            return Err(Error::Validation(
                "cannot start a conversation with yourself".into(),
            ));
        }
        let other = self
            .directory
            .account_by_id(other_id)
            .await?
            .ok_or_else(|| Error::NotFound("account", other_id.to_string()))?;

        let (lo, hi) = Conversation::sorted_pair(&me.id, &other.id);
        let (name_lo, image_lo, name_hi, image_hi) = if lo == me.id {
            (
                me.username.clone(),
                me.profile_image.clone(),
                other.username.clone(),
                other.profile_image.clone(),
            )
        } else {
            (
                other.username.clone(),
                other.profile_image.clone(),
                me.username.clone(),
                me.profile_image.clone(),
            )
        };

        let now = Utc::now();
        let conversation = self
            .repo
            .get_or_create_conversation(Conversation {
                id: Conversation::key(&me.id, &other.id),
                participant_one: lo.to_string(),
                participant_two: hi.to_string(),
                name_one: name_lo,
                name_two: name_hi,
                image_one: image_lo,
                image_two: image_hi,
                last_message: String::new(),
                last_message_at: now,
                last_sender_id: None,
                unread_one: 0,
                unread_two: 0,
                created_at: now,
            })
            .await?;

        self.hub.publish(Change::Conversations(me.id.clone()));
        self.hub.publish(Change::Conversations(other.id));
        Ok(conversation)
    }

    async fn authorized_conversation(
        &self,
        conversation_id: &str,
        account_id: &str,
    ) -> Result<Conversation> {
        let conversation = self
            .repo
            .conversation(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound("conversation", conversation_id.to_string()))?;
        if !conversation.involves(account_id) {
            return Err(Error::NotAuthorized(
                "not a participant of this conversation".into(),
            ));
        }
        Ok(conversation)
    }

    /// Load a conversation's messages for a participant. Opening the thread
    /// counts as reading it: the reader's unread counter is reset as a side
    /// effect of every successful load. Flags are updated before the load so
    /// the returned snapshot already reflects them.
    pub async fn messages(&self, conversation_id: &str, reader: &str) -> Result<Vec<Message>> {
        let conversation = self.authorized_conversation(conversation_id, reader).await?;
        if conversation.unread_for(reader) > 0 {
            self.repo.mark_read(conversation_id, reader).await?;
            self.hub.publish(Change::Conversations(reader.to_string()));
        }
        self.repo.messages(conversation_id).await
    }

    /// Live message view. Each reload runs the same read-marking load as
    /// [`Self::messages`], so the thread stays read while it is open.
    pub async fn watch_messages(
        &self,
        conversation_id: &str,
        reader: &str,
    ) -> Result<Live<ListState<Message>>> {
        // Authorization is checked once up front; the refresh task then
        // reloads through the store to keep the read-marking side effect.
        self.authorized_conversation(conversation_id, reader).await?;

        let repo = self.repo.clone();
        let hub = self.hub.clone();
        let conversation_id = conversation_id.to_string();
        let reader = reader.to_string();
        let topic = conversation_id.clone();
        Ok(spawn_list(
            &self.hub,
            move |change| matches!(change, Change::Messages(c) if *c == topic),
            move || {
                let repo = repo.clone();
                let hub = hub.clone();
                let conversation_id = conversation_id.clone();
                let reader = reader.clone();
                async move {
                    // Mark read before loading so the emitted snapshot
                    // carries the updated flags.
                    if let Some(conversation) = repo.conversation(&conversation_id).await? {
                        if conversation.unread_for(&reader) > 0 {
                            repo.mark_read(&conversation_id, &reader).await?;
                            hub.publish(Change::Conversations(reader.clone()));
                        }
                    }
                    repo.messages(&conversation_id).await
                }
            },
        ))
    }

    /// Send a message. The repository appends it, refreshes the thread
    /// preview, and bumps the recipient's unread counter in one step.
    pub async fn send(
        &self,
        conversation_id: &str,
        sender: &Account,
        new: NewMessage,
    ) -> Result<Message> {
        let conversation = self
            .authorized_conversation(conversation_id, &sender.id)
            .await?;
        let recipient = conversation.other_participant(&sender.id).to_string();

        let (text, image) = match new {
            NewMessage::Text(text) => {
                if text.trim().is_empty() {
                    return Err(Error::Validation("message must not be empty".into()));
                }
                (text, None)
            }
            NewMessage::Image(data) => {
                let reference = self
                    .images
                    .save(ImageKind::Message, conversation_id, data)
                    .await?;
                (IMAGE_PREVIEW.to_string(), Some(reference))
            }
        };

        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender_id: sender.id.clone(),
            text,
            image,
            is_read: false,
            created_at: Utc::now(),
        };
        self.repo.append_message(message.clone(), &recipient).await?;

        self.hub
            .publish(Change::Messages(conversation_id.to_string()));
        self.hub.publish(Change::Conversations(sender.id.clone()));
        self.hub.publish(Change::Conversations(recipient));
        Ok(message)
    }

    /// Total unread across all of an account's conversations, for badges.
    pub async fn unread_total(&self, account_id: &str) -> Result<i64> {
        let conversations = self.repo.conversations_for(account_id).await?;
        let total = conversations
            .iter()
            .map(|c| i64::from(c.unread_for(account_id)))
            .sum();
        Ok(total)
    }
}
