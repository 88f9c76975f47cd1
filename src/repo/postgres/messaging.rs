// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::error::{Error, Result};
use crate::models::{Conversation, Message};
use crate::repo::MessagingRepo;
use crate::schema::{conversations, messages};

use super::PostgresRepo;

#[async_trait]
impl MessagingRepo for PostgresRepo {
    async fn conversations_for(&self, account_id: &str) -> Result<Vec<Conversation>> {
        let mut conn = self.conn().await?;
        conversations::table
            .filter(
                conversations::participant_one
                    .eq(account_id)
                    .or(conversations::participant_two.eq(account_id)),
            )
            .order(conversations::last_message_at.desc())
            .select(Conversation::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)
    }

    async fn conversation(&self, id: &str) -> Result<Option<Conversation>> {
        let mut conn = self.conn().await?;
        conversations::table
            .find(id)
            .select(Conversation::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Error::backend)
    }

    async fn get_or_create_conversation(&self, conversation: Conversation) -> Result<Conversation> {
        let mut conn = self.conn().await?;
        // The deterministic pair key makes the insert a no-op when the
        // conversation already exists, so concurrent first contact cannot
        // produce duplicates.
        diesel::insert_into(conversations::table)
            .values(&conversation)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(Error::backend)?;

        conversations::table
            .find(&conversation.id)
            .select(Conversation::as_select())
            .first(&mut conn)
            .await
            .map_err(super::db_err("conversation", &conversation.id))
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let mut conn = self.conn().await?;
        messages::table
            .filter(messages::conversation_id.eq(conversation_id))
            .order(messages::created_at.asc())
            .select(Message::as_select())
            .load(&mut conn)
            .await
            .map_err(Error::backend)
    }

    async fn append_message(&self, message: Message, recipient: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(messages::table)
                    .values(&message)
                    .execute(conn)
                    .await?;

                diesel::update(conversations::table.find(&message.conversation_id))
                    .set((
                        conversations::last_message.eq(&message.text),
                        conversations::last_message_at.eq(message.created_at),
                        conversations::last_sender_id.eq(Some(message.sender_id.clone())),
                    ))
                    .execute(conn)
                    .await?;

                // Exactly one of these matches; both increments are atomic
                // on the database side.
                diesel::update(
                    conversations::table
                        .find(&message.conversation_id)
                        .filter(conversations::participant_one.eq(recipient)),
                )
                .set(conversations::unread_one.eq(conversations::unread_one + 1))
                .execute(conn)
                .await?;
                diesel::update(
                    conversations::table
                        .find(&message.conversation_id)
                        .filter(conversations::participant_two.eq(recipient)),
                )
                .set(conversations::unread_two.eq(conversations::unread_two + 1))
                .execute(conn)
                .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::backend)
    }

    async fn mark_read(&self, conversation_id: &str, reader: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::update(
                    conversations::table
                        .find(conversation_id)
                        .filter(conversations::participant_one.eq(reader)),
                )
                .set(conversations::unread_one.eq(0))
                .execute(conn)
                .await?;
                diesel::update(
                    conversations::table
                        .find(conversation_id)
                        .filter(conversations::participant_two.eq(reader)),
                )
                .set(conversations::unread_two.eq(0))
                .execute(conn)
                .await?;

                diesel::update(
                    messages::table
                        .filter(messages::conversation_id.eq(conversation_id))
                        .filter(messages::sender_id.ne(reader)),
                )
                .set(messages::is_read.eq(true))
                .execute(conn)
                .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(Error::backend)
    }
}
