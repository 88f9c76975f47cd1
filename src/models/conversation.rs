// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{conversations, messages};

/// A two-party thread. Participants are stored in sorted order so the
/// sorted pair doubles as the document id, making first-contact creation
/// idempotent under concurrent senders.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Conversation {
    pub id: String,
    pub participant_one: String,
    pub participant_two: String,
    pub name_one: String,
    pub name_two: String,
    pub image_one: Option<String>,
    pub image_two: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub last_sender_id: Option<String>,
    pub unread_one: i32,
    pub unread_two: i32,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Deterministic id for the unordered pair.
    pub fn key(a: &str, b: &str) -> String {
        let (lo, hi) = Self::sorted_pair(a, b);
        format!("{lo}:{hi}")
    }

    pub fn sorted_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn involves(&self, account_id: &str) -> bool {
        self.participant_one == account_id || self.participant_two == account_id
    }

    /// The participant id that is not `account_id`.
    pub fn other_participant(&self, account_id: &str) -> &str {
        if self.participant_one == account_id {
            &self.participant_two
        } else {
            &self.participant_one
        }
    }

    pub fn other_participant_name(&self, account_id: &str) -> &str {
        if self.participant_one == account_id {
            &self.name_two
        } else {
            &self.name_one
        }
    }

    pub fn unread_for(&self, account_id: &str) -> i32 {
        if self.participant_one == account_id {
            self.unread_one
        } else {
            self.unread_two
        }
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    pub image: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum NewMessage {
    Text(String),
    Image(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        assert_eq!(Conversation::key("bob", "alice"), Conversation::key("alice", "bob"));
        assert_eq!(Conversation::key("alice", "bob"), "alice:bob");
    }
}
