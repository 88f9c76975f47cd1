// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

// Diesel table definitions, kept in sync with `migrations/`.

use diesel::allow_tables_to_appear_in_same_query;
use diesel::table;

table! {
    accounts (id) {
        id -> Varchar,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        profile_image -> Nullable<Varchar>,
        position -> Nullable<Varchar>,
        experience -> Nullable<Varchar>,
        is_admin -> Bool,
        is_disabled -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    posts (id) {
        id -> Varchar,
        author_id -> Varchar,
        author_username -> Varchar,
        author_image -> Nullable<Varchar>,
        text -> Text,
        image -> Nullable<Varchar>,
        is_announcement -> Bool,
        like_count -> Integer,
        comment_count -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    likes (post_id, account_id) {
        post_id -> Varchar,
        account_id -> Varchar,
        created_at -> Timestamptz,
    }
}

table! {
    comments (id) {
        id -> Varchar,
        post_id -> Varchar,
        author_id -> Varchar,
        author_username -> Varchar,
        author_image -> Nullable<Varchar>,
        text -> Text,
        created_at -> Timestamptz,
    }
}

table! {
    conversations (id) {
        id -> Varchar,
        participant_one -> Varchar,
        participant_two -> Varchar,
        name_one -> Varchar,
        name_two -> Varchar,
        image_one -> Nullable<Varchar>,
        image_two -> Nullable<Varchar>,
        last_message -> Text,
        last_message_at -> Timestamptz,
        last_sender_id -> Nullable<Varchar>,
        unread_one -> Integer,
        unread_two -> Integer,
        created_at -> Timestamptz,
    }
}

table! {
    messages (id) {
        id -> Varchar,
        conversation_id -> Varchar,
        sender_id -> Varchar,
        text -> Text,
        image -> Nullable<Varchar>,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    boards (id) {
        id -> Varchar,
        owner_id -> Varchar,
        title -> Varchar,
        description -> Text,
        players -> Jsonb,
        movements -> Jsonb,
        image -> Nullable<Varchar>,
        is_shared -> Bool,
        created_at -> Timestamptz,
    }
}

allow_tables_to_appear_in_same_query!(
    accounts,
    posts,
    likes,
    comments,
    conversations,
    messages,
    boards,
);
