// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use handball_connect::error::Error;
use handball_connect::models::NewMessage;

use common::{env, png_bytes, register};

#[tokio::test]
async fn opening_a_thread_twice_converges_on_one_record() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;

    let from_anna = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();
    let from_bert = env
        .stores
        .messaging
        .get_or_create_conversation(&bert, &anna.id)
        .await
        .unwrap();

    assert_eq!(from_anna.id, from_bert.id);
    assert_eq!(env.stores.messaging.conversations(&anna.id).await.unwrap().len(), 1);
    assert_eq!(env.stores.messaging.conversations(&bert.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn self_conversations_are_rejected() {
    let env = env();
    let anna = register(&env, "anna").await;

    let err = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &anna.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn unknown_partners_are_a_not_found() {
    let env = env();
    let anna = register(&env, "anna").await;

    let err = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_, _)));
}

#[tokio::test]
async fn sending_bumps_only_the_recipient_counter() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let conversation = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();

    env.stores
        .messaging
        .send(&conversation.id, &anna, NewMessage::Text("hi".to_string()))
        .await
        .unwrap();

    let for_bert = &env.stores.messaging.conversations(&bert.id).await.unwrap()[0];
    assert_eq!(for_bert.unread_for(&bert.id), 1);
    assert_eq!(for_bert.unread_for(&anna.id), 0);
    assert_eq!(for_bert.last_message, "hi");
    assert_eq!(for_bert.last_sender_id.as_deref(), Some(anna.id.as_str()));

    assert_eq!(env.stores.messaging.unread_total(&bert.id).await.unwrap(), 1);
    assert_eq!(env.stores.messaging.unread_total(&anna.id).await.unwrap(), 0);
}

#[tokio::test]
async fn reading_a_thread_resets_only_the_readers_counter() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let conversation = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();

    env.stores
        .messaging
        .send(&conversation.id, &anna, NewMessage::Text("hi".to_string()))
        .await
        .unwrap();
    env.stores
        .messaging
        .send(&conversation.id, &bert, NewMessage::Text("hello".to_string()))
        .await
        .unwrap();

    // Both sides now have one unread message from the other.
    let messages = env
        .stores
        .messaging
        .messages(&conversation.id, &bert.id)
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    // The snapshot returned by the marking load already carries the
    // updated flag on the other side's message.
    assert_eq!(messages[0].text, "hi");
    assert!(messages[0].is_read);
    // Bert's own message stays unread until Anna opens the thread.
    assert!(!messages[1].is_read);

    let for_bert = &env.stores.messaging.conversations(&bert.id).await.unwrap()[0];
    assert_eq!(for_bert.unread_for(&bert.id), 0);
    // Anna has not opened the thread; her counter is untouched.
    assert_eq!(for_bert.unread_for(&anna.id), 1);
}

#[tokio::test]
async fn non_participants_cannot_read_or_send() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let carl = register(&env, "carl").await;
    let conversation = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();

    let err = env
        .stores
        .messaging
        .messages(&conversation.id, &carl.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    let err = env
        .stores
        .messaging
        .send(&conversation.id, &carl, NewMessage::Text("hi".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));
}

#[tokio::test]
async fn empty_text_messages_are_rejected() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let conversation = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();

    let err = env
        .stores
        .messaging
        .send(&conversation.id, &anna, NewMessage::Text("  ".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn image_messages_use_the_placeholder_preview() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let conversation = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();

    let message = env
        .stores
        .messaging
        .send(&conversation.id, &anna, NewMessage::Image(png_bytes()))
        .await
        .unwrap();
    assert_eq!(message.text, "[Image]");
    assert!(message.image.is_some());

    let for_bert = &env.stores.messaging.conversations(&bert.id).await.unwrap()[0];
    assert_eq!(for_bert.last_message, "[Image]");
}

#[tokio::test]
async fn conversations_sort_by_most_recent_message() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;
    let carl = register(&env, "carl").await;

    let with_bert = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &bert.id)
        .await
        .unwrap();
    let with_carl = env
        .stores
        .messaging
        .get_or_create_conversation(&anna, &carl.id)
        .await
        .unwrap();

    env.stores
        .messaging
        .send(&with_bert.id, &anna, NewMessage::Text("first".to_string()))
        .await
        .unwrap();
    env.stores
        .messaging
        .send(&with_carl.id, &anna, NewMessage::Text("second".to_string()))
        .await
        .unwrap();

    let list = env.stores.messaging.conversations(&anna.id).await.unwrap();
    assert_eq!(list[0].id, with_carl.id);
    assert_eq!(list[1].id, with_bert.id);
}
