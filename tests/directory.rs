// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use handball_connect::error::Error;
use handball_connect::models::ProfileUpdate;
use handball_connect::repo::DirectoryRepo;

use common::{env, promote_to_admin, register};

#[tokio::test]
async fn register_login_authenticate_round_trip() {
    let env = env();
    let account = register(&env, "anna").await;

    let (logged_in, token) = env
        .stores
        .directory
        .login("anna@example.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(logged_in.id, account.id);

    let resolved = env.stores.directory.authenticate(&token).await.unwrap();
    assert_eq!(resolved.id, account.id);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let env = env();
    register(&env, "anna").await;

    let err = env
        .stores
        .directory
        .login("anna@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let env = env();
    register(&env, "anna").await;

    let err = env
        .stores
        .directory
        .register(handball_connect::models::NewAccount {
            username: "anna2".to_string(),
            email: "anna@example.com".to_string(),
            password: "correct-horse".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn disabled_accounts_cannot_log_in() {
    let env = env();
    let account = register(&env, "anna").await;
    env.repo.set_disabled(&account.id, true).await.unwrap();

    let err = env
        .stores
        .directory
        .login("anna@example.com", "correct-horse")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));
}

#[tokio::test]
async fn partial_profile_update_leaves_other_fields_alone() {
    let env = env();
    let account = register(&env, "anna").await;

    env.stores
        .directory
        .update_profile(
            &account.id,
            ProfileUpdate {
                position: Some("Left Wing".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let refreshed = env.stores.directory.account(&account.id).await.unwrap();
    assert_eq!(refreshed.username, "anna");
    assert_eq!(refreshed.position.as_deref(), Some("Left Wing"));
    assert_eq!(refreshed.experience, None);
}

#[tokio::test]
async fn password_reset_swaps_the_credential() {
    let env = env();
    let account = register(&env, "anna").await;

    // Unknown emails succeed without revealing anything.
    env.stores
        .directory
        .request_password_reset("nobody@example.com")
        .await
        .unwrap();

    let token = env.tokens.issue_reset(&account.id).unwrap();
    env.stores
        .directory
        .confirm_password_reset(&token, "new-password-1")
        .await
        .unwrap();

    assert!(env
        .stores
        .directory
        .login("anna@example.com", "correct-horse")
        .await
        .is_err());
    env.stores
        .directory
        .login("anna@example.com", "new-password-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn session_tokens_are_not_valid_for_resets() {
    let env = env();
    let account = register(&env, "anna").await;

    let session = env.tokens.issue_session(&account.id).unwrap();
    let err = env
        .stores
        .directory
        .confirm_password_reset(&session, "new-password-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));
}

#[tokio::test]
async fn admin_toggles_require_admin() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;

    let err = env
        .stores
        .admin
        .set_admin(&anna, &bert.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    let anna = promote_to_admin(&env, &anna).await;
    env.stores.admin.set_admin(&anna, &bert.id, true).await.unwrap();
    let bert = env.stores.directory.account(&bert.id).await.unwrap();
    assert!(bert.is_admin);

    // Admins cannot disable themselves.
    let err = env
        .stores
        .admin
        .set_disabled(&anna, &anna.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    env.stores
        .admin
        .set_disabled(&anna, &bert.id, true)
        .await
        .unwrap();
    let bert = env.stores.directory.account(&bert.id).await.unwrap();
    assert!(bert.is_disabled);
}

#[tokio::test]
async fn account_listing_is_admin_only() {
    let env = env();
    let anna = register(&env, "anna").await;
    register(&env, "bert").await;

    assert!(env.stores.admin.list_accounts(&anna).await.is_err());

    let anna = promote_to_admin(&env, &anna).await;
    let accounts = env.stores.admin.list_accounts(&anna).await.unwrap();
    assert_eq!(accounts.len(), 2);
}
