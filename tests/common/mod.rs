// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use std::io::Cursor;
use std::sync::Arc;

use image::DynamicImage;
use uuid::Uuid;

use handball_connect::auth::TokenIssuer;
use handball_connect::config::AuthConfig;
use handball_connect::images::ImageStore;
use handball_connect::models::{Account, NewAccount};
use handball_connect::repo::memory::MemoryRepo;
use handball_connect::stores::Stores;

/// Store bundle over the in-memory adapter, with direct repository and
/// token access for test setup.
pub struct TestEnv {
    pub stores: Stores,
    pub repo: Arc<MemoryRepo>,
    pub tokens: Arc<TokenIssuer>,
}

pub fn env() -> TestEnv {
    let repo = Arc::new(MemoryRepo::new());
    let root = std::env::temp_dir().join(format!("hc-int-test-{}", Uuid::new_v4()));
    let images = Arc::new(ImageStore::new(root));
    let tokens = Arc::new(TokenIssuer::new(&AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        session_ttl_hours: 1,
        reset_ttl_minutes: 5,
    }));
    TestEnv {
        stores: Stores::new(repo.clone(), images, tokens.clone()),
        repo,
        tokens,
    }
}

pub async fn register(env: &TestEnv, name: &str) -> Account {
    let (account, _token) = env
        .stores
        .directory
        .register(NewAccount {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "correct-horse".to_string(),
        })
        .await
        .expect("registration failed");
    account
}

/// Promote an account and return its refreshed record.
pub async fn promote_to_admin(env: &TestEnv, account: &Account) -> Account {
    use handball_connect::repo::DirectoryRepo;
    env.repo.set_admin(&account.id, true).await.unwrap();
    env.stores.directory.account(&account.id).await.unwrap()
}

/// A small valid PNG for upload paths.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
