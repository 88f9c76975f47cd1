// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Domain stores. Each store owns the business rules for one area —
//! permission checks, denormalized snapshots, validation, cascades — and
//! delegates persistence to its repository port. Writes publish change
//! events so live subscriptions re-emit.

mod admin;
mod directory;
mod feed;
mod messaging;
mod tactics;

pub use admin::AdminStore;
pub use directory::DirectoryStore;
pub use feed::FeedStore;
pub use messaging::MessagingStore;
pub use tactics::TacticsStore;

use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::images::ImageStore;
use crate::live::ChangeHub;
use crate::repo::{DirectoryRepo, FeedRepo, MessagingRepo, TacticsRepo};

/// The full store bundle wired over one repository adapter.
pub struct Stores {
    pub directory: DirectoryStore,
    pub admin: AdminStore,
    pub feed: FeedStore,
    pub messaging: MessagingStore,
    pub tactics: TacticsStore,
}

impl Stores {
    pub fn new<R>(repo: Arc<R>, images: Arc<ImageStore>, tokens: Arc<TokenIssuer>) -> Self
    where
        R: DirectoryRepo + FeedRepo + MessagingRepo + TacticsRepo + 'static,
    {
        let hub = Arc::new(ChangeHub::new());
        let directory: Arc<dyn DirectoryRepo> = repo.clone();
        let feed: Arc<dyn FeedRepo> = repo.clone();
        let messaging: Arc<dyn MessagingRepo> = repo.clone();
        let tactics: Arc<dyn TacticsRepo> = repo;

        Self {
            directory: DirectoryStore::new(
                directory.clone(),
                images.clone(),
                tokens,
                hub.clone(),
            ),
            admin: AdminStore::new(directory.clone(), hub.clone()),
            feed: FeedStore::new(feed, directory.clone(), images.clone(), hub.clone()),
            messaging: MessagingStore::new(messaging, directory, images.clone(), hub.clone()),
            tactics: TacticsStore::new(tactics, images, hub),
        }
    }
}
