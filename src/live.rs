// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Live query support: a broadcast hub of change events plus watch-channel
//! subscriptions that re-run their query and re-emit the full result set on
//! every relevant change.

use std::future::Future;

use futures::Stream;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;

/// A change notification published by a store after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Feed,
    Post(String),
    Comments(String),
    Accounts,
    Account(String),
    /// Keyed by participant account id.
    Conversations(String),
    /// Keyed by conversation id.
    Messages(String),
    Boards,
}

/// View state for list subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ListState<T> {
    Loading,
    Empty,
    Success(Vec<T>),
    Error(String),
}

impl<T> ListState<T> {
    fn from_result(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => ListState::Empty,
            Ok(items) => ListState::Success(items),
            Err(err) => ListState::Error(err.to_string()),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Success(items) => items,
            _ => &[],
        }
    }
}

/// View state for single-document subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum DocState<T> {
    Loading,
    Success(T),
    Missing,
    Error(String),
}

impl<T> DocState<T> {
    fn from_result(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(doc)) => DocState::Success(doc),
            Ok(None) => DocState::Missing,
            Err(err) => DocState::Error(err.to_string()),
        }
    }
}

/// Fan-out point for change events. One hub is shared by all stores.
#[derive(Debug)]
pub struct ChangeHub {
    tx: broadcast::Sender<Change>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn publish(&self, change: Change) {
        debug!(?change, "publishing change");
        let _ = self.tx.send(change);
    }

    pub fn watch(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

/// A standing subscription. The refresh task lives exactly as long as this
/// handle; dropping it is the unsubscribe.
pub struct Live<S> {
    rx: watch::Receiver<S>,
    task: JoinHandle<()>,
}

impl<S: Clone + Send + Sync + 'static> Live<S> {
    /// The most recently emitted state.
    pub fn current(&self) -> S {
        self.rx.borrow().clone()
    }

    /// Wait for the next emission. Returns `None` once the subscription has
    /// shut down.
    pub async fn changed(&mut self) -> Option<S> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }

    /// Consume the handle as a stream of emissions, starting with the
    /// current state. The refresh task is torn down when the stream drops.
    pub fn into_stream(self) -> impl Stream<Item = S> + Send {
        futures::stream::unfold((self, true), |(mut live, first)| async move {
            if first {
                let state = live.current();
                return Some((state, (live, false)));
            }
            live.changed().await.map(|state| (state, (live, false)))
        })
    }
}

impl<S> Drop for Live<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a list subscription: initial load, then reload on every change
/// accepted by `relevant`.
pub(crate) fn spawn_list<T, P, F, Fut>(hub: &ChangeHub, relevant: P, reload: F) -> Live<ListState<T>>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&Change) -> bool + Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send,
{
    let (tx, rx) = watch::channel(ListState::Loading);
    let mut changes = hub.watch();
    let task = tokio::spawn(async move {
        if tx.send(ListState::from_result(reload().await)).is_err() {
            return;
        }
        loop {
            let refresh = match changes.recv().await {
                Ok(change) => relevant(&change),
                // Missed notifications; resync unconditionally.
                Err(broadcast::error::RecvError::Lagged(_)) => true,
                Err(broadcast::error::RecvError::Closed) => return,
            };
            if refresh && tx.send(ListState::from_result(reload().await)).is_err() {
                return;
            }
        }
    });
    Live { rx, task }
}

/// Spawn a single-document subscription.
pub(crate) fn spawn_doc<T, P, F, Fut>(hub: &ChangeHub, relevant: P, reload: F) -> Live<DocState<T>>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&Change) -> bool + Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<T>>> + Send,
{
    let (tx, rx) = watch::channel(DocState::Loading);
    let mut changes = hub.watch();
    let task = tokio::spawn(async move {
        if tx.send(DocState::from_result(reload().await)).is_err() {
            return;
        }
        loop {
            let refresh = match changes.recv().await {
                Ok(change) => relevant(&change),
                Err(broadcast::error::RecvError::Lagged(_)) => true,
                Err(broadcast::error::RecvError::Closed) => return,
            };
            if refresh && tx.send(DocState::from_result(reload().await)).is_err() {
                return;
            }
        }
    });
    Live { rx, task }
}
