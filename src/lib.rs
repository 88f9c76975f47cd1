// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod live;
pub mod models;
pub mod repo;
pub mod schema;
pub mod stores;
