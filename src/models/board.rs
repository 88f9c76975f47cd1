// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player marker on the tactics board. Coordinates are normalized to
/// [0, 1] in court space; `id` is unique only within one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i32,
    pub x: f32,
    pub y: f32,
    pub number: i32,
    pub is_offense: bool,
    pub label: String,
}

/// A movement or pass arrow. `player_id` optionally ties the arrow to a
/// player; deleting that player removes the arrow as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i32,
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub player_id: Option<i32>,
    pub is_pass: bool,
}

/// A persisted tactics board document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub players: Vec<Player>,
    pub movements: Vec<Movement>,
    pub image: Option<String>,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
}

/// What a caller supplies when saving a board; the store fills in identity
/// and timestamps. `id: None` creates a new board. The rendered preview
/// image travels outside the JSON body, so it is skipped here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(skip)]
    pub snapshot: Option<Vec<u8>>,
    #[serde(default)]
    pub is_shared: bool,
}
