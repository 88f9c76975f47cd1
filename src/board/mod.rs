// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! The client-local tactics board editor. All edits mutate in-memory lists
//! only; persisting goes through the tactics store with the editor's
//! current snapshot.

mod formations;
pub mod geometry;

pub use formations::Formation;

use crate::models::{Board, Movement, Player};

/// Editable board state, seeded either from the default formation or from a
/// loaded board document.
#[derive(Debug, Clone)]
pub struct BoardEditor {
    board_id: Option<String>,
    players: Vec<Player>,
    movements: Vec<Movement>,
}

impl Default for BoardEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardEditor {
    /// A fresh board with the default formation and no arrows.
    pub fn new() -> Self {
        Self {
            board_id: None,
            players: Formation::default().players(),
            movements: Vec::new(),
        }
    }

    /// Editor seeded from an existing board; saving will update it in place.
    pub fn from_board(board: &Board) -> Self {
        Self {
            board_id: Some(board.id.clone()),
            players: board.players.clone(),
            movements: board.movements.clone(),
        }
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Move an existing player, or add the supplied player if the id is new.
    pub fn upsert_player(&mut self, player: Player) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Add a player with the next free id within this board.
    pub fn add_player(&mut self, x: f32, y: f32, number: i32, is_offense: bool, label: &str) -> i32 {
        let id = next_id(self.players.iter().map(|p| p.id));
        self.players.push(Player {
            id,
            x,
            y,
            number,
            is_offense,
            label: label.to_string(),
        });
        id
    }

    /// Remove a player and cascade to every arrow owned by it.
    pub fn remove_player(&mut self, player_id: i32) {
        self.players.retain(|p| p.id != player_id);
        self.movements.retain(|m| m.player_id != Some(player_id));
    }

    /// Add an arrow with the next free id within this board.
    #[allow(clippy::too_many_arguments)]
    pub fn add_movement(
        &mut self,
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        player_id: Option<i32>,
        is_pass: bool,
    ) -> i32 {
        let id = next_id(self.movements.iter().map(|m| m.id));
        self.movements.push(Movement {
            id,
            start_x,
            start_y,
            end_x,
            end_y,
            player_id,
            is_pass,
        });
        id
    }

    pub fn update_movement(&mut self, movement: Movement) {
        if let Some(existing) = self.movements.iter_mut().find(|m| m.id == movement.id) {
            *existing = movement;
        }
    }

    pub fn remove_movement(&mut self, movement_id: i32) {
        self.movements.retain(|m| m.id != movement_id);
    }

    /// Replace the entire player list with a template formation and clear
    /// all arrows.
    pub fn apply_template(&mut self, formation: Formation) {
        self.players = formation.players();
        self.movements.clear();
    }
}

fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_editor_starts_from_the_default_formation() {
        let editor = BoardEditor::new();
        assert_eq!(editor.players(), Formation::SixZero.players().as_slice());
        assert!(editor.movements().is_empty());
        assert!(editor.board_id().is_none());
    }

    #[test]
    fn removing_a_player_cascades_to_owned_arrows_only() {
        let mut editor = BoardEditor::new();
        let owned = editor.add_movement(0.2, 0.5, 0.4, 0.5, Some(1), false);
        let owned_too = editor.add_movement(0.2, 0.5, 0.3, 0.2, Some(1), true);
        let unrelated = editor.add_movement(0.3, 0.3, 0.5, 0.3, Some(2), false);
        let free = editor.add_movement(0.1, 0.1, 0.9, 0.9, None, true);

        editor.remove_player(1);

        assert!(editor.players().iter().all(|p| p.id != 1));
        let remaining: Vec<i32> = editor.movements().iter().map(|m| m.id).collect();
        assert!(!remaining.contains(&owned));
        assert!(!remaining.contains(&owned_too));
        assert!(remaining.contains(&unrelated));
        assert!(remaining.contains(&free));
        // Untouched players survive.
        assert_eq!(editor.players().len(), 11);
    }

    #[test]
    fn applying_a_template_replaces_players_and_clears_arrows() {
        let mut editor = BoardEditor::new();
        editor.add_movement(0.0, 0.0, 1.0, 1.0, None, false);
        editor.add_player(0.5, 0.5, 9, true, "X");

        editor.apply_template(Formation::ThreeTwoOne);

        assert_eq!(editor.players(), Formation::ThreeTwoOne.players().as_slice());
        assert!(editor.movements().is_empty());
    }

    #[test]
    fn ids_are_assigned_max_plus_one() {
        let mut editor = BoardEditor::new();
        // Default formation tops out at id 12.
        assert_eq!(editor.add_player(0.5, 0.5, 7, true, "X"), 13);
        editor.remove_player(13);
        // Ids are not recycled below the current maximum.
        assert_eq!(editor.add_player(0.5, 0.5, 7, true, "Y"), 13);

        assert_eq!(editor.add_movement(0.0, 0.0, 1.0, 1.0, None, false), 1);
        assert_eq!(editor.add_movement(0.0, 0.0, 1.0, 1.0, None, true), 2);
    }

    #[test]
    fn moving_a_player_keeps_the_list_stable() {
        let mut editor = BoardEditor::new();
        let mut moved = editor.players()[0].clone();
        moved.x = 0.42;
        moved.y = 0.24;
        editor.upsert_player(moved.clone());

        assert_eq!(editor.players().len(), 12);
        assert_eq!(editor.players()[0], moved);
    }

    #[test]
    fn editor_from_board_round_trips_lists() {
        let mut source = BoardEditor::new();
        source.add_movement(0.1, 0.2, 0.3, 0.4, Some(3), true);

        let board = crate::models::Board {
            id: "b1".to_string(),
            owner_id: "acct".to_string(),
            title: "wing play".to_string(),
            description: String::new(),
            players: source.players().to_vec(),
            movements: source.movements().to_vec(),
            image: None,
            is_shared: false,
            created_at: chrono::Utc::now(),
        };

        let editor = BoardEditor::from_board(&board);
        assert_eq!(editor.board_id(), Some("b1"));
        assert_eq!(editor.players(), board.players.as_slice());
        assert_eq!(editor.movements(), board.movements.as_slice());
    }
}
