// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

//! Named tactical formations. These are fixed data, not computed; the
//! coordinates mirror a standard court layout with offense on the left.

use crate::models::Player;

/// The template formations the editor can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formation {
    #[default]
    SixZero,
    FiveOne,
    ThreeTwoOne,
    FastBreak,
}

impl Formation {
    /// Parse a template name; unknown names fall back to the default 6-0.
    pub fn from_name(name: &str) -> Formation {
        match name {
            "6-0" => Formation::SixZero,
            "5-1" => Formation::FiveOne,
            "3-2-1" => Formation::ThreeTwoOne,
            "fast-break" | "fastbreak" => Formation::FastBreak,
            _ => Formation::SixZero,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Formation::SixZero => "6-0",
            Formation::FiveOne => "5-1",
            Formation::ThreeTwoOne => "3-2-1",
            Formation::FastBreak => "fast-break",
        }
    }

    /// The full player list for this formation (offense plus defense).
    pub fn players(self) -> Vec<Player> {
        match self {
            Formation::SixZero => [standard_offense(), six_zero_defense()].concat(),
            Formation::FiveOne => [standard_offense(), five_one_defense()].concat(),
            Formation::ThreeTwoOne => [standard_offense(), three_two_one_defense()].concat(),
            Formation::FastBreak => [fast_break_offense(), fast_break_defense()].concat(),
        }
    }
}

fn player(id: i32, x: f32, y: f32, number: i32, is_offense: bool, label: &str) -> Player {
    Player {
        id,
        x,
        y,
        number,
        is_offense,
        label: label.to_string(),
    }
}

fn standard_offense() -> Vec<Player> {
    vec![
        player(1, 0.2, 0.5, 1, true, "LW"),
        player(2, 0.3, 0.3, 2, true, "LB"),
        player(3, 0.3, 0.5, 3, true, "CB"),
        player(4, 0.3, 0.7, 4, true, "RB"),
        player(5, 0.2, 0.9, 5, true, "RW"),
        player(6, 0.15, 0.5, 6, true, "P"),
    ]
}

fn six_zero_defense() -> Vec<Player> {
    vec![
        player(7, 0.8, 0.3, 1, false, "LD"),
        player(8, 0.8, 0.4, 2, false, "LHD"),
        player(9, 0.8, 0.5, 3, false, "CHD"),
        player(10, 0.8, 0.6, 4, false, "RHD"),
        player(11, 0.8, 0.7, 5, false, "RD"),
        player(12, 0.9, 0.5, 12, false, "GK"),
    ]
}

fn five_one_defense() -> Vec<Player> {
    vec![
        player(7, 0.8, 0.25, 1, false, "LD"),
        player(8, 0.8, 0.4, 2, false, "LHD"),
        player(9, 0.8, 0.5, 3, false, "CHD"),
        player(10, 0.8, 0.6, 4, false, "RHD"),
        player(11, 0.8, 0.75, 5, false, "RD"),
        player(12, 0.9, 0.5, 12, false, "GK"),
        // Advanced defender in front of the wall.
        player(13, 0.7, 0.5, 6, false, "AD"),
    ]
}

fn three_two_one_defense() -> Vec<Player> {
    vec![
        // Back row of three.
        player(7, 0.85, 0.3, 1, false, "LD"),
        player(8, 0.85, 0.5, 2, false, "CD"),
        player(9, 0.85, 0.7, 3, false, "RD"),
        // Middle row of two.
        player(10, 0.75, 0.35, 4, false, "LM"),
        player(11, 0.75, 0.65, 5, false, "RM"),
        // Point defender.
        player(12, 0.65, 0.5, 6, false, "FD"),
        player(13, 0.9, 0.5, 12, false, "GK"),
    ]
}

fn fast_break_offense() -> Vec<Player> {
    vec![
        player(1, 0.5, 0.2, 1, true, "LW"),
        player(2, 0.6, 0.4, 2, true, "LB"),
        player(3, 0.7, 0.5, 3, true, "CB"),
        player(4, 0.6, 0.6, 4, true, "RB"),
        player(5, 0.5, 0.8, 5, true, "RW"),
        player(6, 0.4, 0.5, 6, true, "P"),
    ]
}

fn fast_break_defense() -> Vec<Player> {
    // Defense caught scattered on the retreat.
    vec![
        player(7, 0.3, 0.2, 1, false, "D1"),
        player(8, 0.2, 0.4, 2, false, "D2"),
        player(9, 0.1, 0.5, 3, false, "D3"),
        player(10, 0.2, 0.6, 4, false, "D4"),
        player(11, 0.3, 0.8, 5, false, "D5"),
        player(12, 0.9, 0.5, 12, false, "GK"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_formation_has_unique_player_ids() {
        for formation in [
            Formation::SixZero,
            Formation::FiveOne,
            Formation::ThreeTwoOne,
            Formation::FastBreak,
        ] {
            let players = formation.players();
            let ids: HashSet<i32> = players.iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), players.len(), "{formation:?} has duplicate ids");
        }
    }

    #[test]
    fn formation_sizes() {
        assert_eq!(Formation::SixZero.players().len(), 12);
        assert_eq!(Formation::FiveOne.players().len(), 13);
        assert_eq!(Formation::ThreeTwoOne.players().len(), 13);
        assert_eq!(Formation::FastBreak.players().len(), 12);
    }

    #[test]
    fn unknown_names_fall_back_to_six_zero() {
        assert_eq!(Formation::from_name("4-2"), Formation::SixZero);
        assert_eq!(Formation::from_name("fastbreak"), Formation::FastBreak);
        assert_eq!(Formation::from_name("3-2-1"), Formation::ThreeTwoOne);
    }

    #[test]
    fn coordinates_are_normalized() {
        for formation in [
            Formation::SixZero,
            Formation::FiveOne,
            Formation::ThreeTwoOne,
            Formation::FastBreak,
        ] {
            for p in formation.players() {
                assert!((0.0..=1.0).contains(&p.x), "{formation:?} {}", p.label);
                assert!((0.0..=1.0).contains(&p.y), "{formation:?} {}", p.label);
            }
        }
    }
}
