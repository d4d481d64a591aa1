//! Room, player and pawn records.
//!
//! These are plain serializable data. All rule-bearing mutation lives in
//! `domain::turn` and `domain::lobby`; helpers here only read.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::board::Color;

pub type RoomId = i64;
pub type PlayerId = String;
pub type PawnId = u8;

pub const MIN_PLAYERS_TO_START: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const PAWNS_PER_COLOR: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Color,
    pub is_bot: bool,
    pub ready: bool,
    pub now_moving: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pawn {
    /// Equal to the pawn's base slot, so ids are stable and unique per room.
    pub id: PawnId,
    pub color: Color,
    pub base_pos: u8,
    pub position: u8,
}

impl Pawn {
    pub fn in_base(&self) -> bool {
        self.position == self.base_pos
    }

    pub fn is_home(&self) -> bool {
        self.position == self.color.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Optimistic lock version; bumped by the store on every save.
    pub version: i32,
    pub players: Vec<Player>,
    pub pawns: Vec<Pawn>,
    pub started: bool,
    pub winner: Option<Color>,
    pub rolled_number: Option<u8>,
    pub roll_history: Vec<u8>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_move_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub bot_controlled_players: BTreeSet<PlayerId>,
}

impl Room {
    /// A fresh lobby with every color's pawns seeded at their base slots.
    ///
    /// `id` and `version` are placeholders until the store assigns them.
    pub fn new(name: impl Into<String>) -> Self {
        let pawns = Color::ALL
            .iter()
            .flat_map(|&color| {
                let first = color.first_base_slot();
                (first..first + PAWNS_PER_COLOR).map(move |slot| Pawn {
                    id: slot,
                    color,
                    base_pos: slot,
                    position: slot,
                })
            })
            .collect();

        Self {
            id: 0,
            name: name.into(),
            version: 0,
            players: Vec::new(),
            pawns,
            started: false,
            winner: None,
            rolled_number: None,
            roll_history: Vec::new(),
            next_move_time: None,
            bot_controlled_players: BTreeSet::new(),
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn mover_index(&self) -> Option<usize> {
        self.players.iter().position(|p| p.now_moving)
    }

    pub fn mover(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.now_moving)
    }

    pub fn pawn(&self, pawn_id: PawnId) -> Option<&Pawn> {
        self.pawns.iter().find(|p| p.id == pawn_id)
    }

    pub fn pawns_of(&self, color: Color) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.color == color)
    }

    /// Native bots and humans whose turns are being auto-played.
    pub fn is_automated(&self, player: &Player) -> bool {
        player.is_bot || self.bot_controlled_players.contains(&player.id)
    }

    /// True when the current mover is played by automation.
    pub fn mover_is_automated(&self) -> bool {
        self.mover().is_some_and(|p| self.is_automated(p))
    }

    /// A started room with no winner yet.
    pub fn in_progress(&self) -> bool {
        self.started && self.winner.is_none()
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            player_count: self.players.len(),
            started: self.started,
            winner: self.winner,
        }
    }
}

/// What room listings show; never used for turn logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub started: bool,
    pub winner: Option<Color>,
}
