use serde::{Deserialize, Serialize};

use crate::domain::board::Color;
use crate::domain::room::{PawnId, PlayerId};

/// Why a turn ended without the mover choosing to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEndReason {
    ThreeSixes,
    NoLegalMove,
}

/// Why the mover keeps the turn after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusReason {
    Six,
    PendingSix,
    Capture,
    StarCell,
}

/// Facts produced by one committed mutation, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerJoined {
        player_id: PlayerId,
        color: Color,
        is_bot: bool,
    },
    ReadyChanged {
        player_id: PlayerId,
        ready: bool,
    },
    GameStarted {
        first_mover: PlayerId,
    },
    MoverHealed {
        player_id: PlayerId,
    },
    DiceRolled {
        player_id: PlayerId,
        value: u8,
    },
    PawnMoved {
        pawn_id: PawnId,
        color: Color,
        from: u8,
        to: u8,
        roll: u8,
    },
    PawnCaptured {
        pawn_id: PawnId,
        color: Color,
        at: u8,
    },
    BonusTurn {
        player_id: PlayerId,
        reason: BonusReason,
    },
    TurnEnded {
        player_id: PlayerId,
        reason: TurnEndReason,
    },
    TurnChanged {
        player_id: PlayerId,
    },
    BotTakeover {
        player_id: PlayerId,
    },
    GameWon {
        color: Color,
    },
}

impl GameEvent {
    pub fn dice_value(&self) -> Option<u8> {
        match self {
            GameEvent::DiceRolled { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            GameEvent::GameWon { color } => Some(*color),
            _ => None,
        }
    }
}
