//! Rule helpers shared by the human command path and automation.
//!
//! The bonus-turn rule and the three-sixes rule are defined here once;
//! `turn` applies them and bot strategies only read through them.

use time::Duration;

use crate::domain::board::{can_move, is_star_cell, Color};
use crate::domain::events::BonusReason;
use crate::domain::room::{Pawn, Room};

pub const SIX: u8 = 6;

/// Turn deadlines for human movers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTiming {
    /// Full window granted at turn start and on every bonus turn.
    pub window: Duration,
    /// Added to the running deadline on a six or a capture.
    pub extension: Duration,
}

impl Default for TurnTiming {
    fn default() -> Self {
        Self {
            window: Duration::seconds(15),
            extension: Duration::seconds(15),
        }
    }
}

/// The turn is forfeit once the last three pending rolls are all sixes.
pub fn three_sixes(history: &[u8]) -> bool {
    history.len() >= 3 && history[history.len() - 3..].iter().all(|&r| r == SIX)
}

/// A mover may roll while nothing is pending or the pending roll is a six.
pub fn may_roll(rolled: Option<u8>) -> bool {
    matches!(rolled, None | Some(SIX))
}

/// Canonical bonus-turn rule.
///
/// `remaining` is the roll history after the used roll was removed.
/// Returns the first reason that applies, or `None` if the turn rotates.
pub fn bonus_turn(
    chosen_roll: u8,
    remaining: &[u8],
    captured: bool,
    destination: u8,
) -> Option<BonusReason> {
    if chosen_roll == SIX {
        Some(BonusReason::Six)
    } else if remaining.contains(&SIX) {
        Some(BonusReason::PendingSix)
    } else if captured {
        Some(BonusReason::Capture)
    } else if is_star_cell(destination) {
        Some(BonusReason::StarCell)
    } else {
        None
    }
}

/// Pawns of `color` that can legally move `roll`.
pub fn movable_pawns(room: &Room, color: Color, roll: u8) -> Vec<&Pawn> {
    room.pawns_of(color).filter(|p| can_move(p, roll)).collect()
}

pub fn has_legal_move(room: &Room, color: Color, roll: u8) -> bool {
    room.pawns_of(color).any(|p| can_move(p, roll))
}

/// Rolls the mover may still spend, oldest first, without duplicates.
pub fn pending_rolls(room: &Room) -> Vec<u8> {
    let mut rolls: Vec<u8> = Vec::with_capacity(room.roll_history.len() + 1);
    for &r in room.roll_history.iter().chain(room.rolled_number.iter()) {
        if !rolls.contains(&r) {
            rolls.push(r);
        }
    }
    rolls
}

/// Whether `roll` may be spent right now.
pub fn is_pending(room: &Room, roll: u8) -> bool {
    room.rolled_number == Some(roll) || room.roll_history.contains(&roll)
}
