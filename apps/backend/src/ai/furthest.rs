//! Default bot: push the leading pawn.

use super::trait_def::{BotError, BotStrategy};
use crate::domain::board::progress;
use crate::domain::room::Room;
use crate::domain::rules::{movable_pawns, pending_rolls};
use crate::domain::turn::BotAction;

/// Spends pending rolls oldest first, always on the pawn furthest along its
/// route, and only rolls when no pending roll can move. Fully deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct Furthest;

impl Furthest {
    pub const NAME: &'static str = "furthest";
    pub const VERSION: &'static str = "1.0.0";
}

impl BotStrategy for Furthest {
    fn choose_action(&self, room: &Room) -> Result<BotAction, BotError> {
        let mover = room.mover().ok_or(BotError::NoMover)?;

        for roll in pending_rolls(room) {
            let movable = movable_pawns(room, mover.color, roll);
            // Lowest id wins ties; max_by_key keeps the last maximum.
            let best = movable
                .iter()
                .rev()
                .max_by_key(|p| progress(p))
                .map(|p| p.id);
            if let Some(pawn_id) = best {
                return Ok(BotAction::Move { pawn_id, roll });
            }
        }

        Ok(match room.rolled_number {
            None => BotAction::Roll,
            Some(_) => BotAction::Pass,
        })
    }
}
