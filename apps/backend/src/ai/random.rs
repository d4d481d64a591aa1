//! Random bot - picks uniformly among legal moves.

use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::trait_def::{BotError, BotStrategy};
use crate::domain::room::Room;
use crate::domain::rules::{movable_pawns, pending_rolls};
use crate::domain::turn::BotAction;

/// Bot that makes random legal moves.
///
/// Like [`super::Furthest`] it rolls only when no pending roll can move;
/// only the choice of pawn and roll is random. Seeded bots replay identically.
pub struct RandomBot {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomBot {
    pub const NAME: &'static str = "random";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl BotStrategy for RandomBot {
    fn choose_action(&self, room: &Room) -> Result<BotAction, BotError> {
        let mover = room.mover().ok_or(BotError::NoMover)?;

        let options: Vec<BotAction> = pending_rolls(room)
            .into_iter()
            .flat_map(|roll| {
                movable_pawns(room, mover.color, roll)
                    .into_iter()
                    .map(move |p| BotAction::Move { pawn_id: p.id, roll })
            })
            .collect();

        let mut rng = self.rng.lock();
        if let Some(action) = options.choose(&mut *rng) {
            return Ok(*action);
        }
        Ok(match room.rolled_number {
            None => BotAction::Roll,
            Some(_) => BotAction::Pass,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::RoomFixture;

    #[test]
    fn only_picks_legal_moves() {
        let room = RoomFixture::new("r")
            .bot("b")
            .human("h")
            .started()
            .pawn(0, 20)
            .pawn(1, 72)
            .rolls(&[3])
            .build();
        let bot = RandomBot::new(Some(9));
        for _ in 0..32 {
            // Pawn 1 would overshoot with a 3; base pawns need a six.
            assert_eq!(
                bot.choose_action(&room).unwrap(),
                BotAction::Move { pawn_id: 0, roll: 3 }
            );
        }
    }

    #[test]
    fn spends_a_six_instead_of_rolling_again() {
        let room = RoomFixture::new("r")
            .bot("b")
            .human("h")
            .started()
            .rolls(&[6])
            .build();
        let bot = RandomBot::new(Some(3));
        assert!(matches!(
            bot.choose_action(&room).unwrap(),
            BotAction::Move { roll: 6, .. }
        ));
    }

    #[test]
    fn same_seed_same_choices() {
        let room = RoomFixture::new("r")
            .bot("b")
            .human("h")
            .started()
            .pawn(0, 20)
            .pawn(1, 30)
            .pawn(2, 40)
            .rolls(&[2])
            .build();
        let a = RandomBot::new(Some(42));
        let b = RandomBot::new(Some(42));
        let xs: Vec<BotAction> = (0..16).map(|_| a.choose_action(&room).unwrap()).collect();
        let ys: Vec<BotAction> = (0..16).map(|_| b.choose_action(&room).unwrap()).collect();
        assert_eq!(xs, ys);
    }
}
