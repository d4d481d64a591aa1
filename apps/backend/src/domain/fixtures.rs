//! Room fixtures for tests, demos and the simulator.
//!
//! The builder writes fields directly so tests can set up positions that
//! would take dozens of real turns to reach.

use time::OffsetDateTime;

use crate::domain::board::Color;
use crate::domain::lobby;
use crate::domain::room::{PawnId, Room};

pub struct RoomFixture {
    room: Room,
}

impl RoomFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            room: Room::new(name),
        }
    }

    /// Seat a human. Seats past the fourth are ignored.
    pub fn human(mut self, id: &str) -> Self {
        let _ = lobby::add_player(&mut self.room, id.to_string(), id, false);
        self
    }

    /// Seat a native bot. Seats past the fourth are ignored.
    pub fn bot(mut self, id: &str) -> Self {
        let _ = lobby::add_player(&mut self.room, id.to_string(), id, true);
        self
    }

    pub fn bot_controlled(mut self, id: &str) -> Self {
        self.room.bot_controlled_players.insert(id.to_string());
        self
    }

    /// Mark the room started with every player ready. The first player
    /// moves unless [`RoomFixture::mover`] picks someone else.
    pub fn started(mut self) -> Self {
        self.room.started = true;
        for p in self.room.players.iter_mut() {
            p.ready = true;
        }
        if self.room.mover_index().is_none() {
            if let Some(first) = self.room.players.first_mut() {
                first.now_moving = true;
            }
        }
        self
    }

    pub fn mover(mut self, id: &str) -> Self {
        for p in self.room.players.iter_mut() {
            p.now_moving = p.id == id;
        }
        self
    }

    pub fn pawn(mut self, pawn_id: PawnId, position: u8) -> Self {
        if let Some(p) = self.room.pawns.iter_mut().find(|p| p.id == pawn_id) {
            p.position = position;
        }
        self
    }

    /// Put every pawn of `color` on its finish except `pawn_id`.
    pub fn nearly_finished(mut self, color: Color, pawn_id: PawnId, position: u8) -> Self {
        for p in self.room.pawns.iter_mut().filter(|p| p.color == color) {
            p.position = if p.id == pawn_id {
                position
            } else {
                color.finish()
            };
        }
        self
    }

    /// Pending rolls; the last entry becomes the current roll.
    pub fn rolls(mut self, history: &[u8]) -> Self {
        self.room.roll_history = history.to_vec();
        self.room.rolled_number = history.last().copied();
        self
    }

    pub fn deadline(mut self, at: OffsetDateTime) -> Self {
        self.room.next_move_time = Some(at);
        self
    }

    pub fn build(self) -> Room {
        self.room
    }
}
