//! Collaborators that remember what the engine told them.

use async_trait::async_trait;
use ludo_backend::domain::{Color, Room, RoomId};
use ludo_backend::error::AppError;
use ludo_backend::realtime::BroadcastSink;
use ludo_backend::services::settlement::SettlementHook;
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingSink {
    snapshots: Mutex<Vec<Room>>,
    dice: Mutex<Vec<(RoomId, u8)>>,
    winners: Mutex<Vec<(RoomId, Color)>>,
}

impl RecordingSink {
    pub fn snapshots(&self) -> Vec<Room> {
        self.snapshots.lock().clone()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn last_snapshot(&self) -> Option<Room> {
        self.snapshots.lock().last().cloned()
    }

    pub fn dice(&self) -> Vec<(RoomId, u8)> {
        self.dice.lock().clone()
    }

    pub fn winners(&self) -> Vec<(RoomId, Color)> {
        self.winners.lock().clone()
    }
}

#[async_trait]
impl BroadcastSink for RecordingSink {
    async fn room_snapshot(&self, room: &Room) {
        self.snapshots.lock().push(room.clone());
    }

    async fn dice_rolled(&self, room_id: RoomId, value: u8) {
        self.dice.lock().push((room_id, value));
    }

    async fn winner(&self, room_id: RoomId, color: Color) {
        self.winners.lock().push((room_id, color));
    }
}

#[derive(Default)]
pub struct RecordingSettlement {
    settled: Mutex<Vec<(RoomId, Color)>>,
}

impl RecordingSettlement {
    pub fn settled(&self) -> Vec<(RoomId, Color)> {
        self.settled.lock().clone()
    }
}

#[async_trait]
impl SettlementHook for RecordingSettlement {
    async fn settle_game(&self, room_id: RoomId, winner: Color) -> Result<(), AppError> {
        self.settled.lock().push((room_id, winner));
        Ok(())
    }
}
