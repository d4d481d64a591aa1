//! In-process fan-out of room events to subscribers.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::trace;

use super::protocol::ServerMsg;
use super::BroadcastSink;
use crate::domain::board::Color;
use crate::domain::room::{Room, RoomId};

const DEFAULT_CAPACITY: usize = 256;

/// One broadcast channel per room with at least one subscriber.
pub struct RoomHub {
    channels: DashMap<RoomId, broadcast::Sender<ServerMsg>>,
    capacity: usize,
}

impl RoomHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is the per-room backlog; slow subscribers beyond it see `Lagged`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, room_id: RoomId) -> broadcast::Receiver<ServerMsg> {
        self.channels
            .entry(room_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Forget rooms whose subscribers have all gone away.
    pub fn prune(&self) {
        self.channels.retain(|_, tx| tx.receiver_count() > 0);
    }

    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.channels
            .get(&room_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn send(&self, room_id: RoomId, msg: ServerMsg) {
        if let Some(tx) = self.channels.get(&room_id) {
            // Err only means nobody is listening right now.
            if tx.send(msg).is_err() {
                trace!(room_id, "No subscribers for room");
            }
        }
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BroadcastSink for RoomHub {
    async fn room_snapshot(&self, room: &Room) {
        self.send(room.id, ServerMsg::RoomData { room: room.clone() });
    }

    async fn dice_rolled(&self, room_id: RoomId, value: u8) {
        self.send(room_id, ServerMsg::DiceRolled { room_id, value });
    }

    async fn winner(&self, room_id: RoomId, color: Color) {
        self.send(room_id, ServerMsg::Winner { room_id, color });
    }
}
