//! Outbound broadcast boundary and the wire protocol for room sessions.

pub mod hub;
pub mod protocol;

use async_trait::async_trait;

use crate::domain::board::Color;
use crate::domain::room::{Room, RoomId};

pub use hub::RoomHub;
pub use protocol::{ClientMsg, GameCommand, MovePayload, ServerMsg};

/// Where committed room changes are announced.
///
/// Called with the room lock held, in commit order, so implementations must
/// not call back into the engine for the same room.
#[async_trait]
pub trait BroadcastSink: Send + Sync {
    async fn room_snapshot(&self, room: &Room);
    async fn dice_rolled(&self, room_id: RoomId, value: u8);
    async fn winner(&self, room_id: RoomId, color: Color);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl BroadcastSink for NullSink {
    async fn room_snapshot(&self, _room: &Room) {}
    async fn dice_rolled(&self, _room_id: RoomId, _value: u8) {}
    async fn winner(&self, _room_id: RoomId, _color: Color) {}
}
