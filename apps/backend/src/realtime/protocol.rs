use serde::{Deserialize, Serialize};

use crate::domain::board::Color;
use crate::domain::room::{PawnId, Room, RoomId};

/// Move payload as clients send it: either a bare pawn id or an object
/// naming the pawn and, optionally, which pending roll to spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovePayload {
    Pawn(PawnId),
    #[serde(rename_all = "camelCase")]
    Detailed {
        pawn_id: PawnId,
        #[serde(default)]
        roll_number: Option<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Roll { room_id: RoomId },
    Move { room_id: RoomId, payload: MovePayload },
}

/// A turn command after payload normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Roll,
    Move {
        pawn_id: PawnId,
        chosen_roll: Option<u8>,
    },
}

impl MovePayload {
    /// `rollNumber: 0` is what older clients send for "current roll".
    pub fn normalize(&self) -> GameCommand {
        match *self {
            MovePayload::Pawn(pawn_id) => GameCommand::Move {
                pawn_id,
                chosen_roll: None,
            },
            MovePayload::Detailed {
                pawn_id,
                roll_number,
            } => GameCommand::Move {
                pawn_id,
                chosen_roll: roll_number.filter(|r| *r != 0),
            },
        }
    }
}

impl ClientMsg {
    pub fn room_id(&self) -> RoomId {
        match self {
            ClientMsg::Roll { room_id } | ClientMsg::Move { room_id, .. } => *room_id,
        }
    }

    pub fn into_command(self) -> (RoomId, GameCommand) {
        match self {
            ClientMsg::Roll { room_id } => (room_id, GameCommand::Roll),
            ClientMsg::Move { room_id, payload } => (room_id, payload.normalize()),
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    RoomData { room: Room },
    DiceRolled { room_id: RoomId, value: u8 },
    Winner { room_id: RoomId, color: Color },
}
