use tracing::debug;

use super::{CommandOutcome, GameFlowService};
use crate::domain::room::{PawnId, RoomId};
use crate::domain::turn::{self, Actor};
use crate::error::AppError;
use crate::realtime::protocol::{ClientMsg, GameCommand};

impl GameFlowService {
    /// Roll for `player_id`, then let automation take any turns that follow.
    pub async fn roll(&self, room_id: RoomId, player_id: &str) -> Result<CommandOutcome, AppError> {
        self.execute(room_id, player_id, GameCommand::Roll).await
    }

    /// Move a pawn with `chosen_roll`, or with the current roll when `None`.
    pub async fn move_pawn(
        &self,
        room_id: RoomId,
        player_id: &str,
        pawn_id: PawnId,
        chosen_roll: Option<u8>,
    ) -> Result<CommandOutcome, AppError> {
        self.execute(
            room_id,
            player_id,
            GameCommand::Move {
                pawn_id,
                chosen_roll,
            },
        )
        .await
    }

    /// Entry point for transport sessions that already resolved the actor.
    pub async fn submit(&self, player_id: &str, msg: ClientMsg) -> Result<CommandOutcome, AppError> {
        let (room_id, command) = msg.into_command();
        self.execute(room_id, player_id, command).await
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        player_id: &str,
        command: GameCommand,
    ) -> Result<CommandOutcome, AppError> {
        debug!(room_id, player_id, ?command, "Turn command");
        let _guard = self.locks.acquire(room_id).await;

        let dice = self.dice.clone();
        let timing = self.timing;
        let outcome = self
            .commit_locked(room_id, |room, now| match command {
                GameCommand::Roll => {
                    turn::roll(room, Actor::Player(player_id), dice.as_ref(), now, timing)
                }
                GameCommand::Move {
                    pawn_id,
                    chosen_roll,
                } => turn::move_pawn(room, Actor::Player(player_id), pawn_id, chosen_roll, now, timing),
            })
            .await?;

        self.continue_with_automation(room_id, &outcome).await?;
        Ok(outcome)
    }
}
