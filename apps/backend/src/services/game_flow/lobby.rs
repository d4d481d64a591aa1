use tracing::info;
use ulid::Ulid;

use super::{CommandOutcome, GameFlowService, Joined};
use crate::domain::lobby;
use crate::domain::room::{Room, RoomId};
use crate::error::AppError;

const BOT_NAMES: [&str; 4] = ["Bolt", "Cog", "Sprocket", "Widget"];

impl GameFlowService {
    /// Create an empty lobby room.
    pub async fn create_room(&self, name: &str) -> Result<Room, AppError> {
        let room = self.gateway.create_room(Room::new(name)).await?;
        info!(room_id = room.id, name, "Room opened");
        self.sink.room_snapshot(&room).await;
        Ok(room)
    }

    /// Seat a human under a fresh player id.
    pub async fn join_room(&self, room_id: RoomId, name: &str) -> Result<Joined, AppError> {
        let player_id = Ulid::new().to_string();
        let _guard = self.locks.acquire(room_id).await;
        let outcome = self
            .commit_locked(room_id, |room, _now| {
                lobby::add_player(room, player_id.clone(), name, false)
            })
            .await?;
        Ok(Joined { player_id, outcome })
    }

    /// Seat a native bot. Bots join ready but do not start the game.
    pub async fn add_bot(&self, room_id: RoomId) -> Result<Joined, AppError> {
        let player_id = Ulid::new().to_string();
        let _guard = self.locks.acquire(room_id).await;
        let outcome = self
            .commit_locked(room_id, |room, _now| {
                let name = BOT_NAMES[room.players.len() % BOT_NAMES.len()];
                lobby::add_player(room, player_id.clone(), name, true)
            })
            .await?;
        Ok(Joined { player_id, outcome })
    }

    /// Toggle readiness; the second ready player starts the game.
    pub async fn set_ready(
        &self,
        room_id: RoomId,
        player_id: &str,
    ) -> Result<CommandOutcome, AppError> {
        let _guard = self.locks.acquire(room_id).await;
        let timing = self.timing;
        let outcome = self
            .commit_locked(room_id, |room, now| {
                lobby::toggle_ready(room, player_id, now, timing)
            })
            .await?;
        self.continue_with_automation(room_id, &outcome).await?;
        Ok(outcome)
    }

    /// Start once at least two players are ready.
    pub async fn start_game(&self, room_id: RoomId) -> Result<CommandOutcome, AppError> {
        let _guard = self.locks.acquire(room_id).await;
        let timing = self.timing;
        let outcome = self
            .commit_locked(room_id, |room, now| lobby::start_game(room, now, timing))
            .await?;
        self.continue_with_automation(room_id, &outcome).await?;
        Ok(outcome)
    }
}
