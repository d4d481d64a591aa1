use std::sync::Weak;

use time::OffsetDateTime;
use tracing::{error, warn};

use super::{CommandOutcome, GameFlowService};
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::room::{Room, RoomId};
use crate::error::AppError;
use crate::services::room_gateway::Mutation;
use crate::services::turn_timers::DeadlineHandler;

impl GameFlowService {
    /// Run one mutation and, if it was saved, publish it.
    ///
    /// The caller must hold the room lock. `mutation` receives the freshly
    /// loaded room and the current time; it may run twice if the first save
    /// loses a version race.
    pub(super) async fn commit_locked<F>(
        &self,
        room_id: RoomId,
        mut mutation: F,
    ) -> Result<CommandOutcome, AppError>
    where
        F: FnMut(&mut Room, OffsetDateTime) -> Result<Vec<GameEvent>, RuleError> + Send,
    {
        let now = self.clock.now();
        let result = self
            .gateway
            .mutate(room_id, |room| mutation(room, now))
            .await?;

        Ok(match result {
            Mutation::Committed { room, events } => {
                self.after_commit(&room, &events).await;
                CommandOutcome::Applied { room, events }
            }
            Mutation::Unchanged { room } => CommandOutcome::Unchanged(room),
            Mutation::Rejected { room, error } => {
                warn!(room_id, version = room.version, %error, "Command rejected");
                CommandOutcome::Rejected(error)
            }
            Mutation::Conflicted => {
                error!(room_id, "Command abandoned after repeated save conflicts");
                CommandOutcome::Conflicted
            }
        })
    }

    /// Broadcast, reconcile the timer and settle, in that order.
    async fn after_commit(&self, room: &Room, events: &[GameEvent]) {
        for value in events.iter().filter_map(GameEvent::dice_value) {
            self.sink.dice_rolled(room.id, value).await;
        }
        self.sink.room_snapshot(room).await;
        let winner = events.iter().find_map(GameEvent::winner);
        if let Some(color) = winner {
            self.sink.winner(room.id, color).await;
        }

        self.reconcile_timer(room);

        if let Some(color) = winner {
            if let Err(e) = self.settlement.settle_game(room.id, color).await {
                error!(room_id = room.id, winner = %color, error = %e, "Settlement failed");
            }
        }
    }

    /// Cancel the room's timer, then arm it again for a human mover.
    pub(super) fn reconcile_timer(&self, room: &Room) {
        self.timers.cancel(room.id);
        if !room.in_progress() || room.mover_is_automated() {
            return;
        }
        if let Some(deadline) = room.next_move_time {
            let handler: Weak<dyn DeadlineHandler> = self.me.clone();
            self.timers.arm(room.id, deadline, handler);
        }
    }
}
