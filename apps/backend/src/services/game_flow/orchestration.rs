use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info};

use super::{CommandOutcome, GameFlowService};
use crate::domain::room::{Room, RoomId, RoomSummary};
use crate::domain::turn;
use crate::error::AppError;

fn deadline_passed(room: &Room, now: OffsetDateTime) -> bool {
    room.in_progress() && room.next_move_time.is_some_and(|d| d <= now)
}

impl GameFlowService {
    /// Fresh read of one room.
    ///
    /// A read never mutates, with one exception: a live room whose deadline
    /// already passed (its timer was lost, e.g. across a restart) gets the
    /// timeout path applied before it is returned.
    pub async fn get_room(&self, room_id: RoomId) -> Result<Room, AppError> {
        let room = self.gateway.require_room(room_id).await?;
        if !deadline_passed(&room, self.clock.now()) {
            return Ok(room);
        }

        let _guard = self.locks.acquire(room_id).await;
        info!(room_id, "Applying overdue deadline on read");
        self.expire_and_drive(room_id).await?;
        self.gateway.require_room(room_id).await
    }

    /// Room summaries for listings. May be up to the cache TTL stale.
    pub async fn list_rooms(&self) -> Result<Arc<Vec<RoomSummary>>, AppError> {
        self.gateway.list_rooms().await
    }

    /// Timer callback body: re-check the room under its lock.
    pub(super) async fn handle_deadline(&self, room_id: RoomId) -> Result<(), AppError> {
        let _guard = self.locks.acquire(room_id).await;
        self.expire_and_drive(room_id).await
    }

    /// Apply the timeout path if the room's deadline has really passed,
    /// then let automation play. Caller holds the room lock.
    async fn expire_and_drive(&self, room_id: RoomId) -> Result<(), AppError> {
        let outcome = self
            .commit_locked(room_id, |room, now| turn::expire_turn(room, now))
            .await?;
        if !outcome.is_applied() {
            debug!(room_id, "Deadline no longer due, nothing to do");
            return Ok(());
        }
        self.continue_with_automation(room_id, &outcome).await
    }

    /// Pick live rooms back up after a restart: overdue turns are expired,
    /// automated movers are driven, and human deadlines get a timer again.
    ///
    /// Returns how many live rooms were found.
    pub async fn resume_rooms(&self) -> Result<usize, AppError> {
        let summaries = self.gateway.list_rooms_fresh().await?;
        let mut live = 0;
        for summary in summaries.iter().filter(|s| s.started && s.winner.is_none()) {
            let _guard = self.locks.acquire(summary.id).await;
            let Some(room) = self.gateway.load_room(summary.id).await? else {
                continue;
            };
            if !room.in_progress() {
                continue;
            }
            live += 1;
            if deadline_passed(&room, self.clock.now()) {
                self.expire_and_drive(room.id).await?;
            } else if room.mover_is_automated() {
                let outcome = CommandOutcome::Unchanged(room);
                self.continue_with_automation(summary.id, &outcome).await?;
            } else {
                self.reconcile_timer(&room);
            }
        }
        info!(live, "Rooms resumed");
        Ok(live)
    }
}
