use tracing::{debug, error, info, warn};

use super::{CommandOutcome, GameFlowService};
use crate::domain::errors::RuleError;
use crate::domain::room::RoomId;
use crate::domain::turn;
use crate::error::AppError;

impl GameFlowService {
    /// Play automated turns until a human must act or the game ends.
    ///
    /// Each bot decision is its own committed and broadcast mutation. The
    /// caller must hold the room lock. Returns the number of steps taken.
    pub(super) async fn drive_automation(&self, room_id: RoomId) -> Result<usize, AppError> {
        let limit = self.config.max_automation_steps;
        let mut steps = 0;

        while steps < limit {
            let bot = self.bot.clone();
            let dice = self.dice.clone();
            let timing = self.timing;

            let outcome = self
                .commit_locked(room_id, move |room, now| {
                    if !room.in_progress() || !room.mover_is_automated() {
                        return Ok(Vec::new());
                    }
                    let action = bot
                        .choose_action(room)
                        .map_err(|e| RuleError::Automation(e.to_string()))?;
                    turn::apply_bot_action(room, action, dice.as_ref(), now, timing)
                })
                .await?;

            match outcome {
                CommandOutcome::Applied { .. } => steps += 1,
                CommandOutcome::Unchanged(_) => {
                    debug!(room_id, steps, "Automation idle");
                    return Ok(steps);
                }
                CommandOutcome::Rejected(e) => {
                    error!(room_id, steps, error = %e, "Bot chose an illegal action, stopping automation");
                    return Ok(steps);
                }
                CommandOutcome::Conflicted => return Ok(steps),
            }
        }

        warn!(room_id, steps, "Automation step limit reached");
        Ok(steps)
    }

    /// Drive automation if `outcome` left an automated mover in a live game.
    pub(super) async fn continue_with_automation(
        &self,
        room_id: RoomId,
        outcome: &CommandOutcome,
    ) -> Result<(), AppError> {
        let Some(room) = outcome.room() else {
            return Ok(());
        };
        if room.in_progress() && room.mover_is_automated() {
            let steps = self.drive_automation(room_id).await?;
            info!(room_id, steps, "Automated turns played");
        }
        Ok(())
    }
}
