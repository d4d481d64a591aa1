//! Post-game settlement boundary.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::board::Color;
use crate::domain::room::RoomId;
use crate::error::AppError;

/// Called once per finished room, after the winning save commits.
#[async_trait]
pub trait SettlementHook: Send + Sync {
    async fn settle_game(&self, room_id: RoomId, winner: Color) -> Result<(), AppError>;
}

/// Settlement that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSettlement;

#[async_trait]
impl SettlementHook for NoopSettlement {
    async fn settle_game(&self, room_id: RoomId, winner: Color) -> Result<(), AppError> {
        debug!(room_id, winner = %winner, "Settlement skipped");
        Ok(())
    }
}
