//! Per-room metrics, tallied from the broadcasts the engine sends.

use async_trait::async_trait;
use dashmap::DashMap;
use ludo_backend::domain::{Color, Room, RoomId};
use ludo_backend::realtime::BroadcastSink;
use serde::Serialize;

/// Counters for one room, folded from consecutive snapshots.
#[derive(Debug, Clone, Default)]
pub struct RoomTally {
    last: Option<Room>,
    pub snapshots: u32,
    pub rolls: u32,
    pub sixes: u32,
    pub turns: u32,
    pub moves: u32,
    pub captures: u32,
    pub bonus_turns: u32,
    pub winner: Option<Color>,
}

impl RoomTally {
    fn observe(&mut self, room: &Room) {
        self.snapshots += 1;
        if let Some(prev) = self.last.as_ref() {
            let prev_mover = prev.mover().map(|p| p.id.as_str());
            let mover = room.mover().map(|p| p.id.as_str());

            let mover_color = prev.mover().map(|p| p.color);
            let moved = prev
                .pawns
                .iter()
                .zip(&room.pawns)
                .any(|(a, b)| Some(a.color) == mover_color && a.position != b.position);
            // only a capture sends a pawn back to its base slot
            let captured = prev
                .pawns
                .iter()
                .zip(&room.pawns)
                .filter(|(a, b)| !a.in_base() && b.in_base())
                .count();

            if moved {
                self.moves += 1;
                if prev_mover == mover && room.winner.is_none() {
                    self.bonus_turns += 1;
                }
            }
            self.captures += u32::try_from(captured).unwrap_or(u32::MAX);
            if prev_mover.is_some() && mover.is_some() && prev_mover != mover {
                self.turns += 1;
            }
        }
        self.last = Some(room.clone());
    }
}

/// Broadcast sink that only counts.
#[derive(Default)]
pub struct MetricsSink {
    rooms: DashMap<RoomId, RoomTally>,
}

impl MetricsSink {
    /// Remove and return the tally for a finished room.
    pub fn take(&self, room_id: RoomId) -> RoomTally {
        self.rooms
            .remove(&room_id)
            .map(|(_, tally)| tally)
            .unwrap_or_default()
    }
}

#[async_trait]
impl BroadcastSink for MetricsSink {
    async fn room_snapshot(&self, room: &Room) {
        self.rooms.entry(room.id).or_default().observe(room);
    }

    async fn dice_rolled(&self, room_id: RoomId, value: u8) {
        let mut tally = self.rooms.entry(room_id).or_default();
        tally.rolls += 1;
        if value == 6 {
            tally.sixes += 1;
        }
    }

    async fn winner(&self, room_id: RoomId, color: Color) {
        self.rooms.entry(room_id).or_default().winner = Some(color);
    }
}

/// One output record per simulated room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMetrics {
    pub room_id: RoomId,
    pub seed: u64,
    pub strategy: String,
    pub players: usize,
    pub winner: Option<String>,
    pub turns: u32,
    pub rolls: u32,
    pub sixes: u32,
    pub moves: u32,
    pub captures: u32,
    pub bonus_turns: u32,
    pub snapshots: u32,
    pub duration_ms: f64,
    pub timestamp: String,
}

impl RoomMetrics {
    pub fn from_tally(
        room_id: RoomId,
        seed: u64,
        strategy: &str,
        players: usize,
        tally: &RoomTally,
        duration_ms: f64,
    ) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            room_id,
            seed,
            strategy: strategy.to_string(),
            players,
            winner: tally.winner.map(|c| c.as_str().to_string()),
            turns: tally.turns,
            rolls: tally.rolls,
            sixes: tally.sixes,
            moves: tally.moves,
            captures: tally.captures,
            bonus_turns: tally.bonus_turns,
            snapshots: tally.snapshots,
            duration_ms,
            timestamp,
        }
    }
}

/// Flat CSV row.
#[derive(Debug, Clone, Serialize)]
pub struct CsvSummaryRow {
    pub room_id: RoomId,
    pub strategy: String,
    pub players: usize,
    pub winner: String,
    pub turns: u32,
    pub rolls: u32,
    pub captures: u32,
    pub bonus_turns: u32,
    pub duration_ms: f64,
}

impl From<&RoomMetrics> for CsvSummaryRow {
    fn from(m: &RoomMetrics) -> Self {
        Self {
            room_id: m.room_id,
            strategy: m.strategy.clone(),
            players: m.players,
            winner: m.winner.clone().unwrap_or_default(),
            turns: m.turns,
            rolls: m.rolls,
            captures: m.captures,
            bonus_turns: m.bonus_turns,
            duration_ms: m.duration_ms,
        }
    }
}
