//! Per-room turn deadline timers.
//!
//! At most one timer is armed per room. Arming cancels the previous timer
//! first, and a timer that fires after being superseded does nothing: each
//! entry carries a generation, and only the task whose generation is still
//! registered may call the handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::domain::room::RoomId;
use crate::services::clock::{until, Clock};

/// Receives fired deadlines. It must re-check the room itself; a fired
/// timer only says "look again", never "the turn has expired".
#[async_trait]
pub trait DeadlineHandler: Send + Sync {
    async fn on_deadline(&self, room_id: RoomId);
}

struct TimerEntry {
    generation: u64,
    deadline: OffsetDateTime,
    cancel: CancellationToken,
}

pub struct TurnTimers {
    entries: Arc<DashMap<RoomId, TimerEntry>>,
    next_generation: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl TurnTimers {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(1),
            clock,
        }
    }

    /// Arm the room's timer for `deadline`, replacing any armed one.
    ///
    /// Holds only a weak reference to `handler` so pending timers never
    /// keep a dropped engine alive.
    pub fn arm(&self, room_id: RoomId, deadline: OffsetDateTime, handler: Weak<dyn DeadlineHandler>) {
        self.cancel(room_id);

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        self.entries.insert(
            room_id,
            TimerEntry {
                generation,
                deadline,
                cancel: cancel.clone(),
            },
        );

        let delay = until(self.clock.now(), deadline);
        let entries = self.entries.clone();
        debug!(room_id, generation, delay_ms = delay.as_millis() as u64, "Turn timer armed");

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            let current = entries
                .remove_if(&room_id, |_, e| e.generation == generation)
                .is_some();
            if !current {
                trace!(room_id, generation, "Superseded timer fired, ignoring");
                return;
            }
            if let Some(handler) = handler.upgrade() {
                handler.on_deadline(room_id).await;
            }
        });
    }

    /// Cancel the room's timer, if any.
    pub fn cancel(&self, room_id: RoomId) {
        if let Some((_, entry)) = self.entries.remove(&room_id) {
            entry.cancel.cancel();
            trace!(room_id, generation = entry.generation, "Turn timer cancelled");
        }
    }

    pub fn cancel_all(&self) {
        for entry in self.entries.iter() {
            entry.cancel.cancel();
        }
        self.entries.clear();
    }

    pub fn deadline(&self, room_id: RoomId) -> Option<OffsetDateTime> {
        self.entries.get(&room_id).map(|e| e.deadline)
    }

    pub fn armed_count(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for TurnTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
