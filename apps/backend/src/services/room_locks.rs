//! Per-room async mutexes serializing every mutation of one room.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::room::RoomId;

#[derive(Default)]
pub struct RoomLocks {
    locks: DashMap<RoomId, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `room_id`. Dropping the guard releases it.
    pub async fn acquire(&self, room_id: RoomId) -> RoomGuard<'_> {
        // Clone the Arc out before awaiting so no shard lock is held.
        let lock = self
            .locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        RoomGuard {
            guard: Some(lock.lock_owned().await),
            locks: self,
            room_id,
        }
    }

    /// Drop the mutex for a room nobody holds or waits on.
    fn release_idle(&self, room_id: RoomId) {
        self.locks
            .remove_if(&room_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one room.
///
/// On drop the mutex is unlocked and, when no other task holds a handle to
/// it, removed from the map, so finished and abandoned rooms leave nothing
/// behind.
pub struct RoomGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a RoomLocks,
    room_id: RoomId,
}

impl Drop for RoomGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release_idle(self.room_id);
    }
}
